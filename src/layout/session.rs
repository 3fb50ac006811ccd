use std::path::PathBuf;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};
use serde_json::Value;
use tracing::{error, info, warn};

use super::{document::LayoutDocument, registry::RegisteredSet, registry::WidgetDescriptor};
use crate::{
    dock::{
        Dimensions, DockCommand, DockEvent, DockLayout, DockTheme, DockingEngine, ItemConfig,
        LayoutConfig, Settings,
    },
    files::{FileError, FilesService},
};

pub const DEFAULT_SAVE_FILE_NAME: &str = "layout-config.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Rows of the window not available to the docking surface.
    pub header_offset: u16,
    pub save_file_name: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            header_offset: 2,
            save_file_name: DEFAULT_SAVE_FILE_NAME.to_string(),
        }
    }
}

/// Owns the docking engine of the dashboard and the set of widget names that
/// have a mount callback in it.
///
/// The session starts uninitialized. [`LayoutSession::initialize_layout`]
/// builds the engine once; every other operation logs an error and does
/// nothing until then.
pub struct LayoutSession<E: DockingEngine = DockLayout> {
    pub(super) engine: Option<E>,
    pub(super) registered: RegisteredSet,
    container: Option<Rect>,
    window: Option<(u16, u16)>,
    settings: SessionSettings,
    theme: Option<DockTheme>,
}

impl<E: DockingEngine> Default for LayoutSession<E> {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}

impl<E: DockingEngine> LayoutSession<E> {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            engine: None,
            registered: RegisteredSet::default(),
            container: None,
            window: None,
            settings,
            theme: None,
        }
    }

    pub fn default_config() -> LayoutConfig {
        LayoutConfig {
            root: Some(ItemConfig::row(Vec::new())),
            settings: Settings {
                show_popout_icon: false,
                show_maximise_icon: false,
                show_close_icon: true,
            },
            dimensions: Dimensions { header_height: 1 },
        }
    }

    pub fn initialize_layout(&mut self, container: Rect) {
        if self.engine.is_some() {
            warn!("Layout is already initialized");
            return;
        }

        let mut engine = E::new(container);
        if let Some(theme) = self.theme {
            engine.set_theme(theme);
        }
        if let Err(e) = engine.load_layout(Self::default_config()) {
            error!("Failed to load the default layout: {e}");
        }
        self.container = Some(container);
        self.engine = Some(engine);
        info!("Layout initialized at {container:?}");
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some() && self.container.is_some()
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.engine.as_mut()
    }

    pub fn registered(&self) -> &RegisteredSet {
        &self.registered
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn set_theme(&mut self, theme: DockTheme) {
        self.theme = Some(theme);
        if let Some(engine) = self.engine.as_mut() {
            engine.set_theme(theme);
        }
    }

    pub(super) fn has_errors(&self) -> bool {
        if self.engine.is_none() {
            error!("Layout does not exist.");
            return true;
        }
        if self.container.is_none() {
            error!("Container element not found.");
            return true;
        }
        false
    }

    /// The document `save_layout` would write.
    pub fn current_document(&self) -> Option<LayoutDocument> {
        if self.has_errors() {
            return None;
        }
        let engine = self.engine.as_ref()?;
        let layout_data = match serde_json::to_value(engine.save_layout()) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to serialize the layout: {e}");
                return None;
            }
        };
        Some(LayoutDocument {
            imported_components: self.registered.to_vec(),
            layout_data,
        })
    }

    /// Writes the current layout through `files`. `Ok(None)` means the
    /// session was not ready and nothing was written.
    pub fn save_layout(&self, files: &FilesService) -> Result<Option<PathBuf>, FileError> {
        let Some(document) = self.current_document() else {
            return Ok(None);
        };
        let path = files.save_json_file(&document, &self.settings.save_file_name)?;
        info!("Layout saved to {}", path.display());
        Ok(Some(path))
    }

    /// Applies saved layout data. Panes whose component name has no mount
    /// callback yet stay empty; see [`LayoutSession::load_document`].
    pub fn load_layout(&mut self, layout_data: Value) -> bool {
        if self.has_errors() {
            return false;
        }
        let config = match LayoutConfig::from_resolved_value(layout_data) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load the layout: {e}");
                return false;
            }
        };
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        match engine.load_layout(config) {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to load the layout: {e}");
                false
            }
        }
    }

    /// Registers every known component the document references, then loads
    /// its layout data.
    pub fn load_document(&mut self, document: LayoutDocument) -> bool {
        if self.has_errors() {
            return false;
        }
        for name in &document.imported_components {
            match WidgetDescriptor::from_logical_name(name) {
                Some(descriptor) => self.register_descriptor(descriptor),
                None => warn!("Component \"{name}\" is not recognized."),
            }
        }
        self.load_layout(document.layout_data)
    }

    /// Removes every pane. Registered components stay registered.
    pub fn clear_layout(&mut self) {
        if self.has_errors() {
            return;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.clear();
        }
    }

    pub fn on_window_resize(&mut self, width: u16, height: u16) {
        self.window = Some((width, height));
        if self.engine.is_some() {
            self.resize_layout();
        }
    }

    /// Reacts to the state changes the engine reported since the last call.
    /// Returns `true` if the engine was resized.
    pub fn sync_state(&mut self) -> bool {
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };
        let changed = engine
            .take_events()
            .iter()
            .any(|event| *event == DockEvent::StateChanged);
        if changed {
            self.resize_layout();
        }
        changed
    }

    /// The size the docking surface should have right now.
    pub fn available_size(&self) -> Option<(u16, u16)> {
        match (self.window, self.container) {
            (Some((width, height)), _) => {
                Some((width, height.saturating_sub(self.settings.header_offset)))
            }
            (None, Some(container)) => Some((container.width, container.height)),
            (None, None) => None,
        }
    }

    fn resize_layout(&mut self) {
        let Some((width, height)) = self.available_size() else {
            return;
        };
        if let Some(engine) = self.engine.as_mut() {
            engine.set_size(width, height);
        }
    }

    pub fn execute(&mut self, command: DockCommand) {
        if self.has_errors() {
            return;
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.execute(command);
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        self.engine
            .as_mut()
            .is_some_and(|engine| engine.handle_key_event(key))
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if let Some(engine) = self.engine.as_mut() {
            engine.handle_mouse_event(mouse);
        }
    }

    pub fn draw(&mut self, f: &mut Frame<'_>) {
        if let Some(engine) = self.engine.as_mut() {
            engine.draw(f);
        }
    }
}
