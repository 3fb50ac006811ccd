use std::path::PathBuf;

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::prelude::{Rect, Size};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::{
    action::Action,
    components::{Component, FilePrompt, Menu, PromptPicker, StatusBar, Toolbar},
    config::Config,
    dock::DockCommand,
    files::{FilesService, PickerSlot},
    layout::{preset::install_presets, LayoutDocument, LayoutSession, LayoutSource},
    mode::Mode,
    tui::{self, Event, Frame},
};

pub struct App {
    pub config: Config,
    pub tick_rate: f64,
    pub frame_rate: f64,
    pub components: Vec<Box<dyn Component>>,
    pub should_quit: bool,
    pub should_suspend: bool,
    pub mode: Mode,
    pub last_tick_key_events: Vec<KeyEvent>,
    session: LayoutSession,
    files: FilesService,
    picker: PickerSlot,
    presets_dir: PathBuf,
    startup: Option<LayoutSource>,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
}

impl App {
    pub fn new(tick_rate: f64, frame_rate: f64) -> Result<Self> {
        let config = Config::new()?;
        Ok(Self::with_config(config, tick_rate, frame_rate))
    }

    pub fn with_config(config: Config, tick_rate: f64, frame_rate: f64) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let session = LayoutSession::new(config.layout.session_settings());
        let files = FilesService::new(config.layout.save_dir());
        let presets_dir = config.layout.presets_dir();
        Self {
            tick_rate,
            frame_rate,
            components: vec![
                Box::new(Toolbar::new()),
                Box::new(StatusBar::new()),
                Box::new(Menu::add_menu()),
                Box::new(Menu::load_menu()),
                Box::new(FilePrompt::new()),
            ],
            should_quit: false,
            should_suspend: false,
            config,
            mode: Mode::Dashboard,
            last_tick_key_events: Vec::new(),
            session,
            files,
            picker: PickerSlot::default(),
            presets_dir,
            startup: None,
            action_tx,
            action_rx,
        }
    }

    /// Layout to load once the dashboard is up.
    pub fn startup(mut self, source: Option<LayoutSource>) -> Self {
        self.startup = source;
        self
    }

    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.files = FilesService::new(dir);
        self
    }

    pub fn presets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.presets_dir = dir.into();
        self
    }

    pub fn session(&self) -> &LayoutSession {
        &self.session
    }

    pub fn action_sender(&self) -> UnboundedSender<Action> {
        self.action_tx.clone()
    }

    /// Wires the components and builds the dashboard for a terminal of
    /// `size`.
    pub fn init(&mut self, size: Size) -> Result<()> {
        for component in self.components.iter_mut() {
            component.register_action_handler(self.action_tx.clone())?;
        }
        for component in self.components.iter_mut() {
            component.register_config_handler(self.config.clone())?;
        }
        for component in self.components.iter_mut() {
            component.init(size)?;
        }

        let container = Rect::new(
            0,
            1,
            size.width,
            size.height.saturating_sub(self.config.layout.header_offset),
        );
        self.session.set_theme(self.config.styles.dock_theme());
        self.session.initialize_layout(container);
        self.session.on_window_resize(size.width, size.height);

        match install_presets(&self.presets_dir) {
            Ok(installed) if !installed.is_empty() => {
                info!("Installed {} presets", installed.len());
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Could not install presets: {e}");
                self.action_tx
                    .send(Action::Error(format!("Could not install presets: {e}")))?;
            }
        }

        self.action_tx.send(Action::ModeChanged(self.mode))?;
        self.action_tx.send(Action::SystemMessage(
            "Press a to add a widget, o to load a layout".to_string(),
        ))?;
        if let Some(source) = self.startup.take() {
            self.action_tx.send(Action::LoadLayout(source))?;
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Quit => self.action_tx.send(Action::Quit)?,
            Event::Tick => self.action_tx.send(Action::Tick)?,
            Event::Render => self.action_tx.send(Action::Render)?,
            Event::Resize(x, y) => self.action_tx.send(Action::Resize(x, y))?,
            Event::Key(key) => return self.handle_key_event(key),
            Event::Mouse(mouse) if self.mode == Mode::Dashboard => {
                self.session.handle_mouse_event(mouse);
            }
            _ => {}
        }
        for component in self.components.iter_mut() {
            if let Some(action) = component.handle_events(Some(event.clone()))? {
                self.action_tx.send(action)?;
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if let Some(keymap) = self.config.keybindings.get(&self.mode) {
            if let Some(action) = keymap.get(&vec![key]) {
                info!("Got action: {action:?}");
                self.action_tx.send(action.clone())?;
                return Ok(());
            }

            // If the key was not handled as a single key action,
            // then consider it for multi-key combinations.
            self.last_tick_key_events.push(key);
            if let Some(action) = keymap.get(&self.last_tick_key_events) {
                info!("Got action: {action:?}");
                self.action_tx.send(action.clone())?;
                return Ok(());
            }
        }

        if self.mode == Mode::Dashboard {
            self.session.handle_key_event(key);
        }
        for component in self.components.iter_mut() {
            if let Some(action) = component.handle_events(Some(Event::Key(key)))? {
                self.action_tx.send(action)?;
            }
        }
        Ok(())
    }

    fn set_mode(&mut self, mode: Mode) -> Result<()> {
        if self.mode != mode {
            self.mode = mode;
            self.last_tick_key_events.clear();
            self.action_tx.send(Action::ModeChanged(mode))?;
        }
        Ok(())
    }

    fn message(&self, message: impl Into<String>) -> Result<()> {
        self.action_tx.send(Action::SystemMessage(message.into()))?;
        Ok(())
    }

    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        if action != Action::Tick && action != Action::Render {
            debug!("{action:?}");
        }
        match action.clone() {
            Action::Tick => {
                self.last_tick_key_events.drain(..);
            }
            Action::Quit => self.should_quit = true,
            Action::Suspend => self.should_suspend = true,
            Action::Resume => self.should_suspend = false,
            Action::Resize(width, height) => self.session.on_window_resize(width, height),
            Action::EnterMode(mode) => self.set_mode(mode)?,
            Action::AddWidget(kind) => {
                if self.session.add_widget(kind).is_some() {
                    self.message(format!("Added {}", kind.title()))?;
                }
                self.set_mode(Mode::Dashboard)?;
            }
            Action::SaveLayout => match self.session.save_layout(&self.files) {
                Ok(Some(path)) => self.message(format!("Layout saved to {}", path.display()))?,
                Ok(None) => {}
                Err(e) => {
                    error!("Failed to save the layout: {e}");
                    self.action_tx.send(Action::Error(e.to_string()))?;
                }
            },
            Action::LoadLayout(source) => {
                self.set_mode(Mode::Dashboard)?;
                self.spawn_load(source);
            }
            Action::LayoutLoaded(document) => {
                if self.session.load_document(document) {
                    self.message("Layout loaded")?;
                } else {
                    self.action_tx
                        .send(Action::Error("The layout could not be loaded.".to_string()))?;
                }
            }
            Action::ClearLayout => {
                self.session.clear_layout();
                self.message("Layout cleared")?;
            }
            Action::OpenFilePrompt(_) => self.set_mode(Mode::FilePrompt)?,
            Action::SubmitFilePath(path) => {
                let path = (!path.is_empty()).then(|| PathBuf::from(path));
                self.picker.resolve(path);
                self.set_mode(Mode::Dashboard)?;
            }
            Action::CancelFilePrompt => {
                self.picker.resolve(None);
                self.set_mode(Mode::Dashboard)?;
            }
            Action::FocusNext => self.session.execute(DockCommand::FocusNext),
            Action::FocusPrevious => self.session.execute(DockCommand::FocusPrevious),
            Action::ClosePane => self.session.execute(DockCommand::CloseFocused),
            Action::GrowPane => self.session.execute(DockCommand::Grow),
            Action::ShrinkPane => self.session.execute(DockCommand::Shrink),
            _ => {}
        }
        for component in self.components.iter_mut() {
            if let Some(action) = component.update(action.clone())? {
                self.action_tx.send(action)?;
            };
        }
        Ok(())
    }

    /// Reads a layout document in the background and reports the outcome as
    /// an action. Loads are not ordered: the last one to finish is applied
    /// last.
    fn spawn_load(&self, source: LayoutSource) {
        let files = self.files.clone();
        let tx = self.action_tx.clone();
        let picker = PromptPicker::new(self.picker.clone(), self.action_tx.clone());
        let presets_dir = self.presets_dir.clone();
        tokio::spawn(async move {
            let loaded = match source {
                LayoutSource::Custom => files.load_json_file(&picker).await,
                LayoutSource::Preset(preset) => {
                    files
                        .load_json_file_from_path(&preset.path_in(&presets_dir))
                        .await
                }
                LayoutSource::File(path) => files.load_json_file_from_path(&path).await,
            };
            let action = match loaded.map(serde_json::from_value::<LayoutDocument>) {
                Ok(Ok(document)) => Action::LayoutLoaded(document),
                Ok(Err(e)) => {
                    error!("Failed to load the layout: {e}");
                    Action::Error("The file is not a layout document.".to_string())
                }
                Err(e) => {
                    error!("Failed to load the layout: {e}");
                    Action::Error(e.to_string())
                }
            };
            let _ = tx.send(action);
        });
    }

    /// Handles every queued action, then lets the layout react to the state
    /// changes they caused.
    pub fn process_actions(&mut self) -> Result<()> {
        while let Ok(action) = self.action_rx.try_recv() {
            self.handle_action(action)?;
        }
        self.session.sync_state();
        Ok(())
    }

    pub fn render(&mut self, f: &mut Frame<'_>) {
        self.session.draw(f);
        let area = f.area();
        for component in self.components.iter_mut() {
            if let Err(e) = component.draw(f, area) {
                let _ = self
                    .action_tx
                    .send(Action::Error(format!("Failed to draw: {e:?}")));
            }
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = tui::Tui::new()?
            .tick_rate(self.tick_rate)
            .frame_rate(self.frame_rate)
            .mouse(true);
        tui.enter()?;
        self.init(tui.size()?)?;

        loop {
            if let Some(e) = tui.next().await {
                self.handle_event(e)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                let redraw = matches!(action, Action::Render | Action::Resize(..));
                if let Action::Resize(w, h) = action {
                    tui.resize(Rect::new(0, 0, w, h))?;
                }
                self.handle_action(action)?;
                if redraw {
                    tui.draw(|f| self.render(f))?;
                }
            }
            self.session.sync_state();

            if self.should_suspend {
                tui.suspend()?;
                self.action_tx.send(Action::Resume)?;
                tui = tui::Tui::new()?
                    .tick_rate(self.tick_rate)
                    .frame_rate(self.frame_rate)
                    .mouse(true);
                tui.enter()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }
}
