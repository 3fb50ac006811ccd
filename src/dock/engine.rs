use std::{collections::HashMap, mem};

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use super::{
    config::{Dimensions, LayoutConfig, ResolvedLayoutConfig, Settings, DEFAULT_ITEM_SIZE},
    container::{ComponentContainer, PaneId},
    item::{Item, Split, Stack},
    DockError,
};

/// Mount callback invoked whenever a pane of the registered type is created.
pub type ComponentFactoryFn = Box<dyn Fn(&mut ComponentContainer)>;

const SIZE_STEP: u16 = 2;
const MAX_ITEM_SIZE: u16 = 100;
const CLOSE_MARKER: &str = "×";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockEvent {
    PaneAdded(PaneId),
    PaneClosed(PaneId),
    StateChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockCommand {
    FocusNext,
    FocusPrevious,
    CloseFocused,
    Grow,
    Shrink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockTheme {
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub border: Style,
    pub border_focused: Style,
    pub empty: Style,
}

impl Default for DockTheme {
    fn default() -> Self {
        Self {
            tab_active: Style::default().fg(Color::Black).bg(Color::Yellow).bold(),
            tab_inactive: Style::default().fg(Color::Gray).bg(Color::DarkGray),
            border: Style::default().fg(Color::DarkGray),
            border_focused: Style::default().fg(Color::Yellow),
            empty: Style::default().fg(Color::DarkGray).italic(),
        }
    }
}

/// The operations a layout session needs from a docking engine.
pub trait DockingEngine {
    /// Creates an engine hosted at `container`. The engine is empty until a
    /// layout is loaded.
    fn new(container: Rect) -> Self
    where
        Self: Sized;

    fn load_layout(&mut self, config: LayoutConfig) -> Result<(), DockError>;

    fn save_layout(&self) -> ResolvedLayoutConfig;

    fn add_component(
        &mut self,
        component_type: &str,
        component_state: Option<Value>,
        title: &str,
    ) -> Result<PaneId, DockError>;

    fn register_component_factory_function(
        &mut self,
        component_type: &str,
        factory: ComponentFactoryFn,
    );

    fn clear(&mut self);

    fn set_size(&mut self, width: u16, height: u16);

    /// Drains the notifications queued since the last call.
    fn take_events(&mut self) -> Vec<DockEvent>;

    fn execute(&mut self, command: DockCommand);

    fn handle_key_event(&mut self, key: KeyEvent) -> bool;

    fn handle_mouse_event(&mut self, mouse: MouseEvent);

    fn draw(&mut self, f: &mut Frame<'_>);

    fn set_theme(&mut self, _theme: DockTheme) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HitTarget {
    Tab(PaneId),
    Close(PaneId),
    Body(PaneId),
}

/// Tiling layout of rows, columns and tabbed stacks.
pub struct DockLayout {
    container: Rect,
    width: u16,
    height: u16,
    root: Item,
    settings: Settings,
    dimensions: Dimensions,
    factories: HashMap<String, ComponentFactoryFn>,
    focused: Option<PaneId>,
    next_id: u64,
    events: Vec<DockEvent>,
    hit_regions: Vec<(Rect, HitTarget)>,
    theme: DockTheme,
}

impl DockLayout {
    pub fn container(&self) -> Rect {
        self.container
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn focused(&self) -> Option<PaneId> {
        self.focused
    }

    pub fn panes(&self) -> Vec<&ComponentContainer> {
        let mut panes = Vec::new();
        self.root.collect_panes(&mut panes);
        panes
    }

    pub fn pane(&self, id: PaneId) -> Option<&ComponentContainer> {
        self.panes().into_iter().find(|pane| pane.id() == id)
    }

    pub fn has_factory(&self, component_type: &str) -> bool {
        self.factories.contains_key(component_type)
    }

    fn create_container(
        factories: &HashMap<String, ComponentFactoryFn>,
        next_id: &mut u64,
        component_type: String,
        title: String,
        state: Option<Value>,
    ) -> ComponentContainer {
        *next_id += 1;
        let mut container =
            ComponentContainer::new(PaneId::new(*next_id), component_type, title, state);
        match factories.get(container.component_type()) {
            Some(factory) => factory(&mut container),
            None => {
                tracing::warn!(
                    "No factory registered for component type \"{}\"; pane stays empty",
                    container.component_type()
                );
            }
        }
        container
    }

    fn notify(&mut self, event: DockEvent) {
        self.events.push(event);
        if event != DockEvent::StateChanged {
            self.events.push(DockEvent::StateChanged);
        }
    }

    fn pane_ids(&self) -> Vec<PaneId> {
        self.panes().iter().map(|pane| pane.id()).collect()
    }

    pub fn focus(&mut self, id: PaneId) {
        if let Some(stack) = self.root.stack_of_mut(id) {
            if let Some(index) = stack.position(id) {
                stack.active = index;
                self.focused = Some(id);
            }
        }
    }

    fn focus_offset(&mut self, forward: bool) {
        let ids = self.pane_ids();
        if ids.is_empty() {
            self.focused = None;
            return;
        }
        let current = self
            .focused
            .and_then(|focused| ids.iter().position(|id| *id == focused));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => ids.len() - 1,
            (Some(index), true) => (index + 1) % ids.len(),
            (Some(index), false) => (index + ids.len() - 1) % ids.len(),
        };
        self.focus(ids[next]);
    }

    pub fn close_pane(&mut self, id: PaneId) {
        let ids = self.pane_ids();
        let Some(order) = ids.iter().position(|pane| *pane == id) else {
            return;
        };
        if let Some(stack) = self.root.stack_of_mut(id) {
            if let Some(index) = stack.position(id) {
                stack.panes.remove(index);
                if stack.active >= stack.panes.len() {
                    stack.active = stack.panes.len().saturating_sub(1);
                }
            }
        }
        self.root.prune();

        if self.focused == Some(id) || self.focused.is_none() {
            let remaining = self.pane_ids();
            self.focused = None;
            if !remaining.is_empty() {
                let next = remaining[order.min(remaining.len() - 1)];
                self.focus(next);
            }
        }
        self.notify(DockEvent::PaneClosed(id));
    }

    fn resize_focused(&mut self, grow: bool) {
        let Some(id) = self.focused else {
            return;
        };
        let Some(stack) = self.root.stack_of_mut(id) else {
            return;
        };
        let size = if grow {
            stack.size.saturating_add(SIZE_STEP).min(MAX_ITEM_SIZE)
        } else {
            stack.size.saturating_sub(SIZE_STEP).max(1)
        };
        if size != stack.size {
            stack.size = size;
            self.notify(DockEvent::StateChanged);
        }
    }

    fn draw_item(&mut self, f: &mut Frame<'_>, area: Rect, path: &[usize]) {
        let Some(item) = item_at(&self.root, path) else {
            return;
        };
        match item {
            Item::Split(split) => {
                let constraints: Vec<_> = split
                    .children
                    .iter()
                    .map(|child| Constraint::Fill(child.size()))
                    .collect();
                let areas = Layout::default()
                    .direction(split.axis.direction())
                    .constraints(constraints)
                    .split(area);
                let count = split.children.len();
                for index in 0..count {
                    let mut child_path = path.to_vec();
                    child_path.push(index);
                    self.draw_item(f, areas[index], &child_path);
                }
            }
            Item::Stack(_) => self.draw_stack(f, area, path),
        }
    }

    fn draw_stack(&mut self, f: &mut Frame<'_>, area: Rect, path: &[usize]) {
        let header_height = self.dimensions.header_height;
        let show_close = self.settings.show_close_icon;
        let focused = self.focused;
        let theme = self.theme;

        let [header, body] = Layout::vertical([
            Constraint::Length(header_height),
            Constraint::Min(0),
        ])
        .areas(area);

        let mut regions = Vec::new();
        let Some(Item::Stack(stack)) = item_at_mut(&mut self.root, path) else {
            return;
        };

        let mut x = header.x;
        let right = header.x.saturating_add(header.width);
        let mut spans = Vec::new();
        for (index, pane) in stack.panes.iter().enumerate() {
            if x >= right {
                break;
            }
            let style = if index == stack.active {
                theme.tab_active
            } else {
                theme.tab_inactive
            };
            let title = format!(" {} ", pane.title());
            let title_width = (title.width() as u16).min(right - x);
            regions.push((
                Rect::new(x, header.y, title_width, header.height),
                HitTarget::Tab(pane.id()),
            ));
            spans.push(Span::styled(title, style));
            x = x.saturating_add(title_width);
            if show_close && x < right {
                regions.push((
                    Rect::new(x, header.y, 1, header.height),
                    HitTarget::Close(pane.id()),
                ));
                spans.push(Span::styled(CLOSE_MARKER, style));
                spans.push(Span::raw(" "));
                x = x.saturating_add(2);
            }
        }
        f.render_widget(Paragraph::new(Line::from(spans)), header);

        let is_focused = stack
            .panes
            .get(stack.active)
            .is_some_and(|pane| Some(pane.id()) == focused);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if is_focused {
                theme.border_focused
            } else {
                theme.border
            });
        let inner = block.inner(body);
        f.render_widget(block, body);

        if let Some(pane) = stack.active_pane_mut() {
            regions.push((body, HitTarget::Body(pane.id())));
            match pane.element_mut().first_mut() {
                Some(panel) => panel.draw(f, inner),
                None => {
                    let placeholder = Paragraph::new(format!(
                        "\"{}\" is not available",
                        pane.component_type()
                    ))
                    .style(theme.empty)
                    .alignment(Alignment::Center);
                    f.render_widget(placeholder, inner);
                }
            }
        }
        self.hit_regions.extend(regions);
    }
}

fn item_at<'a>(item: &'a Item, path: &[usize]) -> Option<&'a Item> {
    match path.split_first() {
        None => Some(item),
        Some((index, rest)) => match item {
            Item::Split(split) => item_at(split.children.get(*index)?, rest),
            Item::Stack(_) => None,
        },
    }
}

fn item_at_mut<'a>(item: &'a mut Item, path: &[usize]) -> Option<&'a mut Item> {
    match path.split_first() {
        None => Some(item),
        Some((index, rest)) => match item {
            Item::Split(split) => item_at_mut(split.children.get_mut(*index)?, rest),
            Item::Stack(_) => None,
        },
    }
}

impl DockingEngine for DockLayout {
    fn new(container: Rect) -> Self {
        Self {
            container,
            width: container.width,
            height: container.height,
            root: Item::empty_row(),
            settings: Settings::default(),
            dimensions: Dimensions::default(),
            factories: HashMap::new(),
            focused: None,
            next_id: 0,
            events: Vec::new(),
            hit_regions: Vec::new(),
            theme: DockTheme::default(),
        }
    }

    fn load_layout(&mut self, config: LayoutConfig) -> Result<(), DockError> {
        let factories = &self.factories;
        let next_id = &mut self.next_id;
        let mut create = |component_type, title, state| {
            Self::create_container(factories, next_id, component_type, title, state)
        };
        let root = match config.root {
            Some(root) => Item::from_config(root, &mut create)?,
            None => Item::empty_row(),
        };

        self.root = root;
        self.root.prune();
        self.settings = config.settings;
        self.dimensions = config.dimensions;
        self.focused = None;
        if let Some(first) = self.pane_ids().first().copied() {
            self.focus(first);
        }
        self.notify(DockEvent::StateChanged);
        Ok(())
    }

    fn save_layout(&self) -> ResolvedLayoutConfig {
        ResolvedLayoutConfig {
            resolved: true,
            root: Some(self.root.to_config()),
            settings: self.settings,
            dimensions: self.dimensions,
        }
    }

    fn add_component(
        &mut self,
        component_type: &str,
        component_state: Option<Value>,
        title: &str,
    ) -> Result<PaneId, DockError> {
        if component_type.is_empty() {
            return Err(DockError::InvalidItem(
                "component without a componentType".to_string(),
            ));
        }
        let container = Self::create_container(
            &self.factories,
            &mut self.next_id,
            component_type.to_string(),
            title.to_string(),
            component_state,
        );
        let id = container.id();
        match &mut self.root {
            Item::Stack(stack) => {
                stack.panes.push(container);
            }
            Item::Split(split) => split
                .children
                .push(Item::Stack(Stack::single(container, DEFAULT_ITEM_SIZE))),
        }
        self.focus(id);
        self.notify(DockEvent::PaneAdded(id));
        Ok(id)
    }

    fn register_component_factory_function(
        &mut self,
        component_type: &str,
        factory: ComponentFactoryFn,
    ) {
        self.factories.insert(component_type.to_string(), factory);
    }

    fn clear(&mut self) {
        self.root = match &self.root {
            Item::Split(split) => Item::Split(Split {
                axis: split.axis,
                children: Vec::new(),
                size: split.size,
            }),
            Item::Stack(_) => Item::empty_row(),
        };
        self.focused = None;
        self.notify(DockEvent::StateChanged);
    }

    fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    fn take_events(&mut self) -> Vec<DockEvent> {
        mem::take(&mut self.events)
    }

    fn execute(&mut self, command: DockCommand) {
        match command {
            DockCommand::FocusNext => self.focus_offset(true),
            DockCommand::FocusPrevious => self.focus_offset(false),
            DockCommand::CloseFocused => {
                if let Some(id) = self.focused {
                    self.close_pane(id);
                }
            }
            DockCommand::Grow => self.resize_focused(true),
            DockCommand::Shrink => self.resize_focused(false),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        let Some(id) = self.focused else {
            return false;
        };
        let Some(stack) = self.root.stack_of_mut(id) else {
            return false;
        };
        stack
            .active_pane_mut()
            .and_then(|pane| pane.element_mut().first_mut())
            .is_some_and(|panel| panel.handle_key_event(key))
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let position = Position::new(mouse.column, mouse.row);
        let target = self
            .hit_regions
            .iter()
            .find(|(area, target)| {
                area.contains(position) && !matches!(target, HitTarget::Body(_))
            })
            .or_else(|| {
                self.hit_regions
                    .iter()
                    .find(|(area, _)| area.contains(position))
            })
            .map(|(_, target)| *target);
        match target {
            Some(HitTarget::Tab(id)) | Some(HitTarget::Body(id)) => self.focus(id),
            Some(HitTarget::Close(id)) => self.close_pane(id),
            None => {}
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>) {
        self.hit_regions.clear();
        let area = Rect::new(self.container.x, self.container.y, self.width, self.height)
            .intersection(f.area());
        if area.is_empty() {
            return;
        }
        self.draw_item(f, area, &[]);
    }

    fn set_theme(&mut self, theme: DockTheme) {
        self.theme = theme;
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::dock::{container::Panel, ItemConfig};

    struct LabelPanel {
        label: &'static str,
        keys: Rc<RefCell<Vec<KeyCode>>>,
    }

    impl Panel for LabelPanel {
        fn draw(&mut self, f: &mut Frame<'_>, area: Rect) {
            f.render_widget(Paragraph::new(self.label), area);
        }

        fn handle_key_event(&mut self, key: KeyEvent) -> bool {
            self.keys.borrow_mut().push(key.code);
            true
        }
    }

    fn engine_with_factories(keys: &Rc<RefCell<Vec<KeyCode>>>) -> DockLayout {
        let mut engine = DockLayout::new(Rect::new(0, 0, 40, 10));
        for (component_type, label) in [("table", "TABLE"), ("tree", "TREE")] {
            let keys = Rc::clone(keys);
            engine.register_component_factory_function(
                component_type,
                Box::new(move |container: &mut ComponentContainer| {
                    container.element_mut().append(Box::new(LabelPanel {
                        label,
                        keys: Rc::clone(&keys),
                    }))
                }),
            );
        }
        engine
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_add_component_mounts_and_focuses() {
        let keys = Rc::new(RefCell::new(Vec::new()));
        let mut engine = engine_with_factories(&keys);
        let id = engine.add_component("table", None, "Table").expect("added");

        assert_eq!(engine.focused(), Some(id));
        assert!(engine.pane(id).is_some_and(ComponentContainer::is_mounted));
        assert_eq!(
            engine.take_events(),
            vec![DockEvent::PaneAdded(id), DockEvent::StateChanged]
        );
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn test_unregistered_component_stays_empty() {
        let mut engine = DockLayout::new(Rect::new(0, 0, 40, 10));
        let id = engine.add_component("pieGraph", None, "Pie").expect("added");
        assert!(engine.pane(id).is_some_and(|pane| !pane.is_mounted()));
    }

    #[test]
    fn test_add_component_rejects_empty_type() {
        let mut engine = DockLayout::new(Rect::new(0, 0, 40, 10));
        assert!(matches!(
            engine.add_component("", None, ""),
            Err(DockError::InvalidItem(_))
        ));
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn test_save_then_load_restores_arrangement() {
        let keys = Rc::new(RefCell::new(Vec::new()));
        let mut engine = engine_with_factories(&keys);
        engine.add_component("table", None, "Table").expect("added");
        engine.add_component("tree", None, "Tree").expect("added");
        let saved = engine.save_layout();

        let mut restored = engine_with_factories(&keys);
        restored
            .load_layout(LayoutConfig::from_resolved(saved.clone()).expect("resolved"))
            .expect("loaded");
        assert_eq!(restored.save_layout(), saved);
        assert!(restored.panes().iter().all(|pane| pane.is_mounted()));
    }

    #[test]
    fn test_close_focused_moves_focus_and_prunes() {
        let keys = Rc::new(RefCell::new(Vec::new()));
        let mut engine = engine_with_factories(&keys);
        let first = engine.add_component("table", None, "Table").expect("added");
        let second = engine.add_component("tree", None, "Tree").expect("added");
        engine.take_events();

        engine.execute(DockCommand::CloseFocused);
        assert_eq!(engine.focused(), Some(first));
        assert!(engine.pane(second).is_none());
        assert_eq!(
            engine.save_layout().root,
            Some(ItemConfig::row(vec![ItemConfig::stack(vec![
                ItemConfig::component("table", "Table")
            ])]))
        );
        assert!(engine.take_events().contains(&DockEvent::StateChanged));
    }

    #[test]
    fn test_focus_cycles_both_directions() {
        let keys = Rc::new(RefCell::new(Vec::new()));
        let mut engine = engine_with_factories(&keys);
        let first = engine.add_component("table", None, "Table").expect("added");
        let second = engine.add_component("tree", None, "Tree").expect("added");

        engine.execute(DockCommand::FocusNext);
        assert_eq!(engine.focused(), Some(first));
        engine.execute(DockCommand::FocusPrevious);
        assert_eq!(engine.focused(), Some(second));
    }

    #[test]
    fn test_grow_and_shrink_are_bounded() {
        let keys = Rc::new(RefCell::new(Vec::new()));
        let mut engine = engine_with_factories(&keys);
        engine.add_component("table", None, "Table").expect("added");
        for _ in 0..100 {
            engine.execute(DockCommand::Shrink);
        }
        let Some(ItemConfig::Row { content, .. }) = engine.save_layout().root else {
            panic!("expected a row root");
        };
        assert_eq!(content[0].size(), 1);
    }

    #[test]
    fn test_keys_go_to_focused_panel() {
        let keys = Rc::new(RefCell::new(Vec::new()));
        let mut engine = engine_with_factories(&keys);
        engine.add_component("table", None, "Table").expect("added");
        let consumed =
            engine.handle_key_event(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        assert!(consumed);
        assert_eq!(*keys.borrow(), vec![KeyCode::Down]);
    }

    #[test]
    fn test_clear_keeps_factories() {
        let keys = Rc::new(RefCell::new(Vec::new()));
        let mut engine = engine_with_factories(&keys);
        engine.add_component("table", None, "Table").expect("added");
        engine.clear();
        assert!(engine.panes().is_empty());
        assert_eq!(engine.focused(), None);
        assert!(engine.has_factory("table"));
    }

    #[test]
    fn test_zero_size_items_still_get_space() {
        let keys = Rc::new(RefCell::new(Vec::new()));
        let mut engine = engine_with_factories(&keys);
        let hidden = ItemConfig::Stack {
            content: vec![ItemConfig::component("table", "AAAA")],
            active_item_index: 0,
            size: 0,
        };
        let config = LayoutConfig {
            root: Some(ItemConfig::row(vec![
                hidden,
                ItemConfig::Stack {
                    content: vec![ItemConfig::component("tree", "BBBB")],
                    active_item_index: 0,
                    size: 1,
                },
            ])),
            ..LayoutConfig::default()
        };
        engine.load_layout(config).expect("loaded");
        engine.set_size(40, 10);

        let mut terminal = Terminal::new(TestBackend::new(40, 10)).expect("terminal");
        terminal.draw(|f| engine.draw(f)).expect("draw");
        let text = buffer_text(&terminal);
        assert!(text.contains("AAAA"));
        assert!(text.contains("BBBB"));
    }

    #[test]
    fn test_draw_respects_set_size_and_click_closes() {
        let keys = Rc::new(RefCell::new(Vec::new()));
        let mut engine = engine_with_factories(&keys);
        let id = engine.add_component("table", None, "Table").expect("added");
        engine.set_size(20, 6);

        let mut terminal = Terminal::new(TestBackend::new(40, 10)).expect("terminal");
        terminal.draw(|f| engine.draw(f)).expect("draw");
        let text = buffer_text(&terminal);
        assert!(text.contains("Table"));
        assert!(text.contains("TABLE"));
        // nothing beyond the configured width
        let second_row = &terminal.backend().buffer().content()[40..80];
        assert!(second_row[20..].iter().all(|cell| cell.symbol() == " "));

        // " Table " is 7 cells wide, the close marker follows
        engine.handle_mouse_event(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 7,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert!(engine.pane(id).is_none());
    }
}
