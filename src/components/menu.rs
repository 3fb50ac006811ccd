use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use strum::IntoEnumIterator;
use unicode_width::UnicodeWidthStr;

use super::{centered_rect, Component};
use crate::{
    action::Action,
    config::Config,
    layout::{LayoutPreset, LayoutSource},
    mode::Mode,
    tui::Frame,
    widgets::WidgetKind,
};

/// A popup list of actions, shown while the app is in its mode.
pub struct Menu {
    mode: Mode,
    title: &'static str,
    items: Vec<(String, Action)>,
    state: ListState,
    visible: bool,
    highlight: Style,
}

impl Menu {
    pub fn new(mode: Mode, title: &'static str, items: Vec<(String, Action)>) -> Self {
        Self {
            mode,
            title,
            items,
            state: ListState::default().with_selected(Some(0)),
            visible: false,
            highlight: Style::default().reversed(),
        }
    }

    /// "Add component": one entry per widget kind.
    pub fn add_menu() -> Self {
        let items = WidgetKind::iter()
            .enumerate()
            .map(|(index, kind)| {
                (
                    format!("{} {}", index + 1, kind.title()),
                    Action::AddWidget(kind),
                )
            })
            .collect();
        Self::new(Mode::AddMenu, " Add component ", items)
    }

    /// "Load layout": a custom file or one of the presets.
    pub fn load_menu() -> Self {
        let mut items = vec![(
            "c Custom file...".to_string(),
            Action::LoadLayout(LayoutSource::Custom),
        )];
        items.extend(LayoutPreset::iter().enumerate().map(|(index, preset)| {
            (
                format!("{} {} preset", index + 1, preset.title()),
                Action::LoadLayout(LayoutSource::Preset(preset)),
            )
        }));
        Self::new(Mode::LoadMenu, " Load layout ", items)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn selected(&self) -> Option<&Action> {
        self.state
            .selected()
            .and_then(|index| self.items.get(index))
            .map(|(_, action)| action)
    }

    /// Columns needed for the widest label or the title, plus borders and
    /// the highlight symbol.
    fn popup_width(&self) -> u16 {
        let widest = self
            .items
            .iter()
            .map(|(label, _)| label.width())
            .max()
            .unwrap_or_default()
            .max(self.title.width());
        u16::try_from(widest).unwrap_or(u16::MAX).saturating_add(6)
    }

    fn select_offset(&mut self, forward: bool) {
        let last = self.items.len().saturating_sub(1);
        let next = match (self.state.selected(), forward) {
            (Some(index), true) => (index + 1).min(last),
            (Some(index), false) => index.saturating_sub(1),
            (None, _) => 0,
        };
        self.state.select(Some(next));
    }
}

impl Component for Menu {
    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        if let Some(style) = config.styles.get_style(self.mode, "highlight") {
            self.highlight = style;
        }
        Ok(())
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if !self.visible {
            return Ok(None);
        }
        let action = match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_offset(true);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_offset(false);
                None
            }
            KeyCode::Enter => self.selected().cloned(),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::ModeChanged(mode) = action {
            let visible = mode == self.mode;
            if visible && !self.visible {
                self.state.select(Some(0));
            }
            self.visible = visible;
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        if !self.visible {
            return Ok(());
        }
        let width = self.popup_width();
        let height = self.items.len() as u16 + 2;
        let popup = centered_rect(area, width, height);

        let items: Vec<ListItem> = self
            .items
            .iter()
            .map(|(label, _)| ListItem::new(label.as_str()))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(self.title)
                    .title_bottom(Line::from(" Enter: select  Esc: close ").right_aligned()),
            )
            .highlight_style(self.highlight)
            .highlight_symbol("> ");
        f.render_widget(Clear, popup);
        f.render_stateful_widget(list, popup, &mut self.state);
        Ok(())
    }
}
