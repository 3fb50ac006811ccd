use color_eyre::eyre::Result;
use ratatui::{prelude::*, widgets::*};

use super::Component;
use crate::{
    action::Action,
    config::{key_event_to_string, Config},
    mode::Mode,
    tui::Frame,
};

const ENTRIES: [(&str, Action); 5] = [
    ("Add", Action::EnterMode(Mode::AddMenu)),
    ("Load", Action::EnterMode(Mode::LoadMenu)),
    ("Save", Action::SaveLayout),
    ("Clear", Action::ClearLayout),
    ("Quit", Action::Quit),
];

/// The top row: menu entries with the key that triggers each of them.
#[derive(Default)]
pub struct Toolbar {
    config: Config,
    mode: Mode,
}

impl Toolbar {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first key bound to `action` in dashboard mode.
    fn key_for(&self, action: &Action) -> Option<String> {
        let keymap = self.config.keybindings.get(&Mode::Dashboard)?;
        let mut keys: Vec<String> = keymap
            .iter()
            .filter(|(_, bound)| *bound == action)
            .filter_map(|(sequence, _)| {
                let names: Vec<String> = sequence.iter().map(key_event_to_string).collect();
                (!names.is_empty()).then(|| names.join(" "))
            })
            .collect();
        keys.sort_by_key(|key| (key.len(), key.clone()));
        keys.into_iter().next()
    }

    pub fn entries(&self) -> Vec<(String, &'static str)> {
        ENTRIES
            .iter()
            .filter_map(|(label, action)| Some((self.key_for(action)?, *label)))
            .collect()
    }
}

impl Component for Toolbar {
    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.config = config;
        Ok(())
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::ModeChanged(mode) = action {
            self.mode = mode;
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [row, _] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
        let base = self
            .config
            .styles
            .get_style(Mode::Dashboard, "toolbar")
            .unwrap_or_default();
        let key_style = self
            .config
            .styles
            .get_style(Mode::Dashboard, "toolbar_key")
            .unwrap_or_else(|| base.bold());

        let mut spans = vec![Span::styled(" dockboard ", base.bold())];
        for (key, label) in self.entries() {
            spans.push(Span::styled(format!(" {key}"), key_style));
            spans.push(Span::styled(format!(" {label} "), base));
        }
        f.render_widget(Clear, row);
        f.render_widget(
            Paragraph::new(Line::from(spans)).style(base),
            row,
        );
        f.render_widget(
            Paragraph::new(Line::from(format!("[{}] ", self.mode)).right_aligned()).style(base),
            row,
        );
        Ok(())
    }
}
