use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};

use crate::dock::Panel;

const HEADER: [&str; 4] = ["Band", "Genre", "Country", "Formed"];

const ROWS: [[&str; 4]; 8] = [
    ["Mayhem", "Black Metal", "Norway", "1984"],
    ["Emperor", "Black Metal", "Norway", "1991"],
    ["Death", "Death Metal", "USA", "1983"],
    ["Obituary", "Death Metal", "USA", "1984"],
    ["Candlemass", "Doom Metal", "Sweden", "1984"],
    ["Saint Vitus", "Doom Metal", "USA", "1978"],
    ["Finntroll", "Folk Metal", "Finland", "1997"],
    ["Eluveitie", "Folk Metal", "Switzerland", "2002"],
];

/// Selectable table of sample rows.
#[derive(Debug)]
pub struct TablePanel {
    state: TableState,
}

impl Default for TablePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl TablePanel {
    pub fn new() -> Self {
        Self {
            state: TableState::default().with_selected(Some(0)),
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    fn select_next(&mut self) {
        let next = match self.state.selected() {
            Some(index) if index + 1 < ROWS.len() => index + 1,
            Some(index) => index,
            None => 0,
        };
        self.state.select(Some(next));
    }

    fn select_previous(&mut self) {
        let previous = self
            .state
            .selected()
            .map_or(0, |index| index.saturating_sub(1));
        self.state.select(Some(previous));
    }
}

impl Panel for TablePanel {
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) {
        let header = Row::new(HEADER).style(Style::default().bold().underlined());
        let rows = ROWS.iter().map(|row| Row::new(*row));
        let table = Table::new(
            rows,
            [
                Constraint::Fill(3),
                Constraint::Fill(3),
                Constraint::Fill(3),
                Constraint::Length(6),
            ],
        )
        .header(header)
        .row_highlight_style(Style::default().reversed())
        .highlight_symbol("> ");
        f.render_stateful_widget(table, area, &mut self.state);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Home => self.state.select(Some(0)),
            KeyCode::End => self.state.select(Some(ROWS.len() - 1)),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut panel = TablePanel::new();
        assert!(panel.handle_key_event(key(KeyCode::Up)));
        assert_eq!(panel.selected(), Some(0));

        for _ in 0..20 {
            panel.handle_key_event(key(KeyCode::Down));
        }
        assert_eq!(panel.selected(), Some(ROWS.len() - 1));
    }

    #[test]
    fn test_unhandled_key_is_not_consumed() {
        let mut panel = TablePanel::new();
        assert!(!panel.handle_key_event(key(KeyCode::Char('z'))));
    }
}
