use chrono::{DateTime, Local};
use color_eyre::eyre::Result;
use ratatui::{prelude::*, widgets::*};

use crate::{action::Action, components::Component, config::Config, mode::Mode, tui::Frame};

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusMessage {
    text: String,
    is_error: bool,
    at: DateTime<Local>,
}

/// The bottom row: the latest message or error.
#[derive(Default)]
pub struct StatusBar {
    message: Option<StatusMessage>,
    style: Style,
    error_style: Style,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            message: None,
            style: Style::default().fg(Color::Gray),
            error_style: Style::default().fg(Color::Red).bold(),
        }
    }

    pub fn message(&self) -> Option<String> {
        self.message.as_ref().map(|message| {
            if message.is_error {
                format!("ERR: {}", message.text)
            } else {
                message.text.clone()
            }
        })
    }

    fn set(&mut self, text: String, is_error: bool) {
        self.message = Some(StatusMessage {
            text,
            is_error,
            at: Local::now(),
        });
    }
}

impl Component for StatusBar {
    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        if let Some(style) = config.styles.get_style(Mode::Dashboard, "status") {
            self.style = style;
        }
        if let Some(style) = config.styles.get_style(Mode::Dashboard, "error") {
            self.error_style = style;
        }
        Ok(())
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::SystemMessage(message) => self.set(message, false),
            Action::Error(message) => self.set(message, true),
            _ => {}
        };

        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [_, row] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        f.render_widget(Clear, row);

        let Some(message) = &self.message else {
            return Ok(());
        };
        let style = if message.is_error {
            self.error_style
        } else {
            self.style
        };
        let line = Line::from(vec![
            Span::styled(
                format!("{} ", message.at.format("%H:%M:%S")),
                Style::default().dark_gray(),
            ),
            Span::styled(self.message().unwrap_or_default(), style),
        ]);
        f.render_widget(Paragraph::new(line), row);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_latest_message_wins() {
        let mut status_bar = StatusBar::new();
        assert_eq!(status_bar.message(), None);

        status_bar
            .update(Action::SystemMessage("Layout saved".to_string()))
            .expect("update");
        assert_eq!(status_bar.message().as_deref(), Some("Layout saved"));

        status_bar
            .update(Action::Error("No file was selected.".to_string()))
            .expect("update");
        assert_eq!(
            status_bar.message().as_deref(),
            Some("ERR: No file was selected.")
        );
    }
}
