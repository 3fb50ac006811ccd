use ratatui::{prelude::*, widgets::*};

use crate::dock::Panel;

#[derive(Debug, Default)]
pub struct TestPanel;

impl TestPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Panel for TestPanel {
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) {
        let text = vec![
            Line::from("test works!".bold()),
            Line::from(""),
            Line::from("Press Tab to move between panes, x to close this one.".gray()),
        ];
        f.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}
