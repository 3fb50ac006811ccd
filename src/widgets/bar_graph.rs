use ratatui::{prelude::*, widgets::*};

use super::GENRE_POPULARITY;
use crate::dock::Panel;

const BAR_COLORS: [Color; 4] = [Color::Cyan, Color::Magenta, Color::Yellow, Color::Green];

/// Bar chart of genre popularity, drawn vertically or horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarGraphPanel {
    direction: Direction,
}

impl BarGraphPanel {
    pub fn vertical() -> Self {
        Self {
            direction: Direction::Vertical,
        }
    }

    pub fn horizontal() -> Self {
        Self {
            direction: Direction::Horizontal,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn bar_width(&self, area: Rect) -> u16 {
        let bars = GENRE_POPULARITY.len() as u16;
        match self.direction {
            Direction::Vertical => (area.width / bars).saturating_sub(1).max(1),
            Direction::Horizontal => 1,
        }
    }
}

impl Panel for BarGraphPanel {
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) {
        let [caption, chart] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
        let axis = match self.direction {
            Direction::Vertical => "x: Genre  y: Popularity",
            Direction::Horizontal => "x: Popularity  y: Genre",
        };
        f.render_widget(
            Paragraph::new(Line::from(vec![
                "Metal music genres ".bold(),
                Span::styled(axis, Style::default().dark_gray()),
            ])),
            caption,
        );

        let bars: Vec<Bar> = GENRE_POPULARITY
            .iter()
            .zip(BAR_COLORS)
            .map(|((name, value), color)| {
                Bar::default()
                    .value(*value)
                    .label(Line::from(*name))
                    .style(Style::default().fg(color))
                    .value_style(Style::default().fg(Color::Black).bg(color))
            })
            .collect();
        let bar_chart = BarChart::default()
            .direction(self.direction)
            .data(BarGroup::default().bars(&bars))
            .bar_width(self.bar_width(chart))
            .bar_gap(1)
            .max(100);
        f.render_widget(bar_chart, chart);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use super::*;

    fn render(panel: &mut BarGraphPanel, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        terminal
            .draw(|f| panel.draw(f, f.area()))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_vertical_bar_width_scales_with_area() {
        let panel = BarGraphPanel::vertical();
        assert_eq!(panel.bar_width(Rect::new(0, 0, 40, 10)), 9);
        assert_eq!(panel.bar_width(Rect::new(0, 0, 3, 10)), 1);
        assert_eq!(BarGraphPanel::horizontal().bar_width(Rect::new(0, 0, 40, 10)), 1);
    }

    #[test]
    fn test_horizontal_graph_shows_labels() {
        let text = render(&mut BarGraphPanel::horizontal(), 60, 10);
        assert!(text.contains("Metal music genres"));
        assert!(text.contains("Black Metal"));
        assert!(text.contains("Folk Metal"));
    }
}
