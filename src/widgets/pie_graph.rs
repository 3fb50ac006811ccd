use std::f64::consts::TAU;

use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Points},
        *,
    },
};

use super::GENRE_POPULARITY;
use crate::dock::Panel;

const SLICE_COLORS: [Color; 4] = [Color::Cyan, Color::Magenta, Color::Yellow, Color::Green];
const INNER_RADIUS: f64 = 0.5;
const LEGEND_WIDTH: u16 = 22;

/// Doughnut chart of genre popularity with a legend.
#[derive(Debug, Clone)]
pub struct PieGraphPanel {
    slices: Vec<Slice>,
}

#[derive(Debug, Clone, PartialEq)]
struct Slice {
    label: &'static str,
    value: u64,
    start: f64,
    end: f64,
    color: Color,
}

impl Default for PieGraphPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl PieGraphPanel {
    pub fn new() -> Self {
        let total: u64 = GENRE_POPULARITY.iter().map(|(_, value)| value).sum();
        let mut start = 0.0;
        let slices = GENRE_POPULARITY
            .iter()
            .zip(SLICE_COLORS)
            .map(|((label, value), color)| {
                let end = start + TAU * (*value as f64) / (total as f64);
                let slice = Slice {
                    label: *label,
                    value: *value,
                    start,
                    end,
                    color,
                };
                start = end;
                slice
            })
            .collect();
        Self { slices }
    }

    fn share(&self, slice: &Slice) -> f64 {
        (slice.end - slice.start) / TAU * 100.0
    }

    /// Canvas points of one doughnut slice.
    fn slice_points(slice: &Slice) -> Vec<(f64, f64)> {
        const ANGLE_STEP: f64 = 0.02;
        const RADIUS_STEP: f64 = 0.04;
        let mut points = Vec::new();
        let mut angle = slice.start;
        while angle < slice.end {
            let mut radius = INNER_RADIUS;
            while radius <= 1.0 {
                points.push((radius * angle.cos(), radius * angle.sin()));
                radius += RADIUS_STEP;
            }
            angle += ANGLE_STEP;
        }
        points
    }

    /// Canvas bounds that keep the chart round in terminal cells, which are
    /// roughly twice as tall as they are wide.
    fn bounds(area: Rect) -> ([f64; 2], [f64; 2]) {
        if area.width == 0 || area.height == 0 {
            return ([-1.0, 1.0], [-1.0, 1.0]);
        }
        let ratio = f64::from(area.width) / (2.0 * f64::from(area.height));
        if ratio >= 1.0 {
            ([-ratio, ratio], [-1.0, 1.0])
        } else {
            ([-1.0, 1.0], [-1.0 / ratio, 1.0 / ratio])
        }
    }
}

impl Panel for PieGraphPanel {
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) {
        let [chart, legend] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(LEGEND_WIDTH)])
                .areas(area);

        let (x_bounds, y_bounds) = Self::bounds(chart);
        let slices = &self.slices;
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                for slice in slices {
                    let coords = Self::slice_points(slice);
                    ctx.draw(&Points {
                        coords: &coords,
                        color: slice.color,
                    });
                }
            });
        f.render_widget(canvas, chart);

        let mut lines = vec![Line::from("Metal Music Genres".bold()), Line::from("")];
        lines.extend(self.slices.iter().map(|slice| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(slice.color)),
                Span::raw(format!(
                    "{} {} ({:.0}%)",
                    slice.label,
                    slice.value,
                    self.share(slice)
                )),
            ])
        }));
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), legend);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_slices_cover_full_circle() {
        let panel = PieGraphPanel::new();
        assert_eq!(panel.slices.len(), 4);
        assert_eq!(panel.slices[0].start, 0.0);
        let last = panel.slices.last().expect("slices");
        assert!((last.end - TAU).abs() < 1e-9);
        let total: f64 = panel.slices.iter().map(|slice| panel.share(slice)).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_slice_points_stay_in_ring() {
        let panel = PieGraphPanel::new();
        for (x, y) in PieGraphPanel::slice_points(&panel.slices[1]) {
            let radius = (x * x + y * y).sqrt();
            assert!((INNER_RADIUS - 1e-9..=1.0 + 1e-9).contains(&radius));
        }
    }

    #[test]
    fn test_bounds_keep_aspect() {
        assert_eq!(
            PieGraphPanel::bounds(Rect::new(0, 0, 40, 10)),
            ([-2.0, 2.0], [-1.0, 1.0])
        );
        assert_eq!(
            PieGraphPanel::bounds(Rect::new(0, 0, 10, 10)),
            ([-1.0, 1.0], [-2.0, 2.0])
        );
    }
}
