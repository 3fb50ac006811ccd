use std::{collections::HashMap, str::FromStr};

use derive_deref::{Deref, DerefMut};
use ratatui::style::{Color, Modifier, Style};
use serde::{de::Deserializer, Deserialize};

use crate::{dock::DockTheme, mode::Mode};

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct Styles(pub HashMap<Mode, HashMap<String, Style>>);

impl<'de> Deserialize<'de> for Styles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<Mode, HashMap<String, String>>::deserialize(deserializer)?;

        let styles = parsed_map
            .into_iter()
            .map(|(mode, inner_map)| {
                let converted = inner_map
                    .into_iter()
                    .map(|(name, style)| (name, parse_style(&style)))
                    .collect();
                (mode, converted)
            })
            .collect();

        Ok(Styles(styles))
    }
}

impl Styles {
    pub fn get_style(&self, mode: Mode, name: &str) -> Option<Style> {
        self.get(&mode)?.get(name).copied()
    }

    /// Docking engine colors, taken from the `Dashboard` styles with the
    /// engine defaults filling the gaps.
    pub fn dock_theme(&self) -> DockTheme {
        let defaults = DockTheme::default();
        let style = |name: &str, fallback: Style| {
            self.get_style(Mode::Dashboard, name).unwrap_or(fallback)
        };
        DockTheme {
            tab_active: style("tab_active", defaults.tab_active),
            tab_inactive: style("tab_inactive", defaults.tab_inactive),
            border: style("border", defaults.border),
            border_focused: style("border_focused", defaults.border_focused),
            empty: style("empty", defaults.empty),
        }
    }
}

/// Parses strings like `"bold yellow on black"`. Unknown words are ignored.
pub fn parse_style(line: &str) -> Style {
    let line = line.to_lowercase();
    let (foreground, background) = match line.split_once(" on ") {
        Some((fg, bg)) => (fg, Some(bg)),
        None => match line.strip_prefix("on ") {
            Some(bg) => ("", Some(bg)),
            None => (line.as_str(), None),
        },
    };

    let mut style = Style::default();
    for word in foreground.split_whitespace() {
        if let Some(modifier) = parse_modifier(word) {
            style = style.add_modifier(modifier);
        } else if let Ok(color) = Color::from_str(word) {
            style = style.fg(color);
        }
    }
    if let Some(color) = background.and_then(|bg| Color::from_str(bg.trim()).ok()) {
        style = style.bg(color);
    }
    style
}

fn parse_modifier(word: &str) -> Option<Modifier> {
    let modifier = match word {
        "bold" => Modifier::BOLD,
        "dim" => Modifier::DIM,
        "italic" => Modifier::ITALIC,
        "underline" | "underlined" => Modifier::UNDERLINED,
        "blink" => Modifier::SLOW_BLINK,
        "reverse" | "reversed" => Modifier::REVERSED,
        "hidden" => Modifier::HIDDEN,
        "crossed_out" | "strikethrough" => Modifier::CROSSED_OUT,
        _ => return None,
    };
    Some(modifier)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("yellow", Style::default().fg(Color::Yellow))]
    #[case(
        "bold yellow on black",
        Style::default().fg(Color::Yellow).bg(Color::Black).add_modifier(Modifier::BOLD)
    )]
    #[case("on blue", Style::default().bg(Color::Blue))]
    #[case(
        "italic darkgray",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
    )]
    #[case("#ff8800", Style::default().fg(Color::Rgb(0xff, 0x88, 0x00)))]
    #[case("reversed", Style::default().add_modifier(Modifier::REVERSED))]
    fn test_parse_style(#[case] line: &str, #[case] expected: Style) {
        assert_eq!(parse_style(line), expected);
    }

    #[test]
    fn test_dock_theme_overrides_and_defaults() {
        let styles: Styles =
            json5::from_str(r#"{ "Dashboard": { border_focused: "green" } }"#).expect("styles");
        let theme = styles.dock_theme();
        assert_eq!(theme.border_focused, Style::default().fg(Color::Green));
        assert_eq!(theme.tab_active, DockTheme::default().tab_active);
    }
}
