mod keybindings;
mod styles;

use std::path::PathBuf;

use color_eyre::eyre::Result;
use config::ConfigError;
use serde::Deserialize;

pub use self::{
    keybindings::{key_event_to_string, parse_key_sequence, KeyBindings},
    styles::{parse_style, Styles},
};
use crate::{
    layout::{session::DEFAULT_SAVE_FILE_NAME, SessionSettings},
    utils,
};

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub save_file_name: String,
    /// Overrides the user's download directory.
    pub save_dir: Option<PathBuf>,
    /// Overrides `<data dir>/presets`.
    pub presets_dir: Option<PathBuf>,
    pub header_offset: u16,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        let session = SessionSettings::default();
        Self {
            save_file_name: DEFAULT_SAVE_FILE_NAME.to_string(),
            save_dir: None,
            presets_dir: None,
            header_offset: session.header_offset,
        }
    }
}

impl LayoutSettings {
    pub fn save_dir(&self) -> PathBuf {
        self.save_dir.clone().unwrap_or_else(utils::get_download_dir)
    }

    pub fn presets_dir(&self) -> PathBuf {
        self.presets_dir
            .clone()
            .unwrap_or_else(utils::get_presets_dir)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            header_offset: self.header_offset,
            save_file_name: self.save_file_name.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub styles: Styles,
    #[serde(default)]
    pub layout: LayoutSettings,
}

impl Config {
    /// The configuration embedded in the binary.
    pub fn default_config() -> Result<Self, ConfigError> {
        json5::from_str(CONFIG)
            .map_err(|e| ConfigError::Message(format!("Failed to load default config: {e}")))
    }

    /// Layers the user's config files over the embedded defaults. Missing
    /// user files are not an error.
    pub fn new() -> Result<Self, ConfigError> {
        let default_config = Self::default_config()?;
        let data_dir = utils::get_data_dir();
        let config_dir = utils::get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().into_owned())?
            .set_default("_config_dir", config_dir.to_string_lossy().into_owned())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
            ("config.ini", config::FileFormat::Ini),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            builder = builder.add_source(
                config::File::from(config_dir.join(file))
                    .format(*format)
                    .required(false),
            );
            if config_dir.join(file).exists() {
                found_config = true;
            }
        }
        if !found_config {
            log::info!(
                "No configuration file found in {}, using defaults",
                config_dir.display()
            );
            let mut cfg = default_config;
            cfg.config = AppConfig {
                _data_dir: data_dir,
                _config_dir: config_dir,
            };
            return Ok(cfg);
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        cfg.merge_defaults(&default_config);
        Ok(cfg)
    }

    /// Fills keybindings and styles the user did not set from `defaults`.
    pub fn merge_defaults(&mut self, defaults: &Config) {
        for (mode, default_bindings) in defaults.keybindings.iter() {
            let user_bindings = self.keybindings.entry(*mode).or_default();
            for (key, cmd) in default_bindings.iter() {
                user_bindings
                    .entry(key.clone())
                    .or_insert_with(|| cmd.clone());
            }
        }
        for (mode, default_styles) in defaults.styles.iter() {
            let user_styles = self.styles.entry(*mode).or_default();
            for (style_key, style) in default_styles.iter() {
                user_styles
                    .entry(style_key.clone())
                    .or_insert_with(|| *style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::style::{Color, Style};

    use super::*;
    use crate::{
        action::Action,
        layout::{LayoutPreset, LayoutSource},
        mode::Mode,
        widgets::WidgetKind,
    };

    fn binding(config: &Config, mode: Mode, keys: &str) -> Option<Action> {
        let sequence = parse_key_sequence(keys).ok()?;
        config.keybindings.get(&mode)?.get(&sequence).cloned()
    }

    #[test]
    fn test_default_config_keybindings() {
        let config = Config::default_config().expect("embedded config");
        assert_eq!(binding(&config, Mode::Dashboard, "<q>"), Some(Action::Quit));
        assert_eq!(
            binding(&config, Mode::Dashboard, "<a>"),
            Some(Action::EnterMode(Mode::AddMenu))
        );
        assert_eq!(
            binding(&config, Mode::AddMenu, "<6>"),
            Some(Action::AddWidget(WidgetKind::PieGraph))
        );
        assert_eq!(
            binding(&config, Mode::LoadMenu, "<4>"),
            Some(Action::LoadLayout(LayoutSource::Preset(LayoutPreset::Combined)))
        );
        assert_eq!(
            binding(&config, Mode::FilePrompt, "<esc>"),
            Some(Action::CancelFilePrompt)
        );
        assert_eq!(binding(&config, Mode::FilePrompt, "<q>"), None);
    }

    #[test]
    fn test_default_layout_settings() {
        let config = Config::default_config().expect("embedded config");
        assert_eq!(config.layout, LayoutSettings::default());
        assert_eq!(
            config.layout.session_settings(),
            SessionSettings::default()
        );
    }

    #[test]
    fn test_user_config_keeps_unset_defaults() {
        let defaults = Config::default_config().expect("embedded config");
        let mut user: Config = json5::from_str(
            r#"{
                keybindings: { "Dashboard": { "<Ctrl-q>": "Quit" } },
                styles: { "Dashboard": { border: "blue" } },
                layout: { save_file_name: "mine.json" },
            }"#,
        )
        .expect("user config");
        user.merge_defaults(&defaults);

        assert_eq!(binding(&user, Mode::Dashboard, "<Ctrl-q>"), Some(Action::Quit));
        assert_eq!(binding(&user, Mode::Dashboard, "<s>"), Some(Action::SaveLayout));
        assert_eq!(
            user.styles.get_style(Mode::Dashboard, "border"),
            Some(Style::default().fg(Color::Blue))
        );
        assert_eq!(user.layout.save_file_name, "mine.json");
        assert_eq!(user.layout.header_offset, 2);
    }
}
