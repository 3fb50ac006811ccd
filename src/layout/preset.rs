use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::info;

/// Layouts shipped with the binary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPreset {
    Stack,
    Row,
    Column,
    Combined,
}

impl LayoutPreset {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Stack => "stackPreset.json",
            Self::Row => "rowPreset.json",
            Self::Column => "columnPreset.json",
            Self::Combined => "combinedPreset.json",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Stack => "Stack",
            Self::Row => "Row",
            Self::Column => "Column",
            Self::Combined => "Combined",
        }
    }

    pub fn contents(&self) -> &'static str {
        match self {
            Self::Stack => include_str!("../../presets/stackPreset.json"),
            Self::Row => include_str!("../../presets/rowPreset.json"),
            Self::Column => include_str!("../../presets/columnPreset.json"),
            Self::Combined => include_str!("../../presets/combinedPreset.json"),
        }
    }

    pub fn path_in(&self, presets_dir: &Path) -> PathBuf {
        presets_dir.join(self.file_name())
    }
}

/// Writes every bundled preset that is missing from `presets_dir`. Files
/// already there are left alone so users can edit them.
pub fn install_presets(presets_dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(presets_dir)?;
    let mut installed = Vec::new();
    for preset in LayoutPreset::iter() {
        let path = preset.path_in(presets_dir);
        if path.exists() {
            continue;
        }
        fs::write(&path, preset.contents())?;
        info!("Installed preset {}", path.display());
        installed.push(path);
    }
    Ok(installed)
}

/// Where a layout to load comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutSource {
    /// Ask the user for a file.
    Custom,
    Preset(LayoutPreset),
    File(PathBuf),
}
