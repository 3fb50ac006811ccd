use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Mode {
    #[default]
    Dashboard,
    AddMenu,
    LoadMenu,
    FilePrompt,
}
