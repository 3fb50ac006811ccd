use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{
    layout::{LayoutDocument, LayoutSource},
    mode::Mode,
    widgets::WidgetKind,
};

#[derive(Debug, Clone, PartialEq, Serialize, Display, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    Error(String),
    SystemMessage(String),
    EnterMode(Mode),
    ModeChanged(Mode),
    AddWidget(WidgetKind),
    SaveLayout,
    LoadLayout(LayoutSource),
    LayoutLoaded(LayoutDocument),
    ClearLayout,
    OpenFilePrompt(String),
    SubmitFilePath(String),
    CancelFilePrompt,
    FocusNext,
    FocusPrevious,
    ClosePane,
    GrowPane,
    ShrinkPane,
}
