use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;
use tui_textarea::TextArea;

use super::{centered_rect, Component};
use crate::{
    action::Action,
    config::Config,
    files::{has_extension, FilePicker, PickFuture, PickerSlot},
    mode::Mode,
    tui::Frame,
};

const PROMPT_WIDTH: u16 = 64;

/// Answers file requests through the path prompt popup. Paths without the
/// requested extension count as no selection.
///
/// Each request arms the shared slot and asks the UI to open the prompt; the
/// app resolves the slot when the user submits or dismisses it.
#[derive(Debug, Clone)]
pub struct PromptPicker {
    slot: PickerSlot,
    action_tx: UnboundedSender<Action>,
}

impl PromptPicker {
    pub fn new(slot: PickerSlot, action_tx: UnboundedSender<Action>) -> Self {
        Self { slot, action_tx }
    }
}

impl FilePicker for PromptPicker {
    fn pick_file<'a>(&'a self, extension: &'a str) -> PickFuture<'a> {
        Box::pin(async move {
            let answer = self.slot.arm();
            if self
                .action_tx
                .send(Action::OpenFilePrompt(extension.to_string()))
                .is_err()
            {
                return None;
            }
            answer
                .await
                .ok()
                .flatten()
                .filter(|path| {
                    let accepted = has_extension(path, extension);
                    if !accepted {
                        warn!("{} is not a .{extension} file", path.display());
                    }
                    accepted
                })
        })
    }
}

/// Single-line path input shown in file prompt mode.
pub struct FilePrompt<'a> {
    textarea: TextArea<'a>,
    extension: String,
    visible: bool,
    border: Style,
}

impl<'a> Default for FilePrompt<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FilePrompt<'a> {
    pub fn new() -> Self {
        Self {
            textarea: TextArea::default(),
            extension: "json".to_string(),
            visible: false,
            border: Style::default(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("")
    }

    fn reset(&mut self) {
        self.textarea = TextArea::default();
        self.textarea.set_cursor_line_style(Style::default());
    }
}

impl<'a> Component for FilePrompt<'a> {
    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        if let Some(style) = config.styles.get_style(Mode::FilePrompt, "border") {
            self.border = style;
        }
        Ok(())
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if !self.visible {
            return Ok(None);
        }
        match key.code {
            KeyCode::Enter => Ok(Some(Action::SubmitFilePath(self.text().trim().to_string()))),
            _ => {
                self.textarea.input(key);
                Ok(None)
            }
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::OpenFilePrompt(extension) => {
                self.extension = extension;
                self.reset();
            }
            Action::ModeChanged(mode) => self.visible = mode == Mode::FilePrompt,
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        if !self.visible {
            return Ok(());
        }
        let popup = centered_rect(area, PROMPT_WIDTH, 3);
        self.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.border)
                .title(format!(" Open .{} file: Enter to load, Esc to cancel ", self.extension)),
        );
        f.render_widget(Clear, popup);
        f.render_widget(&self.textarea, popup);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    use super::*;

    fn type_text(prompt: &mut FilePrompt<'_>, text: &str) {
        for c in text.chars() {
            prompt
                .handle_key_events(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .expect("key");
        }
    }

    #[test]
    fn test_submit_trims_path() {
        let mut prompt = FilePrompt::new();
        prompt.update(Action::ModeChanged(Mode::FilePrompt)).expect("update");
        type_text(&mut prompt, " /tmp/a.json ");
        let action = prompt
            .handle_key_events(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .expect("key");
        assert_eq!(action, Some(Action::SubmitFilePath("/tmp/a.json".to_string())));
    }

    #[test]
    fn test_reopening_clears_text() {
        let mut prompt = FilePrompt::new();
        prompt.update(Action::ModeChanged(Mode::FilePrompt)).expect("update");
        type_text(&mut prompt, "old");
        prompt
            .update(Action::OpenFilePrompt("json".to_string()))
            .expect("update");
        assert_eq!(prompt.text(), "");
    }

    #[tokio::test]
    async fn test_picker_waits_for_slot() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let slot = PickerSlot::default();
        let picker = PromptPicker::new(slot.clone(), tx);

        let pending = tokio::spawn(async move { picker.pick_file("json").await });
        assert_eq!(
            rx.recv().await,
            Some(Action::OpenFilePrompt("json".to_string()))
        );
        assert!(slot.resolve(Some(PathBuf::from("layout.json"))));
        assert_eq!(
            pending.await.expect("join"),
            Some(PathBuf::from("layout.json"))
        );
    }

    #[tokio::test]
    async fn test_picker_refuses_other_extensions() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let slot = PickerSlot::default();
        let picker = PromptPicker::new(slot.clone(), tx);

        let pending = tokio::spawn(async move { picker.pick_file("json").await });
        assert_eq!(
            rx.recv().await,
            Some(Action::OpenFilePrompt("json".to_string()))
        );
        assert!(slot.resolve(Some(PathBuf::from("/tmp/notes.txt"))));
        assert_eq!(pending.await.expect("join"), None);
    }
}
