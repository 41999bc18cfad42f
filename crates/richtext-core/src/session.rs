use log::{debug, info};

use crate::document::{Document, Selection};
use crate::editor::{Editor, SelectionError};
use crate::format;
use crate::input::{Command, KeyChord, Keymap, ToolbarButton};
use crate::storage::{Storage, StorageResult, load_document, save_document};

pub const DEFAULT_TEXT: &str = "A line of text in a paragraph.";

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Text of the paragraph used when nothing is saved.
    pub default_text: String,
    /// Merge adjacent leaves with equal marks after each edit.
    pub normalize_text_runs: bool,
}

impl SessionConfig {
    pub fn with_defaults(mut self) -> Self {
        if self.default_text.is_empty() {
            self.default_text = DEFAULT_TEXT.to_string();
        }
        self
    }

    pub fn default_document(&self) -> Document {
        Document::with_text(self.default_text.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// The input ran a command; default handling is suppressed.
    Handled(Command),
    /// Not bound; the caller falls back to default text input.
    Ignored,
}

/// An editor plus the storage it is saved to. Every command that changes the
/// document saves it before returning; selection changes never save.
pub struct Session<S: Storage> {
    editor: Editor,
    storage: S,
    keymap: Keymap,
    config: SessionConfig,
}

impl<S: Storage> Session<S> {
    pub fn open(storage: S, config: SessionConfig) -> Self {
        let config = config.with_defaults();
        let doc = load_document(&storage, || config.default_document());
        Self {
            editor: Editor::new(doc),
            storage,
            keymap: Keymap::default(),
            config,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn doc(&self) -> &Document {
        self.editor.doc()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<(), SelectionError> {
        self.editor.set_selection(selection)
    }

    pub fn select_all(&mut self) {
        self.editor.select_all();
    }

    pub fn deselect(&mut self) {
        self.editor.deselect();
    }

    /// Runs `command`; returns whether the document changed.
    pub fn run(&mut self, command: Command) -> StorageResult<bool> {
        if command.is_storage_only() {
            self.clear_storage()?;
            return Ok(false);
        }

        let changed = match command {
            Command::ToggleMark(mark) => format::toggle_mark(&mut self.editor, mark),
            Command::ToggleCodeBlock => format::toggle_code_block(&mut self.editor),
            Command::SetAlign(align) => format::set_alignment(&mut self.editor, align),
            Command::ClearStorage => false,
        };
        self.after_edit(command.id(), changed)?;
        Ok(changed)
    }

    pub fn handle_key(&mut self, chord: &KeyChord) -> StorageResult<InputOutcome> {
        let Some(command) = self.keymap.command_for(chord) else {
            return Ok(InputOutcome::Ignored);
        };
        self.run(command)?;
        Ok(InputOutcome::Handled(command))
    }

    /// Pointer activation; the selection is left as it was.
    pub fn activate(&mut self, button: ToolbarButton) -> StorageResult<InputOutcome> {
        let command = button.command();
        self.run(command)?;
        Ok(InputOutcome::Handled(command))
    }

    pub fn insert_text(&mut self, text: &str) -> StorageResult<bool> {
        let changed = self.editor.insert_text(text);
        self.after_edit("insert_text", changed)?;
        Ok(changed)
    }

    pub fn save(&self) -> StorageResult<()> {
        save_document(&self.storage, self.editor.doc())
    }

    /// Drops the saved document. The open document is kept; the next
    /// [`Session::open`] starts from the default one.
    pub fn clear_storage(&mut self) -> StorageResult<()> {
        self.storage.clear()?;
        info!("cleared saved document");
        Ok(())
    }

    fn after_edit(&mut self, source: &str, changed: bool) -> StorageResult<()> {
        if !changed {
            debug!("{source}: document unchanged");
            return Ok(());
        }
        if self.config.normalize_text_runs {
            self.editor.normalize_text_runs();
        }
        self.save()?;
        debug!("{source}: saved document");
        Ok(())
    }
}
