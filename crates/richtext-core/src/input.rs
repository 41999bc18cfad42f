use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::document::{Align, Mark};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown key: {0}")]
    UnknownKey(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("unknown toolbar button: {0}")]
    UnknownButton(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Delete,
    Backspace,
    Enter,
    Escape,
    Tab,
}

impl Key {
    fn name(&self) -> Option<&'static str> {
        match self {
            Key::Char(_) => None,
            Key::Delete => Some("delete"),
            Key::Backspace => Some("backspace"),
            Key::Enter => Some("enter"),
            Key::Escape => Some("escape"),
            Key::Tab => Some("tab"),
        }
    }
}

/// A key press with its modifiers, written `ctrl-b`, `ctrl-delete`,
/// `shift-tab`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
            alt: false,
        }
    }

    pub const fn ctrl(key: Key) -> Self {
        Self {
            key,
            ctrl: true,
            shift: false,
            alt: false,
        }
    }
}

impl FromStr for KeyChord {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chord = KeyChord::plain(Key::Escape);
        let mut rest = s.trim();
        loop {
            if let Some(r) = rest.strip_prefix("ctrl-") {
                chord.ctrl = true;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("shift-") {
                chord.shift = true;
                rest = r;
            } else if let Some(r) = rest.strip_prefix("alt-") {
                chord.alt = true;
                rest = r;
            } else {
                break;
            }
        }

        chord.key = match rest {
            "delete" => Key::Delete,
            "backspace" => Key::Backspace,
            "enter" => Key::Enter,
            "escape" => Key::Escape,
            "tab" => Key::Tab,
            "space" => Key::Char(' '),
            _ => {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return Err(InputError::UnknownKey(s.to_string())),
                }
            }
        };
        Ok(chord)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("ctrl-")?;
        }
        if self.shift {
            f.write_str("shift-")?;
        }
        if self.alt {
            f.write_str("alt-")?;
        }
        match (self.key, self.key.name()) {
            (Key::Char(' '), _) => f.write_str("space"),
            (Key::Char(c), _) => write!(f, "{c}"),
            (_, Some(name)) => f.write_str(name),
            (_, None) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    ToggleMark(Mark),
    ToggleCodeBlock,
    SetAlign(Align),
    ClearStorage,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::ToggleMark(Mark::Bold),
        Command::ToggleMark(Mark::Italics),
        Command::ToggleMark(Mark::Underline),
        Command::ToggleCodeBlock,
        Command::SetAlign(Align::Left),
        Command::SetAlign(Align::Center),
        Command::SetAlign(Align::Right),
        Command::ClearStorage,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Command::ToggleMark(Mark::Bold) => "marks.toggle_bold",
            Command::ToggleMark(Mark::Italics) => "marks.toggle_italics",
            Command::ToggleMark(Mark::Underline) => "marks.toggle_underline",
            Command::ToggleCodeBlock => "code_block.toggle",
            Command::SetAlign(Align::Left) => "block.align_left",
            Command::SetAlign(Align::Center) => "block.align_center",
            Command::SetAlign(Align::Right) => "block.align_right",
            Command::ClearStorage => "storage.clear",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Command::ToggleMark(Mark::Bold) => "Bold",
            Command::ToggleMark(Mark::Italics) => "Italics",
            Command::ToggleMark(Mark::Underline) => "Underline",
            Command::ToggleCodeBlock => "Code block",
            Command::SetAlign(Align::Left) => "Align left",
            Command::SetAlign(Align::Center) => "Align center",
            Command::SetAlign(Align::Right) => "Align right",
            Command::ClearStorage => "Clear saved document",
        }
    }

    pub fn from_id(id: &str) -> Result<Self, InputError> {
        Self::ALL
            .into_iter()
            .find(|c| c.id() == id)
            .ok_or_else(|| InputError::UnknownCommand(id.to_string()))
    }

    /// Whether the command only touches storage, not the document.
    pub fn is_storage_only(&self) -> bool {
        matches!(self, Command::ClearStorage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub chord: KeyChord,
    pub command: Command,
}

impl KeyBinding {
    pub const fn new(chord: KeyChord, command: Command) -> Self {
        Self { chord, command }
    }
}

/// Maps chords to commands. Unbound chords fall through to text input.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<KeyBinding>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            bindings: vec![
                KeyBinding::new(
                    KeyChord::ctrl(Key::Char('b')),
                    Command::ToggleMark(Mark::Bold),
                ),
                KeyBinding::new(
                    KeyChord::ctrl(Key::Char('u')),
                    Command::ToggleMark(Mark::Underline),
                ),
                KeyBinding::new(
                    KeyChord::ctrl(Key::Char('i')),
                    Command::ToggleMark(Mark::Italics),
                ),
                KeyBinding::new(KeyChord::ctrl(Key::Char('`')), Command::ToggleCodeBlock),
                KeyBinding::new(KeyChord::ctrl(Key::Delete), Command::ClearStorage),
            ],
        }
    }
}

impl Keymap {
    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    pub fn command_for(&self, chord: &KeyChord) -> Option<Command> {
        self.bindings
            .iter()
            .find(|b| b.chord == *chord)
            .map(|b| b.command)
    }
}

/// Pointer-activated commands. Activation keeps the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolbarButton {
    Bold,
    CodeBlock,
    AlignLeft,
    AlignCenter,
    AlignRight,
}

impl ToolbarButton {
    pub const ALL: [ToolbarButton; 5] = [
        ToolbarButton::Bold,
        ToolbarButton::CodeBlock,
        ToolbarButton::AlignLeft,
        ToolbarButton::AlignCenter,
        ToolbarButton::AlignRight,
    ];

    pub fn command(self) -> Command {
        match self {
            ToolbarButton::Bold => Command::ToggleMark(Mark::Bold),
            ToolbarButton::CodeBlock => Command::ToggleCodeBlock,
            ToolbarButton::AlignLeft => Command::SetAlign(Align::Left),
            ToolbarButton::AlignCenter => Command::SetAlign(Align::Center),
            ToolbarButton::AlignRight => Command::SetAlign(Align::Right),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolbarButton::Bold => "bold",
            ToolbarButton::CodeBlock => "code",
            ToolbarButton::AlignLeft => "left",
            ToolbarButton::AlignCenter => "center",
            ToolbarButton::AlignRight => "right",
        }
    }
}

impl FromStr for ToolbarButton {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.name() == s)
            .ok_or_else(|| InputError::UnknownButton(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_prints_chords() {
        let chord: KeyChord = "ctrl-b".parse().unwrap();
        assert_eq!(chord, KeyChord::ctrl(Key::Char('b')));
        assert_eq!(chord.to_string(), "ctrl-b");

        let chord: KeyChord = "ctrl-`".parse().unwrap();
        assert_eq!(chord.key, Key::Char('`'));

        let chord: KeyChord = "ctrl-shift-delete".parse().unwrap();
        assert!(chord.ctrl && chord.shift && !chord.alt);
        assert_eq!(chord.key, Key::Delete);
        assert_eq!(chord.to_string(), "ctrl-shift-delete");

        // A bare dash is a key, not a modifier separator.
        assert_eq!("-".parse::<KeyChord>().unwrap().key, Key::Char('-'));

        assert_eq!(
            "ctrl-bogus".parse::<KeyChord>(),
            Err(InputError::UnknownKey("ctrl-bogus".to_string()))
        );
    }

    #[test]
    fn keymap_requires_ctrl_and_nothing_else() {
        let keymap = Keymap::default();
        assert_eq!(
            keymap.command_for(&"ctrl-u".parse().unwrap()),
            Some(Command::ToggleMark(Mark::Underline))
        );
        assert_eq!(
            keymap.command_for(&"ctrl-delete".parse().unwrap()),
            Some(Command::ClearStorage)
        );
        assert_eq!(keymap.command_for(&"b".parse().unwrap()), None);
        assert_eq!(keymap.command_for(&"ctrl-shift-b".parse().unwrap()), None);
        assert_eq!(keymap.command_for(&"delete".parse().unwrap()), None);
    }

    #[test]
    fn command_ids_round_trip() {
        for command in Command::ALL {
            assert_eq!(Command::from_id(command.id()), Ok(command));
        }
        assert!(Command::from_id("marks.toggle_strike").is_err());
    }

    #[test]
    fn toolbar_buttons_map_to_commands() {
        assert_eq!(
            "center".parse::<ToolbarButton>().unwrap().command(),
            Command::SetAlign(Align::Center)
        );
        assert_eq!(
            ToolbarButton::CodeBlock.command(),
            Command::ToggleCodeBlock
        );
        assert!("italic".parse::<ToolbarButton>().is_err());
    }
}
