mod document;
mod editor;
mod format;
mod input;
mod render;
mod session;
mod storage;

pub use crate::document::*;
pub use crate::editor::*;
pub use crate::format::*;
pub use crate::input::*;
pub use crate::render::*;
pub use crate::session::*;
pub use crate::storage::*;
