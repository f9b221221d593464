//! Chat inputs and the panel that hosts them.

mod input;
mod panel;

pub use input::{ChatInput, ChatInputId, Key};
pub use panel::{ChatError, ChatPanel};
