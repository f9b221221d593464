use super::input::{ChatInput, ChatInputId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("unknown chat input {0}")]
    UnknownInput(ChatInputId),
}

/// Ordered collection of chat inputs; the newest input is last.
#[derive(Debug, Default)]
pub struct ChatPanel {
    inputs: Vec<ChatInput>,
    next_id: u32,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty input that still tracks the editor.
    pub fn create_input(&mut self) -> ChatInputId {
        self.next_id += 1;
        let id = ChatInputId(self.next_id);
        self.inputs.push(ChatInput::new(id));
        id
    }

    pub fn input(&self, id: ChatInputId) -> Result<&ChatInput, ChatError> {
        self.inputs
            .iter()
            .find(|input| input.id() == id)
            .ok_or(ChatError::UnknownInput(id))
    }

    pub fn input_mut(&mut self, id: ChatInputId) -> Result<&mut ChatInput, ChatError> {
        self.inputs
            .iter_mut()
            .find(|input| input.id() == id)
            .ok_or(ChatError::UnknownInput(id))
    }

    pub fn last_input(&self) -> Option<&ChatInput> {
        self.inputs.last()
    }

    pub fn inputs_mut(&mut self) -> impl Iterator<Item = &mut ChatInput> {
        self.inputs.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_last_is_newest() {
        let mut panel = ChatPanel::new();
        let first = panel.create_input();
        let second = panel.create_input();

        assert_ne!(first, second);
        assert_eq!(panel.last_input().map(ChatInput::id), Some(second));
        assert_eq!(panel.len(), 2);
    }

    #[test]
    fn unknown_input_is_an_error() {
        let mut panel = ChatPanel::new();
        let id = panel.create_input();
        let mut other = ChatPanel::new();
        other.create_input();
        let stray = other.create_input();

        assert!(panel.input(id).is_ok());
        assert_eq!(panel.input(stray).err(), Some(ChatError::UnknownInput(stray)));
    }
}
