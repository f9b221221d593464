use crate::mention::ContextMention;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatInputId(pub(crate) u32);

impl ChatInputId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ChatInputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chat-input-{}", self.0)
    }
}

/// A key press delivered to a chat input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
}

/// Editable chat input: mentions followed by free-form text.
///
/// While `user_edited` is false the mentions are owned by the initial-context
/// synchronizer. The first manual edit sets the flag and it is never cleared,
/// not even when the text is emptied again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatInput {
    id: ChatInputId,
    mentions: Vec<ContextMention>,
    text: String,
    user_edited: bool,
}

impl ChatInput {
    pub(crate) fn new(id: ChatInputId) -> Self {
        Self {
            id,
            mentions: Vec::new(),
            text: String::new(),
            user_edited: false,
        }
    }

    pub fn id(&self) -> ChatInputId {
        self.id
    }

    pub fn mentions(&self) -> &[ContextMention] {
        &self.mentions
    }

    pub fn mention_labels(&self) -> Vec<String> {
        self.mentions.iter().map(ContextMention::label).collect()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True until the user edits this input.
    pub fn is_tracking(&self) -> bool {
        !self.user_edited
    }

    /// Replaces the mentions with a freshly computed initial context.
    /// Returns false, leaving the input untouched, once the user has edited it.
    pub fn sync_initial_context(&mut self, mentions: Vec<ContextMention>) -> bool {
        if self.user_edited {
            return false;
        }
        self.mentions = mentions;
        true
    }

    pub fn press_key(&mut self, key: Key) {
        self.user_edited = true;
        match key {
            Key::Char(c) => self.text.push(c),
            Key::Backspace => {
                self.text.pop();
            }
            Key::Enter => {}
        }
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press_key(Key::Char(c));
        }
    }

    /// Removes the first mention with `label`. Removing a mention is a manual
    /// edit and stops automatic tracking.
    pub fn remove_mention(&mut self, label: &str) -> bool {
        let Some(index) = self.mentions.iter().position(|m| m.label() == label) else {
            return false;
        };
        self.mentions.remove(index);
        self.user_edited = true;
        true
    }

    /// Empties the free-form text. Tracking stays disabled.
    pub fn clear_text(&mut self) {
        self.text.clear();
    }

    /// Message as it would be submitted: `@label` per mention, then the text.
    pub fn compose_message(&self) -> String {
        let mut parts: Vec<String> = self
            .mentions
            .iter()
            .map(|mention| format!("@{}", mention.label()))
            .collect();
        let text = self.text.trim();
        if !text.is_empty() {
            parts.push(text.to_string());
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mention::LineRange;

    fn input_with(mentions: Vec<ContextMention>) -> ChatInput {
        let mut input = ChatInput::new(ChatInputId(1));
        assert!(input.sync_initial_context(mentions));
        input
    }

    #[test]
    fn first_keystroke_freezes_mentions() {
        let mut input = input_with(vec![
            ContextMention::file("main.c"),
            ContextMention::repository("myrepo"),
        ]);
        input.press_key(Key::Char('x'));

        assert!(!input.is_tracking());
        assert!(!input.sync_initial_context(vec![ContextMention::file("README.md")]));
        assert_eq!(input.mention_labels(), vec!["main.c", "myrepo"]);
        assert_eq!(input.text(), "x");
    }

    #[test]
    fn clearing_text_does_not_resume_tracking() {
        let mut input = input_with(Vec::new());
        input.type_text("hi");
        input.press_key(Key::Backspace);
        input.press_key(Key::Backspace);
        input.clear_text();

        assert_eq!(input.text(), "");
        assert!(!input.is_tracking());
    }

    #[test]
    fn removing_a_mention_counts_as_an_edit() {
        let mut input = input_with(vec![
            ContextMention::file("main.c"),
            ContextMention::selection("main.c", LineRange::new(2, 4)),
        ]);
        assert!(!input.remove_mention("nope"));
        assert!(input.is_tracking());

        assert!(input.remove_mention("main.c:2-4"));
        assert_eq!(input.mention_labels(), vec!["main.c"]);
        assert!(!input.is_tracking());
    }

    #[test]
    fn composed_message_prefixes_mentions() {
        let mut input = input_with(vec![
            ContextMention::file("main.c"),
            ContextMention::repository("codehost.example/user/myrepo"),
        ]);
        assert_eq!(input.compose_message(), "@main.c @myrepo");
        input.type_text("explain this ");
        assert_eq!(input.compose_message(), "@main.c @myrepo explain this");
    }
}
