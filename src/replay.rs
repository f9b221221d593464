//! Line-oriented scripts of workbench actions.
//!
//! ```text
//! # comments and blank lines are ignored
//! open main.c
//! select 2 4
//! tab README.md
//! new-chat
//! type x
//! key backspace
//! repo codehost.example/user/myrepo
//! ```
//!
//! Chat actions (`type`, `key`, `remove`, `clear-text`) go to the most
//! recently created chat input.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use initctx_core::{ChatInputId, Key, RepositorySource, ResolvedRepository};
use serde_json::json;
use thiserror::Error;

use crate::workbench::Workbench;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ScriptError {
    pub line: usize,
    pub message: String,
}

impl ScriptError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Open(String),
    Tab(String),
    Select { start: u32, end: u32 },
    ClearSelection,
    Close(String),
    Type(String),
    Key(Key),
    Remove(String),
    ClearText,
    NewChat,
    Repo(Option<String>),
}

impl fmt::Display for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(path) => write!(f, "open {path}"),
            Self::Tab(path) => write!(f, "tab {path}"),
            Self::Select { start, end } => write!(f, "select {start} {end}"),
            Self::ClearSelection => f.write_str("clear-selection"),
            Self::Close(path) => write!(f, "close {path}"),
            Self::Type(text) => write!(f, "type {text}"),
            Self::Key(Key::Char(c)) => write!(f, "key {c}"),
            Self::Key(Key::Backspace) => f.write_str("key backspace"),
            Self::Key(Key::Enter) => f.write_str("key enter"),
            Self::Remove(label) => write!(f, "remove {label}"),
            Self::ClearText => f.write_str("clear-text"),
            Self::NewChat => f.write_str("new-chat"),
            Self::Repo(Some(name)) => write!(f, "repo {name}"),
            Self::Repo(None) => f.write_str("repo none"),
        }
    }
}

fn parse_key(raw: &str) -> Option<Key> {
    match raw {
        "backspace" => Some(Key::Backspace),
        "enter" => Some(Key::Enter),
        "space" => Some(Key::Char(' ')),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Key::Char(c)),
                _ => None,
            }
        }
    }
}

fn parse_line_number(raw: Option<&str>, line: usize) -> Result<u32, ScriptError> {
    let raw = raw.ok_or_else(|| ScriptError::new(line, "select needs a start and an end line"))?;
    raw.parse()
        .map_err(|_| ScriptError::new(line, format!("'{raw}' is not a line number")))
}

fn parse_command(text: &str, line: usize) -> Result<ScriptCommand, ScriptError> {
    let (verb, rest) = match text.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (text, ""),
    };

    let argument = |what: &str| -> Result<String, ScriptError> {
        if rest.is_empty() {
            Err(ScriptError::new(line, format!("{verb} needs {what}")))
        } else {
            Ok(rest.to_string())
        }
    };
    let no_argument = |command: ScriptCommand| -> Result<ScriptCommand, ScriptError> {
        if rest.is_empty() {
            Ok(command)
        } else {
            Err(ScriptError::new(line, format!("{verb} takes no arguments")))
        }
    };

    match verb {
        "open" => Ok(ScriptCommand::Open(argument("a file")?)),
        "tab" => Ok(ScriptCommand::Tab(argument("a file")?)),
        "close" => Ok(ScriptCommand::Close(argument("a file")?)),
        "select" => {
            let mut parts = rest.split_whitespace();
            let start = parse_line_number(parts.next(), line)?;
            let end = parse_line_number(parts.next(), line)?;
            if parts.next().is_some() {
                return Err(ScriptError::new(line, "select takes exactly two line numbers"));
            }
            Ok(ScriptCommand::Select { start, end })
        }
        "clear-selection" => no_argument(ScriptCommand::ClearSelection),
        "type" => Ok(ScriptCommand::Type(argument("text")?)),
        "key" => {
            let name = argument("a key")?;
            parse_key(&name)
                .map(ScriptCommand::Key)
                .ok_or_else(|| ScriptError::new(line, format!("unknown key '{name}'")))
        }
        "remove" => Ok(ScriptCommand::Remove(argument("a mention label")?)),
        "clear-text" => no_argument(ScriptCommand::ClearText),
        "new-chat" => no_argument(ScriptCommand::NewChat),
        "repo" => {
            let name = argument("a repository name or 'none'")?;
            Ok(ScriptCommand::Repo((name != "none").then_some(name)))
        }
        other => Err(ScriptError::new(line, format!("unknown command '{other}'"))),
    }
}

/// A parsed script: commands with their 1-based source line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    commands: Vec<(usize, ScriptCommand)>,
}

impl FromStr for Script {
    type Err = ScriptError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let mut commands = Vec::new();
        for (index, raw) in source.lines().enumerate() {
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            let line = index + 1;
            commands.push((line, parse_command(text, line)?));
        }
        Ok(Self { commands })
    }
}

/// Mentions of the last chat input after one script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayStep {
    pub line: usize,
    pub command: String,
    pub input: ChatInputId,
    pub mentions: Vec<String>,
}

impl ReplayStep {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "line": self.line,
            "command": self.command,
            "input": self.input.to_string(),
            "mentions": self.mentions,
        })
    }
}

impl fmt::Display for ReplayStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>3}  {:<24} {} [{}]",
            self.line,
            self.command,
            self.input,
            self.mentions.join(", ")
        )
    }
}

impl Script {
    pub fn commands(&self) -> impl Iterator<Item = &ScriptCommand> {
        self.commands.iter().map(|(_, command)| command)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Runs every command against `bench`, stopping at the first failure.
    pub fn run(&self, bench: &mut Workbench) -> Result<Vec<ReplayStep>> {
        let mut steps = Vec::with_capacity(self.commands.len());
        for (line, command) in &self.commands {
            apply(bench, command).with_context(|| format!("line {line}: {command}"))?;
            let input = bench.last_chat_input();
            steps.push(ReplayStep {
                line: *line,
                command: command.to_string(),
                input,
                mentions: bench.chat_input_mentions(input)?,
            });
        }
        Ok(steps)
    }
}

fn apply(bench: &mut Workbench, command: &ScriptCommand) -> Result<()> {
    let input = bench.last_chat_input();
    match command {
        ScriptCommand::Open(path) => bench.open_file_in_editor_tab(path)?,
        ScriptCommand::Tab(path) => bench.click_editor_tab(path)?,
        ScriptCommand::Select { start, end } => {
            bench.select_line_range_in_editor_tab(*start, *end)?
        }
        ScriptCommand::ClearSelection => bench.clear_selection()?,
        ScriptCommand::Close(path) => bench.close_editor_tab(path)?,
        ScriptCommand::Type(text) => bench.type_text(input, text)?,
        ScriptCommand::Key(key) => bench.press(input, *key)?,
        ScriptCommand::Remove(label) => {
            bench.remove_mention(input, label)?;
        }
        ScriptCommand::ClearText => bench.clear_chat_text(input)?,
        ScriptCommand::NewChat => {
            bench.create_empty_chat_panel();
        }
        ScriptCommand::Repo(name) => {
            let repository = name.as_ref().map(|name| ResolvedRepository {
                name: name.clone(),
                remote_url: name.clone(),
                source: RepositorySource::SelfServe,
            });
            bench.set_repository(repository);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use initctx_config::ContextConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_commands_and_skips_comments() {
        let script: Script = "# setup\n\nopen main.c\nselect 4 2\nkey backspace\nrepo none\n"
            .parse()
            .unwrap();
        let commands: Vec<&ScriptCommand> = script.commands().collect();
        assert_eq!(
            commands,
            vec![
                &ScriptCommand::Open("main.c".to_string()),
                &ScriptCommand::Select { start: 4, end: 2 },
                &ScriptCommand::Key(Key::Backspace),
                &ScriptCommand::Repo(None),
            ]
        );
    }

    #[test]
    fn errors_carry_the_line_number() {
        let error = "open main.c\nselect 2\n".parse::<Script>().unwrap_err();
        assert_eq!(error.line, 2);
        assert_eq!(error.to_string(), "line 2: select needs a start and an end line");

        let error = "open main.c\n\nfrobnicate\n".parse::<Script>().unwrap_err();
        assert_eq!(error, ScriptError::new(3, "unknown command 'frobnicate'"));

        assert!("new-chat now".parse::<Script>().is_err());
        assert!("key shift".parse::<Script>().is_err());
    }

    #[test]
    fn run_reports_last_input_mentions() {
        let script: Script = "repo codehost.example/user/myrepo\nopen main.c\nselect 2 4\ntype x\nopen README.md\n"
            .parse()
            .unwrap();
        let mut bench = Workbench::new(ContextConfig::default());
        let steps = script.run(&mut bench).unwrap();

        let last: Vec<&[String]> = steps.iter().map(|step| step.mentions.as_slice()).collect();
        assert_eq!(last[0], ["myrepo".to_string()]);
        assert_eq!(
            last[2],
            ["main.c".to_string(), "main.c:2-4".to_string(), "myrepo".to_string()]
        );
        assert_eq!(last[4], last[3]);
        assert_eq!(steps[4].command, "open README.md");
        assert_eq!(bench.editor().open_tabs().len(), 2);
    }

    #[test]
    fn run_stops_at_failing_command() {
        let script: Script = "open main.c\ntab README.md\n".parse().unwrap();
        let mut bench = Workbench::new(ContextConfig::default());
        let error = script.run(&mut bench).unwrap_err();
        assert!(error.to_string().starts_with("line 2: tab README.md"));
    }

    #[test]
    fn opening_the_current_directory_fails_the_script() {
        let script: Script = "open main.c\nopen .\n".parse().unwrap();
        let mut bench = Workbench::new(ContextConfig::default());
        let error = script.run(&mut bench).unwrap_err();
        assert_eq!(error.to_string(), "line 2: open .");
        assert_eq!(bench.editor().open_tabs().len(), 1);
    }
}
