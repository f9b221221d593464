//! Context mentions rendered inline in a chat input.
//!
//! A mention is a structured reference to the current repository, an open
//! file, or a line range selected in that file. Labels are the user-visible
//! text and are what the chat input exposes for inspection.

use initctx_commons::display_name;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 1-based, inclusive range of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawLineRange")]
pub struct LineRange {
    start: u32,
    end: u32,
}

/// Wire shape of [`LineRange`]; deserialized bounds go through [`LineRange::new`].
#[derive(Deserialize)]
struct RawLineRange {
    start: u32,
    end: u32,
}

impl From<RawLineRange> for LineRange {
    fn from(raw: RawLineRange) -> Self {
        Self::new(raw.start, raw.end)
    }
}

impl LineRange {
    /// Builds a range, swapping reversed bounds and clamping line 0 to 1.
    pub fn new(start: u32, end: u32) -> Self {
        let (start, end) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        Self {
            start: start.max(1),
            end: end.max(1),
        }
    }

    pub fn single(line: u32) -> Self {
        Self::new(line, line)
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn line_count(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn contains(&self, line: u32) -> bool {
        (self.start..=self.end).contains(&line)
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionKind {
    Repository,
    File,
    Selection,
}

impl MentionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Repository => "repository",
            Self::File => "file",
            Self::Selection => "selection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContextMention {
    /// Full repository name, e.g. `codehost.example/user/myrepo`.
    Repository { name: String },
    File { path: PathBuf },
    Selection { path: PathBuf, range: LineRange },
}

impl ContextMention {
    pub fn repository(name: impl Into<String>) -> Self {
        Self::Repository { name: name.into() }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    pub fn selection(path: impl Into<PathBuf>, range: LineRange) -> Self {
        Self::Selection {
            path: path.into(),
            range,
        }
    }

    pub fn kind(&self) -> MentionKind {
        match self {
            Self::Repository { .. } => MentionKind::Repository,
            Self::File { .. } => MentionKind::File,
            Self::Selection { .. } => MentionKind::Selection,
        }
    }

    /// Text shown in the chat input: `myrepo`, `main.c`, `main.c:2-4`.
    pub fn label(&self) -> String {
        match self {
            Self::Repository { name } => repository_short_name(name).to_string(),
            Self::File { path } => display_name(path),
            Self::Selection { path, range } => format!("{}:{range}", display_name(path)),
        }
    }
}

impl fmt::Display for ContextMention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Last path segment of a repository name with any `.git` suffix removed.
pub fn repository_short_name(name: &str) -> &str {
    let trimmed = name.trim_end_matches('/');
    let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last)
}
