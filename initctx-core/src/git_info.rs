//! Git remote discovery and parsing
//!
//! Reads the fetch remotes of a workspace with `git remote -v` and turns a
//! remote URL into a host plus repository path, which is what repository
//! resolution keys on.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Stdio};
use url::Url;

/// A git remote reduced to what identifies the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GitRemote {
    /// URL exactly as configured in git.
    pub url: String,
    /// Lowercased host name without credentials or port.
    pub host: String,
    /// Repository path on the host, without leading/trailing slashes or `.git`.
    pub path: String,
}

impl GitRemote {
    /// `host/path`, e.g. `codehost.example/user/myrepo`.
    pub fn canonical_name(&self) -> String {
        format!("{}/{}", self.host, self.path)
    }
}

/// Parses https, http, ssh, git, and scp-like (`git@host:path`) remote URLs.
/// Local paths and `file://` URLs have no host and yield `None`.
pub fn parse_remote_url(raw: &str) -> Option<GitRemote> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (host, path) = if trimmed.contains("://") {
        let url = Url::parse(trimmed).ok()?;
        if !matches!(url.scheme(), "http" | "https" | "ssh" | "git" | "git+ssh") {
            return None;
        }
        (url.host_str()?.to_string(), url.path().to_string())
    } else {
        // scp-like syntax: [user@]host:path
        let (authority, path) = trimmed.split_once(':')?;
        // A one-letter authority is a Windows drive, not a host.
        if authority.len() < 2 || authority.contains('/') || path.starts_with("//") {
            return None;
        }
        let host = authority.rsplit('@').next().unwrap_or(authority);
        (host.to_string(), path.to_string())
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path).trim_end_matches('/');
    if host.is_empty() || path.is_empty() {
        return None;
    }

    Some(GitRemote {
        url: trimmed.to_string(),
        host: host.to_ascii_lowercase(),
        path: path.to_string(),
    })
}

/// Get git remote URLs for fetch remotes in the repository at the given path.
///
/// Returns an empty map if not in a git repository or if no remotes are configured.
pub fn get_git_remote_urls(cwd: &Path) -> Result<BTreeMap<String, String>> {
    let output = Command::new("git")
        .args(["remote", "-v"])
        .current_dir(cwd)
        .output()
        .with_context(|| format!("Failed to run git remote -v in {}", cwd.display()))?;

    if !output.status.success() {
        return Ok(BTreeMap::new());
    }

    Ok(parse_remote_listing(&String::from_utf8_lossy(&output.stdout)))
}

/// Parses `git remote -v` output, keeping only fetch URLs:
///
/// ```text
/// origin  https://codehost.example/user/myrepo.git (fetch)
/// origin  https://codehost.example/user/myrepo.git (push)
/// ```
pub fn parse_remote_listing(listing: &str) -> BTreeMap<String, String> {
    let mut remotes = BTreeMap::new();
    for line in listing.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if let [name, url, purpose, ..] = parts.as_slice() {
            if purpose.trim_matches(|c| c == '(' || c == ')') == "fetch" {
                remotes.insert(name.to_string(), url.to_string());
            }
        }
    }
    remotes
}

/// Picks `preferred` when configured, otherwise the first remote by name,
/// skipping remotes whose URL cannot be parsed.
pub fn preferred_remote(remotes: &BTreeMap<String, String>, preferred: &str) -> Option<GitRemote> {
    remotes
        .get(preferred)
        .and_then(|url| parse_remote_url(url))
        .or_else(|| remotes.values().find_map(|url| parse_remote_url(url)))
}

/// Check if the given path is inside a git repository.
pub fn is_git_repo(cwd: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .current_dir(cwd)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Reads the workspace's remotes and returns the one repository resolution
/// should use.
pub fn workspace_remote(cwd: &Path, preferred: &str) -> Result<Option<GitRemote>> {
    if !is_git_repo(cwd) {
        return Ok(None);
    }
    let remotes = get_git_remote_urls(cwd)?;
    Ok(preferred_remote(&remotes, preferred))
}
