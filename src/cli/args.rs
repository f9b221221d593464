use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Chat initial-context tools
#[derive(Debug, Parser)]
#[command(name = "initctx")]
#[command(about = "Track a chat panel's initial context against an editor")]
#[command(version)]
pub struct Cli {
    /// Configuration file to load instead of workspace discovery
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Runtime configuration override (can be repeated)
    ///
    /// Example: -c server.endpoint=http://127.0.0.1:4000
    #[arg(short = 'c', long = "config-override", global = true, value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Workspace directory (defaults to the current directory)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the repository mention for the workspace
    ///
    /// Prints nothing when the workspace has no resolvable git remote.
    ///
    /// Examples:
    ///   initctx repo
    ///   initctx repo --remote git@codehost.example:user/myrepo.git
    Repo {
        /// Resolve this remote URL instead of reading the workspace's remotes
        #[arg(long)]
        remote: Option<String>,

        /// Print the resolved repository as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay a script of editor and chat actions
    ///
    /// Prints the mentions of the most recent chat input after every step.
    ///
    /// Examples:
    ///   initctx replay session.txt
    ///   initctx replay session.txt --remote https://codehost.example/user/myrepo.git
    Replay {
        /// Script file, one action per line
        script: PathBuf,

        /// Git remote whose repository seeds the initial context
        #[arg(long)]
        remote: Option<String>,

        /// Emit one JSON object per step
        #[arg(long)]
        json: bool,

        /// Print the synchronizer's context events to stderr when done
        #[arg(long)]
        events: bool,
    },

    /// Run the mock backend until interrupted
    ///
    /// Examples:
    ///   initctx mock-server --port 4000 --map codehost.example/user/myrepo=codehost.example/user/myrepo
    MockServer {
        /// Port to listen on (0 picks a free port)
        #[arg(short, long, default_value_t = 0)]
        port: u16,

        /// Repository mapping REMOTE=NAME (can be repeated)
        #[arg(long = "map", value_name = "REMOTE=NAME")]
        mappings: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "initctx",
            "replay",
            "session.txt",
            "-c",
            "context.include_selection=false",
            "--remote",
            "git@codehost.example:user/myrepo.git",
        ])
        .unwrap();

        assert_eq!(cli.overrides, vec!["context.include_selection=false"]);
        match cli.command {
            Commands::Replay {
                script,
                remote,
                json,
                events,
            } => {
                assert_eq!(script, PathBuf::from("session.txt"));
                assert_eq!(remote.as_deref(), Some("git@codehost.example:user/myrepo.git"));
                assert!(!json);
                assert!(!events);
            }
            other => panic!("Wrong command type: {other:?}"),
        }
    }

    #[test]
    fn mock_server_collects_mappings() {
        let cli = Cli::try_parse_from([
            "initctx",
            "mock-server",
            "--map",
            "a.example/x/y=a.example/x/y",
            "--map",
            "b.example/z=b.example/z",
        ])
        .unwrap();
        match cli.command {
            Commands::MockServer { port, mappings } => {
                assert_eq!(port, 0);
                assert_eq!(mappings.len(), 2);
            }
            other => panic!("Wrong command type: {other:?}"),
        }
    }
}
