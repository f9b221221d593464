//! # initctx - chat initial context
//!
//! initctx keeps a chat panel's *initial context* (the open file, the
//! selected lines and the workspace repository) in step with the editor
//! until the user starts typing into the chat input. From the first
//! keystroke on, that input's mentions are frozen.
//!
//! ## Crates
//!
//! - `initctx-commons`: HTTP client builders, path display helpers and the
//!   telemetry sink used for context events.
//! - `initctx-config`: layered `initctx.toml` loading.
//! - `initctx-core`: mentions, editor state, chat inputs, the synchronizer,
//!   git remote parsing, repository resolution and the mock backend.
//! - `initctx` (this crate): the [`Workbench`] driver, the replay script
//!   format and the `initctx` binary.
//!
//! ## Quickstart
//!
//! ```bash
//! # Show the repository mention for the current checkout
//! initctx repo
//!
//! # Replay a script of editor and chat actions
//! initctx replay session.txt --remote git@codehost.example:user/myrepo.git
//!
//! # Run the mock backend with a mapping
//! initctx mock-server --port 4000 --map codehost.example/user/myrepo=codehost.example/user/myrepo
//! ```
//!
//! ## Driving the workbench
//!
//! ```
//! use initctx::Workbench;
//! use initctx_config::ContextConfig;
//!
//! let mut bench = Workbench::new(ContextConfig::default());
//! bench.open_file_in_editor_tab("main.c").unwrap();
//! bench.select_line_range_in_editor_tab(2, 4).unwrap();
//!
//! let input = bench.last_chat_input();
//! assert_eq!(
//!     bench.chat_input_mentions(input).unwrap(),
//!     vec!["main.c".to_string(), "main.c:2-4".to_string()]
//! );
//! ```

pub mod replay;
pub mod workbench;

pub use replay::{ReplayStep, Script, ScriptCommand, ScriptError};
pub use workbench::Workbench;
