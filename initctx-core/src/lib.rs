//! Core of initctx: the chat panel's initial context.
//!
//! A chat input starts out mirroring what the user is looking at in the
//! editor (active file, selected lines, and the workspace repository) and
//! keeps mirroring it until the user edits the input for the first time.
//!
//! ```
//! use initctx_config::ContextConfig;
//! use initctx_core::{ChatPanel, EditorSurface, InitialContextSync, LineRange};
//!
//! let mut editor = EditorSurface::new();
//! let mut panel = ChatPanel::new();
//! let sync = InitialContextSync::new(ContextConfig::default());
//! let input = sync.attach_input(&mut panel, &editor.focus_state());
//!
//! editor.open_file("src/main.c").unwrap();
//! editor.select_lines(LineRange::new(2, 4)).unwrap();
//! sync.on_focus_changed(&mut panel, &editor.focus_state());
//!
//! assert_eq!(
//!     panel.input(input).unwrap().mention_labels(),
//!     vec!["main.c".to_string(), "main.c:2-4".to_string()]
//! );
//! ```

pub mod chat;
pub mod context;
pub mod editor;
pub mod git_info;
pub mod mention;
#[cfg(feature = "mock-server")]
pub mod mock_server;
pub mod repository;

pub use chat::{ChatError, ChatInput, ChatInputId, ChatPanel, Key};
pub use context::{ContextEvent, InitialContextSync, compute_initial_context};
pub use editor::{EditorError, EditorEvent, EditorFocusState, EditorSurface};
pub use git_info::GitRemote;
pub use mention::{ContextMention, LineRange, MentionKind};
#[cfg(feature = "mock-server")]
pub use mock_server::MockServer;
pub use repository::{
    ChainResolver, EnterpriseResolver, RepositoryResolver, RepositorySource, ResolveError,
    ResolvedRepository, SelfServeResolver, detect_repository, resolver_from_config,
};
