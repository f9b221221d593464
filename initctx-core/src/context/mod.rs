//! Initial chat context.
//!
//! A fresh chat input mirrors the editor: the active file, the selected line
//! range in it, and the detected repository, always in that order. Mirroring
//! continues on every focus change until the user edits the input; from then
//! on the input keeps whatever mentions it had last.

mod sync;

pub use sync::{ContextEvent, InitialContextSync, compute_initial_context};
