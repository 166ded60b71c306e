//! # Confdeck edit engine
//!
//! Tracks an operator's local edits against the last-saved configuration
//! values and commits only the changed ones to the remote store.
//!
//! ```text
//! tree ──seed──▶ EditSession ──edit*──▶ diff ──save──▶ ConfigStore
//! ```
//!
//! The session never touches the tree itself; after a successful save the
//! owner re-fetches and reseeds.

mod errors;
mod session;

pub use errors::{EditorError, SaveError};
pub use session::{EditSession, ScopeState};
