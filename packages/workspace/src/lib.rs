//! # Confdeck workspace
//!
//! Ties the pieces together for a running operator session: the store
//! client, the current configuration tree, path resolution, and edit
//! sessions, with every successful write followed by a re-fetch.

mod workspace;

pub use workspace::{ConfigWorkspace, WorkspaceError};
