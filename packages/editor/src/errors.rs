//! Error types for the editor

use confdeck_client::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("unknown edit scope: {0}")]
    UnknownScope(String),

    #[error(transparent)]
    Save(#[from] SaveError),
}

/// One or more update calls in a save batch failed.
///
/// `failed_paths` names the parameters whose writes did not go through;
/// their edited values are kept so the user can retry without retyping.
/// Keys whose individual calls succeeded have already been reconciled.
#[derive(Error, Debug)]
#[error("failed to save {} parameter(s): {source}", failed_paths.len())]
pub struct SaveError {
    pub failed_paths: Vec<String>,
    pub source: StoreError,
}
