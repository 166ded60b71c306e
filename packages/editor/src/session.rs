//! # Edit session
//!
//! Per-scope mutable editing state against an immutable configuration
//! tree: a working copy of parameter values (`edited_values`) next to the
//! last-confirmed-saved copy (`saved_values`), with diffing and a batched
//! save path through the remote store.
//!
//! A *scope* groups one editable block's parameters (or one element of a
//! repeated block list). Scopes are fully independent: editing one never
//! affects another.
//!
//! ## Lifecycle
//!
//! ```text
//! Seed → Edit* → Save → (re-fetch tree) → Seed
//! ```
//!
//! Seeding flattens a block's item parameters into `path → value` and
//! replaces both copies wholesale; any unsaved edits are discarded, which
//! is intentional because a reseed only happens after a fresh fetch and the
//! tree is the source of truth at that point.

use std::collections::HashMap;

use confdeck_client::ConfigStore;
use confdeck_tree::ConfigBlock;
use futures::future::join_all;

use crate::errors::{EditorError, SaveError};

/// Edit state for one scope.
#[derive(Debug, Clone, Default)]
pub struct ScopeState {
    /// Working copy, mutated by [`EditSession::edit`].
    pub edited_values: HashMap<String, String>,

    /// Last values confirmed written to the store.
    pub saved_values: HashMap<String, String>,

    /// True while a save batch is in flight.
    pub is_saving: bool,
}

impl ScopeState {
    fn seeded(values: HashMap<String, String>) -> Self {
        Self {
            edited_values: values.clone(),
            saved_values: values,
            is_saving: false,
        }
    }
}

/// Tracks local edits for any number of scopes and commits only the
/// changed values to the remote store.
#[derive(Debug, Default)]
pub struct EditSession {
    scopes: HashMap<String, ScopeState>,
}

/// Flatten every parameter under every config item of `block` into a
/// `path → value` map.
fn initial_values(block: &ConfigBlock) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for item in &block.config_items {
        for param in &item.params {
            values.insert(param.path.clone(), param.value.clone());
        }
    }
    values
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed (or reseed) a single scope from one block. Replaces the
    /// scope's state wholesale.
    pub fn seed_block(&mut self, scope: &str, block: &ConfigBlock) {
        self.scopes
            .insert(scope.to_string(), ScopeState::seeded(initial_values(block)));
    }

    /// Seed one scope per element of a repeated block list, named
    /// `<prefix>-<index>`. Scopes from a previous seed of the same prefix
    /// are dropped first, so a list that shrank does not leave stale state.
    pub fn seed_blocks(&mut self, prefix: &str, blocks: &[ConfigBlock]) {
        let list_prefix = format!("{prefix}-");
        self.scopes
            .retain(|scope, _| scope != prefix && !scope.starts_with(&list_prefix));

        for (index, block) in blocks.iter().enumerate() {
            self.scopes.insert(
                format!("{prefix}-{index}"),
                ScopeState::seeded(initial_values(block)),
            );
        }
    }

    pub fn scope(&self, scope: &str) -> Option<&ScopeState> {
        self.scopes.get(scope)
    }

    pub fn scope_ids(&self) -> impl Iterator<Item = &str> {
        self.scopes.keys().map(String::as_str)
    }

    /// Record a local edit. No validation, no remote effect.
    pub fn edit(&mut self, scope: &str, path: &str, new_value: &str) -> Result<(), EditorError> {
        let state = self
            .scopes
            .get_mut(scope)
            .ok_or_else(|| EditorError::UnknownScope(scope.to_string()))?;
        state
            .edited_values
            .insert(path.to_string(), new_value.to_string());
        Ok(())
    }

    /// True iff any edited value differs from its saved counterpart.
    /// Unknown scopes have no changes.
    pub fn has_changes(&self, scope: &str) -> bool {
        self.scopes
            .get(scope)
            .map(|state| {
                state
                    .edited_values
                    .iter()
                    .any(|(path, value)| state.saved_values.get(path) != Some(value))
            })
            .unwrap_or(false)
    }

    /// The current diff for a scope, sorted by path.
    pub fn changed(&self, scope: &str) -> Vec<(String, String)> {
        let Some(state) = self.scopes.get(scope) else {
            return Vec::new();
        };

        let mut changed: Vec<(String, String)> = state
            .edited_values
            .iter()
            .filter(|(path, value)| state.saved_values.get(*path) != Some(*value))
            .map(|(path, value)| (path.clone(), value.clone()))
            .collect();
        changed.sort();
        changed
    }

    /// Commit the scope's changed values to the store.
    ///
    /// One `update_value` call per changed key, all issued concurrently as
    /// a single batch targeting `<param path>/value`. Outcomes are tracked
    /// per key: every key whose call succeeded has its saved value
    /// reconciled, even when a sibling call fails. On any failure the batch
    /// surfaces a single [`SaveError`] naming the failed paths; edited
    /// values are never rolled back, so a retry needs no retyping.
    pub async fn save(&mut self, scope: &str, store: &dyn ConfigStore) -> Result<(), EditorError> {
        let changed = self.changed(scope);
        if changed.is_empty() {
            return Ok(());
        }

        if let Some(state) = self.scopes.get_mut(scope) {
            state.is_saving = true;
        }

        let results = join_all(changed.iter().map(|(path, value)| {
            let value_path = format!("{path}/value");
            async move { store.update_value(&value_path, value).await }
        }))
        .await;

        let Some(state) = self.scopes.get_mut(scope) else {
            return Ok(());
        };
        state.is_saving = false;

        let mut failed_paths = Vec::new();
        let mut first_error = None;

        for ((path, value), result) in changed.into_iter().zip(results) {
            match result {
                Ok(()) => {
                    state.saved_values.insert(path, value);
                }
                Err(err) => {
                    tracing::warn!(%path, error = %err, "parameter update failed");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                    failed_paths.push(path);
                }
            }
        }

        match first_error {
            None => {
                // Full success: saved becomes a copy of the working state
                // at the moment of the save.
                state.saved_values = state.edited_values.clone();
                Ok(())
            }
            Some(source) => Err(SaveError {
                failed_paths,
                source,
            }
            .into()),
        }
    }
}
