//! # Configuration workspace
//!
//! Owns the remote store handle and the current parsed tree, and
//! orchestrates the read and write sides:
//!
//! ```text
//! store ──fetch──▶ raw payload ──parse──▶ tree ──resolve──▶ views
//!   ▲                                       │
//!   └──── update / add-block / delete ◀─────┘  (every write → refresh)
//! ```
//!
//! The tree is replaced wholesale on every refresh; nothing mutates it in
//! place. After any successful write the workspace re-fetches, so the tree
//! always reflects what the store last confirmed.

use std::sync::Arc;

use confdeck_client::{ConfigStore, StoreError};
use confdeck_editor::{EditSession, EditorError};
use confdeck_tree::{parse_raw_config, resolver, ConfigBlock, ParsedConfig, Resolved};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("configuration not loaded")]
    NotLoaded,
}

pub struct ConfigWorkspace {
    store: Arc<dyn ConfigStore>,
    current: Option<ParsedConfig>,
}

impl ConfigWorkspace {
    /// The store is injected, never a global: tests pass a fake.
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            store,
            current: None,
        }
    }

    pub fn store(&self) -> &Arc<dyn ConfigStore> {
        &self.store
    }

    /// Fetch the raw payload and rebuild the tree from scratch.
    pub async fn refresh(&mut self) -> Result<(), WorkspaceError> {
        let raw = self.store.fetch_config().await?;
        let parsed = parse_raw_config(&raw);

        if !parsed.is_clean() {
            tracing::warn!(
                skipped = parsed.warnings.len(),
                "configuration loaded with skipped elements"
            );
        }

        self.current = Some(parsed);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    pub fn root(&self) -> Option<&ConfigBlock> {
        self.current.as_ref().map(|parsed| &parsed.root)
    }

    /// Warnings from the most recent parse (skipped payload portions).
    pub fn warnings(&self) -> &[confdeck_tree::ParseWarning] {
        self.current
            .as_ref()
            .map(|parsed| parsed.warnings.as_slice())
            .unwrap_or(&[])
    }

    /// Resolve a path against the current tree. `None` both for a miss and
    /// for a not-yet-loaded tree; callers treat either as "not loaded".
    pub fn resolve(&self, path: &str) -> Option<Resolved<'_>> {
        resolver::resolve(self.root()?, path)
    }

    pub fn block(&self, path: &str) -> Option<&ConfigBlock> {
        match self.resolve(path)? {
            Resolved::Block(block) => Some(block),
            // A unique block's path resolves to its one-element list.
            Resolved::Blocks([block]) => Some(block),
            _ => None,
        }
    }

    pub fn blocks(&self, path: &str) -> Option<&[ConfigBlock]> {
        self.resolve(path)?.as_blocks()
    }

    /// Write one value, then re-fetch.
    pub async fn update_value(&mut self, path: &str, new_value: &str) -> Result<(), WorkspaceError> {
        self.store.update_value(path, new_value).await?;
        self.refresh().await
    }

    /// Append a block of kind `block_key` under `parent_path`, then re-fetch.
    pub async fn add_block(&mut self, parent_path: &str, block_key: &str) -> Result<(), WorkspaceError> {
        self.store.add_block(parent_path, block_key).await?;
        self.refresh().await
    }

    /// Delete the block at `block_path`, then re-fetch.
    pub async fn delete_block(&mut self, block_path: &str) -> Result<(), WorkspaceError> {
        self.store.delete_block(block_path).await?;
        self.refresh().await
    }

    /// Seed a fresh edit session for the single block at `path`.
    pub fn session_for_block(&self, path: &str, scope: &str) -> Result<EditSession, WorkspaceError> {
        let block = self.block(path).ok_or(WorkspaceError::NotLoaded)?;
        let mut session = EditSession::new();
        session.seed_block(scope, block);
        Ok(session)
    }

    /// Seed a fresh edit session for the repeated block list at `path`,
    /// one scope per element.
    pub fn session_for_blocks(&self, path: &str, prefix: &str) -> Result<EditSession, WorkspaceError> {
        let blocks = self.blocks(path).ok_or(WorkspaceError::NotLoaded)?;
        let mut session = EditSession::new();
        session.seed_blocks(prefix, blocks);
        Ok(session)
    }

    /// Commit one scope's changes, then re-fetch so the tree reflects the
    /// store. The refresh happens once per batch, not once per key; the
    /// caller reseeds its session from the fresh tree afterwards.
    pub async fn save_session(
        &mut self,
        session: &mut EditSession,
        scope: &str,
    ) -> Result<(), WorkspaceError> {
        let result = session.save(scope, self.store.as_ref()).await;
        // Even a failed batch may have written some keys; re-fetch either way.
        let refreshed = self.refresh().await;
        result?;
        refreshed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use confdeck_client::StoreResult;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingStore {
        fetches: AtomicUsize,
        updates: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ConfigStore for CountingStore {
        async fn fetch_config(&self) -> StoreResult<Value> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(json!({
                "http": {
                    "is_block": true,
                    "unique": true,
                    "display_name": {},
                    "desc": {},
                    "params": [],
                    "children": {
                        "server": [{
                            "is_block": true,
                            "unique": false,
                            "display_name": {},
                            "desc": {},
                            "params": [],
                            "children": {
                                "gzip": [{
                                    "is_block": false,
                                    "unique": false,
                                    "display_name": {},
                                    "desc": {},
                                    "params": [{
                                        "index": 0,
                                        "display_name": {},
                                        "desc": {},
                                        "type": "bool",
                                        "is_required": false,
                                        "default": "off",
                                        "value": "on"
                                    }]
                                }]
                            }
                        }]
                    }
                }
            }))
        }

        async fn update_value(&self, path: &str, new_value: &str) -> StoreResult<()> {
            self.updates
                .lock()
                .unwrap()
                .push((path.to_string(), new_value.to_string()));
            Ok(())
        }

        async fn add_block(&self, _parent_path: &str, _block_key: &str) -> StoreResult<()> {
            Ok(())
        }

        async fn delete_block(&self, _block_path: &str) -> StoreResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_refresh_loads_tree() {
        let mut workspace = ConfigWorkspace::new(Arc::new(CountingStore::default()));
        assert!(!workspace.is_loaded());
        assert!(workspace.resolve("/http").is_none());

        workspace.refresh().await.unwrap();
        assert!(workspace.is_loaded());
        assert!(workspace.block("/http").is_some());
        assert_eq!(workspace.blocks("/http/children/server").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_writes_trigger_a_refetch() {
        let store = Arc::new(CountingStore::default());
        let mut workspace = ConfigWorkspace::new(store.clone());

        workspace.refresh().await.unwrap();
        assert_eq!(store.fetches.load(Ordering::SeqCst), 1);

        workspace.update_value("/x/params/0/value", "1").await.unwrap();
        assert_eq!(store.fetches.load(Ordering::SeqCst), 2);

        workspace.add_block("/http", "server").await.unwrap();
        assert_eq!(store.fetches.load(Ordering::SeqCst), 3);

        workspace.delete_block("/http/children/server/0").await.unwrap();
        assert_eq!(store.fetches.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_session_seeding_requires_loaded_tree() {
        let workspace = ConfigWorkspace::new(Arc::new(CountingStore::default()));
        assert!(matches!(
            workspace.session_for_block("/http", "http"),
            Err(WorkspaceError::NotLoaded)
        ));
    }

    #[tokio::test]
    async fn test_seed_edit_save_round_trip() {
        let store = Arc::new(CountingStore::default());
        let mut workspace = ConfigWorkspace::new(store.clone());
        workspace.refresh().await.unwrap();

        let param_path = "/http/children/server/0/children/gzip/0/params/0";
        let mut session = workspace
            .session_for_block("/http/children/server/0", "server")
            .unwrap();
        assert!(!session.has_changes("server"));

        session.edit("server", param_path, "off").unwrap();
        workspace.save_session(&mut session, "server").await.unwrap();

        // The changed key went out as a `/value` write and the tree was
        // re-fetched once for the whole batch.
        assert_eq!(
            *store.updates.lock().unwrap(),
            vec![(format!("{param_path}/value"), "off".to_string())]
        );
        assert_eq!(store.fetches.load(Ordering::SeqCst), 2);
        assert!(!session.has_changes("server"));
    }

    #[tokio::test]
    async fn test_session_seeding_from_resolved_blocks() {
        let mut workspace = ConfigWorkspace::new(Arc::new(CountingStore::default()));
        workspace.refresh().await.unwrap();

        let session = workspace
            .session_for_blocks("/http/children/server", "server")
            .unwrap();
        let ids: Vec<&str> = session.scope_ids().collect();
        assert_eq!(ids, ["server-0"]);
    }
}
