//! # Remote-store contract
//!
//! The four operations the rest of the system needs from the configuration
//! store. Everything above this trait treats the store as a black box whose
//! calls each resolve or fail exactly once; retrying, request pacing, and
//! transport concerns belong to the implementation behind it.
//!
//! The store is always passed in explicitly (constructor injection), so
//! tests substitute an in-memory fake instead of patching shared state.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreResult;

#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch the entire configuration as the raw nested wire payload
    /// (top level: object mapping key to one raw element).
    async fn fetch_config(&self) -> StoreResult<Value>;

    /// Write one parameter's value. `path` targets exactly one parameter's
    /// `value` field; callers append `/value` to the parameter path.
    async fn update_value(&self, path: &str, new_value: &str) -> StoreResult<()>;

    /// Append a new block of kind `block_key` under `parent_path`.
    async fn add_block(&self, parent_path: &str, block_key: &str) -> StoreResult<()>;

    /// Remove the block addressed by `block_path`.
    async fn delete_block(&self, block_path: &str) -> StoreResult<()>;
}
