//! # Canonical path construction
//!
//! Every node in the tree is addressed by a stable, slash-separated path
//! that is reconstructible purely from structural position. These two
//! functions are the single source of truth for that scheme; no other code
//! assembles path strings by hand.
//!
//! Scheme:
//!
//! ```text
//! ""                                  root (synthetic)
//! /http                               unique top-level block
//! /http/children/server/0             non-unique nested block, index 0
//! /http/children/server/0/params/3    parameter with declared index 3
//! ```

/// Path of a parameter with declared `index` under the element at `parent`.
pub fn param_path(parent: &str, index: usize) -> String {
    format!("{parent}/params/{index}")
}

/// Path of a block or item `key` under `parent`.
///
/// A root-level element (`parent == ""`) is addressed as `/key`; a nested
/// one as `parent/children/key`. Non-unique elements carry a trailing index
/// equal to their position in the sibling array; `index` is ignored when
/// `unique` is true.
pub fn element_path(parent: &str, key: &str, index: usize, unique: bool) -> String {
    let base = if parent.is_empty() {
        format!("/{key}")
    } else {
        format!("{parent}/children/{key}")
    };
    if unique {
        base
    } else {
        format!("{base}/{index}")
    }
}
