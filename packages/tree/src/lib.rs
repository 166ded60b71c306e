//! # Confdeck configuration tree
//!
//! Canonical model of a server's nested configuration: recursive blocks,
//! leaf items, and string-valued parameters, each addressable by a stable
//! path string.
//!
//! ```text
//! raw wire payload ──parser──▶ ConfigBlock tree ──resolver──▶ node by path
//! ```
//!
//! The tree is immutable once built and is rebuilt wholesale on every fetch
//! from the remote store; edits live in `confdeck-editor` and only show up
//! here after a successful write followed by a re-fetch.

pub mod model;
pub mod parser;
pub mod paths;
pub mod resolver;

pub use model::{ConfigBlock, ConfigItem, LocalizedText, Param, ParamType};
pub use parser::{parse_raw_config, ParseWarning, ParsedConfig, RawElement, RawParam};
pub use resolver::{resolve, Resolved};
