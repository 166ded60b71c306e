use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display text keyed by language tag (e.g. `"en"`, `"zh-tw"`).
///
/// Carried through untouched; picking a language is a presentation concern.
pub type LocalizedText = HashMap<String, String>;

/// Declared parameter kind.
///
/// Purely descriptive: values are always carried as strings and are never
/// coerced or range-checked against this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamType {
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "u32")]
    U32,
    #[serde(rename = "String")]
    String,
    #[serde(rename = "usize")]
    Usize,
}

/// A single named, typed, string-valued configuration leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Unique within the whole tree; always `<owner path>/params/<index>`.
    pub path: String,
    pub display_name: LocalizedText,
    pub desc: LocalizedText,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub is_required: bool,
    pub default: String,
    pub value: String,
}

/// A non-recursive configuration element holding only parameters
/// (e.g. a single directive group).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub path: String,
    pub display_name: LocalizedText,
    pub desc: LocalizedText,
    pub params: Vec<Param>,
}

/// A recursive configuration container: own parameters, leaf items, and
/// nested child blocks grouped by key.
///
/// The root of a parsed tree is a synthetic block with `path == ""`.
/// A key is present in `children` only if at least one block of that key
/// exists; an empty list is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigBlock {
    pub path: String,
    pub display_name: LocalizedText,
    pub desc: LocalizedText,
    pub params: Vec<Param>,
    pub config_items: Vec<ConfigItem>,
    pub children: HashMap<String, Vec<ConfigBlock>>,
}

impl ConfigBlock {
    /// Synthetic root block (empty path, no content).
    pub fn root() -> Self {
        Self {
            path: String::new(),
            display_name: LocalizedText::new(),
            desc: LocalizedText::new(),
            params: Vec::new(),
            config_items: Vec::new(),
            children: HashMap::new(),
        }
    }
}
