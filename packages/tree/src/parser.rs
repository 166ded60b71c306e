//! # Wire payload parser
//!
//! Converts the raw nested payload returned by the configuration store into
//! the canonical [`ConfigBlock`] tree, assigning every block, item, and
//! parameter its path via [`crate::paths`].
//!
//! ## Resilience policy
//!
//! Parsing never fails. Each element and parameter is decoded through a
//! typed serde step that fails closed for that node only: a malformed
//! sibling is skipped and reported as a [`ParseWarning`], and the rest of
//! the payload still parses. An operator should still see the valid
//! portions of configuration when part of the payload is unexpected.

use serde::Deserialize;
use serde_json::Value;

use crate::model::{ConfigBlock, ConfigItem, LocalizedText, Param, ParamType};
use crate::paths;

/// Raw parameter as it appears on the wire.
///
/// The declared `index` is authoritative for the parameter's path; the
/// position in the `params` array is not.
#[derive(Debug, Clone, Deserialize)]
pub struct RawParam {
    pub index: usize,
    pub display_name: LocalizedText,
    pub desc: LocalizedText,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub is_required: bool,
    pub default: String,
    pub value: String,
}

/// Raw element as it appears on the wire: either a recursive block
/// (`is_block == true`) or a leaf item.
///
/// `params` entries and `children` values stay as [`Value`] here so that a
/// malformed entry can be skipped without rejecting its siblings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawElement {
    pub is_block: bool,
    pub unique: bool,
    pub display_name: LocalizedText,
    pub desc: LocalizedText,
    #[serde(default)]
    pub params: Vec<Value>,
    #[serde(default)]
    pub children: Option<serde_json::Map<String, Value>>,
}

/// A skipped portion of the payload, with where and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// Path (or closest enclosing path) of the skipped node.
    pub location: String,
    pub reason: String,
}

/// Result of a parse: the tree plus everything that was skipped.
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    pub root: ConfigBlock,
    pub warnings: Vec<ParseWarning>,
}

impl ParsedConfig {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Parse the raw payload (top level: object mapping key to one raw element)
/// into the canonical tree. Never fails; see the module docs for the
/// degradation policy.
pub fn parse_raw_config(raw: &Value) -> ParsedConfig {
    let mut parser = TreeParser::default();
    let root = parser.parse_root(raw);
    ParsedConfig {
        root,
        warnings: parser.warnings,
    }
}

#[derive(Default)]
struct TreeParser {
    warnings: Vec<ParseWarning>,
}

impl TreeParser {
    fn warn(&mut self, location: String, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(%location, %reason, "skipping malformed config element");
        self.warnings.push(ParseWarning { location, reason });
    }

    fn parse_root(&mut self, raw: &Value) -> ConfigBlock {
        let mut root = ConfigBlock::root();

        let Some(entries) = raw.as_object() else {
            if !raw.is_null() {
                self.warn(String::new(), "top-level payload is not an object");
            }
            return root;
        };

        for (key, value) in entries {
            match serde_json::from_value::<RawElement>(value.clone()) {
                Ok(element) if element.is_block => {
                    let block = self.parse_block(&element, "", key, 0);
                    root.children.entry(key.clone()).or_default().push(block);
                }
                Ok(element) => {
                    let item = self.parse_item(&element, "", key, 0);
                    root.config_items.push(item);
                }
                Err(err) => {
                    self.warn(paths::element_path("", key, 0, true), err.to_string());
                }
            }
        }

        root
    }

    fn parse_block(
        &mut self,
        element: &RawElement,
        parent: &str,
        key: &str,
        index: usize,
    ) -> ConfigBlock {
        let path = paths::element_path(parent, key, index, element.unique);
        let params = self.parse_params(&element.params, &path);

        let mut block = ConfigBlock {
            path: path.clone(),
            display_name: element.display_name.clone(),
            desc: element.desc.clone(),
            params,
            config_items: Vec::new(),
            children: Default::default(),
        };

        if let Some(children) = &element.children {
            self.parse_children(children, &mut block);
        }

        block
    }

    fn parse_children(&mut self, children: &serde_json::Map<String, Value>, block: &mut ConfigBlock) {
        let parent = block.path.clone();

        for (child_key, child_value) in children {
            let Some(entries) = child_value.as_array() else {
                self.warn(
                    paths::element_path(&parent, child_key, 0, true),
                    "child entry is not an array",
                );
                continue;
            };

            for (index, entry) in entries.iter().enumerate() {
                let location = paths::element_path(&parent, child_key, index, false);

                if entry.is_null() {
                    self.warn(location, "null element in child array");
                    continue;
                }

                match serde_json::from_value::<RawElement>(entry.clone()) {
                    Ok(child) if child.is_block => {
                        let parsed = self.parse_block(&child, &parent, child_key, index);
                        block
                            .children
                            .entry(child_key.clone())
                            .or_default()
                            .push(parsed);
                    }
                    Ok(child) => {
                        let parsed = self.parse_item(&child, &parent, child_key, index);
                        block.config_items.push(parsed);
                    }
                    Err(err) => self.warn(location, err.to_string()),
                }
            }
        }
    }

    fn parse_item(
        &mut self,
        element: &RawElement,
        parent: &str,
        key: &str,
        index: usize,
    ) -> ConfigItem {
        let path = paths::element_path(parent, key, index, element.unique);
        let params = self.parse_params(&element.params, &path);

        ConfigItem {
            path,
            display_name: element.display_name.clone(),
            desc: element.desc.clone(),
            params,
        }
    }

    fn parse_params(&mut self, raw_params: &[Value], owner: &str) -> Vec<Param> {
        let mut params = Vec::with_capacity(raw_params.len());

        for (position, raw) in raw_params.iter().enumerate() {
            match serde_json::from_value::<RawParam>(raw.clone()) {
                Ok(param) => params.push(Param {
                    // Declared index, not array position.
                    path: paths::param_path(owner, param.index),
                    display_name: param.display_name,
                    desc: param.desc,
                    param_type: param.param_type,
                    is_required: param.is_required,
                    default: param.default,
                    value: param.value,
                }),
                Err(err) => self.warn(paths::param_path(owner, position), err.to_string()),
            }
        }

        params
    }
}
