//! Tree-wide addressing properties: every parsed node is reachable again
//! through its own assigned path, and no two nodes share a path.

use confdeck_tree::{parse_raw_config, resolve, ConfigBlock, Resolved};
use serde_json::json;

fn nested_payload() -> serde_json::Value {
    json!({
        "http": {
            "is_block": true,
            "unique": true,
            "display_name": {"en": "HTTP"},
            "desc": {},
            "params": [{
                "index": 0,
                "display_name": {"en": "keepalive"},
                "desc": {},
                "type": "u32",
                "is_required": false,
                "default": "65",
                "value": "65"
            }],
            "children": {
                "server": [
                    {
                        "is_block": true,
                        "unique": false,
                        "display_name": {"en": "Server"},
                        "desc": {},
                        "params": [{
                            "index": 0,
                            "display_name": {"en": "server_name"},
                            "desc": {},
                            "type": "String",
                            "is_required": true,
                            "default": "",
                            "value": "example.com"
                        }],
                        "children": {
                            "location": [
                                {
                                    "is_block": true,
                                    "unique": false,
                                    "display_name": {"en": "Location"},
                                    "desc": {},
                                    "params": [],
                                    "children": {}
                                },
                                {
                                    "is_block": true,
                                    "unique": false,
                                    "display_name": {"en": "Location"},
                                    "desc": {},
                                    "params": [{
                                        "index": 1,
                                        "display_name": {"en": "root"},
                                        "desc": {},
                                        "type": "String",
                                        "is_required": false,
                                        "default": "/var/www",
                                        "value": "/srv/site"
                                    }],
                                    "children": {}
                                }
                            ],
                            "gzip": [{
                                "is_block": false,
                                "unique": false,
                                "display_name": {"en": "gzip"},
                                "desc": {},
                                "params": [{
                                    "index": 0,
                                    "display_name": {"en": "enabled"},
                                    "desc": {},
                                    "type": "bool",
                                    "is_required": false,
                                    "default": "off",
                                    "value": "on"
                                }]
                            }]
                        }
                    }
                ]
            }
        },
        "other": {
            "is_block": false,
            "unique": false,
            "display_name": {"en": "Other"},
            "desc": {},
            "params": [{
                "index": 0,
                "display_name": {"en": "worker_processes"},
                "desc": {},
                "type": "usize",
                "is_required": false,
                "default": "1",
                "value": "4"
            }]
        }
    })
}

fn collect_paths(block: &ConfigBlock, out: &mut Vec<String>) {
    out.push(block.path.clone());
    for param in &block.params {
        out.push(param.path.clone());
    }
    for item in &block.config_items {
        out.push(item.path.clone());
        for param in &item.params {
            out.push(param.path.clone());
        }
    }
    for list in block.children.values() {
        for child in list {
            collect_paths(child, out);
        }
    }
}

#[test]
fn every_path_in_the_tree_is_unique() {
    let parsed = parse_raw_config(&nested_payload());
    assert!(parsed.is_clean());

    let mut paths = Vec::new();
    collect_paths(&parsed.root, &mut paths);

    let mut deduped = paths.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), paths.len(), "duplicate path in parsed tree");
}

#[test]
fn every_node_round_trips_through_its_own_path() {
    let parsed = parse_raw_config(&nested_payload());
    let root = &parsed.root;

    let mut paths = Vec::new();
    collect_paths(root, &mut paths);

    for path in &paths {
        let resolved = resolve(root, path)
            .unwrap_or_else(|| panic!("path {path:?} did not resolve"));

        match resolved {
            Resolved::Block(block) => assert_eq!(&block.path, path),
            // A unique block's path carries no index, so resolving it
            // returns the (single-element) sibling list.
            Resolved::Blocks(blocks) => {
                assert_eq!(blocks.len(), 1);
                assert_eq!(&blocks[0].path, path);
            }
            Resolved::Item(item) => assert_eq!(&item.path, path),
            Resolved::Param(param) => assert_eq!(&param.path, path),
        }
    }
}

#[test]
fn nested_scenario_assigns_expected_paths() {
    // One unique http block holding one non-unique server with a single
    // string param.
    let raw = json!({
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
                    "params": [{
                        "index": 0,
                        "display_name": {},
                        "desc": {},
                        "type": "String",
                        "is_required": true,
                        "default": "",
                        "value": "example.com"
                    }],
                    "children": {}
                }]
            }
        }
    });

    let parsed = parse_raw_config(&raw);
    assert!(parsed.is_clean());

    let http_list = &parsed.root.children["http"];
    assert_eq!(http_list.len(), 1);
    assert_eq!(http_list[0].path, "/http");

    let servers = &http_list[0].children["server"];
    assert_eq!(servers.len(), 1);
    assert_eq!(servers[0].path, "/http/children/server/0");
    assert_eq!(servers[0].params[0].path, "/http/children/server/0/params/0");

    let server = resolve(&parsed.root, "/http/children/server/0")
        .unwrap()
        .as_block()
        .unwrap();
    assert_eq!(server.params[0].value, "example.com");

    assert!(resolve(&parsed.root, "/http/children/server/5").is_none());
}
