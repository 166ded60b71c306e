//! Operator commands, each taking an already-refreshed workspace.

use anyhow::{bail, Result};
use colored::Colorize;
use confdeck_tree::{ConfigBlock, LocalizedText, Resolved};
use confdeck_workspace::ConfigWorkspace;

/// Preferred display language, falling back to any available one.
fn display_name(text: &LocalizedText) -> &str {
    text.get("en")
        .or_else(|| text.values().next())
        .map(String::as_str)
        .unwrap_or("")
}

/// Print the whole parsed tree, indented, with paths.
pub fn tree(workspace: &ConfigWorkspace) -> Result<()> {
    let Some(root) = workspace.root() else {
        bail!("configuration not loaded");
    };

    print_block(root, 0);

    let warnings = workspace.warnings();
    if !warnings.is_empty() {
        println!();
        for warning in warnings {
            println!(
                "{} {} ({})",
                "skipped:".yellow().bold(),
                warning.location,
                warning.reason
            );
        }
    }
    Ok(())
}

fn print_block(block: &ConfigBlock, depth: usize) {
    let indent = "  ".repeat(depth);

    let label = if block.path.is_empty() {
        "(root)".to_string()
    } else {
        block.path.clone()
    };
    println!("{indent}{} {}", label.cyan().bold(), display_name(&block.display_name));

    for param in &block.params {
        println!("{indent}  {} = {}", param.path, param.value.green());
    }
    for item in &block.config_items {
        println!("{indent}  {} {}", item.path.yellow(), display_name(&item.display_name));
        for param in &item.params {
            println!("{indent}    {} = {}", param.path, param.value.green());
        }
    }

    let mut keys: Vec<&String> = block.children.keys().collect();
    keys.sort();
    for key in keys {
        for child in &block.children[key] {
            print_block(child, depth + 1);
        }
    }
}

/// Resolve a path and print the addressed node as JSON.
pub fn get(workspace: &ConfigWorkspace, path: &str) -> Result<()> {
    let json = match workspace.resolve(path) {
        Some(Resolved::Block(block)) => serde_json::to_string_pretty(block)?,
        Some(Resolved::Blocks(blocks)) => serde_json::to_string_pretty(blocks)?,
        Some(Resolved::Item(item)) => serde_json::to_string_pretty(item)?,
        Some(Resolved::Param(param)) => serde_json::to_string_pretty(param)?,
        None => bail!("nothing at path: {path}"),
    };
    println!("{json}");
    Ok(())
}

/// Write one parameter value and print the store-confirmed result.
pub async fn set(workspace: &mut ConfigWorkspace, path: &str, value: &str) -> Result<()> {
    match workspace.resolve(path) {
        Some(Resolved::Param(_)) => {}
        Some(_) => bail!("path addresses a block or item, not a parameter: {path}"),
        None => bail!("nothing at path: {path}"),
    }

    workspace.update_value(&format!("{path}/value"), value).await?;

    // Report what the re-fetched tree now holds, which is what the store
    // confirmed, not merely what was sent.
    let confirmed = workspace
        .resolve(path)
        .and_then(|resolved| resolved.as_param())
        .map(|param| param.value.as_str())
        .unwrap_or("<gone>");
    println!("{} {path} = {}", "saved:".green().bold(), confirmed);
    Ok(())
}

/// Append a new block under a parent and show the resulting sibling list.
pub async fn add_block(
    workspace: &mut ConfigWorkspace,
    parent_path: &str,
    block_key: &str,
) -> Result<()> {
    workspace.add_block(parent_path, block_key).await?;

    let count = workspace
        .blocks(&format!("{parent_path}/children/{block_key}"))
        .map(<[ConfigBlock]>::len)
        .unwrap_or(0);
    println!(
        "{} {block_key} under {parent_path} ({count} now)",
        "added:".green().bold()
    );
    Ok(())
}

/// Delete the block at a path.
pub async fn delete_block(workspace: &mut ConfigWorkspace, block_path: &str) -> Result<()> {
    if workspace.resolve(block_path).is_none() {
        bail!("nothing at path: {block_path}");
    }

    workspace.delete_block(block_path).await?;
    println!("{} {block_path}", "deleted:".green().bold());
    Ok(())
}
