//! JSON rendering of the PCIe topology forest.

use serde_json::json;
use std::path::Path;

use crate::core::pcie::{read_tree, TreeNode};
use crate::error::Result;

pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Rendered `/pcie-tree` body.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeDocument {
    /// Array of root nodes
    Tree(String),
    /// `{"error": "<message>"}`
    Error(String),
}

impl TreeDocument {
    pub fn is_error(&self) -> bool {
        matches!(self, TreeDocument::Error(_))
    }

    pub fn into_body(self) -> String {
        match self {
            TreeDocument::Tree(body) | TreeDocument::Error(body) => body,
        }
    }
}

/// Read the topology under `sysfs_root` and render it.
pub fn scrape_tree(sysfs_root: &Path) -> TreeDocument {
    let result = read_tree(sysfs_root);
    if let Err(e) = &result {
        log::warn!("PCIe topology scrape failed: {}", e);
    }
    render_tree(&result)
}

pub fn render_tree(result: &Result<Vec<TreeNode>>) -> TreeDocument {
    let rendered = result
        .as_ref()
        .map_err(|e| e.to_string())
        .and_then(|roots| to_json(roots).map_err(|e| e.to_string()));

    match rendered {
        Ok(body) => TreeDocument::Tree(body),
        Err(message) => TreeDocument::Error(format!("{}\n", json!({ "error": message }))),
    }
}

fn to_json(roots: &[TreeNode]) -> Result<String> {
    let mut body = serde_json::to_string(roots)?;
    body.push('\n');
    Ok(body)
}
