use crate::core::pcie::TreeNode;

/// Format a link ratio as a percentage, or `n/a` when undefined
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(value) => format!("{:.0}%", value * 100.0),
        None => "n/a".to_string(),
    }
}

/// Format throughput in GB/s
pub fn format_throughput(gbps: f64) -> String {
    format!("{:.2} GB/s", gbps)
}

/// A tree node flattened for line-by-line display
#[derive(Debug, Clone)]
pub struct FlattenedNode<'a> {
    pub node: &'a TreeNode,
    pub depth: usize,
    pub is_last: bool,
    pub parent_chain: Vec<bool>, // For drawing tree lines
}

/// Flatten a forest depth-first, keeping sibling order
pub fn flatten_tree(roots: &[TreeNode]) -> Vec<FlattenedNode<'_>> {
    let mut result = Vec::new();
    for (i, root) in roots.iter().enumerate() {
        flatten_node(root, &mut result, 0, i + 1 == roots.len(), Vec::new());
    }
    result
}

fn flatten_node<'a>(
    node: &'a TreeNode,
    result: &mut Vec<FlattenedNode<'a>>,
    depth: usize,
    is_last: bool,
    parent_chain: Vec<bool>,
) {
    result.push(FlattenedNode {
        node,
        depth,
        is_last,
        parent_chain: parent_chain.clone(),
    });

    let mut chain = parent_chain;
    if depth > 0 {
        chain.push(is_last);
    }

    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        flatten_node(child, result, depth + 1, i + 1 == count, chain.clone());
    }
}

/// Tree-drawing prefix for a flattened node
pub fn format_tree_indent(flattened: &FlattenedNode<'_>) -> String {
    let mut indent = String::new();

    for &is_parent_last in &flattened.parent_chain {
        if is_parent_last {
            indent.push_str("  ");
        } else {
            indent.push_str("│ ");
        }
    }

    if flattened.depth > 0 {
        if flattened.is_last {
            indent.push_str("└─");
        } else {
            indent.push_str("├─");
        }
    }

    indent
}
