//! Output formatting for CLI

use crate::{graph::WeightedGraph, types::NodeSet};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// External ids of a node set, sorted, shortened past `limit` entries
pub fn format_nodes(graph: &WeightedGraph, nodes: &NodeSet, limit: usize) -> String {
    let mut ids: Vec<i64> = nodes.iter().map(|&node| graph.external_id(node)).collect();
    ids.sort_unstable();

    let shown: Vec<String> = ids.iter().take(limit).map(i64::to_string).collect();
    if ids.len() > limit {
        format!("{} ... (+{} more)", shown.join(" "), ids.len() - limit)
    } else {
        shown.join(" ")
    }
}

/// Print the size and size ratio of a node set
pub fn print_set(key: &str, nodes: &NodeSet, total: usize) {
    let ratio = if total == 0 {
        0.0
    } else {
        nodes.len() as f64 / total as f64
    };
    print_kv(
        key,
        &format!("{} ({:.1}%)", format_number(nodes.len()), ratio * 100.0),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Edge;

    #[test]
    fn thousands_are_separated() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn node_lists_use_external_ids() {
        let graph =
            WeightedGraph::from_edge_list(&[Edge::unit(30, 10), Edge::unit(10, 20)], true)
                .unwrap();
        let all: NodeSet = (0..3).collect();
        assert_eq!(format_nodes(&graph, &all, 5), "10 20 30");
        assert_eq!(format_nodes(&graph, &all, 2), "10 20 ... (+1 more)");
    }
}
