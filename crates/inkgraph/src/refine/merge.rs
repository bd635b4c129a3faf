//! Node-level canonicalization: text merging, deduplication and rewiring.

use std::collections::{HashMap, HashSet};

use inkgraph_core::{
    geometry::Bounds,
    graph::{GraphEdge, GraphNode, NodeKind},
    identifier::Id,
};

use super::identity::IdentityMap;

/// Merges `text_blob` nodes that continue each other on the page.
///
/// Nodes are visited in (top, left) order. Each unmerged node absorbs every
/// later node that passes [`continues_text`] against its current, growing
/// box. The returned nodes keep that visiting order.
pub fn merge_adjacent_text(nodes: Vec<GraphNode>) -> (Vec<GraphNode>, IdentityMap) {
    let mut sorted = nodes;
    sorted.sort_by_key(|node| (node.bounds().min_y(), node.bounds().min_x()));

    let mut absorbed = vec![false; sorted.len()];
    let mut merged = Vec::with_capacity(sorted.len());
    let mut map = IdentityMap::new();

    for i in 0..sorted.len() {
        if absorbed[i] {
            continue;
        }
        let mut current = sorted[i].clone();
        for j in (i + 1)..sorted.len() {
            if absorbed[j] || !continues_text(&current, &sorted[j]) {
                continue;
            }
            current.absorb(&sorted[j]);
            map.record(sorted[j].id(), current.id());
            absorbed[j] = true;
        }
        merged.push(current);
    }

    (merged, map)
}

/// Checks whether `next` continues the text of `current`.
///
/// Both must be text blobs whose vertical centres differ by at most the
/// taller height. The horizontal gap may range from a heavy overlap (90% of
/// the first width, for wrapped lines) up to 1.5 times the taller height.
pub fn continues_text(current: &GraphNode, next: &GraphNode) -> bool {
    if current.kind() != NodeKind::TextBlob || next.kind() != NodeKind::TextBlob {
        return false;
    }
    let (b1, b2): (Bounds, Bounds) = (current.bounds(), next.bounds());

    let max_h = f64::from(b1.height().max(b2.height()));
    let cy1 = f64::from(b1.min_y() + b1.max_y()) / 2.0;
    let cy2 = f64::from(b2.min_y() + b2.max_y()) / 2.0;
    if (cy1 - cy2).abs() > max_h {
        return false;
    }

    let dist_x = f64::from(b2.min_x() - b1.max_x());
    let width1 = f64::from(b1.width());
    -0.9 * width1 <= dist_x && dist_x < 1.5 * max_h
}

/// Collapses nodes with the same case-folded label onto the first one.
///
/// Nodes with an empty label are dropped without a map entry, so edges that
/// touch them disappear during rewiring.
pub fn deduplicate(nodes: Vec<GraphNode>) -> (Vec<GraphNode>, IdentityMap) {
    let mut first_by_label: HashMap<String, Id> = HashMap::new();
    let mut unique = Vec::with_capacity(nodes.len());
    let mut map = IdentityMap::new();

    for node in nodes {
        let key = node.label().to_lowercase();
        if key.is_empty() {
            continue;
        }
        match first_by_label.get(&key) {
            Some(&survivor) => map.record(node.id(), survivor),
            None => {
                first_by_label.insert(key, node.id());
                map.record(node.id(), node.id());
                unique.push(node);
            }
        }
    }

    (unique, map)
}

/// Rewrites edge endpoints through `map`.
///
/// An edge survives only when both resolved endpoints name one of `nodes`
/// and differ from each other.
pub fn rewire(edges: &[GraphEdge], nodes: &[GraphNode], map: &IdentityMap) -> Vec<GraphEdge> {
    let present: HashSet<Id> = nodes.iter().map(GraphNode::id).collect();
    edges
        .iter()
        .filter_map(|edge| {
            let from = map.resolve(edge.from());
            let to = map.resolve(edge.to());
            (from != to && present.contains(&from) && present.contains(&to))
                .then(|| edge.rewired(from, to))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use inkgraph_core::graph::CONNECTED_TO;

    use super::*;

    fn blob(id: &str, label: &str, [x1, y1, x2, y2]: [i32; 4]) -> GraphNode {
        GraphNode::new(Id::new(id), label, NodeKind::TextBlob, Bounds::new(x1, y1, x2, y2))
    }

    fn container(id: &str, label: &str, [x1, y1, x2, y2]: [i32; 4]) -> GraphNode {
        GraphNode::new(Id::new(id), label, NodeKind::Container, Bounds::new(x1, y1, x2, y2))
    }

    fn edge(from: &str, to: &str) -> GraphEdge {
        GraphEdge::new(Id::new(from), Id::new(to), CONNECTED_TO)
    }

    #[test]
    fn test_machine_learning_merges() {
        let nodes = vec![
            blob("t1", "Learning", [62, 0, 130, 20]),
            blob("t0", "Machine", [0, 0, 60, 20]),
        ];
        let (merged, map) = merge_adjacent_text(nodes);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].label(), "Machine Learning");
        assert_eq!(merged[0].bounds(), Bounds::new(0, 0, 130, 20));
        assert_eq!(map.resolve(Id::new("t1")), Id::new("t0"));
    }

    #[test]
    fn test_distant_blobs_stay_apart() {
        let nodes = vec![
            blob("a", "Machine", [0, 0, 60, 20]),
            blob("b", "Learning", [100, 0, 160, 20]),
            blob("c", "Below", [0, 60, 60, 80]),
        ];
        let (merged, map) = merge_adjacent_text(nodes);
        assert_eq!(merged.len(), 3);
        assert!(map.is_empty());
    }

    #[test]
    fn test_wrapped_line_merges_through_overlap() {
        // Second line starts under the first, overlapping most of its width.
        let nodes = vec![
            blob("a", "groupings called", [0, 0, 100, 20]),
            blob("b", "clusters", [20, 18, 90, 38]),
        ];
        let (merged, _) = merge_adjacent_text(nodes);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].label(), "groupings called clusters");
    }

    #[test]
    fn test_growing_box_chains_merges() {
        let nodes = vec![
            blob("a", "one", [0, 0, 40, 20]),
            blob("b", "two", [45, 0, 85, 20]),
            blob("c", "three", [90, 0, 140, 20]),
        ];
        let (merged, map) = merge_adjacent_text(nodes);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].label(), "one two three");
        assert_eq!(map.resolve(Id::new("c")), Id::new("a"));
    }

    #[test]
    fn test_containers_never_merge() {
        let nodes = vec![
            container("a", "Machine", [0, 0, 60, 20]),
            blob("b", "Learning", [62, 0, 130, 20]),
        ];
        let (merged, _) = merge_adjacent_text(nodes);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_deduplicate_is_case_insensitive() {
        let nodes = vec![
            container("a", "Model", [0, 0, 10, 10]),
            blob("b", "model", [0, 20, 10, 30]),
            blob("c", "Data", [0, 40, 10, 50]),
        ];
        let (unique, map) = deduplicate(nodes);
        let ids: Vec<_> = unique.iter().map(|n| n.id()).collect();
        assert_eq!(ids, [Id::new("a"), Id::new("c")]);
        assert_eq!(map.resolve(Id::new("b")), Id::new("a"));
    }

    #[test]
    fn test_deduplicate_drops_empty_labels() {
        let nodes = vec![container("a", "", [0, 0, 10, 10]), blob("b", "x", [0, 20, 10, 30])];
        let (unique, map) = deduplicate(nodes);
        assert_eq!(unique.len(), 1);
        assert_eq!(map.resolve(Id::new("a")), Id::new("a"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_rewire_composes_and_drops_self_loops() {
        let nodes = vec![
            container("a", "Data", [0, 0, 10, 10]),
            container("c", "Model", [0, 40, 10, 50]),
        ];
        let merge: IdentityMap = [(Id::new("b"), Id::new("x"))].into_iter().collect();
        let dedup: IdentityMap = [(Id::new("x"), Id::new("c"))].into_iter().collect();
        let edges = vec![edge("a", "b"), edge("c", "x"), edge("a", "gone")];

        let rewired = rewire(&edges, &nodes, &merge.then(&dedup));
        assert_eq!(rewired.len(), 1);
        assert_eq!(rewired[0].from(), "a");
        assert_eq!(rewired[0].to(), "c");
        assert_eq!(rewired[0].relation(), CONNECTED_TO);
    }
}
