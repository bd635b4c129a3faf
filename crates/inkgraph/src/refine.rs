//! Canonicalization of raw diagram graphs.
//!
//! [`GraphRefiner`] first merges the raw graphs of a page, either all into
//! one or by vertical proximity, then runs a fixed sequence of stages over
//! each merged graph:
//!
//! 1. label normalization ([`LabelNormalizer`]),
//! 2. adjacent text merging ([`merge::merge_adjacent_text`]),
//! 3. deduplication by case-folded label ([`merge::deduplicate`]),
//! 4. edge rewiring through the composed [`IdentityMap`] of stages 2 and 3,
//! 5. relation inference ([`RelationInferrer`]).
//!
//! Graphs left without nodes are dropped.

pub mod identity;
pub mod merge;
pub mod normalize;
pub mod relation;

use indexmap::IndexMap;
use log::{debug, info, trace};
use petgraph::unionfind::UnionFind;

use inkgraph_core::{
    geometry::{Bounds, union_all},
    graph::{CanonicalGraph, DiagramGraph, GraphEdge, GraphNode},
};

pub use identity::IdentityMap;
pub use normalize::LabelNormalizer;
pub use relation::RelationInferrer;

use crate::{
    config::{MergeMode, RefineConfig},
    error::InkgraphError,
};

/// Turns the raw graphs of a page into canonical graphs.
#[derive(Debug, Clone)]
pub struct GraphRefiner {
    merge_mode: MergeMode,
    proximity_y_threshold: i32,
    normalizer: LabelNormalizer,
    relations: RelationInferrer,
}

/// Several raw graphs concatenated into one.
struct MergedGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    source: String,
    bounds: Bounds,
}

impl GraphRefiner {
    /// Creates a refiner, compiling the correction table of `config`.
    pub fn new(config: &RefineConfig) -> Result<Self, InkgraphError> {
        Ok(Self {
            merge_mode: config.merge_mode(),
            proximity_y_threshold: config.proximity_y_threshold(),
            normalizer: LabelNormalizer::new(config.corrections())?,
            relations: RelationInferrer::new(config.relation_rules()),
        })
    }

    pub fn merge_mode(&self) -> MergeMode {
        self.merge_mode
    }

    /// Refines the raw graphs of one page.
    pub fn refine(&self, graphs: Vec<DiagramGraph>) -> Vec<CanonicalGraph> {
        let input = graphs.len();
        let clusters = match self.merge_mode {
            MergeMode::PageLevel => vec![graphs],
            MergeMode::Proximity => self.cluster_by_proximity(graphs),
        };

        let refined: Vec<CanonicalGraph> = clusters
            .into_iter()
            .filter_map(merge_graphs)
            .map(|merged| self.refine_merged(merged))
            .filter(|graph| !graph.is_empty())
            .collect();

        info!(
            mode:? = self.merge_mode,
            input = input,
            output = refined.len();
            "Refined diagram graphs"
        );
        refined
    }

    /// Groups graphs that are vertically close, transitively.
    ///
    /// Clusters are ordered by their first graph and keep input order inside.
    fn cluster_by_proximity(&self, graphs: Vec<DiagramGraph>) -> Vec<Vec<DiagramGraph>> {
        let mut components = UnionFind::new(graphs.len());
        for i in 0..graphs.len() {
            for j in (i + 1)..graphs.len() {
                if self.vertically_close(graphs[i].bounds(), graphs[j].bounds()) {
                    components.union(i, j);
                }
            }
        }

        let mut clusters: IndexMap<usize, Vec<DiagramGraph>> = IndexMap::new();
        for (i, graph) in graphs.into_iter().enumerate() {
            clusters.entry(components.find(i)).or_default().push(graph);
        }
        debug!(clusters = clusters.len(); "Clustered graphs by proximity");
        clusters.into_values().collect()
    }

    fn vertically_close(&self, b1: Bounds, b2: Bounds) -> bool {
        let y_dist = if b2.min_y() > b1.min_y() {
            (b2.min_y() - b1.max_y()).max(0)
        } else {
            (b1.min_y() - b2.max_y()).max(0)
        };
        y_dist < self.proximity_y_threshold
    }

    fn refine_merged(&self, merged: MergedGraph) -> CanonicalGraph {
        let MergedGraph {
            mut nodes,
            edges,
            source,
            bounds,
        } = merged;

        for node in &mut nodes {
            let label = self.normalizer.normalize(node.label());
            node.set_label(label);
        }

        let raw_nodes = nodes.len();
        let (nodes, merge_map) = merge::merge_adjacent_text(nodes);
        let merged_nodes = nodes.len();
        let (nodes, dedup_map) = merge::deduplicate(nodes);
        let identities = merge_map.then(&dedup_map);

        let edges: Vec<GraphEdge> = merge::rewire(&edges, &nodes, &identities)
            .into_iter()
            .filter_map(|edge| {
                let source = nodes.iter().find(|n| n.id() == edge.from())?;
                let target = nodes.iter().find(|n| n.id() == edge.to())?;
                let relation = self.relations.infer(source, target);
                Some(edge.with_relation(relation))
            })
            .collect();

        debug!(
            raw_nodes = raw_nodes,
            after_text_merge = merged_nodes,
            after_dedup = nodes.len(),
            edges = edges.len();
            "Canonicalized graph"
        );
        for edge in &edges {
            trace!(from:% = edge.from(), to:% = edge.to(), relation = edge.relation(); "Canonical edge");
        }

        CanonicalGraph::new(nodes, edges, source, bounds)
    }
}

/// Concatenates node and edge lists; the source comes from the first graph.
fn merge_graphs(graphs: Vec<DiagramGraph>) -> Option<MergedGraph> {
    let bounds = union_all(graphs.iter().map(DiagramGraph::bounds))?;
    let source = graphs.first()?.source().to_string();

    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for graph in graphs {
        let (graph_nodes, graph_edges) = graph.into_parts();
        nodes.extend(graph_nodes);
        edges.extend(graph_edges);
    }

    Some(MergedGraph {
        nodes,
        edges,
        source,
        bounds,
    })
}

#[cfg(test)]
mod tests {
    use inkgraph_core::{
        graph::{CONNECTED_TO, NodeKind},
        identifier::Id,
    };

    use super::*;

    fn node(id: &str, label: &str, kind: NodeKind, [x1, y1, x2, y2]: [i32; 4]) -> GraphNode {
        GraphNode::new(Id::new(id), label, kind, Bounds::new(x1, y1, x2, y2))
    }

    fn graph(nodes: Vec<GraphNode>, edges: Vec<(&str, &str)>) -> DiagramGraph {
        let bounds = union_all(nodes.iter().map(GraphNode::bounds)).unwrap();
        let edges = edges
            .into_iter()
            .map(|(from, to)| GraphEdge::new(Id::new(from), Id::new(to), CONNECTED_TO))
            .collect();
        DiagramGraph::new(nodes, edges, "page.png", bounds)
    }

    fn refiner(mode: MergeMode) -> GraphRefiner {
        GraphRefiner::new(&RefineConfig::default().with_merge_mode(mode)).unwrap()
    }

    #[test]
    fn test_page_level_merges_everything() {
        let first = graph(
            vec![node("g0_box0", "Data", NodeKind::Container, [0, 0, 100, 40])],
            vec![],
        );
        let second = graph(
            vec![node("g1_box0", "Model", NodeKind::Container, [0, 900, 100, 940])],
            vec![],
        );
        let refined = refiner(MergeMode::PageLevel).refine(vec![first, second]);
        assert_eq!(refined.len(), 1);
        assert_eq!(refined[0].nodes().len(), 2);
        assert_eq!(refined[0].bounds(), Bounds::new(0, 0, 100, 940));
        assert_eq!(refined[0].source(), "page.png");
    }

    #[test]
    fn test_proximity_mode_splits_distant_graphs() {
        let top = graph(
            vec![node("g0_box0", "Data", NodeKind::Container, [0, 0, 100, 40])],
            vec![],
        );
        let bottom = graph(
            vec![node("g1_box0", "Model", NodeKind::Container, [0, 900, 100, 940])],
            vec![],
        );
        let near_top = graph(
            vec![node("g2_box0", "Task", NodeKind::Container, [300, 90, 400, 130])],
            vec![],
        );
        let refined = refiner(MergeMode::Proximity).refine(vec![top, bottom, near_top]);
        assert_eq!(refined.len(), 2);
        assert_eq!(refined[0].nodes().len(), 2);
        assert_eq!(refined[1].nodes()[0].label(), "Model");
    }

    #[test]
    fn test_full_refinement() {
        let raw = graph(
            vec![
                node("g0_box0", "1. Datal", NodeKind::Container, [0, 0, 100, 40]),
                node("g0_box1", "Learning Program:", NodeKind::Container, [0, 200, 100, 240]),
                node("g0_text0", "Machine", NodeKind::TextBlob, [300, 0, 360, 20]),
                node("g0_text1", "Learning", NodeKind::TextBlob, [362, 0, 430, 20]),
                node("g0_box2", "data", NodeKind::Container, [0, 400, 100, 440]),
                node("g0_box3", "", NodeKind::Container, [0, 600, 100, 640]),
            ],
            vec![
                ("g0_box2", "g0_box1"),
                ("g0_text1", "g0_box0"),
                ("g0_box0", "g0_box2"),
                ("g0_box1", "g0_box3"),
            ],
        );
        let refined = refiner(MergeMode::PageLevel).refine(vec![raw]);
        let canonical = &refined[0];

        let labels: Vec<_> = canonical.nodes().iter().map(|n| n.label()).collect();
        assert_eq!(labels, ["Data", "Machine Learning", "Learning Program"]);

        let edges: Vec<_> = canonical
            .edges()
            .iter()
            .map(|e| format!("{} -> {}: {}", e.from(), e.to(), e.relation()))
            .collect();
        assert_eq!(
            edges,
            [
                "g0_box0 -> g0_box1: input_to",
                "g0_text0 -> g0_box0: flows_from"
            ]
        );
    }

    #[test]
    fn test_graph_without_labels_is_dropped() {
        let raw = graph(
            vec![node("g0_box0", " - ", NodeKind::Container, [0, 0, 100, 40])],
            vec![],
        );
        assert!(refiner(MergeMode::PageLevel).refine(vec![raw]).is_empty());
    }

    #[test]
    fn test_no_graphs() {
        assert!(refiner(MergeMode::Proximity).refine(Vec::new()).is_empty());
        assert!(refiner(MergeMode::PageLevel).refine(Vec::new()).is_empty());
    }
}
