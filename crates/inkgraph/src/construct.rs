//! Raw graph construction from a single diagram group.

use std::cmp::Ordering;

use log::{debug, trace};

use inkgraph_core::{
    geometry::Point,
    graph::{CONNECTED_TO, DiagramGraph, GraphEdge, GraphNode, NodeKind},
    identifier::{Id, IdKind},
    region::{DiagramElement, DiagramGroup},
};

/// Builds the nodes and edges of one diagram group.
///
/// Containers become nodes labelled by the text lines whose centre lies
/// strictly inside them. Text lines inside no container become `text_blob`
/// nodes. Every connector links the two nodes closest to its centre.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphConstructor;

impl GraphConstructor {
    pub fn new() -> Self {
        Self
    }

    /// Builds the graph of the `group_index`-th diagram group of a page.
    ///
    /// The group index only namespaces the node ids, so graphs of different
    /// groups never share an id.
    pub fn construct(&self, group_index: usize, group: &DiagramGroup, source: &str) -> DiagramGraph {
        let texts: Vec<&DiagramElement> = group
            .elements()
            .iter()
            .filter(|element| element.text().is_some())
            .collect();

        let mut nodes = Vec::new();
        let mut enclosed = vec![false; texts.len()];

        for (n, container) in group.elements().iter().filter(|e| e.is_container()).enumerate() {
            let bounds = container.bounds();
            let mut inside: Vec<(usize, &DiagramElement)> = texts
                .iter()
                .enumerate()
                .filter(|(_, text)| bounds.contains_strict(text.bounds().center()))
                .map(|(i, text)| (i, *text))
                .collect();
            inside.sort_by_key(|(_, text)| (text.bounds().min_y(), text.bounds().min_x()));

            let mut words = Vec::with_capacity(inside.len());
            for (i, text) in inside {
                enclosed[i] = true;
                words.extend(text.text());
            }
            let label = words.join(" ");

            let id = Id::for_element(group_index, IdKind::Container, n);
            trace!(id:% = id, label = label.as_str(); "Container node");
            nodes.push(GraphNode::new(id, label, NodeKind::Container, bounds));
        }

        let loose = texts.iter().zip(&enclosed).filter(|(_, used)| !**used);
        for (n, (text, _)) in loose.enumerate() {
            let id = Id::for_element(group_index, IdKind::Text, n);
            let label = text.text().unwrap_or_default();
            nodes.push(GraphNode::new(id, label, NodeKind::TextBlob, text.bounds()));
        }

        let edges = if nodes.len() < 2 {
            Vec::new()
        } else {
            group
                .elements()
                .iter()
                .filter(|e| e.is_connector())
                .enumerate()
                .filter_map(|(m, connector)| {
                    let connector_id = Id::for_element(group_index, IdKind::Connector, m);
                    connect(&nodes, connector.bounds().center())
                        .map(|(from, to)| {
                            GraphEdge::new(from, to, CONNECTED_TO).with_connector(connector_id)
                        })
                })
                .collect()
        };

        debug!(
            group = group_index,
            nodes = nodes.len(),
            edges = edges.len();
            "Constructed diagram graph"
        );

        DiagramGraph::new(nodes, edges, source, group.bounds())
    }
}

/// Picks the two nodes nearest `center` and orders them in reading order.
fn connect(nodes: &[GraphNode], center: Point) -> Option<(Id, Id)> {
    let mut by_distance: Vec<(f32, &GraphNode)> = nodes
        .iter()
        .map(|node| (node.bounds().center().distance(center), node))
        .collect();
    by_distance.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let [(_, a), (_, b), ..] = by_distance.as_slice() else {
        return None;
    };
    Some(reading_order(a, b))
}

/// The higher node is the source; on a tie in height the left one is.
fn reading_order(a: &GraphNode, b: &GraphNode) -> (Id, Id) {
    let (ca, cb) = (a.bounds().center(), b.bounds().center());
    let a_first = match ca.y().partial_cmp(&cb.y()) {
        Some(Ordering::Less) => true,
        Some(Ordering::Greater) => false,
        _ => cb.x() >= ca.x(),
    };
    if a_first {
        (a.id(), b.id())
    } else {
        (b.id(), a.id())
    }
}
