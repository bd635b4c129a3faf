//! Knowledge graph typing and edge admission.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use log::{debug, trace};
use regex::Regex;

use inkgraph_core::{
    graph::{CONNECTED_TO, CanonicalGraph},
    identifier::Id,
    knowledge::{KnowledgeEdge, KnowledgeGraph, KnowledgeNode, NodeType},
};

use crate::{config::VocabularyConfig, error::InkgraphError, refine::relation::FLOWS_FROM};

/// Confidence of an edge carried over from the canonical graph.
pub const ADMITTED_CONFIDENCE: f64 = 0.9;
/// Confidence of an injected backbone edge.
pub const BACKBONE_CONFIDENCE: f64 = 1.0;

const DEFINED_AS: &str = "defined_as";
const IS_TYPE_OF: &str = "is_type_of";
const EXAMPLE_OF: &str = "example_of";

/// Builds the typed knowledge graph of a canonical graph.
#[derive(Debug, Clone)]
pub struct KnowledgeGraphBuilder {
    vocabulary: VocabularyConfig,
    type_rules: Vec<(Regex, NodeType)>,
    stop_words: HashSet<String>,
    hub: Id,
}

impl KnowledgeGraphBuilder {
    /// Compiles the type rules of `vocabulary`.
    pub fn new(vocabulary: &VocabularyConfig) -> Result<Self, InkgraphError> {
        let type_rules = vocabulary
            .type_rules()
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|regex| (regex, rule.node_type))
                    .map_err(|err| {
                        InkgraphError::Config(format!(
                            "invalid type rule `{}`: {err}",
                            rule.pattern
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            type_rules,
            stop_words: vocabulary
                .stop_words()
                .iter()
                .map(|word| word.to_lowercase())
                .collect(),
            hub: Id::new(&vocabulary.hub_node().id),
            vocabulary: vocabulary.clone(),
        })
    }

    /// Returns the type of the first rule matching the lowercased label.
    pub fn node_type(&self, label: &str) -> NodeType {
        let lower = label.to_lowercase();
        self.type_rules
            .iter()
            .find(|(regex, _)| regex.is_match(&lower))
            .map(|(_, node_type)| *node_type)
            .unwrap_or_default()
    }

    pub fn build(&self, graph: &CanonicalGraph, source: &str) -> KnowledgeGraph {
        let (mut nodes, ids) = self.admit_nodes(graph, source);
        self.inject_hub(&mut nodes, source);

        let mut seen = HashSet::new();
        let mut edges = self.admit_edges(graph, &ids, &nodes, &mut seen, source);
        let admitted = edges.len();
        self.inject_backbone(&nodes, &mut edges, &mut seen, source);

        debug!(
            nodes = nodes.len(),
            edges = admitted,
            backbone = edges.len() - admitted;
            "Built knowledge graph"
        );
        KnowledgeGraph::new(source, nodes.into_values().collect(), edges)
    }

    /// Keeps concept-like nodes and keys them by slug.
    ///
    /// Returns the admitted nodes and a map from canonical node id to slug.
    /// Nodes that slug identically collapse into the first, which gains the
    /// later aliases.
    fn admit_nodes(
        &self,
        graph: &CanonicalGraph,
        source: &str,
    ) -> (IndexMap<Id, KnowledgeNode>, HashMap<Id, Id>) {
        let mut nodes: IndexMap<Id, KnowledgeNode> = IndexMap::new();
        let mut ids = HashMap::new();

        for node in graph.nodes() {
            let Some(label) = self.concept_label(node.label()) else {
                trace!(label = node.label(); "Pruned node");
                continue;
            };
            let node_id = Id::from_label(&label);
            if node_id == "" {
                continue;
            }

            let node_type = self.node_type(&label);
            let candidate = KnowledgeNode::new(node_id, label, node_type, source);
            ids.insert(node.id(), node_id);

            match nodes.get_mut(&node_id) {
                Some(existing) => existing.merge_aliases(&candidate),
                None => {
                    nodes.insert(node_id, candidate);
                }
            }
        }

        (nodes, ids)
    }

    /// Applies label rewrites, then rejects prose and stop words.
    fn concept_label(&self, raw: &str) -> Option<String> {
        let mut label = raw.trim();
        if label.is_empty() {
            return None;
        }
        if let Some(rewrite) = self
            .vocabulary
            .label_rewrites()
            .iter()
            .find(|rewrite| label.contains(rewrite.contains.as_str()))
        {
            label = rewrite.label.as_str();
        }

        let words: Vec<&str> = label.split_whitespace().collect();
        if words.len() > self.vocabulary.sentence_words() {
            return None;
        }
        let lower = label.to_lowercase();
        let first = words.first()?.to_lowercase();
        if self.stop_words.contains(&lower) || self.stop_words.contains(&first) {
            return None;
        }
        Some(label.to_string())
    }

    /// Adds the hub node when one of its subtypes is present without it.
    fn inject_hub(&self, nodes: &mut IndexMap<Id, KnowledgeNode>, source: &str) {
        if nodes.contains_key(&self.hub) {
            return;
        }
        let has_subtype = self
            .vocabulary
            .model_subtypes()
            .iter()
            .any(|subtype| nodes.contains_key(&Id::new(subtype)));
        if has_subtype {
            let hub = self.vocabulary.hub_node();
            trace!(hub:% = self.hub; "Injected hub node");
            nodes.insert(
                self.hub,
                KnowledgeNode::new(self.hub, hub.label.as_str(), hub.node_type, source),
            );
        }
    }

    fn admit_edges(
        &self,
        graph: &CanonicalGraph,
        ids: &HashMap<Id, Id>,
        nodes: &IndexMap<Id, KnowledgeNode>,
        seen: &mut HashSet<(Id, Id)>,
        source: &str,
    ) -> Vec<KnowledgeEdge> {
        let type_of = |id: Id| {
            nodes
                .get(&id)
                .map(KnowledgeNode::node_type)
                .unwrap_or_default()
        };

        let mut edges = Vec::new();
        for edge in graph.edges() {
            let (Some(&src), Some(&tgt)) = (ids.get(&edge.from()), ids.get(&edge.to())) else {
                continue;
            };
            if src == tgt || !nodes.contains_key(&src) || !nodes.contains_key(&tgt) {
                continue;
            }

            let (src_type, tgt_type) = (type_of(src), type_of(tgt));
            if src_type.is_model_like()
                && tgt_type.is_model_like()
                && src != self.hub
                && tgt != self.hub
            {
                trace!(from:% = src, to:% = tgt; "Suppressed sibling edge");
                continue;
            }

            let relation = self.relation(edge.relation(), src, tgt, src_type, tgt_type);
            if seen.insert((src, tgt)) {
                edges.push(KnowledgeEdge::new(
                    src,
                    tgt,
                    relation,
                    ADMITTED_CONFIDENCE,
                    source,
                ));
            }
        }
        edges
    }

    /// Names an admitted edge.
    ///
    /// The raw relation is renamed, then overrides on the endpoint slugs
    /// apply in order, then the endpoint types have the last word.
    fn relation(
        &self,
        raw: &str,
        src: Id,
        tgt: Id,
        src_type: NodeType,
        tgt_type: NodeType,
    ) -> String {
        let mut relation = self.vocabulary.rename_relation(raw);

        for rule in self.vocabulary.relation_overrides() {
            let source_matches = rule
                .source_contains
                .as_deref()
                .is_none_or(|needle| src.contains(needle));
            let target_matches = rule
                .target_contains
                .as_deref()
                .is_none_or(|needle| tgt.contains(needle));
            if source_matches && target_matches {
                relation = rule.relation.as_str();
            }
        }

        if tgt_type == NodeType::Definition {
            relation = DEFINED_AS;
        }

        if raw == FLOWS_FROM || raw == CONNECTED_TO {
            if tgt_type.is_model_like() && src_type == NodeType::Model {
                relation = IS_TYPE_OF;
            } else if tgt_type == NodeType::Example {
                relation = EXAMPLE_OF;
            }
        }

        relation.to_string()
    }

    /// Adds the configured backbone edges whose endpoints are present.
    fn inject_backbone(
        &self,
        nodes: &IndexMap<Id, KnowledgeNode>,
        edges: &mut Vec<KnowledgeEdge>,
        seen: &mut HashSet<(Id, Id)>,
        source: &str,
    ) {
        let first_present = |candidates: &[String]| {
            candidates
                .iter()
                .map(|candidate| Id::new(candidate))
                .find(|id| nodes.contains_key(id))
        };

        for backbone in self.vocabulary.backbone() {
            let (Some(from), Some(to)) = (first_present(&backbone.from), first_present(&backbone.to))
            else {
                continue;
            };
            if from != to && seen.insert((from, to)) {
                edges.push(KnowledgeEdge::new(
                    from,
                    to,
                    backbone.relation.as_str(),
                    BACKBONE_CONFIDENCE,
                    source,
                ));
            }
        }
    }
}
