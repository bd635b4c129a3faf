//! Relation inference for rewired edges.

use inkgraph_core::graph::GraphNode;

use crate::config::RelationRule;

pub const FLOWS_TO: &str = "flows_to";
pub const FLOWS_FROM: &str = "flows_from";
pub const LEADS_TO: &str = "leads_to";

/// Names the relation between two connected nodes.
///
/// Keyword rules are tried first, in order, against the lowercased labels.
/// Without a match the relation comes from the layout: a mostly horizontal
/// edge flows to or from its target, anything else leads to it. There is no
/// upward counterpart of `leads_to`.
#[derive(Debug, Clone, Default)]
pub struct RelationInferrer {
    rules: Vec<RelationRule>,
}

impl RelationInferrer {
    pub fn new(rules: &[RelationRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| RelationRule::new(
                &rule.source.to_lowercase(),
                &rule.target.to_lowercase(),
                &rule.relation,
            ))
            .collect();
        Self { rules }
    }

    pub fn infer(&self, source: &GraphNode, target: &GraphNode) -> String {
        let source_label = source.label().to_lowercase();
        let target_label = target.label().to_lowercase();

        self.rules
            .iter()
            .find(|rule| {
                source_label.contains(&rule.source) && target_label.contains(&rule.target)
            })
            .map(|rule| rule.relation.clone())
            .unwrap_or_else(|| spatial_relation(source, target).to_string())
    }
}

fn spatial_relation(source: &GraphNode, target: &GraphNode) -> &'static str {
    let delta = target
        .bounds()
        .center()
        .sub_point(source.bounds().center());
    if delta.x().abs() > delta.y().abs() {
        if delta.x() > 0.0 { FLOWS_TO } else { FLOWS_FROM }
    } else {
        LEADS_TO
    }
}

#[cfg(test)]
mod tests {
    use inkgraph_core::{geometry::Bounds, graph::NodeKind, identifier::Id};

    use super::*;
    use crate::config::RefineConfig;

    fn node(label: &str, [x1, y1, x2, y2]: [i32; 4]) -> GraphNode {
        GraphNode::new(Id::new(label), label, NodeKind::Container, Bounds::new(x1, y1, x2, y2))
    }

    fn inferrer() -> RelationInferrer {
        RelationInferrer::new(RefineConfig::default().relation_rules())
    }

    #[test]
    fn test_keyword_rules() {
        let inferrer = inferrer();
        let data = node("Data", [0, 0, 50, 20]);
        let program = node("Learning Program", [0, 100, 50, 120]);
        let model = node("Model", [0, 200, 50, 220]);
        assert_eq!(inferrer.infer(&data, &program), "input_to");
        assert_eq!(inferrer.infer(&program, &model), "produces");
    }

    #[test]
    fn test_spatial_fallback() {
        let inferrer = inferrer();
        let left = node("left", [0, 0, 50, 20]);
        let right = node("right", [200, 0, 250, 20]);
        let below = node("below", [0, 200, 50, 220]);
        assert_eq!(inferrer.infer(&left, &right), FLOWS_TO);
        assert_eq!(inferrer.infer(&right, &left), FLOWS_FROM);
        assert_eq!(inferrer.infer(&left, &below), LEADS_TO);
        assert_eq!(inferrer.infer(&below, &left), LEADS_TO);
    }

    #[test]
    fn test_rules_match_case_insensitively() {
        let inferrer = RelationInferrer::new(&[RelationRule::new("Task", "Model", "trains")]);
        let task = node("task list", [0, 0, 10, 10]);
        let model = node("the MODEL", [0, 50, 10, 60]);
        assert_eq!(inferrer.infer(&task, &model), "trains");
    }
}
