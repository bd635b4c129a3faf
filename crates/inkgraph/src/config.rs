//! Configuration types for the inkgraph pipeline.
//!
//! Every threshold and every domain table used by the pipeline lives here,
//! so the stages themselves contain no tuning literals. All types implement
//! [`serde::Deserialize`] and every section falls back to its defaults.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`DetectorConfig`] - Binarization and contour classification thresholds.
//! - [`ConsolidationConfig`] - Proximity thresholds for grouping regions.
//! - [`RefineConfig`] - Graph merge mode, OCR corrections and relation rules.
//! - [`VocabularyConfig`] - Tables used to type nodes and normalize edges.
//! - [`StyleConfig`] - Colours of the SVG overlay.
//!
//! # Example
//!
//! ```
//! # use inkgraph::config::{AppConfig, MergeMode};
//! let config = AppConfig::default();
//! assert_eq!(config.refine().merge_mode(), MergeMode::PageLevel);
//! assert_eq!(config.consolidation().diagram_proximity(), 30);
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use inkgraph_core::{color::Color, knowledge::NodeType};

pub use inkgraph_vision::DetectorConfig;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    detector: DetectorConfig,

    #[serde(default)]
    consolidation: ConsolidationConfig,

    #[serde(default)]
    refine: RefineConfig,

    #[serde(default)]
    vocabulary: VocabularyConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(
        detector: DetectorConfig,
        consolidation: ConsolidationConfig,
        refine: RefineConfig,
        vocabulary: VocabularyConfig,
        style: StyleConfig,
    ) -> Self {
        Self {
            detector,
            consolidation,
            refine,
            vocabulary,
            style,
        }
    }

    pub fn detector(&self) -> &DetectorConfig {
        &self.detector
    }

    pub fn consolidation(&self) -> &ConsolidationConfig {
        &self.consolidation
    }

    pub fn refine(&self) -> &RefineConfig {
        &self.refine
    }

    pub fn vocabulary(&self) -> &VocabularyConfig {
        &self.vocabulary
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Overrides the graph merge mode, keeping the rest of `[refine]`.
    pub fn with_merge_mode(mut self, merge_mode: MergeMode) -> Self {
        self.refine = self.refine.with_merge_mode(merge_mode);
        self
    }
}

/// Distances, in pixels, used when grouping regions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Structural regions closer than this join the same diagram.
    diagram_proximity: i32,
    /// OCR lines closer than this to a diagram are attached to it.
    text_attach_proximity: i32,
    /// Largest vertical gap between consecutive lines of a paragraph.
    paragraph_gap: i32,
    /// Largest left-edge offset for non-overlapping lines of a paragraph.
    paragraph_left_alignment: i32,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            diagram_proximity: 30,
            text_attach_proximity: 10,
            paragraph_gap: 20,
            paragraph_left_alignment: 50,
        }
    }
}

impl ConsolidationConfig {
    pub fn new(
        diagram_proximity: i32,
        text_attach_proximity: i32,
        paragraph_gap: i32,
        paragraph_left_alignment: i32,
    ) -> Self {
        Self {
            diagram_proximity,
            text_attach_proximity,
            paragraph_gap,
            paragraph_left_alignment,
        }
    }

    pub fn diagram_proximity(&self) -> i32 {
        self.diagram_proximity
    }

    pub fn text_attach_proximity(&self) -> i32 {
        self.text_attach_proximity
    }

    pub fn paragraph_gap(&self) -> i32 {
        self.paragraph_gap
    }

    pub fn paragraph_left_alignment(&self) -> i32 {
        self.paragraph_left_alignment
    }
}

/// How per-diagram graphs are combined before refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    /// Every graph on the page collapses into one.
    #[default]
    PageLevel,
    /// Graphs whose vertical distance is under a threshold are merged.
    Proximity,
}

/// A whole-word, case-insensitive OCR correction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Correction {
    pub word: String,
    pub replacement: String,
}

impl Correction {
    pub fn new(word: &str, replacement: &str) -> Self {
        Self {
            word: word.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

/// Relation assigned when the source label contains `source` and the
/// target label contains `target` (both lowercase).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelationRule {
    pub source: String,
    pub target: String,
    pub relation: String,
}

impl RelationRule {
    pub fn new(source: &str, target: &str, relation: &str) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            relation: relation.to_string(),
        }
    }
}

/// Graph refinement settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    merge_mode: MergeMode,
    /// Vertical distance under which graphs merge in proximity mode.
    proximity_y_threshold: i32,
    /// Applied in order to every label.
    corrections: Vec<Correction>,
    /// Checked in order; the first match names the relation.
    relation_rules: Vec<RelationRule>,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            merge_mode: MergeMode::PageLevel,
            proximity_y_threshold: 100,
            corrections: vec![
                Correction::new("datal", "Data"),
                Correction::new("folowing", "following"),
                Correction::new("followinge", "following"),
                Correction::new("dandel", "and"),
                Correction::new("dand", "and"),
            ],
            relation_rules: vec![
                RelationRule::new("data", "program", "input_to"),
                RelationRule::new("learning", "model", "produces"),
                RelationRule::new("experience", "model", "improves"),
                RelationRule::new("model", "machine learning", "defined_as"),
            ],
        }
    }
}

impl RefineConfig {
    pub fn merge_mode(&self) -> MergeMode {
        self.merge_mode
    }

    pub fn proximity_y_threshold(&self) -> i32 {
        self.proximity_y_threshold
    }

    pub fn corrections(&self) -> &[Correction] {
        &self.corrections
    }

    pub fn relation_rules(&self) -> &[RelationRule] {
        &self.relation_rules
    }

    /// Returns a copy using the given merge mode.
    pub fn with_merge_mode(mut self, merge_mode: MergeMode) -> Self {
        self.merge_mode = merge_mode;
        self
    }
}

/// Replaces a whole label when it contains `contains` (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LabelRewrite {
    pub contains: String,
    pub label: String,
}

/// Assigns `node_type` to labels matching the regular expression `pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeRule {
    pub pattern: String,
    pub node_type: NodeType,
}

impl TypeRule {
    pub fn new(pattern: &str, node_type: NodeType) -> Self {
        Self {
            pattern: pattern.to_string(),
            node_type,
        }
    }
}

/// Forces `relation` on edges whose endpoint ids contain the given needles.
///
/// An absent needle matches every id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelationOverride {
    #[serde(default)]
    pub source_contains: Option<String>,
    #[serde(default)]
    pub target_contains: Option<String>,
    pub relation: String,
}

impl RelationOverride {
    pub fn new(source: Option<&str>, target: Option<&str>, relation: &str) -> Self {
        Self {
            source_contains: source.map(str::to_string),
            target_contains: target.map(str::to_string),
            relation: relation.to_string(),
        }
    }
}

/// The node injected when model subtypes appear without their parent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HubNode {
    pub id: String,
    pub label: String,
    pub node_type: NodeType,
}

/// An edge injected when both endpoints are present.
///
/// Each endpoint lists candidate node ids; the first one present is used.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackboneEdge {
    pub from: Vec<String>,
    pub to: Vec<String>,
    pub relation: String,
}

impl BackboneEdge {
    pub fn new(from: &[&str], to: &[&str], relation: &str) -> Self {
        Self {
            from: from.iter().map(|s| s.to_string()).collect(),
            to: to.iter().map(|s| s.to_string()).collect(),
            relation: relation.to_string(),
        }
    }
}

/// Domain tables used by the schema generator.
///
/// The defaults describe a machine-learning definition page; replace them to
/// target another subject.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    stop_words: Vec<String>,
    label_rewrites: Vec<LabelRewrite>,
    type_rules: Vec<TypeRule>,
    relation_renames: HashMap<String, String>,
    default_relation: String,
    relation_overrides: Vec<RelationOverride>,
    definition_keywords: Vec<String>,
    model_subtypes: Vec<String>,
    hub_node: HubNode,
    backbone: Vec<BackboneEdge>,
    /// Labels with more words than this are prose, not concepts.
    sentence_words: usize,
    topic: String,
}

const DEFAULT_MODEL_SUBTYPES: [&str; 4] = [
    "mathematical_equation",
    "relational_diagrams_like_graphs_trees",
    "logical_if_else_rules",
    "groupings_called_clusters",
];

impl Default for VocabularyConfig {
    fn default() -> Self {
        let words = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let relation_renames = [
            ("flows_to", "input_to"),
            ("leads_to", "leads_to"),
            ("produces", "produces"),
            ("input_to", "input_to"),
            ("defined_as", "defined_as"),
            ("flows_from", "is_type_of"),
            ("connected_to", "leads_to"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        let mut backbone = vec![
            BackboneEdge::new(
                &["data"],
                &["learning_program", "data_learning_program"],
                "input_to",
            ),
            BackboneEdge::new(
                &["learning_program", "data_learning_program"],
                &["model"],
                "produces",
            ),
        ];
        backbone.extend(
            DEFAULT_MODEL_SUBTYPES
                .iter()
                .map(|subtype| BackboneEdge::new(&["model"], &[subtype], "is_type_of")),
        );
        backbone.push(BackboneEdge::new(
            &["machine_learning"],
            &["definition_of_ml"],
            "defined_as",
        ));

        Self {
            stop_words: words(&[
                "following",
                "base",
                "and",
                "or",
                "of",
                "the",
                "without",
                "that",
                "gives",
                "programmed",
            ]),
            label_rewrites: vec![LabelRewrite {
                contains: "Data Learning program".to_string(),
                label: "Learning Program".to_string(),
            }],
            type_rules: vec![
                TypeRule::new("(machine learning|ml)", NodeType::Concept),
                TypeRule::new("(learning|program|algorithm)", NodeType::Process),
                TypeRule::new("(data|experience|task)", NodeType::Data),
                TypeRule::new("(model|equation|rules|clusters)", NodeType::Model),
                TypeRule::new("(definition|tom mitchell)", NodeType::Definition),
                TypeRule::new("(equation|diagram|rules)", NodeType::Example),
            ],
            relation_renames,
            default_relation: "leads_to".to_string(),
            relation_overrides: vec![
                RelationOverride::new(Some("data"), Some("program"), "input_to"),
                RelationOverride::new(Some("program"), Some("model"), "produces"),
                RelationOverride::new(None, Some("definition"), "defined_as"),
                RelationOverride::new(Some("definition"), None, "defined_as"),
            ],
            definition_keywords: words(&["definition", "field of study", "tom mitchell"]),
            model_subtypes: words(&DEFAULT_MODEL_SUBTYPES),
            hub_node: HubNode {
                id: "model".to_string(),
                label: "Model".to_string(),
                node_type: NodeType::Model,
            },
            backbone,
            sentence_words: 5,
            topic: "extracted_knowledge".to_string(),
        }
    }
}

impl VocabularyConfig {
    pub fn stop_words(&self) -> &[String] {
        &self.stop_words
    }

    pub fn label_rewrites(&self) -> &[LabelRewrite] {
        &self.label_rewrites
    }

    pub fn type_rules(&self) -> &[TypeRule] {
        &self.type_rules
    }

    /// Returns the normalized name of a raw relation.
    pub fn rename_relation(&self, raw: &str) -> &str {
        self.relation_renames
            .get(raw)
            .map(String::as_str)
            .unwrap_or(&self.default_relation)
    }

    pub fn relation_overrides(&self) -> &[RelationOverride] {
        &self.relation_overrides
    }

    pub fn definition_keywords(&self) -> &[String] {
        &self.definition_keywords
    }

    pub fn model_subtypes(&self) -> &[String] {
        &self.model_subtypes
    }

    pub fn hub_node(&self) -> &HubNode {
        &self.hub_node
    }

    pub fn backbone(&self) -> &[BackboneEdge] {
        &self.backbone
    }

    pub fn sentence_words(&self) -> usize {
        self.sentence_words
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Visual styling of the SVG overlay, as CSS colour strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    diagram_color: String,
    paragraph_color: String,
    container_color: String,
    text_blob_color: String,
    edge_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            diagram_color: "#d62728".to_string(),
            paragraph_color: "#1f77b4".to_string(),
            container_color: "#2ca02c".to_string(),
            text_blob_color: "#9467bd".to_string(),
            edge_color: "#ff7f0e".to_string(),
        }
    }
}

fn parse_color(field: &str, value: &str) -> Result<Color, String> {
    Color::new(value).map_err(|err| format!("Invalid {field} in config: {err}"))
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(|color| parse_color("background_color", color))
            .transpose()
    }

    pub fn diagram_color(&self) -> Result<Color, String> {
        parse_color("diagram_color", &self.diagram_color)
    }

    pub fn paragraph_color(&self) -> Result<Color, String> {
        parse_color("paragraph_color", &self.paragraph_color)
    }

    pub fn container_color(&self) -> Result<Color, String> {
        parse_color("container_color", &self.container_color)
    }

    pub fn text_blob_color(&self) -> Result<Color, String> {
        parse_color("text_blob_color", &self.text_blob_color)
    }

    pub fn edge_color(&self) -> Result<Color, String> {
        parse_color("edge_color", &self.edge_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [consolidation]
            diagram_proximity = 45

            [refine]
            merge_mode = "proximity"
            "#,
        )
        .unwrap();

        assert_eq!(config.consolidation().diagram_proximity(), 45);
        assert_eq!(config.consolidation().text_attach_proximity(), 10);
        assert_eq!(config.refine().merge_mode(), MergeMode::Proximity);
        assert_eq!(config.refine().corrections().len(), 5);
        assert_eq!(config.vocabulary().sentence_words(), 5);
    }

    #[test]
    fn test_vocabulary_tables_from_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [vocabulary]
            stop_words = ["the"]
            type_rules = [{ pattern = "cell", node_type = "concept" }]

            [[vocabulary.backbone]]
            from = ["cell"]
            to = ["nucleus"]
            relation = "contains"
            "#,
        )
        .unwrap();

        let vocabulary = config.vocabulary();
        assert_eq!(vocabulary.stop_words(), ["the"]);
        assert_eq!(vocabulary.type_rules()[0].node_type, NodeType::Concept);
        assert_eq!(vocabulary.backbone()[0].relation, "contains");
        assert_eq!(vocabulary.rename_relation("flows_to"), "input_to");
    }

    #[test]
    fn test_rename_relation_defaults() {
        let vocabulary = VocabularyConfig::default();
        assert_eq!(vocabulary.rename_relation("connected_to"), "leads_to");
        assert_eq!(vocabulary.rename_relation("flows_from"), "is_type_of");
        assert_eq!(vocabulary.rename_relation("improves"), "leads_to");
    }

    #[test]
    fn test_default_backbone() {
        let vocabulary = VocabularyConfig::default();
        let backbone = vocabulary.backbone();
        assert_eq!(backbone.len(), 7);
        assert_eq!(backbone[0].to, ["learning_program", "data_learning_program"]);
        assert_eq!(backbone[6].from, ["machine_learning"]);
    }

    #[test]
    fn test_style_colors() {
        let style = StyleConfig::default();
        assert!(style.background_color().unwrap().is_none());
        assert!(style.edge_color().is_ok());

        let style: StyleConfig = toml::from_str(r#"edge_color = "nope""#).unwrap();
        assert!(style.edge_color().is_err());
    }
}
