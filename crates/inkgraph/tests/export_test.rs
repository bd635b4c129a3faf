//! Tests of the artifact files written for a page.

use std::fs;

use inkgraph::{
    PageBuilder,
    config::{AppConfig, StyleConfig},
    export::{
        Exporter,
        json::{GRAPH_KNOWLEDGE_FILE, JsonExporter, REGIONS_FILE, SIMPLIFIED_FILE, TEXT_KNOWLEDGE_FILE},
        svg::Svg,
    },
    geometry::Bounds,
    region::{Region, RegionKind, Shape, TextLine},
};
use serde_json::Value;

fn page() -> inkgraph::PageResult {
    let regions = vec![
        Region::new(RegionKind::DiagramContainer, Bounds::new(0, 0, 100, 50), Shape::Rectangle, 5000.0),
        Region::new(RegionKind::DiagramContainer, Bounds::new(0, 150, 200, 200), Shape::Rectangle, 10000.0),
        Region::new(RegionKind::Connector, Bounds::new(45, 60, 55, 140), Shape::Line, 800.0),
    ];
    let lines = vec![
        TextLine::new(Bounds::new(20, 15, 80, 35), "Data"),
        TextLine::new(Bounds::new(20, 165, 180, 185), "Data Learning program"),
        TextLine::new(Bounds::new(400, 400, 700, 420), "Notes from lecture three"),
    ];
    PageBuilder::new(AppConfig::default())
        .unwrap()
        .process_regions(regions, lines, "lecture.png")
}

fn read_json(dir: &std::path::Path, name: &str) -> Value {
    let content = fs::read_to_string(dir.join(name)).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_json_artifacts_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    JsonExporter::new(&out).export_page(&page()).unwrap();

    let regions = read_json(&out, REGIONS_FILE);
    let regions = regions["regions"].as_array().unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0]["type"], "DIAGRAM");
    assert_eq!(regions[1]["type"], "TEXT_PARAGRAPH");

    let graph = read_json(&out, GRAPH_KNOWLEDGE_FILE);
    assert_eq!(graph["graph_id"], "kg_lecture.png");
    assert_eq!(graph["metadata"]["source_image"], "lecture.png");
    let edges = graph["edges"].as_array().unwrap();
    assert!(edges.iter().any(|edge| {
        edge["from"] == "data" && edge["to"] == "learning_program" && edge["relation"] == "input_to"
    }));
    for node in graph["nodes"].as_array().unwrap() {
        assert!(node.get("node_id").is_some());
        assert!(node.get("type").is_some());
        assert!(node.get("aliases").is_some());
    }

    let text = read_json(&out, TEXT_KNOWLEDGE_FILE);
    assert!(text.is_array());

    let simplified = read_json(&out, SIMPLIFIED_FILE);
    let entries = simplified.as_array().unwrap();
    assert_eq!(entries[0]["type"], "text");
    assert_eq!(entries[0]["content"], "Notes from lecture three");
    assert_eq!(entries[1]["type"], "graph");
    assert!(entries[1]["graph"]["nodes"][0].get("bbox").is_none());
}

#[test]
fn test_svg_overlay_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overlay.svg");
    let svg = Svg::new(path.to_str().unwrap(), &StyleConfig::default()).unwrap();
    svg.export_page(&page()).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("<svg"));
    assert!(content.contains("TEXT_PARAGRAPH"));
    assert!(content.contains("input_to"));
}
