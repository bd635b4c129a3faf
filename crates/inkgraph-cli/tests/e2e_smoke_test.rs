use std::{fs, path::Path};

use image::{GrayImage, Luma};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};
use serde_json::Value;
use tempfile::tempdir;

use inkgraph_cli::{Args, MergeModeArg, run};

const PAPER: Luma<u8> = Luma([250]);
const INK: Luma<u8> = Luma([20]);

/// Writes a page with one outlined box and the OCR line of the word inside it.
fn write_page(dir: &Path) -> (String, String) {
    let mut image = GrayImage::from_pixel(300, 300, PAPER);
    for inset in 0..3u32 {
        let rect = Rect::at(50 + inset as i32, 50 + inset as i32).of_size(70 - 2 * inset, 60 - 2 * inset);
        draw_hollow_rect_mut(&mut image, rect, INK);
    }
    let image_path = dir.join("page.png");
    image.save(&image_path).expect("Failed to write page image");

    let ocr_path = dir.join("page.ocr.json");
    fs::write(
        &ocr_path,
        r#"[{"bbox": [65, 70, 105, 90], "text": "Data", "confidence": 0.93}]"#,
    )
    .expect("Failed to write OCR lines");

    (
        image_path.to_string_lossy().to_string(),
        ocr_path.to_string_lossy().to_string(),
    )
}

fn args(input: String, ocr: Option<String>, output: &Path) -> Args {
    Args {
        input,
        ocr,
        output: output.to_string_lossy().to_string(),
        svg: None,
        config: None,
        merge_mode: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_page_artifacts() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let (image, ocr) = write_page(temp_dir.path());
    let output = temp_dir.path().join("out");
    let svg_path = temp_dir.path().join("overlay.svg");

    let mut args = args(image, Some(ocr), &output);
    args.svg = Some(svg_path.to_string_lossy().to_string());
    args.merge_mode = Some(MergeModeArg::Proximity);
    run(&args).expect("page should be processed");

    for name in [
        "regions.json",
        "text_knowledge.json",
        "graph_knowledge.json",
        "simplified_output.json",
    ] {
        let content = fs::read_to_string(output.join(name)).expect("artifact written");
        let _: Value = serde_json::from_str(&content).expect("artifact is JSON");
    }

    let graph: Value =
        serde_json::from_str(&fs::read_to_string(output.join("graph_knowledge.json")).unwrap()).unwrap();
    assert_eq!(graph["graph_id"], "kg_page.png");
    assert!(
        graph["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .any(|node| node["node_id"] == "data"),
        "missing data node: {graph}"
    );

    let svg = fs::read_to_string(&svg_path).expect("overlay written");
    assert!(svg.contains("<svg"));
}

#[test]
fn e2e_smoke_test_without_ocr() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let (image, _) = write_page(temp_dir.path());
    let output = temp_dir.path().join("out");

    run(&args(image, None, &output)).expect("page without OCR still succeeds");

    let graph: Value =
        serde_json::from_str(&fs::read_to_string(output.join("graph_knowledge.json")).unwrap()).unwrap();
    assert!(graph["edges"].as_array().unwrap().is_empty());
}

#[test]
fn e2e_smoke_test_error_inputs() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("out");

    let missing = temp_dir.path().join("missing.png").to_string_lossy().to_string();
    assert!(run(&args(missing, None, &output)).is_err());

    let (image, _) = write_page(temp_dir.path());
    let bad_ocr = temp_dir.path().join("bad.json");
    fs::write(&bad_ocr, "not json").unwrap();
    let result = run(&args(image, Some(bad_ocr.to_string_lossy().to_string()), &output));
    assert!(matches!(result, Err(inkgraph::InkgraphError::Input(_))));
}
