use image::{GrayImage, Luma};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut},
    rect::Rect,
};

use inkgraph_core::{
    geometry::Bounds,
    region::{RegionKind, Shape},
};
use inkgraph_vision::{DetectorConfig, RegionDetector, SceneKind};

const PAPER: Luma<u8> = Luma([250]);
const INK: Luma<u8> = Luma([20]);

fn page(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, PAPER)
}

/// Draws an outlined box with a stroke `thickness` pixels wide.
fn draw_box(image: &mut GrayImage, x: i32, y: i32, width: u32, height: u32, thickness: u32) {
    for inset in 0..thickness {
        let rect = Rect::at(x + inset as i32, y + inset as i32)
            .of_size(width - 2 * inset, height - 2 * inset);
        draw_hollow_rect_mut(image, rect, INK);
    }
}

#[test]
fn test_outlined_box_is_container() {
    let mut image = page(300, 300);
    draw_box(&mut image, 50, 50, 70, 60, 3);

    let detection = RegionDetector::default().detect_gray(&image);

    let outer = detection
        .regions()
        .iter()
        .find(|r| r.bounds() == Bounds::new(50, 50, 120, 110))
        .expect("box outline detected");
    assert_eq!(outer.kind(), RegionKind::DiagramContainer);
    assert_eq!(detection.scene(), SceneKind::HybridNotes);
}

#[test]
fn test_small_specks_are_noise() {
    let mut image = page(200, 200);
    for i in 0..5 {
        draw_filled_rect_mut(&mut image, Rect::at(20 + i * 30, 40).of_size(3, 3), INK);
    }

    let detection = RegionDetector::default().detect_gray(&image);
    assert!(detection.regions().is_empty());
}

#[test]
fn test_small_compact_blob_is_text() {
    let mut image = page(200, 200);
    draw_filled_rect_mut(&mut image, Rect::at(100, 100).of_size(14, 14), INK);

    let detection = RegionDetector::default().detect_gray(&image);
    let blob = detection
        .regions()
        .iter()
        .find(|r| r.bounds() == Bounds::new(100, 100, 114, 114))
        .expect("blob detected");
    assert_eq!(blob.kind(), RegionKind::Text);
    assert!(blob.area() >= 100.0);
}

#[test]
fn test_ruled_line_is_erased() {
    let mut image = page(400, 200);
    draw_filled_rect_mut(&mut image, Rect::at(20, 100).of_size(360, 3), INK);

    let detection = RegionDetector::default().detect_gray(&image);
    assert!(
        detection.regions().iter().all(|r| r.bounds().width() < 300),
        "ruled line survived: {:?}",
        detection.regions()
    );
}

#[test]
fn test_ruled_line_kept_without_removal() {
    let mut image = page(400, 200);
    draw_filled_rect_mut(&mut image, Rect::at(20, 100).of_size(360, 3), INK);

    let detector = RegionDetector::new(DetectorConfig::default().without_rule_removal());
    let detection = detector.detect_gray(&image);
    assert!(detection.regions().iter().any(|r| r.bounds().width() >= 300));
}

#[test]
fn test_page_wrapper_is_not_a_container() {
    // A frame whose box covers 60% of a 1000x1000 page.
    let mut image = page(1000, 1000);
    draw_box(&mut image, 10, 10, 980, 612, 3);

    let detector = RegionDetector::new(DetectorConfig::default().without_rule_removal());
    let detection = detector.detect_gray(&image);
    assert!(
        detection
            .regions()
            .iter()
            .all(|r| r.kind() != RegionKind::DiagramContainer)
    );
}

#[test]
fn test_bar_between_boxes_is_connector() {
    let mut image = page(300, 200);
    draw_box(&mut image, 20, 50, 70, 60, 3);
    draw_box(&mut image, 180, 50, 70, 60, 3);
    draw_filled_rect_mut(&mut image, Rect::at(100, 78).of_size(70, 5), INK);

    let detection = RegionDetector::default().detect_gray(&image);

    let bar = detection
        .regions()
        .iter()
        .find(|r| r.bounds() == Bounds::new(100, 78, 170, 83))
        .expect("bar detected");
    assert_eq!(bar.kind(), RegionKind::Connector);
    assert_eq!(bar.shape(), Shape::Line);
    assert_eq!(detection.scene(), SceneKind::Flowchart);
}

#[test]
fn test_detection_is_deterministic() {
    let mut image = page(300, 300);
    draw_box(&mut image, 30, 30, 70, 50, 3);
    draw_box(&mut image, 160, 30, 70, 50, 3);
    draw_filled_rect_mut(&mut image, Rect::at(100, 54).of_size(60, 3), INK);

    let detector = RegionDetector::default();
    let first = detector.detect_gray(&image);
    let second = detector.detect_gray(&image);
    assert_eq!(first, second);
}

#[test]
fn test_detect_path_reads_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.png");
    let mut image = page(300, 300);
    draw_box(&mut image, 50, 50, 70, 60, 3);
    image.save(&path).unwrap();

    let detection = RegionDetector::default().detect_path(&path);
    assert!(
        detection
            .regions()
            .iter()
            .any(|r| r.kind() == RegionKind::DiagramContainer)
    );
}

#[test]
fn test_detect_path_unreadable_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not an image").unwrap();

    let detection = RegionDetector::default().detect_path(&path);
    assert!(detection.regions().is_empty());
}
