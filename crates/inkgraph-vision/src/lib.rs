//! Region detection for photographed handwritten note pages.
//!
//! [`RegionDetector`] turns a page image into typed geometric
//! [`Region`]s: containers, connectors, text lines and small text blobs.
//!
//! # Pipeline
//!
//! 1. Grayscale, then inverted adaptive Gaussian threshold
//! 2. Ruled lines are found with a horizontal opening and painted out
//! 3. Contours of the cleaned image are traced with their nesting
//! 4. Each contour is classified by area, aspect ratio and outline shape
//!
//! # Examples
//!
//! ```
//! use image::{GrayImage, Luma};
//! use inkgraph_vision::{DetectorConfig, RegionDetector};
//!
//! let page = GrayImage::from_pixel(200, 200, Luma([255]));
//! let detection = RegionDetector::new(DetectorConfig::default()).detect_gray(&page);
//! assert!(detection.regions().is_empty());
//! ```

mod binarize;
mod classify;
mod config;
mod contour;
mod error;

use std::{fmt, fs, path::Path};

use image::{DynamicImage, GrayImage};
use imageproc::contours::{Contour, find_contours};
use log::{debug, info, trace, warn};
use serde::Serialize;

use inkgraph_core::region::{Region, RegionKind};

pub use classify::{Candidate, classify_region, classify_shape};
pub use config::DetectorConfig;
pub use contour::ContourMetrics;
pub use error::VisionError;

/// Overall layout of a page, judged from its regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    /// No diagram containers
    #[default]
    TextNotes,
    /// At least one diagram container
    HybridNotes,
    /// Several containers joined by at least one connector
    Flowchart,
}

impl SceneKind {
    /// Classifies a page from its detected regions.
    pub fn classify(regions: &[Region]) -> Self {
        let containers = regions
            .iter()
            .filter(|r| r.kind() == RegionKind::DiagramContainer)
            .count();
        let connectors = regions
            .iter()
            .filter(|r| r.kind() == RegionKind::Connector)
            .count();

        if containers > 1 && connectors > 0 {
            SceneKind::Flowchart
        } else if containers > 0 {
            SceneKind::HybridNotes
        } else {
            SceneKind::TextNotes
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SceneKind::TextNotes => "text_notes",
            SceneKind::HybridNotes => "hybrid_notes",
            SceneKind::Flowchart => "flowchart",
        };
        f.write_str(name)
    }
}

/// The result of running detection on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    regions: Vec<Region>,
    scene: SceneKind,
}

impl Detection {
    fn new(regions: Vec<Region>) -> Self {
        let scene = SceneKind::classify(&regions);
        Self { regions, scene }
    }

    /// Regions in contour-tracing order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn scene(&self) -> SceneKind {
        self.scene
    }

    pub fn into_regions(self) -> Vec<Region> {
        self.regions
    }
}

/// Converts page images into typed regions.
///
/// The detector holds only its configuration; each call is independent, so
/// one instance can serve any number of pages.
#[derive(Debug, Clone, Default)]
pub struct RegionDetector {
    config: DetectorConfig,
}

impl RegionDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Decodes an image file.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError`] when the file cannot be read, cannot be
    /// decoded, or has no pixels.
    pub fn load(path: &Path) -> Result<DynamicImage, VisionError> {
        let bytes = fs::read(path).map_err(|source| VisionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image = image::load_from_memory(&bytes).map_err(|source| VisionError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        if image.width() == 0 || image.height() == 0 {
            return Err(VisionError::EmptyImage(path.to_path_buf()));
        }
        Ok(image)
    }

    /// Detects regions in an image file.
    ///
    /// An unreadable file is not fatal here: it is logged and yields an
    /// empty detection.
    pub fn detect_path(&self, path: &Path) -> Detection {
        match Self::load(path) {
            Ok(image) => self.detect(&image),
            Err(err) => {
                warn!(path:% = path.display(); "Cannot read page image: {err}");
                Detection::default()
            }
        }
    }

    /// Detects regions in a decoded image of any colour type.
    pub fn detect(&self, image: &DynamicImage) -> Detection {
        self.detect_gray(&image.to_luma8())
    }

    /// Detects regions in a grayscale image.
    pub fn detect_gray(&self, gray: &GrayImage) -> Detection {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            warn!("Empty page image, no regions detected");
            return Detection::default();
        }

        let mut binary = binarize::adaptive_threshold(
            gray,
            self.config.block_size(),
            self.config.threshold_offset(),
        );
        self.erase_rule_lines(&mut binary);

        let contours = find_contours::<i32>(&binary);
        debug!(contours = contours.len(); "Traced contours");

        let regions = self.classify_contours(&contours, f64::from(width) * f64::from(height));
        let detection = Detection::new(regions);
        info!(
            regions = detection.regions.len(),
            scene:% = detection.scene;
            "Detected page regions"
        );
        detection
    }

    /// Paints the external outlines of long horizontal runs out of `binary`.
    fn erase_rule_lines(&self, binary: &mut GrayImage) {
        if self.config.rule_iterations() == 0 {
            return;
        }
        let rules = binarize::open_horizontal(
            binary,
            self.config.rule_kernel_width(),
            self.config.rule_iterations(),
        );
        let outlines: Vec<Contour<i32>> = find_contours::<i32>(&rules)
            .into_iter()
            .filter(|c| c.parent.is_none())
            .collect();
        trace!(rules = outlines.len(); "Erasing ruled lines");

        binarize::erase_points(
            binary,
            outlines
                .iter()
                .flat_map(|c| c.points.iter().map(|p| (p.x, p.y))),
            self.config.rule_erase_thickness(),
        );
    }

    fn classify_contours(&self, contours: &[Contour<i32>], image_area: f64) -> Vec<Region> {
        let mut has_child = vec![false; contours.len()];
        for contour in contours {
            if let Some(parent) = contour.parent {
                has_child[parent] = true;
            }
        }

        contours
            .iter()
            .enumerate()
            .filter_map(|(i, contour)| {
                let bounds = contour::bounding_box(&contour.points)?;
                let area = contour::polygon_area(&contour.points);
                let candidate = Candidate {
                    area,
                    bounds,
                    has_child: has_child[i],
                };
                let (kind, shape) =
                    classify_region(candidate, image_area, &self.config, || {
                        ContourMetrics::measure(&contour.points)
                            .map(|m| classify_shape(&m))
                            .unwrap_or_default()
                    })?;
                trace!(index = i, kind:% = kind, shape:% = shape; "Classified contour");
                Some(Region::new(kind, bounds, shape, area))
            })
            .collect()
    }
}
