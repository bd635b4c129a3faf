//! Tuning parameters for region detection.

use serde::Deserialize;

/// Thresholds used by [`RegionDetector`](crate::RegionDetector).
///
/// Every field has a default, so a partial `[detector]` table only
/// overrides what it names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Side of the adaptive threshold neighbourhood, in pixels.
    block_size: u32,
    /// Constant subtracted from the Gaussian-weighted neighbourhood mean.
    threshold_offset: i32,
    /// Width of the horizontal element used to find ruled lines.
    rule_kernel_width: u32,
    rule_iterations: u32,
    /// Brush size used to paint ruled lines out of the binary image.
    rule_erase_thickness: u32,
    /// Contours smaller than this are noise.
    noise_area: f64,
    /// Minimum area of a contour with children to be a container.
    container_child_area: f64,
    /// Minimum area of any contour to be a container.
    container_area: f64,
    /// Containers covering more than this share of the page are wrappers.
    page_wrapper_ratio: f64,
    /// Height/width above which a container is a vertical line.
    vertical_line_ratio: f64,
    /// Width/height above which a container is a line of text.
    text_line_ratio: f64,
    /// Width/height above which a small contour is a line-like candidate.
    connector_ratio: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            block_size: 11,
            threshold_offset: 2,
            rule_kernel_width: 40,
            rule_iterations: 2,
            rule_erase_thickness: 5,
            noise_area: 100.0,
            container_child_area: 1000.0,
            container_area: 3000.0,
            page_wrapper_ratio: 0.5,
            vertical_line_ratio: 10.0,
            text_line_ratio: 8.0,
            connector_ratio: 3.0,
        }
    }
}

impl DetectorConfig {
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    pub fn threshold_offset(&self) -> i32 {
        self.threshold_offset
    }

    pub fn rule_kernel_width(&self) -> u32 {
        self.rule_kernel_width
    }

    pub fn rule_iterations(&self) -> u32 {
        self.rule_iterations
    }

    pub fn rule_erase_thickness(&self) -> u32 {
        self.rule_erase_thickness
    }

    pub fn noise_area(&self) -> f64 {
        self.noise_area
    }

    pub fn container_child_area(&self) -> f64 {
        self.container_child_area
    }

    pub fn container_area(&self) -> f64 {
        self.container_area
    }

    pub fn page_wrapper_ratio(&self) -> f64 {
        self.page_wrapper_ratio
    }

    pub fn vertical_line_ratio(&self) -> f64 {
        self.vertical_line_ratio
    }

    pub fn text_line_ratio(&self) -> f64 {
        self.text_line_ratio
    }

    pub fn connector_ratio(&self) -> f64 {
        self.connector_ratio
    }

    /// Returns a copy with ruled-line removal disabled.
    pub fn without_rule_removal(mut self) -> Self {
        self.rule_iterations = 0;
        self
    }
}
