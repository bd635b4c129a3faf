//! Ordered classification heuristics; the first matching rule wins.

use inkgraph_core::{
    geometry::Bounds,
    region::{RegionKind, Shape},
};

use crate::{config::DetectorConfig, contour::ContourMetrics};

/// Classifies the outline shape of a measured contour.
///
/// Rules, in order: two vertices is a line, three a triangle; four to eight
/// vertices filling at least 60% of the bounding box is a square (aspect
/// within 10% of one) or rectangle; more than six vertices within 30% of the
/// enclosing circle's area is a circle; solidity below one half is an arrow
/// or line; anything else is a complex polygon.
pub fn classify_shape(metrics: &ContourMetrics) -> Shape {
    let ContourMetrics {
        vertices,
        area,
        width,
        height,
        enclosing_circle_area,
        hull_area,
    } = *metrics;
    let aspect = f64::from(width) / f64::from(height.max(1));

    match vertices {
        2 => return Shape::Line,
        3 => return Shape::Triangle,
        4..=8 if area > 100.0 => {
            let extent = area / (f64::from(width) * f64::from(height)).max(1.0);
            if (0.6..=1.0).contains(&extent) {
                return if (0.9..=1.1).contains(&aspect) {
                    Shape::Square
                } else {
                    Shape::Rectangle
                };
            }
        }
        _ => {}
    }

    if vertices > 6 && enclosing_circle_area > 0.0 {
        let fill = area / enclosing_circle_area;
        if (0.7..=1.3).contains(&fill) {
            return Shape::Circle;
        }
    }

    if hull_area > 0.0 && area / hull_area < 0.5 {
        return Shape::ArrowOrLine;
    }

    Shape::ComplexPolygon
}

/// Facts about one contour needed to assign it a region kind.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub area: f64,
    pub bounds: Bounds,
    pub has_child: bool,
}

/// Assigns a region kind and shape to a contour, or `None` to discard it.
///
/// `shape_of` is only called for contours whose shape matters, so the
/// polygon measurements are skipped for noise and plain text blobs.
pub fn classify_region(
    candidate: Candidate,
    image_area: f64,
    config: &DetectorConfig,
    shape_of: impl FnOnce() -> Shape,
) -> Option<(RegionKind, Shape)> {
    let Candidate {
        area,
        bounds,
        has_child,
    } = candidate;
    if area < config.noise_area() {
        return None;
    }

    let width = f64::from(bounds.width().max(1));
    let height = f64::from(bounds.height().max(1));
    let aspect = width / height;

    let is_container = (has_child && area > config.container_child_area())
        || area > config.container_area();
    if is_container {
        if width * height > config.page_wrapper_ratio() * image_area {
            return None;
        }
        if height / width > config.vertical_line_ratio() {
            return None;
        }
        if aspect > config.text_line_ratio() {
            return Some((RegionKind::TextLine, Shape::Unknown));
        }
        return Some((RegionKind::DiagramContainer, shape_of()));
    }

    if area < config.container_area() {
        if aspect > config.connector_ratio() {
            let shape = shape_of();
            let kind = if shape.is_linear() {
                RegionKind::Connector
            } else {
                RegionKind::TextLine
            };
            return Some((kind, shape));
        }
        return Some((RegionKind::Text, Shape::Unknown));
    }

    // Exactly at the container area with no qualifying child.
    Some((RegionKind::Unknown, Shape::Unknown))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(vertices: usize, area: f64, width: i32, height: i32) -> ContourMetrics {
        ContourMetrics {
            vertices,
            area,
            width,
            height,
            enclosing_circle_area: 0.0,
            hull_area: area,
        }
    }

    fn candidate(area: f64, bounds: Bounds, has_child: bool) -> Candidate {
        Candidate {
            area,
            bounds,
            has_child,
        }
    }

    #[test]
    fn test_vertex_rules() {
        assert_eq!(classify_shape(&metrics(2, 150.0, 80, 4)), Shape::Line);
        assert_eq!(classify_shape(&metrics(3, 500.0, 40, 40)), Shape::Triangle);
    }

    #[test]
    fn test_square_and_rectangle() {
        assert_eq!(classify_shape(&metrics(4, 1500.0, 40, 40)), Shape::Square);
        assert_eq!(
            classify_shape(&metrics(4, 3000.0, 100, 40)),
            Shape::Rectangle
        );
    }

    #[test]
    fn test_sparse_quad_falls_through() {
        // Extent 0.3 is too hollow for a rectangle; solidity decides.
        let m = ContourMetrics {
            hull_area: 4000.0,
            ..metrics(4, 1200.0, 100, 40)
        };
        assert_eq!(classify_shape(&m), Shape::ArrowOrLine);
    }

    #[test]
    fn test_circle() {
        let m = ContourMetrics {
            enclosing_circle_area: 1300.0,
            ..metrics(8, 1200.0, 40, 40)
        };
        // Eight vertices but extent 0.75 matches the rectangle rule first.
        assert_eq!(classify_shape(&m), Shape::Square);

        let m = ContourMetrics {
            enclosing_circle_area: 1300.0,
            ..metrics(10, 1200.0, 40, 40)
        };
        assert_eq!(classify_shape(&m), Shape::Circle);
    }

    #[test]
    fn test_low_solidity_is_arrow() {
        let m = ContourMetrics {
            hull_area: 1000.0,
            ..metrics(5, 300.0, 100, 20)
        };
        assert_eq!(classify_shape(&m), Shape::ArrowOrLine);
    }

    #[test]
    fn test_complex_polygon_default() {
        let m = ContourMetrics {
            hull_area: 400.0,
            ..metrics(12, 300.0, 40, 40)
        };
        assert_eq!(classify_shape(&m), Shape::ComplexPolygon);
    }

    #[test]
    fn test_shape_is_deterministic() {
        let m = ContourMetrics {
            hull_area: 900.0,
            enclosing_circle_area: 2000.0,
            ..metrics(7, 420.0, 60, 20)
        };
        let first = classify_shape(&m);
        for _ in 0..10 {
            assert_eq!(classify_shape(&m), first);
        }
    }

    #[test]
    fn test_noise_is_discarded() {
        let config = DetectorConfig::default();
        let got = classify_region(
            candidate(99.0, Bounds::new(0, 0, 20, 5), false),
            1e6,
            &config,
            || Shape::Line,
        );
        assert_eq!(got, None);
    }

    #[test]
    fn test_page_wrapper_rejected() {
        let config = DetectorConfig::default();
        // 60% of a 1000x1000 page.
        let bounds = Bounds::new(0, 0, 1000, 600);
        let got = classify_region(
            candidate(500_000.0, bounds, true),
            1_000_000.0,
            &config,
            || Shape::Rectangle,
        );
        assert_eq!(got, None);
    }

    #[test]
    fn test_container_variants() {
        let config = DetectorConfig::default();
        let boxed = classify_region(
            candidate(4000.0, Bounds::new(0, 0, 80, 60), false),
            1e6,
            &config,
            || Shape::Rectangle,
        );
        assert_eq!(
            boxed,
            Some((RegionKind::DiagramContainer, Shape::Rectangle))
        );

        let with_child = classify_region(
            candidate(1200.0, Bounds::new(0, 0, 40, 40), true),
            1e6,
            &config,
            || Shape::Square,
        );
        assert_eq!(with_child, Some((RegionKind::DiagramContainer, Shape::Square)));

        let wide = classify_region(
            candidate(4000.0, Bounds::new(0, 0, 900, 100), false),
            1e6,
            &config,
            || panic!("shape not needed"),
        );
        assert_eq!(wide, Some((RegionKind::TextLine, Shape::Unknown)));

        let tall = classify_region(
            candidate(4000.0, Bounds::new(0, 0, 10, 400), false),
            1e6,
            &config,
            || panic!("shape not needed"),
        );
        assert_eq!(tall, None);
    }

    #[test]
    fn test_line_like_small_contours() {
        let config = DetectorConfig::default();
        let bounds = Bounds::new(0, 0, 120, 10);
        let arrow = classify_region(candidate(300.0, bounds, false), 1e6, &config, || {
            classify_shape(&ContourMetrics {
                hull_area: 1000.0,
                ..metrics(2, 300.0, 120, 10)
            })
        });
        assert_eq!(arrow, Some((RegionKind::Connector, Shape::Line)));

        let scribble = classify_region(candidate(300.0, bounds, false), 1e6, &config, || {
            Shape::ComplexPolygon
        });
        assert_eq!(
            scribble,
            Some((RegionKind::TextLine, Shape::ComplexPolygon))
        );

        let blob = classify_region(
            candidate(300.0, Bounds::new(0, 0, 20, 20), false),
            1e6,
            &config,
            || panic!("shape not needed"),
        );
        assert_eq!(blob, Some((RegionKind::Text, Shape::Unknown)));
    }

    #[test]
    fn test_thin_low_solidity_contour_is_connector() {
        let config = DetectorConfig::default();
        let m = ContourMetrics {
            hull_area: 1000.0,
            ..metrics(5, 300.0, 150, 12)
        };
        let got = classify_region(
            candidate(300.0, Bounds::new(10, 10, 160, 22), false),
            1e6,
            &config,
            || classify_shape(&m),
        );
        assert_eq!(got, Some((RegionKind::Connector, Shape::ArrowOrLine)));
    }
}
