//! Measurements over traced contours.
//!
//! Contours are closed polygons in pixel coordinates, as returned by
//! [`imageproc::contours::find_contours`].

use imageproc::{
    geometry::{approximate_polygon_dp, arc_length, convex_hull},
    point::Point,
};

use inkgraph_core::geometry::Bounds;

/// Area enclosed by a closed polygon (shoelace formula).
///
/// Orientation is ignored. Fewer than three points enclose nothing.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y))
        .sum();
    twice.abs() as f64 / 2.0
}

/// Upright bounding box of a contour, with inclusive pixel extents.
///
/// The box spans `[min_x, min_y, max_x + 1, max_y + 1]`, so a single pixel
/// has width and height one.
pub fn bounding_box(points: &[Point<i32>]) -> Option<Bounds> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Bounds::from_top_left(
        min_x,
        min_y,
        max_x - min_x + 1,
        max_y - min_y + 1,
    ))
}

/// Number of vertices of the polygon approximation used for shape analysis.
///
/// The contour is approximated at `coarse` times its perimeter; when that
/// still leaves more than six vertices it is re-approximated at `coarser`.
pub fn approximate_vertices(points: &[Point<i32>], coarse: f64, coarser: f64) -> usize {
    if points.len() < 3 {
        return points.len();
    }
    let perimeter = arc_length(points, true);
    if perimeter <= 0.0 {
        return points.len();
    }
    let approx = approximate_closed(points, coarse * perimeter);
    if approx.len() > 6 {
        approximate_closed(points, coarser * perimeter).len()
    } else {
        approx.len()
    }
}

/// Douglas-Peucker approximation of a closed contour.
///
/// The curve is split at the point farthest from its first point and each
/// half is simplified as an open chain, so neither split point can be
/// dropped. A contour whose points all coincide approximates to one point.
pub fn approximate_closed(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    let squared_distance = |p: &Point<i32>| {
        let dx = i64::from(p.x) - i64::from(first.x);
        let dy = i64::from(p.y) - i64::from(first.y);
        dx * dx + dy * dy
    };

    let mut split = 0;
    let mut farthest = 0;
    for (i, p) in points.iter().enumerate() {
        let d = squared_distance(p);
        if d > farthest {
            farthest = d;
            split = i;
        }
    }
    if split == 0 {
        return vec![first];
    }

    let mut back: Vec<Point<i32>> = points[split..].to_vec();
    back.push(first);

    let mut approx = simplify_open(&points[..=split], epsilon);
    let tail = simplify_open(&back, epsilon);
    // Both halves end on a split point; keep each of those once.
    approx.extend_from_slice(&tail[1..tail.len() - 1]);
    approx
}

fn simplify_open(chain: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if chain.len() <= 2 {
        return chain.to_vec();
    }
    approximate_polygon_dp(chain, epsilon, false)
}

/// Area of the convex hull of a contour.
pub fn hull_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let hull = convex_hull(points);
    polygon_area(&hull)
}

/// A circle given by centre and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Circle {
    fn through_two(a: (f64, f64), b: (f64, f64)) -> Self {
        let x = (a.0 + b.0) / 2.0;
        let y = (a.1 + b.1) / 2.0;
        Self {
            x,
            y,
            radius: (a.0 - x).hypot(a.1 - y),
        }
    }

    fn through_three(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Option<Self> {
        let d = 2.0 * (a.0 * (b.1 - c.1) + b.0 * (c.1 - a.1) + c.0 * (a.1 - b.1));
        if d.abs() < f64::EPSILON {
            return None;
        }
        let sq = |p: (f64, f64)| p.0 * p.0 + p.1 * p.1;
        let x = (sq(a) * (b.1 - c.1) + sq(b) * (c.1 - a.1) + sq(c) * (a.1 - b.1)) / d;
        let y = (sq(a) * (c.0 - b.0) + sq(b) * (a.0 - c.0) + sq(c) * (b.0 - a.0)) / d;
        Some(Self {
            x,
            y,
            radius: (a.0 - x).hypot(a.1 - y),
        })
    }

    fn contains(&self, p: (f64, f64)) -> bool {
        (p.0 - self.x).hypot(p.1 - self.y) <= self.radius * (1.0 + 1e-9) + 1e-9
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

/// Smallest circle enclosing every point of the contour.
///
/// Incremental construction over the points in contour order; the result
/// depends only on the point list.
pub fn min_enclosing_circle(points: &[Point<i32>]) -> Option<Circle> {
    let pts: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (f64::from(p.x), f64::from(p.y)))
        .collect();
    let first = *pts.first()?;
    let mut circle = Circle {
        x: first.0,
        y: first.1,
        radius: 0.0,
    };

    for i in 1..pts.len() {
        if circle.contains(pts[i]) {
            continue;
        }
        circle = Circle::through_two(pts[0], pts[i]);
        for j in 0..i {
            if circle.contains(pts[j]) {
                continue;
            }
            circle = Circle::through_two(pts[i], pts[j]);
            for k in 0..j {
                if circle.contains(pts[k]) {
                    continue;
                }
                circle = Circle::through_three(pts[i], pts[j], pts[k])
                    .unwrap_or_else(|| widest_pair(pts[i], pts[j], pts[k]));
            }
        }
    }

    Some(circle)
}

/// Circle over the farthest-apart pair of three collinear points.
fn widest_pair(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Circle {
    [
        Circle::through_two(a, b),
        Circle::through_two(b, c),
        Circle::through_two(a, c),
    ]
    .into_iter()
    .fold(Circle::through_two(a, b), |best, circle| {
        if circle.radius > best.radius {
            circle
        } else {
            best
        }
    })
}

/// Everything the shape classifier needs to know about one contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourMetrics {
    pub vertices: usize,
    pub area: f64,
    pub width: i32,
    pub height: i32,
    pub enclosing_circle_area: f64,
    pub hull_area: f64,
}

impl ContourMetrics {
    /// Measures a contour.
    ///
    /// Returns `None` for a contour with no points.
    pub fn measure(points: &[Point<i32>]) -> Option<Self> {
        let bounds = bounding_box(points)?;
        let circle = min_enclosing_circle(points)?;
        Some(Self {
            vertices: approximate_vertices(points, 0.04, 0.06),
            area: polygon_area(points),
            width: bounds.width(),
            height: bounds.height(),
            enclosing_circle_area: circle.area(),
            hull_area: hull_area(points),
        })
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn points_strategy() -> impl Strategy<Value = Vec<Point<i32>>> {
        prop::collection::vec((-200i32..200, -200i32..200), 1..40)
            .prop_map(|pts| pts.into_iter().map(|(x, y)| Point::new(x, y)).collect())
    }

    proptest! {
        #[test]
        fn rectangle_area_is_width_times_height(x in -100i32..100, y in -100i32..100, w in 1i32..80, h in 1i32..80) {
            let points = [
                Point::new(x, y),
                Point::new(x + w, y),
                Point::new(x + w, y + h),
                Point::new(x, y + h),
            ];
            prop_assert_eq!(polygon_area(&points), f64::from(w * h));
        }

        #[test]
        fn enclosing_circle_contains_every_point(points in points_strategy()) {
            let circle = min_enclosing_circle(&points).unwrap();
            for p in &points {
                let d = (f64::from(p.x) - circle.x).hypot(f64::from(p.y) - circle.y);
                prop_assert!(d <= circle.radius + 1e-6);
            }
        }

        #[test]
        fn bounding_box_contains_every_point(points in points_strategy()) {
            let bounds = bounding_box(&points).unwrap();
            for p in &points {
                prop_assert!(bounds.min_x() <= p.x && p.x < bounds.max_x());
                prop_assert!(bounds.min_y() <= p.y && p.y < bounds.max_y());
            }
        }
    }
}
