//! Rectangle clipping of projected features.

use super::source::{UnitFeature, UnitGeometry, UnitPoint};

/// Axis-aligned clip rectangle in unit space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ClipRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ClipRect {
    #[inline]
    pub fn contains(&self, (x, y): UnitPoint) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    #[inline]
    fn overlaps(&self, bounds: (f64, f64, f64, f64)) -> bool {
        bounds.0 <= self.max_x && bounds.2 >= self.min_x && bounds.1 <= self.max_y && bounds.3 >= self.min_y
    }

    #[inline]
    fn covers(&self, bounds: (f64, f64, f64, f64)) -> bool {
        bounds.0 >= self.min_x && bounds.2 <= self.max_x && bounds.1 >= self.min_y && bounds.3 <= self.max_y
    }
}

/// Clips every feature against `rect`, dropping those with nothing inside.
pub(crate) fn clip_features(features: &[UnitFeature], rect: &ClipRect) -> Vec<UnitFeature> {
    features
        .iter()
        .filter(|feature| rect.overlaps(feature.bounds))
        .filter_map(|feature| {
            if rect.covers(feature.bounds) {
                return Some(feature.clone());
            }
            let geometry = clip_geometry(&feature.geometry, rect)?;
            Some(UnitFeature::new(
                feature.id,
                geometry,
                std::sync::Arc::clone(&feature.properties),
            ))
        })
        .collect()
}

fn clip_geometry(geometry: &UnitGeometry, rect: &ClipRect) -> Option<UnitGeometry> {
    match geometry {
        UnitGeometry::Points(points) => {
            let inside: Vec<UnitPoint> = points.iter().copied().filter(|p| rect.contains(*p)).collect();
            (!inside.is_empty()).then_some(UnitGeometry::Points(inside))
        }
        UnitGeometry::Lines(lines) => {
            let parts: Vec<Vec<UnitPoint>> = lines.iter().flat_map(|line| clip_line(line, rect)).collect();
            (!parts.is_empty()).then_some(UnitGeometry::Lines(parts))
        }
        UnitGeometry::Polygons(polygons) => {
            let clipped: Vec<Vec<Vec<UnitPoint>>> = polygons
                .iter()
                .filter_map(|rings| clip_polygon(rings, rect))
                .collect();
            (!clipped.is_empty()).then_some(UnitGeometry::Polygons(clipped))
        }
    }
}

/// Splits a polyline into the parts that lie inside `rect`.
pub(crate) fn clip_line(line: &[UnitPoint], rect: &ClipRect) -> Vec<Vec<UnitPoint>> {
    let mut parts = Vec::new();
    if line.len() == 1 {
        if rect.contains(line[0]) {
            parts.push(vec![line[0]]);
        }
        return parts;
    }

    let mut current: Vec<UnitPoint> = Vec::new();
    for segment in line.windows(2) {
        match clip_segment(segment[0], segment[1], rect) {
            Some((a, b)) => {
                if current.last() != Some(&a) {
                    if !current.is_empty() {
                        parts.push(std::mem::take(&mut current));
                    }
                    current.push(a);
                }
                current.push(b);
                // Leaving the rectangle ends this part
                if b != segment[1] {
                    parts.push(std::mem::take(&mut current));
                }
            }
            None => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Liang-Barsky segment clipping.
fn clip_segment(a: UnitPoint, b: UnitPoint, rect: &ClipRect) -> Option<(UnitPoint, UnitPoint)> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    let checks = [
        (-dx, a.0 - rect.min_x),
        (dx, rect.max_x - a.0),
        (-dy, a.1 - rect.min_y),
        (dy, rect.max_y - a.1),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }
    }
    let start = if t0 > 0.0 { (a.0 + t0 * dx, a.1 + t0 * dy) } else { a };
    let end = if t1 < 1.0 { (a.0 + t1 * dx, a.1 + t1 * dy) } else { b };
    Some((start, end))
}

/// Clips a polygon's rings. Returns `None` when the exterior does not survive.
fn clip_polygon(rings: &[Vec<UnitPoint>], rect: &ClipRect) -> Option<Vec<Vec<UnitPoint>>> {
    let (exterior, holes) = rings.split_first()?;
    let outer = clip_ring(exterior, rect);
    if outer.is_empty() {
        return None;
    }
    let mut clipped = vec![outer];
    clipped.extend(
        holes
            .iter()
            .map(|hole| clip_ring(hole, rect))
            .filter(|hole| !hole.is_empty()),
    );
    Some(clipped)
}

/// Sutherland-Hodgman ring clipping against the four rectangle edges.
pub(crate) fn clip_ring(ring: &[UnitPoint], rect: &ClipRect) -> Vec<UnitPoint> {
    let mut output: Vec<UnitPoint> = ring.to_vec();
    if output.len() > 1 && output.first() == output.last() {
        output.pop();
    }
    let edges: [(usize, f64, bool); 4] = [
        (0, rect.min_x, true),
        (0, rect.max_x, false),
        (1, rect.min_y, true),
        (1, rect.max_y, false),
    ];
    for (axis, bound, keep_greater) in edges {
        if output.is_empty() {
            break;
        }
        let input = std::mem::take(&mut output);
        let inside = |p: &UnitPoint| {
            let v = if axis == 0 { p.0 } else { p.1 };
            if keep_greater {
                v >= bound
            } else {
                v <= bound
            }
        };
        let intersect = |a: &UnitPoint, b: &UnitPoint| {
            let (av, bv) = if axis == 0 { (a.0, b.0) } else { (a.1, b.1) };
            let t = (bound - av) / (bv - av);
            if axis == 0 {
                (bound, a.1 + t * (b.1 - a.1))
            } else {
                (a.0 + t * (b.0 - a.0), bound)
            }
        };
        let mut prev = input[input.len() - 1];
        for current in input {
            match (inside(&current), inside(&prev)) {
                (true, true) => output.push(current),
                (true, false) => {
                    output.push(intersect(&prev, &current));
                    output.push(current);
                }
                (false, true) => output.push(intersect(&prev, &current)),
                (false, false) => {}
            }
            prev = current;
        }
    }
    output
}
