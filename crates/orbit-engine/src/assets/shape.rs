//! Ship outline loading: SVG path data to polygon vertex sets.
//!
//! The host pulls the `d` attribute of every `<path>` out of the ship SVG and
//! hands the strings over. Each subpath is flattened with lyon into one
//! polygon; the polygons are then recentred so the body origin sits on the
//! centroid of the whole outline.
//!
//! Path data is parsed by lyon's SVG parser, so the full command set is
//! accepted, arcs included.

use glam::Vec2;
use lyon::extra::parser::{ParserOptions, PathParser, Source};
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent};
use thiserror::Error;

/// Maximum distance between a curve and its flattened polyline.
const FLATTEN_TOLERANCE: f32 = 0.5;
/// Polygons with less area than this are dropped.
const MIN_AREA: f32 = 1e-3;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("no path data")]
    Empty,
    #[error("malformed path data: {0}")]
    Parse(String),
    #[error("no polygon with at least three vertices")]
    Degenerate,
}

/// Polygon outline of the ship, centred on its centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipShape {
    vertex_sets: Vec<Vec<Vec2>>,
}

impl ShipShape {
    /// Build a shape from the `d` attributes of the ship's `<path>` elements.
    pub fn from_path_data<S: AsRef<str>>(paths: &[S]) -> Result<Self, ShapeError> {
        if paths.iter().all(|d| d.as_ref().trim().is_empty()) {
            return Err(ShapeError::Empty);
        }

        let mut sets = Vec::new();
        for d in paths {
            let path = parse_path(d.as_ref())?;
            flatten_into(&path, &mut sets);
        }
        Self::from_vertex_sets(sets)
    }

    /// Build a shape from raw polygons. Degenerate polygons are dropped and the
    /// rest are recentred.
    pub fn from_vertex_sets(sets: Vec<Vec<Vec2>>) -> Result<Self, ShapeError> {
        let mut sets: Vec<Vec<Vec2>> = sets
            .into_iter()
            .filter(|s| s.len() >= 3 && signed_area(s).abs() > MIN_AREA)
            .collect();
        if sets.is_empty() {
            return Err(ShapeError::Degenerate);
        }

        let center = centroid(&sets);
        for p in sets.iter_mut().flatten() {
            *p -= center;
        }
        Ok(Self { vertex_sets: sets })
    }

    pub fn vertex_sets(&self) -> &[Vec<Vec2>] {
        &self.vertex_sets
    }

    pub fn into_vertex_sets(self) -> Vec<Vec<Vec2>> {
        self.vertex_sets
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_sets.iter().map(Vec::len).sum()
    }

    pub fn bounding_radius(&self) -> f32 {
        self.vertex_sets
            .iter()
            .flatten()
            .map(|p| p.length())
            .fold(0.0, f32::max)
    }
}

/// Parse one path-data string into a lyon path.
fn parse_path(data: &str) -> Result<Path, ShapeError> {
    let mut builder = Path::builder();
    let mut source = Source::new(data.chars());
    PathParser::new()
        .parse(&ParserOptions::DEFAULT, &mut source, &mut builder)
        .map_err(|e| ShapeError::Parse(format!("{:?}", e)))?;
    Ok(builder.build())
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Flatten every subpath of `path` into a polygon and append it to `sets`.
fn flatten_into(path: &Path, sets: &mut Vec<Vec<Vec2>>) {
    let mut current: Vec<Vec2> = Vec::new();
    for event in path.iter().flattened(FLATTEN_TOLERANCE) {
        match event {
            PathEvent::Begin { at } => {
                current.clear();
                current.push(Vec2::new(at.x, at.y));
            }
            PathEvent::Line { to, .. } => {
                let p = Vec2::new(to.x, to.y);
                if current.last().map_or(true, |q| q.distance_squared(p) > 1e-8) {
                    current.push(p);
                }
            }
            PathEvent::End { .. } => {
                if current.len() > 1 && current[0].distance_squared(current[current.len() - 1]) <= 1e-8 {
                    current.pop();
                }
                sets.push(std::mem::take(&mut current));
            }
            // Flattening only yields line segments.
            _ => {}
        }
    }
}

/// Shoelace area, positive for counter-clockwise winding in y-up space.
fn signed_area(poly: &[Vec2]) -> f32 {
    let n = poly.len();
    (0..n)
        .map(|i| poly[i].perp_dot(poly[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

/// Area-weighted centroid of all polygons, independent of winding.
fn centroid(sets: &[Vec<Vec2>]) -> Vec2 {
    let mut weighted = Vec2::ZERO;
    let mut total = 0.0;
    for poly in sets {
        let area = signed_area(poly);
        let n = poly.len();
        let sum: Vec2 = (0..n)
            .map(|i| {
                let (a, b) = (poly[i], poly[(i + 1) % n]);
                (a + b) * a.perp_dot(b)
            })
            .sum();
        let c = sum / (6.0 * area);
        weighted += c * area.abs();
        total += area.abs();
    }
    weighted / total
}
