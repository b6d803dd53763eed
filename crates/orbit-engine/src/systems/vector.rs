//! Frame geometry buffer.
//!
//! Shapes are tessellated on the CPU with lyon into a flat triangle list that
//! the host reads straight out of wasm memory:
//!
//! ```ignore
//! vectors.fill_circle(earth_pos, 100.0, EARTH_COLOR);
//! vectors.fill_polygon(&hull, SHIP_COLOR);
//! vectors.stroke_polyline(&[pos, pos + vel], 1.0, VectorColor::WHITE);
//! ```

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use lyon::math::point;
use lyon::path::{Path, Winding};
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    StrokeOptions, StrokeTessellator, StrokeVertex, StrokeVertexConstructor, VertexBuffers,
};

const TOLERANCE: f32 = 0.5;

/// One output vertex: position then colour, 6 floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct VectorVertex {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorVertex {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn at(pos: Vec2, color: VectorColor) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        }
    }
}

/// RGBA colour, components in 0..1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl VectorColor {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque colour from 8-bit channels, e.g. `rgb8(0x3D, 0x8E, 0xB9)`.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

impl Default for VectorColor {
    fn default() -> Self {
        Self::WHITE
    }
}

struct SolidFill(VectorColor);

impl FillVertexConstructor<VectorVertex> for SolidFill {
    fn new_vertex(&mut self, vertex: FillVertex) -> VectorVertex {
        let p = vertex.position();
        VectorVertex::at(Vec2::new(p.x, p.y), self.0)
    }
}

struct SolidStroke(VectorColor);

impl StrokeVertexConstructor<VectorVertex> for SolidStroke {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> VectorVertex {
        let p = vertex.position();
        VectorVertex::at(Vec2::new(p.x, p.y), self.0)
    }
}

/// Per-frame triangle list plus the lyon tessellators that fill it.
///
/// Shapes that would push the buffer past `max_vertices` are dropped whole.
pub struct VectorState {
    fill_tess: FillTessellator,
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<VectorVertex, u32>,
    buffer: Vec<f32>,
    max_vertices: usize,
    dropped: usize,
}

impl VectorState {
    pub fn new(max_vertices: usize) -> Self {
        Self {
            fill_tess: FillTessellator::new(),
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
            buffer: Vec::with_capacity(max_vertices.min(16384) * VectorVertex::FLOATS),
            max_vertices,
            dropped: 0,
        }
    }

    /// Start a new frame.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.dropped = 0;
    }

    pub fn vertex_count(&self) -> usize {
        self.buffer.len() / VectorVertex::FLOATS
    }

    /// Shapes dropped this frame for lack of room.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    /// Raw pointer to the flat float buffer, for the host to read.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    fn has_room(&mut self, vertices: usize) -> bool {
        if self.vertex_count() + vertices > self.max_vertices {
            self.dropped += 1;
            false
        } else {
            true
        }
    }

    fn push(&mut self, v: &VectorVertex) {
        self.buffer.extend_from_slice(bytemuck::cast_slice(std::slice::from_ref(v)));
    }

    /// Expand indexed lyon output into the triangle list.
    fn flush_geometry(&mut self) {
        let count = self.geometry.indices.len();
        if self.has_room(count) {
            for i in 0..count {
                let v = self.geometry.vertices[self.geometry.indices[i] as usize];
                self.push(&v);
            }
        }
        self.geometry.vertices.clear();
        self.geometry.indices.clear();
    }

    /// One triangle with a colour per corner. Used for gradients.
    pub fn fill_triangle_colored(&mut self, points: [Vec2; 3], colors: [VectorColor; 3]) {
        if !self.has_room(3) {
            return;
        }
        for (p, c) in points.into_iter().zip(colors) {
            self.push(&VectorVertex::at(p, c));
        }
    }

    /// Fill a closed polygon. Concave outlines are fine.
    pub fn fill_polygon(&mut self, points: &[Vec2], color: VectorColor) {
        if points.len() < 3 {
            return;
        }
        let path = polyline_path(points, true);
        self.fill_path(&path, color);
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: VectorColor) {
        if radius <= 0.0 {
            return;
        }
        let mut builder = Path::builder();
        builder.add_circle(point(center.x, center.y), radius, Winding::Positive);
        self.fill_path(&builder.build(), color);
    }

    pub fn fill_path(&mut self, path: &Path, color: VectorColor) {
        let result = self.fill_tess.tessellate_path(
            path,
            &FillOptions::tolerance(TOLERANCE),
            &mut BuffersBuilder::new(&mut self.geometry, SolidFill(color)),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => {
                log::debug!("vector: fill failed: {:?}", e);
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }

    /// Stroke an open polyline.
    pub fn stroke_polyline(&mut self, points: &[Vec2], width: f32, color: VectorColor) {
        if points.len() < 2 {
            return;
        }
        let path = polyline_path(points, false);
        self.stroke_path(&path, width, color);
    }

    pub fn stroke_path(&mut self, path: &Path, width: f32, color: VectorColor) {
        let result = self.stroke_tess.tessellate_path(
            path,
            &StrokeOptions::tolerance(TOLERANCE).with_line_width(width),
            &mut BuffersBuilder::new(&mut self.geometry, SolidStroke(color)),
        );
        match result {
            Ok(()) => self.flush_geometry(),
            Err(e) => {
                log::debug!("vector: stroke failed: {:?}", e);
                self.geometry.vertices.clear();
                self.geometry.indices.clear();
            }
        }
    }
}

fn polyline_path(points: &[Vec2], close: bool) -> Path {
    let mut builder = Path::builder();
    builder.begin(point(points[0].x, points[0].y));
    for p in &points[1..] {
        builder.line_to(point(p.x, p.y));
    }
    builder.end(close);
    builder.build()
}
