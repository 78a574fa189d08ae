//! Turns a [`Frame`] into indexed triangles grouped by texture.
//!
//! Solid shapes sample the 1x1 white texture, so a single pipeline draws
//! everything. Text is passed through untouched for glyphon.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use lyon::math::{Box2D, point};
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, StrokeOptions, StrokeTessellator,
    StrokeVertex, VertexBuffers,
};
use palette::Srgba;
use tracing::warn;

use crate::geometry::{Flip, Point, Rect, Rgba};
use crate::scene::{Anchor, DrawCommand, Frame, TextureKey};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Logical screen pixels; the shader maps them to clip space.
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub texture: TextureKey,
    pub indices: Range<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub at: Point,
    pub size: f32,
    pub color: Rgba,
    pub anchor: Anchor,
}

#[derive(Debug, Default)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub batches: Vec<Batch>,
    pub texts: Vec<TextItem>,
}

/// Convert an sRGB colour to the linear floats the blend stage expects.
pub fn linear(c: Rgba) -> [f32; 4] {
    let srgb: Srgba<f32> = Srgba::new(c.r, c.g, c.b, c.a).into_format();
    let lin = srgb.into_linear();
    [lin.red, lin.green, lin.blue, lin.alpha]
}

#[allow(clippy::cast_precision_loss)]
fn corner(x: i32, y: i32) -> [f32; 2] {
    [x as f32, y as f32]
}

impl Geometry {
    pub fn build(frame: &Frame) -> Self {
        let mut out = Self::default();
        for cmd in frame.commands() {
            match cmd {
                DrawCommand::Texture {
                    key,
                    dst,
                    flip,
                    tint,
                } => out.quad(key, *dst, *flip, *tint),
                DrawCommand::FillRect { rect, color } => {
                    out.quad(&TextureKey::White, *rect, Flip::NONE, *color);
                }
                DrawCommand::OutlineRect {
                    rect,
                    thickness,
                    color,
                } => out.outline(*rect, *thickness, *color),
                DrawCommand::Line {
                    from,
                    to,
                    width,
                    color,
                } => out.line(*from, *to, *width, *color),
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                } => out.circle(*center, *radius, *color),
                DrawCommand::Text {
                    text,
                    at,
                    size,
                    color,
                    anchor,
                } => out.texts.push(TextItem {
                    text: text.clone(),
                    at: *at,
                    size: *size,
                    color: *color,
                    anchor: *anchor,
                }),
            }
        }
        out
    }

    fn quad(&mut self, key: &TextureKey, dst: Rect, flip: Flip, tint: Rgba) {
        if dst.w <= 0 || dst.h <= 0 {
            return;
        }
        let (u0, u1) = if flip.horizontal { (1.0, 0.0) } else { (0.0, 1.0) };
        let (v0, v1) = if flip.vertical { (1.0, 0.0) } else { (0.0, 1.0) };
        let color = linear(tint);
        let base = self.base_index();
        self.vertices.extend_from_slice(&[
            Vertex {
                position: corner(dst.x, dst.y),
                uv: [u0, v0],
                color,
            },
            Vertex {
                position: corner(dst.right(), dst.y),
                uv: [u1, v0],
                color,
            },
            Vertex {
                position: corner(dst.right(), dst.bottom()),
                uv: [u1, v1],
                color,
            },
            Vertex {
                position: corner(dst.x, dst.bottom()),
                uv: [u0, v1],
                color,
            },
        ]);
        self.push_indices(
            key,
            [0, 1, 2, 0, 2, 3].into_iter().map(|i| base + i),
        );
    }

    #[allow(clippy::cast_precision_loss)]
    fn outline(&mut self, rect: Rect, thickness: f32, color: Rgba) {
        let mut buffers = VertexBuffers::new();
        let rect = Box2D::new(
            point(rect.x as f32, rect.y as f32),
            point(rect.right() as f32, rect.bottom() as f32),
        );
        let result = StrokeTessellator::new().tessellate_rectangle(
            &rect,
            &StrokeOptions::default().with_line_width(thickness),
            &mut BuffersBuilder::new(&mut buffers, |v: StrokeVertex| v.position().to_array()),
        );
        if let Err(err) = result {
            warn!(error = ?err, "outline tessellation failed");
            return;
        }
        self.append_solid(&buffers, color);
    }

    #[allow(clippy::cast_precision_loss)]
    fn line(&mut self, from: Point, to: Point, width: f32, color: Rgba) {
        let mut builder = Path::builder();
        builder.begin(point(from.x as f32, from.y as f32));
        builder.line_to(point(to.x as f32, to.y as f32));
        builder.end(false);
        let path = builder.build();

        let mut buffers = VertexBuffers::new();
        let result = StrokeTessellator::new().tessellate_path(
            &path,
            &StrokeOptions::default().with_line_width(width),
            &mut BuffersBuilder::new(&mut buffers, |v: StrokeVertex| v.position().to_array()),
        );
        if let Err(err) = result {
            warn!(error = ?err, "line tessellation failed");
            return;
        }
        self.append_solid(&buffers, color);
    }

    #[allow(clippy::cast_precision_loss)]
    fn circle(&mut self, center: Point, radius: f32, color: Rgba) {
        let mut buffers = VertexBuffers::new();
        let result = FillTessellator::new().tessellate_circle(
            point(center.x as f32, center.y as f32),
            radius,
            &FillOptions::default(),
            &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| v.position().to_array()),
        );
        if let Err(err) = result {
            warn!(error = ?err, "circle tessellation failed");
            return;
        }
        self.append_solid(&buffers, color);
    }

    fn append_solid(&mut self, buffers: &VertexBuffers<[f32; 2], u32>, color: Rgba) {
        if buffers.indices.is_empty() {
            return;
        }
        let color = linear(color);
        let base = self.base_index();
        self.vertices
            .extend(buffers.vertices.iter().map(|&position| Vertex {
                position,
                uv: [0.5, 0.5],
                color,
            }));
        self.push_indices(
            &TextureKey::White,
            buffers.indices.iter().map(|&i| base + i),
        );
    }

    #[allow(clippy::cast_possible_truncation)]
    fn base_index(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Append indices, extending the last batch when the texture matches.
    #[allow(clippy::cast_possible_truncation)]
    fn push_indices(&mut self, key: &TextureKey, indices: impl Iterator<Item = u32>) {
        let start = self.indices.len() as u32;
        self.indices.extend(indices);
        let end = self.indices.len() as u32;
        match self.batches.last_mut() {
            Some(last) if last.texture == *key && last.indices.end == start => {
                last.indices.end = end;
            }
            _ => self.batches.push(Batch {
                texture: key.clone(),
                indices: start..end,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Asset;

    #[test]
    fn quad_with_flip() {
        let mut frame = Frame::new();
        frame.textured(
            TextureKey::Asset(Asset::Arrow),
            Rect::new(10, 20, 30, 40),
            Flip::HORIZONTAL,
            Rgba::WHITE,
        );
        let g = Geometry::build(&frame);
        assert_eq!(g.vertices.len(), 4);
        assert_eq!(g.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(g.vertices[0].position, [10.0, 20.0]);
        assert_eq!(g.vertices[0].uv, [1.0, 0.0]);
        assert_eq!(g.vertices[2].position, [40.0, 60.0]);
        assert_eq!(g.vertices[2].uv, [0.0, 1.0]);
        assert!(g.vertices[0].color.iter().all(|c| (c - 1.0).abs() < 1e-4));
    }

    #[test]
    fn solid_shapes_share_one_batch() {
        let mut frame = Frame::new();
        frame.fill_rect(Rect::new(0, 0, 10, 10), Rgba::RED);
        frame.outline_rect(Rect::new(0, 0, 10, 10), 2.0, Rgba::YELLOW);
        frame.circle(Point::new(5, 5), 3.0, Rgba::GREEN);
        frame.line(Point::new(0, 0), Point::new(9, 9), 1.0, Rgba::WHITE);
        let g = Geometry::build(&frame);
        assert_eq!(g.batches.len(), 1);
        assert_eq!(g.batches[0].texture, TextureKey::White);
        assert_eq!(g.batches[0].indices, 0..g.indices.len() as u32);
        assert!(g.indices.iter().all(|&i| (i as usize) < g.vertices.len()));
    }

    #[test]
    fn texture_switch_starts_new_batch_and_text_is_separate() {
        let mut frame = Frame::new();
        frame.fill_rect(Rect::new(0, 0, 10, 10), Rgba::RED);
        frame.texture(TextureKey::Black, Rect::new(0, 0, 10, 10));
        frame.text("Album", Point::new(1, 1), 20.0, Rgba::WHITE, Anchor::TopLeft);
        frame.fill_rect(Rect::new(0, 0, 10, 10), Rgba::RED);
        frame.fill_rect(Rect::new(0, 0, 0, 10), Rgba::RED);
        let g = Geometry::build(&frame);
        assert_eq!(g.batches.len(), 3);
        assert_eq!(g.texts.len(), 1);
        assert_eq!(g.vertices.len(), 12);
    }
}
