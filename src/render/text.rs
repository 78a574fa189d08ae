//! Labels and captions through glyphon, drawn above all geometry.

use fontdb::{Database, Family, Query};
use glyphon::{
    Attrs, Buffer, Cache, Color, FamilyOwned, FontSystem, Metrics, Resolution, Shaping, SwashCache,
    TextArea, TextAtlas, TextBounds, TextRenderer, Viewport,
};
use tracing::warn;
use winit::dpi::PhysicalSize;

use crate::render::batch::TextItem;
use crate::scene::Anchor;

const FALLBACK_FAMILY: &str = "DejaVu Sans";

struct PlacedText {
    buffer: Buffer,
    left: f32,
    top: f32,
    color: Color,
}

pub struct TextLayer {
    _cache: Cache,
    viewport: Viewport,
    atlas: TextAtlas,
    renderer: TextRenderer,
    font_system: FontSystem,
    swash_cache: SwashCache,
    family: FamilyOwned,
    placed: Vec<PlacedText>,
}

impl TextLayer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        font: Option<&str>,
    ) -> Self {
        let mut font_system = FontSystem::new();
        font_system.db_mut().load_system_fonts();
        let family = resolve_family(font_system.db(), font);

        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, format);
        let renderer =
            TextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);

        Self {
            _cache: cache,
            viewport,
            atlas,
            renderer,
            font_system,
            swash_cache: SwashCache::new(),
            family,
            placed: Vec::new(),
        }
    }

    /// Shape and upload this frame's texts. `scale` maps logical to window pixels.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: PhysicalSize<u32>,
        scale: (f32, f32),
        items: &[TextItem],
    ) {
        self.viewport.update(
            queue,
            Resolution {
                width: size.width,
                height: size.height,
            },
        );

        self.placed.clear();
        for item in items {
            let font_size = (item.size * scale.1).max(1.0);
            let mut buffer = Buffer::new(
                &mut self.font_system,
                Metrics::new(font_size, font_size * 1.2),
            );
            buffer.set_size(&mut self.font_system, None, None);
            let attrs = Attrs::new().family(self.family.as_family());
            buffer.set_text(&mut self.font_system, &item.text, &attrs, Shaping::Advanced, None);
            buffer.shape_until_scroll(&mut self.font_system, false);

            let (w, h) = measure(&buffer, font_size * 1.2);
            let x = item.at.x as f32 * scale.0;
            let y = item.at.y as f32 * scale.1;
            let (left, top) = match item.anchor {
                Anchor::TopLeft => (x, y),
                Anchor::Center => (x - w / 2.0, y - h / 2.0),
            };
            self.placed.push(PlacedText {
                buffer,
                left,
                top,
                color: Color::rgba(item.color.r, item.color.g, item.color.b, item.color.a),
            });
        }

        let bounds = TextBounds {
            left: 0,
            top: 0,
            right: size.width as i32,
            bottom: size.height as i32,
        };
        let areas = self.placed.iter().map(|t| TextArea {
            buffer: &t.buffer,
            left: t.left,
            top: t.top,
            scale: 1.0,
            bounds,
            default_color: t.color,
            custom_glyphs: &[],
        });
        if let Err(err) = self.renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            areas,
            &mut self.swash_cache,
        ) {
            warn!(error = %err, "text prepare failed");
        }
    }

    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.placed.is_empty() {
            return;
        }
        if let Err(err) = self.renderer.render(&self.atlas, &self.viewport, pass) {
            warn!(error = %err, "text render failed");
        }
    }

    pub fn trim(&mut self) {
        self.atlas.trim();
    }
}

fn measure(buffer: &Buffer, fallback_height: f32) -> (f32, f32) {
    let mut width: f32 = 0.0;
    let mut bottom: f32 = 0.0;
    for run in buffer.layout_runs() {
        width = width.max(run.line_w);
        bottom = bottom.max(run.line_top + run.line_height);
    }
    (width, bottom.max(fallback_height))
}

fn resolve_family(db: &Database, requested: Option<&str>) -> FamilyOwned {
    if let Some(name) = requested.map(str::trim).filter(|n| !n.is_empty()) {
        if font_available(db, name) {
            return FamilyOwned::Name(name.into());
        }
        warn!(font = %name, "configured font not found; falling back");
    }
    if font_available(db, FALLBACK_FAMILY) {
        FamilyOwned::Name(FALLBACK_FAMILY.into())
    } else {
        FamilyOwned::SansSerif
    }
}

fn font_available(db: &Database, name: &str) -> bool {
    let query = Query {
        families: &[Family::Name(name)],
        ..Default::default()
    };
    db.query(&query).is_some()
}
