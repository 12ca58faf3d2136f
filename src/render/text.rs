use std::sync::Mutex;

use crate::foundation::error::{ShopframeError, ShopframeResult};

/// Measured extent of a single line of text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width.
    pub width: f64,
    /// Distance from the baseline to the top of the line box.
    pub ascent: f64,
}

/// Glyphs of one shaped run, positioned relative to the line's baseline origin.
#[derive(Clone, Debug)]
pub struct ShapedRun {
    /// Font used to rasterize the glyphs.
    pub font: vello_cpu::peniko::FontData,
    /// Size in pixels the run was shaped at.
    pub font_size: f32,
    /// Positioned glyphs, relative to the baseline origin.
    pub glyphs: Vec<vello_cpu::Glyph>,
}

/// One shaped line of text.
#[derive(Clone, Debug, Default)]
pub struct ShapedText {
    /// Line metrics.
    pub metrics: TextMetrics,
    /// Glyph runs in draw order.
    pub runs: Vec<ShapedRun>,
}

/// Measures and shapes single-line text at a pixel size.
///
/// Font registration is the implementor's concern; the compositor only asks for metrics and
/// glyph runs.
pub trait TextShaper: Send + Sync {
    /// Shape `text` at `size_px`.
    fn shape(&self, text: &str, size_px: f32) -> ShopframeResult<ShapedText>;

    /// Measure `text` at `size_px`.
    fn measure(&self, text: &str, size_px: f32) -> ShopframeResult<TextMetrics> {
        Ok(self.shape(text, size_px)?.metrics)
    }
}

/// Largest size reachable by stepping down one pixel at a time from `start` at which `text` fits
/// within `max_width`. Stops at 1 even if the text still overflows.
pub fn fit_font_size(
    shaper: &dyn TextShaper,
    text: &str,
    start: f32,
    max_width: f64,
) -> ShopframeResult<(f32, TextMetrics)> {
    if !start.is_finite() || start <= 0.0 {
        return Err(ShopframeError::render(format!(
            "font size must be finite and > 0, got {start}"
        )));
    }
    let mut size = start;
    loop {
        let metrics = shaper.measure(text, size)?;
        if metrics.width <= max_width || size <= 1.0 {
            return Ok((size, metrics));
        }
        size = (size - 1.0).max(1.0);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct TextBrush;

struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    family_name: String,
}

impl TextLayoutEngine {
    fn new(font_bytes: &[u8]) -> ShopframeResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ShopframeError::render("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ShopframeError::render("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    fn layout_line(&mut self, text: &str, size_px: f32) -> parley::Layout<TextBrush> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

/// [`TextShaper`] backed by `parley`, using one caller-supplied font.
pub struct ParleyShaper {
    font: vello_cpu::peniko::FontData,
    engine: Mutex<TextLayoutEngine>,
}

impl ParleyShaper {
    /// Register `font_bytes` (TTF/OTF) and build a shaper for it.
    pub fn new(font_bytes: Vec<u8>) -> ShopframeResult<Self> {
        let engine = TextLayoutEngine::new(&font_bytes)?;
        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            font,
            engine: Mutex::new(engine),
        })
    }
}

impl TextShaper for ParleyShaper {
    fn shape(&self, text: &str, size_px: f32) -> ShopframeResult<ShapedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ShopframeError::render(
                "text size_px must be finite and > 0",
            ));
        }
        let mut engine = self
            .engine
            .lock()
            .map_err(|_| ShopframeError::render("text layout engine lock poisoned"))?;
        let layout = engine.layout_line(text, size_px);

        let Some(line) = layout.lines().next() else {
            return Ok(ShapedText::default());
        };
        let baseline = line.metrics().baseline;
        let metrics = TextMetrics {
            width: f64::from(layout.width()),
            ascent: f64::from(line.metrics().ascent),
        };

        let mut runs = Vec::new();
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run
                .positioned_glyphs()
                .map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y - baseline,
                })
                .collect();
            runs.push(ShapedRun {
                font: self.font.clone(),
                font_size: run.run().font_size(),
                glyphs,
            });
        }
        Ok(ShapedText { metrics, runs })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
