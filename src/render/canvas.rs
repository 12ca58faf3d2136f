use crate::foundation::color::Rgba8;
use crate::foundation::error::{ShopframeError, ShopframeResult};
use crate::foundation::math::shadow_kernel;
use crate::render::blur::blur_alpha;
use crate::render::composite::tint_alpha;
use crate::render::surface::Surface;
use crate::render::text::ShapedText;

/// Transparent drawing layer backed by a `vello_cpu` context.
///
/// Everything drawn on one layer is rasterized together by [`Layer::finish`] and then composited
/// onto a surface, optionally with a drop shadow.
pub(crate) struct Layer {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
}

impl Layer {
    pub(crate) fn new(width: u32, height: u32) -> ShopframeResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| ShopframeError::render("layer width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| ShopframeError::render("layer height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(ShopframeError::render("layer must be non-empty"));
        }
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            width: w,
            height: h,
        })
    }

    /// Fill a path with a solid colour.
    pub(crate) fn fill_path(&mut self, path: &kurbo::BezPath, color: Rgba8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color.to_peniko());
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Fill a path with a pre-rasterized paint surface laid over the layer at the origin.
    pub(crate) fn fill_path_with(&mut self, path: &kurbo::BezPath, paint: &Surface) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint.to_image_paint());
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Stroke a path with a solid colour.
    pub(crate) fn stroke_path(&mut self, path: &kurbo::BezPath, color: Rgba8, width: f64) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color.to_peniko());
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }

    /// Draw `image` scaled into the rectangle `(x, y, width, height)`.
    pub(crate) fn draw_image(&mut self, image: &Surface, x: f64, y: f64, width: f64, height: f64) {
        let sx = width / f64::from(image.width());
        let sy = height / f64::from(image.height());
        let transform = kurbo::Affine::translate((x, y)) * kurbo::Affine::scale_non_uniform(sx, sy);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(image.to_image_paint());
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width()),
            f64::from(image.height()),
        ));
    }

    /// Draw shaped text with its baseline origin mapped through `transform`.
    pub(crate) fn draw_text(&mut self, text: &ShapedText, color: Rgba8, transform: kurbo::Affine) {
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color.to_peniko());
        for run in &text.runs {
            self.ctx
                .glyph_run(&run.font)
                .font_size(run.font_size)
                .fill_glyphs(run.glyphs.iter().copied());
        }
    }

    /// Rasterize everything drawn so far.
    pub(crate) fn finish(mut self) -> ShopframeResult<Surface> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        Surface::from_pixmap(&pixmap)
    }
}

/// Composite `layer` onto `dst` at the origin, first laying down a blurred silhouette of the
/// layer in `shadow_color` when `shadow_blur > 0`.
pub(crate) fn composite_with_shadow(
    dst: &mut Surface,
    layer: &Surface,
    shadow_blur: f64,
    shadow_color: Rgba8,
) -> ShopframeResult<()> {
    if let Some((radius, sigma)) = shadow_kernel(shadow_blur) {
        let alpha: Vec<u8> = layer.data().chunks_exact(4).map(|px| px[3]).collect();
        let blurred = blur_alpha(&alpha, layer.width(), layer.height(), radius, sigma)?;
        let shadow = Surface::from_premul(
            layer.width(),
            layer.height(),
            tint_alpha(&blurred, shadow_color.to_premul()),
        )?;
        dst.draw_surface(&shadow, 0, 0);
    }
    dst.draw_surface(layer, 0, 0);
    Ok(())
}

fn affine_to_cpu(a: kurbo::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Closed polygon through `points`.
pub(crate) fn polygon(points: &[(f64, f64)]) -> kurbo::BezPath {
    let mut path = kurbo::BezPath::new();
    let mut iter = points.iter();
    if let Some(&first) = iter.next() {
        path.move_to(first);
        for &p in iter {
            path.line_to(p);
        }
        path.close_path();
    }
    path
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
