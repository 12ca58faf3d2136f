use crate::catalog::model::{Banner, Entry, TileSize};
use crate::config::model::ShopConfig;
use crate::foundation::color::Rgba8;
use crate::foundation::error::ShopframeResult;
use crate::render::canvas::{Layer, composite_with_shadow, polygon};
use crate::render::paint::{ColorStop, linear_gradient, radial_gradient};
use crate::render::surface::Surface;
use crate::render::text::{TextShaper, fit_font_size};

/// Inputs fetched ahead of drawing one tile.
pub(crate) struct EntryInputs<'a> {
    pub(crate) image: &'a Surface,
    pub(crate) currency_icon: &'a Surface,
}

/// Draw one entry tile.
///
/// Back to front: radial background, shadowed item image, shadowed rarity wedge, the flat panel
/// with price and name, then the optional banner ribbon.
pub(crate) fn draw_entry(
    entry: &Entry,
    config: &ShopConfig,
    shaper: &dyn TextShaper,
    inputs: &EntryInputs<'_>,
) -> ShopframeResult<Surface> {
    let tile = &config.tile;
    let dims = config.tile_dims(entry.tile_size());
    let (w, h) = (f64::from(dims.width), f64::from(dims.height));
    let colors = config.rarity_colors(entry.rarity(), entry.series())?;

    let bg = &tile.background;
    let mut out = radial_gradient(
        dims.width,
        dims.height,
        (w / 2.0, h / 2.0),
        bg.inner_radius,
        h,
        &[
            ColorStop::new(0.0, bg.color_a),
            ColorStop::new(bg.gradient_stop, bg.color_b),
        ],
    )?;

    // Normal tiles fit the image to the tile height, the others to the width.
    let image = inputs.image;
    let scale = match entry.tile_size() {
        TileSize::Normal => h / f64::from(image.height()),
        TileSize::Small | TileSize::DoubleWide => w / f64::from(image.width()),
    };
    let (iw, ih) = (f64::from(image.width()) * scale, f64::from(image.height()) * scale);
    let mut layer = Layer::new(dims.width, dims.height)?;
    layer.draw_image(image, (w - iw) / 2.0, 0.0, iw, ih);
    composite_with_shadow(&mut out, &layer.finish()?, tile.shadow_blur, Rgba8::BLACK)?;

    let wedge = &tile.panel.rarity;
    let wedge_paint = linear_gradient(
        dims.width,
        dims.height,
        (0.0, h - wedge.height_a),
        (w, h - wedge.height_b),
        &[
            ColorStop::new(0.0, colors.secondary),
            ColorStop::new(0.3, colors.primary),
            ColorStop::new(1.0, colors.secondary),
        ],
    )?;
    let mut layer = Layer::new(dims.width, dims.height)?;
    layer.fill_path_with(
        &polygon(&[
            (w, h),
            (0.0, h),
            (0.0, h - wedge.height_a),
            (w, h - wedge.height_b),
        ]),
        &wedge_paint,
    );
    composite_with_shadow(&mut out, &layer.finish()?, tile.shadow_blur, Rgba8::BLACK)?;

    let panel = &tile.panel;
    let mut layer = Layer::new(dims.width, dims.height)?;
    layer.fill_path(
        &polygon(&[
            (w, h),
            (0.0, h),
            (0.0, h - panel.height_a),
            (w, h - panel.height_b),
        ]),
        panel.color,
    );

    let cur = &tile.currency;
    layer.draw_image(
        inputs.currency_icon,
        cur.offset_x,
        h - cur.size - cur.offset_y,
        cur.size,
        cur.size,
    );
    let price = shaper.shape(&entry.final_price().to_string(), cur.font_size)?;
    let baseline = h - cur.offset_y - (cur.size - price.metrics.ascent) / 2.0;
    layer.draw_text(
        &price,
        cur.color,
        kurbo::Affine::translate((cur.size + cur.offset_x, baseline)),
    );

    let name_cfg = &tile.name_text;
    let (name_size, _) = fit_font_size(
        shaper,
        entry.name(),
        name_cfg.default_font_size,
        w - 2.0 * name_cfg.offset_x,
    )?;
    let name = shaper.shape(entry.name(), name_size)?;
    layer.draw_text(
        &name,
        name_cfg.color,
        kurbo::Affine::translate((name_cfg.offset_x, h - name_cfg.offset_y)),
    );
    composite_with_shadow(&mut out, &layer.finish()?, 0.0, Rgba8::BLACK)?;

    if let Some(banner) = entry.banner() {
        draw_banner(&mut out, banner, config, shaper)?;
    }
    Ok(out)
}

/// Slanted ribbon anchored to the right edge, following the slope between `height_a` and
/// `height_b` and sized to its text.
fn draw_banner(
    out: &mut Surface,
    banner: &Banner,
    config: &ShopConfig,
    shaper: &dyn TextShaper,
) -> ShopframeResult<()> {
    let cfg = &config.tile.banner;
    let style = cfg.style(banner.intensity);
    let (w, h) = (f64::from(out.width()), f64::from(out.height()));
    let border = cfg.border_thickness;

    let ratio = cfg.height / f64::from(cfg.font_size);
    let (size, metrics) = fit_font_size(
        shaper,
        &banner.text,
        cfg.font_size,
        cfg.max_width * w - 2.0 * border,
    )?;
    let frac = metrics.width / w + 2.0 * border / w;
    let band = ratio * f64::from(size);
    let step = cfg.height_b - cfg.height_a;

    let x_min = w - frac * w + cfg.offset_x;
    let x_max = w + cfg.offset_x;
    let y_min = step / w * x_min + cfg.height_a;
    let y_max = step / w * x_max + cfg.height_a;
    let lean = step * band / w;

    let ribbon = polygon(&[
        (x_min, h - y_min),
        (x_min - lean, h - y_min - band),
        (x_max - lean, h - y_max - band),
        (x_max, h - y_max),
    ]);

    let mut fill = Layer::new(out.width(), out.height())?;
    fill.fill_path(&ribbon, style.color);
    composite_with_shadow(out, &fill.finish()?, cfg.shadow_blur, Rgba8::BLACK)?;

    let mut top = Layer::new(out.width(), out.height())?;
    top.stroke_path(&ribbon, style.border_color, border);
    let text = shaper.shape(&banner.text, size)?;
    let transform = kurbo::Affine::translate((x_min, h - y_min))
        * kurbo::Affine::rotate(-(step / w).atan())
        * kurbo::Affine::translate((border, -(band - metrics.ascent) / 2.0));
    top.draw_text(&text, style.text_color, transform);
    composite_with_shadow(out, &top.finish()?, 0.0, Rgba8::BLACK)
}

#[cfg(test)]
#[path = "../../tests/unit/render/entry.rs"]
mod tests;
