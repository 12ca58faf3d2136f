use crate::config::model::ShopConfig;
use crate::foundation::error::{ShopframeError, ShopframeResult};
use crate::render::canvas::Layer;
use crate::render::surface::Surface;
use crate::render::text::{TextShaper, fit_font_size};

/// Page-number label, 1-based.
pub(crate) fn page_label(index: usize, total: usize) -> String {
    format!("{} / {}", index + 1, total)
}

/// Draw one page: background, one section per row, and the centred page number in the bottom
/// margin. `None` rows are left as background.
pub(crate) fn draw_page(
    config: &ShopConfig,
    shaper: &dyn TextShaper,
    index: usize,
    total: usize,
    width: u32,
    section_height: u32,
    sections: &[Option<&Surface>],
) -> ShopframeResult<Surface> {
    let rows = u32::try_from(sections.len())
        .map_err(|_| ShopframeError::render("too many sections on one page"))?;
    let height = rows
        .checked_mul(section_height)
        .and_then(|h| h.checked_add(2 * config.tile.gap))
        .ok_or_else(|| ShopframeError::render("page height overflows"))?;

    let mut out = Surface::new(width, height)?;
    out.fill(config.page.background_color);
    let mut y = 0i64;
    for section in sections {
        if let Some(section) = section {
            out.draw_surface(section, 0, y);
        }
        y += i64::from(section_height);
    }

    let label = page_label(index, total);
    let (size, metrics) = fit_font_size(
        shaper,
        &label,
        config.page.number_font_size,
        f64::from(width),
    )?;
    let text = shaper.shape(&label, size)?;
    let x = (f64::from(width) - metrics.width) / 2.0;
    let baseline = f64::from(height) - (3.0 * f64::from(config.tile.gap) - metrics.ascent) / 2.0;
    let mut layer = Layer::new(width, height)?;
    layer.draw_text(
        &text,
        config.page.number_color,
        kurbo::Affine::translate((x, baseline)),
    );
    out.draw_surface(&layer.finish()?, 0, 0);
    Ok(out)
}
