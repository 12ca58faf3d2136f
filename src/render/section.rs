use crate::catalog::model::Section;
use crate::config::model::ShopConfig;
use crate::foundation::error::{ShopframeError, ShopframeResult};
use crate::layout::tiles::tile_coordinates;
use crate::render::canvas::Layer;
use crate::render::surface::Surface;
use crate::render::text::{TextShaper, fit_font_size};

/// Draw a section: its title in the band at the top, then each tile at its layout position.
///
/// `tiles` is parallel to `section.entries()`; `None` slots are left empty.
pub(crate) fn draw_section(
    section: &Section,
    config: &ShopConfig,
    shaper: &dyn TextShaper,
    width: u32,
    height: u32,
    tiles: &[Option<&Surface>],
) -> ShopframeResult<Surface> {
    if tiles.len() != section.entries().len() {
        return Err(ShopframeError::validation(format!(
            "section '{}' has {} entries but {} tiles were supplied",
            section.id(),
            section.entries().len(),
            tiles.len()
        )));
    }

    let mut out = Surface::new(width, height)?;
    let title_cfg = &config.section_title;
    let (size, _) = fit_font_size(shaper, section.name(), title_cfg.font_size, f64::from(width))?;
    let title = shaper.shape(section.name(), size)?;
    let mut layer = Layer::new(width, height)?;
    layer.draw_text(
        &title,
        title_cfg.color,
        kurbo::Affine::translate((f64::from(config.tile.gap), title_cfg.text_offset)),
    );
    out.draw_surface(&layer.finish()?, 0, 0);

    let band = i64::from(title_cfg.band_height);
    for (pos, tile) in tile_coordinates(section, config).iter().zip(tiles) {
        if let Some(tile) = tile {
            out.draw_surface(tile, i64::from(pos.x), i64::from(pos.y) + band);
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/section.rs"]
mod tests;
