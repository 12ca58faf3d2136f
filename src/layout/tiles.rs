use crate::catalog::model::{Section, Shop, TileSize};
use crate::config::model::ShopConfig;

/// Top-left corner of a tile inside the section's tile area (below the title band).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TilePos {
    /// Left edge within the section.
    pub x: u32,
    /// Top edge below the title band.
    pub y: u32,
}

/// Tile positions parallel to `section.entries()`.
///
/// Tiles run left to right starting at `(gap, gap)`. Two consecutive small tiles share one slot,
/// the second stacked below the first; the cursor advances once the pair completes. A normal or
/// double-wide tile that interrupts a half-filled small slot closes that slot first.
pub fn tile_coordinates(section: &Section, config: &ShopConfig) -> Vec<TilePos> {
    walk(section, config).0
}

/// Horizontal extent of one section, including the trailing gap.
pub fn section_extent(section: &Section, config: &ShopConfig) -> u32 {
    walk(section, config).1
}

/// Uniform page width: the widest section's extent, or 0 for a shop without sections.
pub fn section_width(shop: &Shop, config: &ShopConfig) -> u32 {
    shop.sections()
        .iter()
        .map(|s| section_extent(s, config))
        .max()
        .unwrap_or(0)
}

fn walk(section: &Section, config: &ShopConfig) -> (Vec<TilePos>, u32) {
    let gap = config.tile.gap;
    let small = config.tile_dims(TileSize::Small);

    let mut coords = Vec::with_capacity(section.entries().len());
    let mut x = gap;
    let mut pending_small = false;

    for entry in section.entries() {
        match entry.tile_size() {
            TileSize::Small if pending_small => {
                coords.push(TilePos {
                    x,
                    y: gap + small.height + gap,
                });
                x += small.width + gap;
                pending_small = false;
            }
            TileSize::Small => {
                coords.push(TilePos { x, y: gap });
                pending_small = true;
            }
            size => {
                if pending_small {
                    x += small.width + gap;
                    pending_small = false;
                }
                coords.push(TilePos { x, y: gap });
                x += config.tile_dims(size).width + gap;
            }
        }
    }
    if pending_small {
        x += small.width + gap;
    }
    (coords, x)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/tiles.rs"]
mod tests;
