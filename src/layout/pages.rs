use crate::catalog::model::{Shop, TileSize};
use crate::config::model::{ShopConfig, SmartPagesConfig};
use crate::foundation::error::{ShopframeError, ShopframeResult};
use crate::layout::tiles::section_width;

/// How sections are split across pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Pagination {
    /// Number of pages, at least 1.
    pub num_pages: usize,
    /// Sections on every page but the last.
    pub per_page: usize,
    /// Sections on the last page.
    pub last_page_count: usize,
}

/// Smart pagination.
///
/// At or below `activate_threshold` sections everything lands on one page. Otherwise
/// `sections_per_page` grows from its configured start until the page count is within
/// `max_pages` and the last page holds at least `min_sections_per_page` sections (an even split
/// counts as a full last page). Once a single page would hold every section, growing further
/// cannot change the outcome, so an unsatisfiable configuration fails instead of looping.
pub fn paginate(num_sections: usize, config: &SmartPagesConfig) -> ShopframeResult<Pagination> {
    if num_sections <= config.activate_threshold {
        return Ok(Pagination {
            num_pages: 1,
            per_page: num_sections,
            last_page_count: num_sections,
        });
    }
    if config.sections_per_page == 0 {
        return Err(ShopframeError::config(
            "smart_pages.sections_per_page must be >= 1",
        ));
    }

    let mut per_page = config.sections_per_page;
    loop {
        let num_pages = num_sections.div_ceil(per_page);
        let rem = num_sections % per_page;
        let last_page_count = if rem == 0 { per_page } else { rem };

        if num_pages <= config.max_pages && last_page_count >= config.min_sections_per_page {
            return Ok(Pagination {
                num_pages,
                per_page,
                last_page_count,
            });
        }
        if per_page >= num_sections {
            return Err(ShopframeError::config(format!(
                "no pagination of {num_sections} sections satisfies max_pages={} and \
                 min_sections_per_page={}",
                config.max_pages, config.min_sections_per_page
            )));
        }
        per_page += 1;
    }
}

/// Split `items` into consecutive pages following `pagination`.
pub fn assign_pages<'a, T>(
    items: &'a [T],
    pagination: &Pagination,
) -> ShopframeResult<Vec<&'a [T]>> {
    let full = pagination.num_pages.saturating_sub(1);
    let expected = full * pagination.per_page + pagination.last_page_count;
    if pagination.num_pages == 0 || expected != items.len() {
        return Err(ShopframeError::validation(format!(
            "pagination {pagination:?} does not cover {} sections",
            items.len()
        )));
    }

    let mut pages = Vec::with_capacity(pagination.num_pages);
    let mut rest = items;
    for i in 0..pagination.num_pages {
        let take = if i == full {
            pagination.last_page_count
        } else {
            pagination.per_page
        };
        let (page, tail) = rest.split_at(take);
        pages.push(page);
        rest = tail;
    }
    Ok(pages)
}

/// Height of one section slot: a normal tile, a gap above and below, and the title band.
pub fn section_height(config: &ShopConfig) -> u32 {
    config.tile_dims(TileSize::Normal).height + 2 * config.tile.gap + config.section_title.band_height
}

/// Height of a page holding `sections` section slots.
pub fn page_height(sections: usize, config: &ShopConfig) -> u32 {
    sections as u32 * section_height(config) + 2 * config.tile.gap
}

/// Page geometry shared by every page of one shop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PageGeometry {
    /// Uniform page width.
    pub width: u32,
    /// Height of one section slot.
    pub section_height: u32,
    /// Page count and sections per page.
    pub pagination: Pagination,
}

impl PageGeometry {
    /// Compute width, slot height and pagination for `shop`.
    pub fn for_shop(shop: &Shop, config: &ShopConfig) -> ShopframeResult<Self> {
        Ok(Self {
            width: section_width(shop, config),
            section_height: section_height(config),
            pagination: paginate(shop.sections().len(), &config.smart_pages)?,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/pages.rs"]
mod tests;
