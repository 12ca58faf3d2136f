//! shopframe renders item-shop catalogs into paginated raster images.
//!
//! A [`Shop`] is a list of [`Section`]s, each holding [`Entry`] tiles. Rendering is incremental
//! at every level:
//!
//! - Entry tiles and sections are cached under their content fingerprints, so unchanged work is
//!   read back instead of drawn.
//! - Pages are reused wholesale while the shop fingerprint matches the last complete render.
//! - Fan-out (entries, sections, pages) runs in parallel and tolerates individual failures.
//!
//! The entry point is [`ShopRenderer`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod cache;
mod catalog;
mod config;
mod foundation;
mod layout;
mod pipeline;
mod render;

pub use crate::foundation::color::Rgba8;
pub use crate::foundation::error::{ShopframeError, ShopframeResult};

pub use crate::catalog::fingerprint::sha256_hex;
pub use crate::catalog::model::{
    Banner, BannerIntensity, Entry, EntryBuilder, Introduction, Item, Rarity, Section, Series,
    Shop, TileSize,
};
pub use crate::catalog::source::{CatalogSource, JsonCatalogFile, shop_from_json_str};

pub use crate::cache::store::{ContentCache, TextEncoding, url_basename};

pub use crate::assets::decode::{decode_image, encode_png};
pub use crate::assets::source::{AssetSource, HttpAssetSource};

pub use crate::config::model::{
    BackgroundConfig, BannerConfig, BannerStyle, CurrencyConfig, NameTextConfig, PageConfig,
    PanelConfig, RarityColors, RarityWedgeConfig, SectionTitleConfig, ShopConfig,
    SmartPagesConfig, TileConfig, TileDims, TileSizes,
};

pub use crate::layout::pages::{
    PageGeometry, Pagination, assign_pages, page_height, paginate, section_height,
};
pub use crate::layout::tiles::{TilePos, section_extent, section_width, tile_coordinates};

pub use crate::render::compositor::{Compositor, RenderStats, Rendered};
pub use crate::render::surface::Surface;
pub use crate::render::text::{
    ParleyShaper, ShapedRun, ShapedText, TextMetrics, TextShaper, fit_font_size,
};

pub use crate::pipeline::orchestrator::{
    LAST_SHOP_MARKER, RenderedShop, RendererOptions, ShopRenderer, page_cache_name,
};
pub use crate::pipeline::settle::settle_all;
