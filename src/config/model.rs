use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;

use crate::catalog::model::{BannerIntensity, Rarity, Series, TileSize};
use crate::foundation::color::Rgba8;
use crate::foundation::error::{ShopframeError, ShopframeResult};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Complete drawing and pagination configuration.
///
/// Loaded once and owned by the renderer; layout and compositor calls receive it by reference.
/// Every section falls back to its default when omitted from the JSON document.
pub struct ShopConfig {
    /// Tile geometry and decoration.
    pub tile: TileConfig,
    /// Section title band.
    pub section_title: SectionTitleConfig,
    /// Page background and page-number label.
    pub page: PageConfig,
    /// Smart pagination thresholds.
    pub smart_pages: SmartPagesConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Pixel dimensions of one tile size class.
pub struct TileDims {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Dimensions per [`TileSize`].
pub struct TileSizes {
    /// Full-height tile.
    pub normal: TileDims,
    /// Half-height tile; two stack in one slot.
    pub small: TileDims,
    /// Double-width tile.
    pub double_wide: TileDims,
}

impl Default for TileSizes {
    fn default() -> Self {
        Self {
            normal: TileDims {
                width: 320,
                height: 480,
            },
            small: TileDims {
                width: 320,
                height: 234,
            },
            double_wide: TileDims {
                width: 652,
                height: 480,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Everything drawn on a single entry tile.
pub struct TileConfig {
    /// Spacing between tiles and around the section edge.
    pub gap: u32,
    /// Dimensions per tile size.
    pub size: TileSizes,
    /// Radial background gradient.
    pub background: BackgroundConfig,
    /// Blur of the black drop shadow under the item image and the rarity wedge.
    pub shadow_blur: f64,
    /// Bottom panel wedges.
    pub panel: PanelConfig,
    /// Currency icon and price text.
    pub currency: CurrencyConfig,
    /// Entry name text.
    pub name_text: NameTextConfig,
    /// Diagonal banner ribbon.
    pub banner: BannerConfig,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            gap: 12,
            size: TileSizes::default(),
            background: BackgroundConfig::default(),
            shadow_blur: 12.0,
            panel: PanelConfig::default(),
            currency: CurrencyConfig::default(),
            name_text: NameTextConfig::default(),
            banner: BannerConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Radial gradient centred on the tile, from `color_a` at `inner_radius` to `color_b` at
/// `gradient_stop` of the tile height.
pub struct BackgroundConfig {
    /// Colour at the centre.
    pub color_a: Rgba8,
    /// Colour toward the edge.
    pub color_b: Rgba8,
    /// Position of `color_b` along the gradient, in `(0, 1]`.
    pub gradient_stop: f64,
    /// Radius of the inner circle in pixels.
    pub inner_radius: f64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            color_a: Rgba8::rgb(0x3c, 0x8c, 0xe6),
            color_b: Rgba8::rgb(0x12, 0x2a, 0x5c),
            gradient_stop: 1.0,
            inner_radius: 50.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Two-colour pair for a rarity or series.
pub struct RarityColors {
    /// Bright middle stop of the wedge gradient.
    pub primary: Rgba8,
    /// Outer stops of the wedge gradient.
    pub secondary: Rgba8,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Rarity wedge geometry and colour table.
pub struct RarityWedgeConfig {
    /// Wedge height at the left edge.
    pub height_a: f64,
    /// Wedge height at the right edge.
    pub height_b: f64,
    /// Colour pairs keyed by rarity or series name.
    pub colors: BTreeMap<String, RarityColors>,
}

impl Default for RarityWedgeConfig {
    fn default() -> Self {
        let pair = |p: Rgba8, s: Rgba8| RarityColors {
            primary: p,
            secondary: s,
        };
        let mut colors = BTreeMap::new();
        for (key, primary, secondary) in [
            ("Common", Rgba8::rgb(0xbe, 0xbe, 0xbe), Rgba8::rgb(0x64, 0x64, 0x64)),
            ("Uncommon", Rgba8::rgb(0x69, 0xbb, 0x1e), Rgba8::rgb(0x17, 0x5c, 0x00)),
            ("Rare", Rgba8::rgb(0x2c, 0xc3, 0xff), Rgba8::rgb(0x14, 0x3f, 0x77)),
            ("Epic", Rgba8::rgb(0xc3, 0x59, 0xff), Rgba8::rgb(0x4b, 0x24, 0x83)),
            ("Legendary", Rgba8::rgb(0xea, 0x8d, 0x23), Rgba8::rgb(0x78, 0x37, 0x1d)),
            ("Mythic", Rgba8::rgb(0xff, 0xdd, 0x00), Rgba8::rgb(0x9c, 0x6b, 0x00)),
            ("Exotic", Rgba8::rgb(0x76, 0xd6, 0xe3), Rgba8::rgb(0x1d, 0x6b, 0x78)),
            ("MarvelSeries", Rgba8::rgb(0xd7, 0x35, 0x35), Rgba8::rgb(0x76, 0x1b, 0x1b)),
            ("DCSeries", Rgba8::rgb(0x54, 0x75, 0xc7), Rgba8::rgb(0x24, 0x34, 0x61)),
            ("ShadowSeries", Rgba8::rgb(0x71, 0x71, 0x71), Rgba8::rgb(0x19, 0x19, 0x19)),
            ("LavaSeries", Rgba8::rgb(0xf3, 0x9d, 0x09), Rgba8::rgb(0x9b, 0x12, 0x2d)),
            ("FrozenSeries", Rgba8::rgb(0xc4, 0xdf, 0xf7), Rgba8::rgb(0x5a, 0x9c, 0xd4)),
        ] {
            colors.insert(key.to_string(), pair(primary, secondary));
        }
        Self {
            height_a: 120.0,
            height_b: 150.0,
            colors,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Solid panel wedge drawn over the rarity wedge.
pub struct PanelConfig {
    /// Panel height at the left edge.
    pub height_a: f64,
    /// Panel height at the right edge.
    pub height_b: f64,
    /// Panel fill.
    pub color: Rgba8,
    /// Rarity wedge below the panel.
    pub rarity: RarityWedgeConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            height_a: 112.0,
            height_b: 140.0,
            color: Rgba8::rgb(0x0e, 0x0e, 0x14),
            rarity: RarityWedgeConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Currency icon and price label.
pub struct CurrencyConfig {
    /// Resource name passed to the asset source.
    pub icon: String,
    /// Icon edge length.
    pub size: f64,
    /// Icon offset from the left edge.
    pub offset_x: f64,
    /// Icon offset from the bottom edge.
    pub offset_y: f64,
    /// Fixed price font size.
    pub font_size: f32,
    /// Price text colour.
    pub color: Rgba8,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            icon: "vbuck.png".to_string(),
            size: 40.0,
            offset_x: 12.0,
            offset_y: 12.0,
            font_size: 36.0,
            color: Rgba8::rgb(0xe6, 0xe6, 0xe6),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Entry name label.
pub struct NameTextConfig {
    /// Name offset from the left edge.
    pub offset_x: f64,
    /// Baseline distance from the tile bottom.
    pub offset_y: f64,
    /// Starting size for the font-fit search.
    pub default_font_size: f32,
    /// Name text colour.
    pub color: Rgba8,
}

impl Default for NameTextConfig {
    fn default() -> Self {
        Self {
            offset_x: 12.0,
            offset_y: 68.0,
            default_font_size: 40.0,
            color: Rgba8::WHITE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Colours of one banner intensity.
pub struct BannerStyle {
    /// Ribbon fill.
    pub color: Rgba8,
    /// Ribbon border colour.
    pub border_color: Rgba8,
    /// Banner text colour.
    pub text_color: Rgba8,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Diagonal banner ribbon.
pub struct BannerConfig {
    /// Ribbon baseline height at the tile's left edge.
    pub height_a: f64,
    /// Ribbon baseline height at the tile's right edge.
    pub height_b: f64,
    /// Ribbon thickness at `font_size`; scales with the fitted size.
    pub height: f64,
    /// Starting size for the font-fit search.
    pub font_size: f32,
    /// Maximum ribbon width as a fraction of the tile width, in `(0, 1]`.
    pub max_width: f64,
    /// Ribbon border width in pixels.
    pub border_thickness: f64,
    /// Horizontal shift of the ribbon.
    pub offset_x: f64,
    /// Ribbon shadow blur.
    pub shadow_blur: f64,
    /// Style for low-intensity banners.
    pub low: BannerStyle,
    /// Style for high-intensity banners.
    pub high: BannerStyle,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            height_a: 420.0,
            height_b: 440.0,
            height: 40.0,
            font_size: 28.0,
            max_width: 0.8,
            border_thickness: 3.0,
            offset_x: 0.0,
            shadow_blur: 8.0,
            low: BannerStyle {
                color: Rgba8::rgb(0x1d, 0x2a, 0x4d),
                border_color: Rgba8::rgb(0x0b, 0x12, 0x26),
                text_color: Rgba8::WHITE,
            },
            high: BannerStyle {
                color: Rgba8::rgb(0xff, 0xe6, 0x1e),
                border_color: Rgba8::rgb(0xc8, 0x8c, 0x00),
                text_color: Rgba8::rgb(0x1a, 0x1a, 0x1a),
            },
        }
    }
}

impl BannerConfig {
    /// Colours for `intensity`.
    pub fn style(&self, intensity: BannerIntensity) -> &BannerStyle {
        match intensity {
            BannerIntensity::Low => &self.low,
            BannerIntensity::High => &self.high,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Section title band above the tiles.
pub struct SectionTitleConfig {
    /// Starting size for the font-fit search.
    pub font_size: f32,
    /// Title baseline from the section top.
    pub text_offset: f64,
    /// Height reserved above the tiles.
    pub band_height: u32,
    /// Title text colour.
    pub color: Rgba8,
}

impl Default for SectionTitleConfig {
    fn default() -> Self {
        Self {
            font_size: 56.0,
            text_offset: 64.0,
            band_height: 72,
            color: Rgba8::WHITE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Page background and page-number label.
pub struct PageConfig {
    /// Page background.
    pub background_color: Rgba8,
    /// Starting size for the page-number font-fit search.
    pub number_font_size: f32,
    /// Page-number text colour.
    pub number_color: Rgba8,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            background_color: Rgba8::rgb(0x14, 0x1e, 0x3c),
            number_font_size: 24.0,
            number_color: Rgba8::WHITE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Smart pagination thresholds.
pub struct SmartPagesConfig {
    /// At or below this many sections everything goes on one page.
    pub activate_threshold: usize,
    /// Starting sections-per-page for the search.
    pub sections_per_page: usize,
    /// Upper bound on the page count.
    pub max_pages: usize,
    /// Minimum size of the last page.
    pub min_sections_per_page: usize,
}

impl Default for SmartPagesConfig {
    fn default() -> Self {
        Self {
            activate_threshold: 4,
            sections_per_page: 3,
            max_pages: 5,
            min_sections_per_page: 2,
        }
    }
}

impl ShopConfig {
    /// Read and validate a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> ShopframeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))
            .map_err(|e| ShopframeError::config(format!("{e:#}")))?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(text: &str) -> ShopframeResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| ShopframeError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Dimensions of a tile size class.
    pub fn tile_dims(&self, size: TileSize) -> TileDims {
        match size {
            TileSize::Normal => self.tile.size.normal,
            TileSize::Small => self.tile.size.small,
            TileSize::DoubleWide => self.tile.size.double_wide,
        }
    }

    /// Wedge colours for an entry: the series entry when the table has one, else the rarity's.
    pub fn rarity_colors(
        &self,
        rarity: Rarity,
        series: Option<Series>,
    ) -> ShopframeResult<&RarityColors> {
        let colors = &self.tile.panel.rarity.colors;
        if let Some(found) = series.and_then(|s| colors.get(s.key())) {
            return Ok(found);
        }
        colors.get(rarity.key()).ok_or_else(|| {
            ShopframeError::config(format!("no rarity colour entry for '{rarity}'"))
        })
    }

    /// Check ranges that the layout and compositor rely on.
    pub fn validate(&self) -> ShopframeResult<()> {
        for (name, dims) in [
            ("normal", self.tile.size.normal),
            ("small", self.tile.size.small),
            ("double_wide", self.tile.size.double_wide),
        ] {
            if dims.width == 0 || dims.height == 0 {
                return Err(ShopframeError::config(format!(
                    "tile.size.{name} must have width>0 and height>0"
                )));
            }
        }

        let bg = &self.tile.background;
        if !(bg.gradient_stop > 0.0 && bg.gradient_stop <= 1.0) {
            return Err(ShopframeError::config(
                "tile.background.gradient_stop must be in (0, 1]",
            ));
        }
        let banner = &self.tile.banner;
        if !(banner.max_width > 0.0 && banner.max_width <= 1.0) {
            return Err(ShopframeError::config(
                "tile.banner.max_width must be in (0, 1]",
            ));
        }

        for (name, value) in [
            ("tile.background.inner_radius", bg.inner_radius),
            ("tile.shadow_blur", self.tile.shadow_blur),
            ("tile.banner.shadow_blur", banner.shadow_blur),
            ("tile.banner.border_thickness", banner.border_thickness),
            ("tile.banner.height", banner.height),
            ("tile.currency.size", self.tile.currency.size),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ShopframeError::config(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        for (name, value) in [
            ("tile.banner.height_a", banner.height_a),
            ("tile.banner.height_b", banner.height_b),
            ("tile.banner.offset_x", banner.offset_x),
            ("tile.panel.height_a", self.tile.panel.height_a),
            ("tile.panel.height_b", self.tile.panel.height_b),
            ("tile.panel.rarity.height_a", self.tile.panel.rarity.height_a),
            ("tile.panel.rarity.height_b", self.tile.panel.rarity.height_b),
            ("tile.currency.offset_x", self.tile.currency.offset_x),
            ("tile.currency.offset_y", self.tile.currency.offset_y),
            ("tile.name_text.offset_x", self.tile.name_text.offset_x),
            ("tile.name_text.offset_y", self.tile.name_text.offset_y),
            ("section_title.text_offset", self.section_title.text_offset),
        ] {
            if !value.is_finite() {
                return Err(ShopframeError::config(format!("{name} must be finite")));
            }
        }

        for (name, size) in [
            ("tile.currency.font_size", self.tile.currency.font_size),
            ("tile.name_text.default_font_size", self.tile.name_text.default_font_size),
            ("tile.banner.font_size", banner.font_size),
            ("section_title.font_size", self.section_title.font_size),
            ("page.number_font_size", self.page.number_font_size),
        ] {
            if !size.is_finite() || size < 1.0 {
                return Err(ShopframeError::config(format!("{name} must be >= 1")));
            }
        }

        let sp = &self.smart_pages;
        if sp.max_pages == 0 {
            return Err(ShopframeError::config("smart_pages.max_pages must be >= 1"));
        }
        if sp.sections_per_page == 0 {
            return Err(ShopframeError::config(
                "smart_pages.sections_per_page must be >= 1",
            ));
        }
        if self.tile.currency.icon.trim().is_empty() {
            return Err(ShopframeError::config("tile.currency.icon must be non-empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
