use std::fmt;

use crate::foundation::error::{ShopframeError, ShopframeResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Rarity tier of an item or entry.
///
/// Both the plain name (`"Epic"`) and the backend value (`"EFortRarity::Epic"`) deserialize.
pub enum Rarity {
    /// Lowest tier.
    #[serde(alias = "EFortRarity::Common")]
    Common,
    /// Second tier.
    #[serde(alias = "EFortRarity::Uncommon")]
    Uncommon,
    /// Third tier.
    #[serde(alias = "EFortRarity::Rare")]
    Rare,
    /// Fourth tier.
    #[serde(alias = "EFortRarity::Epic")]
    Epic,
    /// Fifth tier.
    #[serde(alias = "EFortRarity::Legendary")]
    Legendary,
    /// Sixth tier.
    #[serde(alias = "EFortRarity::Mythic")]
    Mythic,
    /// Seventh tier.
    #[serde(alias = "EFortRarity::Exotic")]
    Exotic,
}

impl Rarity {
    /// Key used in the configured rarity colour table.
    pub fn key(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
            Self::Mythic => "Mythic",
            Self::Exotic => "Exotic",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Optional cosmetic series; overrides the rarity colour when the colour table has an entry.
pub enum Series {
    /// Columbus series.
    ColumbusSeries,
    /// Creator collaboration series.
    CreatorCollabSeries,
    /// Cube series.
    CubeSeries,
    /// DC series.
    DCSeries,
    /// Frozen series.
    FrozenSeries,
    /// Lava series.
    LavaSeries,
    /// Marvel series.
    MarvelSeries,
    /// Gaming platform series.
    PlatformSeries,
    /// Shadow series.
    ShadowSeries,
    /// Slurp series.
    SlurpSeries,
}

impl Series {
    /// Key used in the configured rarity colour table.
    pub fn key(self) -> &'static str {
        match self {
            Self::ColumbusSeries => "ColumbusSeries",
            Self::CreatorCollabSeries => "CreatorCollabSeries",
            Self::CubeSeries => "CubeSeries",
            Self::DCSeries => "DCSeries",
            Self::FrozenSeries => "FrozenSeries",
            Self::LavaSeries => "LavaSeries",
            Self::MarvelSeries => "MarvelSeries",
            Self::PlatformSeries => "PlatformSeries",
            Self::ShadowSeries => "ShadowSeries",
            Self::SlurpSeries => "SlurpSeries",
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Size class of the tile an entry is drawn on.
pub enum TileSize {
    /// Full-height tile.
    Normal,
    /// Half-height tile; two consecutive small tiles share one horizontal slot.
    Small,
    /// Full-height tile with double width.
    DoubleWide,
}

impl TileSize {
    /// Stable name, also used in entry fingerprints.
    pub fn key(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Small => "Small",
            Self::DoubleWide => "DoubleWide",
        }
    }
}

impl fmt::Display for TileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Visual weight of a banner ribbon.
pub enum BannerIntensity {
    /// Standard ribbon style.
    Low,
    /// Emphasised ribbon style.
    High,
}

impl fmt::Display for BannerIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::High => "High",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Promotional label drawn as a diagonal ribbon.
pub struct Banner {
    /// Display text.
    pub text: String,
    /// Ribbon style.
    pub intensity: BannerIntensity,
    /// Stable backend identifier; participates in the entry fingerprint.
    pub backend_value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Chapter/season in which an item first appeared.
pub struct Introduction {
    /// Chapter number.
    pub chapter: u32,
    /// Season within the chapter.
    pub season: u32,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A single cosmetic contained in an entry.
pub struct Item {
    /// Item identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display description.
    #[serde(default)]
    pub description: String,
    /// Display type ("Outfit", "Emote", ...).
    #[serde(rename = "type", default)]
    pub item_type: String,
    /// Rarity tier.
    pub rarity: Rarity,
    /// Optional series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<Series>,
    /// Optional set name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    /// Optional first-appearance info.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<Introduction>,
    /// Date the item was last in the shop, as reported by the data source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_shop_date: Option<String>,
}

impl Item {
    /// Build an item with the required fields; optional fields start empty.
    pub fn new(id: impl Into<String>, name: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            item_type: String::new(),
            rarity,
            series: None,
            set: None,
            introduction: None,
            last_shop_date: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One purchasable offer, drawn as a single tile. Immutable once built.
pub struct Entry {
    id: String,
    name: String,
    rarity: Rarity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    series: Option<Series>,
    regular_price: u32,
    final_price: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bundle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    banner: Option<Banner>,
    #[serde(default)]
    sort_priority: i64,
    tile_size: TileSize,
    image_url: String,
    #[serde(default)]
    categories: Vec<String>,
    items: Vec<Item>,
}

impl Entry {
    /// Start building an entry. `items` must be non-empty.
    pub fn builder(
        id: impl Into<String>,
        name: impl Into<String>,
        tile_size: TileSize,
        items: Vec<Item>,
    ) -> EntryBuilder {
        let rarity = items.first().map_or(Rarity::Common, |i| i.rarity);
        let series = items.first().and_then(|i| i.series);
        EntryBuilder {
            entry: Entry {
                id: id.into(),
                name: name.into(),
                rarity,
                series,
                regular_price: 0,
                final_price: 0,
                bundle_name: None,
                banner: None,
                sort_priority: 0,
                tile_size,
                image_url: String::new(),
                categories: Vec::new(),
                items,
            },
        }
    }

    /// Offer id convention of the data source: bundles get a `-Bundle` suffix.
    pub fn offer_id(first_item_id: &str, is_bundle: bool) -> String {
        if is_bundle {
            format!("{first_item_id}-Bundle")
        } else {
            first_item_id.to_string()
        }
    }

    /// Offer identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rarity used for colouring.
    pub fn rarity(&self) -> Rarity {
        self.rarity
    }

    /// Series, when the entry belongs to one.
    pub fn series(&self) -> Option<Series> {
        self.series
    }

    /// Price before discount.
    pub fn regular_price(&self) -> u32 {
        self.regular_price
    }

    /// Price after discount.
    pub fn final_price(&self) -> u32 {
        self.final_price
    }

    /// Price reduction in currency units.
    pub fn discount(&self) -> u32 {
        self.regular_price - self.final_price
    }

    /// Bundle display name for bundle offers.
    pub fn bundle_name(&self) -> Option<&str> {
        self.bundle_name.as_deref()
    }

    /// `true` when the entry is sold as a bundle.
    pub fn is_bundle(&self) -> bool {
        self.bundle_name.is_some()
    }

    /// Promotional banner, if any.
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Ordering key within the section.
    pub fn sort_priority(&self) -> i64 {
        self.sort_priority
    }

    /// Tile footprint.
    pub fn tile_size(&self) -> TileSize {
        self.tile_size
    }

    /// URL of the tile artwork.
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Catalog categories.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Cosmetics sold in this entry.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Cache name of the entry's source image.
    pub fn image_cache_name(&self) -> String {
        format!("{}.png", self.id)
    }

    pub(crate) fn validate(&self) -> ShopframeResult<()> {
        if self.id.trim().is_empty() {
            return Err(ShopframeError::validation("entry id must be non-empty"));
        }
        if self.items.is_empty() {
            return Err(ShopframeError::validation(format!(
                "entry '{}' must contain at least one item",
                self.id
            )));
        }
        if self.final_price > self.regular_price {
            return Err(ShopframeError::validation(format!(
                "entry '{}' final price {} exceeds regular price {}",
                self.id, self.final_price, self.regular_price
            )));
        }
        if let Some(banner) = &self.banner
            && banner.text.is_empty()
        {
            return Err(ShopframeError::validation(format!(
                "entry '{}' banner text must be non-empty",
                self.id
            )));
        }
        Ok(())
    }
}

/// Builder for [`Entry`]; [`EntryBuilder::build`] validates.
pub struct EntryBuilder {
    entry: Entry,
}

impl EntryBuilder {
    /// Override the rarity (defaults to the first item's).
    pub fn rarity(mut self, rarity: Rarity) -> Self {
        self.entry.rarity = rarity;
        self
    }

    /// Override the series (defaults to the first item's).
    pub fn series(mut self, series: Option<Series>) -> Self {
        self.entry.series = series;
        self
    }

    /// Regular and final price.
    pub fn price(mut self, regular: u32, final_price: u32) -> Self {
        self.entry.regular_price = regular;
        self.entry.final_price = final_price;
        self
    }

    /// Sell the entry as a bundle named `name`.
    pub fn bundle(mut self, name: impl Into<String>) -> Self {
        self.entry.bundle_name = Some(name.into());
        self
    }

    /// Attach a promotional banner.
    pub fn banner(mut self, banner: Banner) -> Self {
        self.entry.banner = Some(banner);
        self
    }

    /// Set the ordering key within the section.
    pub fn sort_priority(mut self, priority: i64) -> Self {
        self.entry.sort_priority = priority;
        self
    }

    /// Set the tile artwork URL.
    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.entry.image_url = url.into();
        self
    }

    /// Set the catalog categories.
    pub fn categories(mut self, categories: Vec<String>) -> Self {
        self.entry.categories = categories;
        self
    }

    /// Validate and return the entry.
    pub fn build(self) -> ShopframeResult<Entry> {
        self.entry.validate()?;
        Ok(self.entry)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A titled group of entries, kept sorted by `sort_priority` descending.
pub struct Section {
    id: String,
    name: String,
    index: i64,
    #[serde(default)]
    landing_priority: i64,
    #[serde(default)]
    entries: Vec<Entry>,
}

impl Section {
    /// Build a section; entries are sorted by priority (stable, so ties keep their order).
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        index: i64,
        landing_priority: i64,
        entries: Vec<Entry>,
    ) -> ShopframeResult<Self> {
        let mut section = Self {
            id: id.into(),
            name: name.into(),
            index,
            landing_priority,
            entries,
        };
        section.validate()?;
        section.sort_entries();
        Ok(section)
    }

    /// Insert an entry and restore the priority ordering.
    pub fn push_entry(&mut self, entry: Entry) -> ShopframeResult<()> {
        entry.validate()?;
        self.entries.push(entry);
        self.sort_entries();
        Ok(())
    }

    /// Section identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Title drawn above the tiles.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Page ordering key.
    pub fn index(&self) -> i64 {
        self.index
    }

    /// Priority reported by the data source.
    pub fn landing_priority(&self) -> i64 {
        self.landing_priority
    }

    /// Entries in draw order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn sort_entries(&mut self) {
        self.entries
            .sort_by(|a, b| b.sort_priority.cmp(&a.sort_priority));
    }

    pub(crate) fn validate(&self) -> ShopframeResult<()> {
        if self.id.trim().is_empty() {
            return Err(ShopframeError::validation("section id must be non-empty"));
        }
        for entry in &self.entries {
            entry.validate()?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One catalog snapshot: sections ordered by `index` ascending.
pub struct Shop {
    fingerprint: String,
    date: String,
    #[serde(default)]
    sections: Vec<Section>,
}

impl Shop {
    /// Build a shop; sections are sorted by `index` (stable).
    pub fn new(
        fingerprint: impl Into<String>,
        date: impl Into<String>,
        sections: Vec<Section>,
    ) -> ShopframeResult<Self> {
        let mut shop = Self {
            fingerprint: fingerprint.into(),
            date: date.into(),
            sections,
        };
        shop.normalize()?;
        Ok(shop)
    }

    /// Opaque content hash reported by the data source.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Date of the shop rotation.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Sections in page order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Re-establish ordering invariants and validate; used after deserialization.
    pub(crate) fn normalize(&mut self) -> ShopframeResult<()> {
        if self.fingerprint.trim().is_empty() {
            return Err(ShopframeError::validation("shop fingerprint must be non-empty"));
        }
        for section in &mut self.sections {
            section.validate()?;
            section.sort_entries();
        }
        self.sections.sort_by_key(|s| s.index);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/model.rs"]
mod tests;
