#![allow(dead_code)]

use std::collections::HashSet;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use shopframe::{
    AssetSource, ContentCache, Entry, Item, Rarity, RendererOptions, Section, ShapedText, Shop,
    ShopConfig, ShopRenderer, ShopframeError, ShopframeResult, TextMetrics, TextShaper, TileSize,
};

pub fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "shopframe_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

pub fn png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let pixels = rgba.repeat((width * height) as usize);
    let img = image::RgbaImage::from_raw(width, height, pixels).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Metrics-only shaper: width = chars * size * 0.5, ascent = 0.7 * size. Draws nothing.
pub struct FixedAdvance;

impl TextShaper for FixedAdvance {
    fn shape(&self, text: &str, size_px: f32) -> ShopframeResult<ShapedText> {
        Ok(ShapedText {
            metrics: TextMetrics {
                width: text.chars().count() as f64 * f64::from(size_px) * 0.5,
                ascent: f64::from(size_px) * 0.7,
            },
            runs: Vec::new(),
        })
    }
}

/// In-memory asset source. Each URL yields a solid image whose colour is derived from the URL.
#[derive(Default)]
pub struct MemoryAssets {
    failing: Mutex<HashSet<String>>,
    fetches: AtomicUsize,
}

impl MemoryAssets {
    pub fn fail(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    pub fn heal(&self, url: &str) {
        self.failing.lock().unwrap().remove(url);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl AssetSource for MemoryAssets {
    fn fetch(&self, url: &str) -> ShopframeResult<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(url) {
            return Err(ShopframeError::retrieval(format!("refused {url}")));
        }
        let seed = url.bytes().fold(7u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)));
        let [r, g, b, _] = seed.to_le_bytes();
        Ok(png(4, 6, [r, g, b, 255]))
    }

    fn resource(&self, _name: &str) -> ShopframeResult<Vec<u8>> {
        Ok(png(2, 2, [250, 210, 40, 255]))
    }
}

/// Small tiles so whole shops render quickly.
pub fn test_config() -> ShopConfig {
    let mut cfg = ShopConfig::default();
    cfg.tile.gap = 2;
    cfg.tile.size.normal.width = 16;
    cfg.tile.size.normal.height = 24;
    cfg.tile.size.small.width = 16;
    cfg.tile.size.small.height = 11;
    cfg.tile.size.double_wide.width = 34;
    cfg.tile.size.double_wide.height = 24;
    cfg.tile.shadow_blur = 2.0;
    cfg.tile.background.inner_radius = 2.0;
    cfg.tile.panel.height_a = 5.0;
    cfg.tile.panel.height_b = 6.0;
    cfg.tile.panel.rarity.height_a = 8.0;
    cfg.tile.panel.rarity.height_b = 9.0;
    cfg.tile.currency.size = 3.0;
    cfg.tile.currency.offset_x = 1.0;
    cfg.tile.currency.offset_y = 1.0;
    cfg.tile.name_text.offset_x = 1.0;
    cfg.tile.name_text.offset_y = 4.0;
    cfg.tile.banner.height_a = 12.0;
    cfg.tile.banner.height_b = 14.0;
    cfg.tile.banner.height = 4.0;
    cfg.tile.banner.font_size = 3.0;
    cfg.tile.banner.border_thickness = 1.0;
    cfg.tile.banner.shadow_blur = 1.0;
    cfg.section_title.band_height = 6;
    cfg.section_title.text_offset = 5.0;
    cfg
}

pub fn image_url(id: &str) -> String {
    format!("https://img.example/{id}.png")
}

pub fn entry(id: &str, size: TileSize) -> Entry {
    Entry::builder(id, id, size, vec![Item::new(id, id, Rarity::Epic)])
        .price(1500, 1200)
        .image_url(image_url(id))
        .build()
        .unwrap()
}

pub fn section(id: &str, index: i64, entry_ids: &[&str]) -> Section {
    let entries = entry_ids
        .iter()
        .map(|e| entry(e, TileSize::Normal))
        .collect();
    Section::new(id, id, index, 0, entries).unwrap()
}

pub fn shop(fingerprint: &str, sections: Vec<Section>) -> Shop {
    Shop::new(fingerprint, "2026-10-19", sections).unwrap()
}

pub fn renderer(
    cache_dir: &PathBuf,
    config: ShopConfig,
    assets: Arc<MemoryAssets>,
    opts: RendererOptions,
) -> ShopRenderer {
    let cache = ContentCache::open(cache_dir).unwrap();
    ShopRenderer::new(config, cache, assets, Arc::new(FixedAdvance), opts).unwrap()
}
