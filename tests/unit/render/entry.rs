use super::*;
use crate::catalog::model::{BannerIntensity, Item, Rarity};
use crate::foundation::error::ShopframeError;
use crate::render::text::{ShapedText, TextMetrics};

struct NoGlyphs;

impl TextShaper for NoGlyphs {
    fn shape(&self, text: &str, size_px: f32) -> ShopframeResult<ShapedText> {
        Ok(ShapedText {
            metrics: TextMetrics {
                width: text.len() as f64 * f64::from(size_px) * 0.5,
                ascent: f64::from(size_px) * 0.8,
            },
            runs: Vec::new(),
        })
    }
}

fn small_config() -> ShopConfig {
    let mut cfg = ShopConfig::default();
    cfg.tile.size.normal.width = 40;
    cfg.tile.size.normal.height = 60;
    cfg.tile.size.small.width = 40;
    cfg.tile.size.small.height = 24;
    cfg.tile.shadow_blur = 0.0;
    cfg.tile.panel.height_a = 5.0;
    cfg.tile.panel.height_b = 5.0;
    cfg.tile.panel.color = Rgba8::rgb(0, 255, 0);
    cfg.tile.panel.rarity.height_a = 10.0;
    cfg.tile.panel.rarity.height_b = 10.0;
    cfg.tile.currency.size = 4.0;
    cfg.tile.currency.offset_x = 2.0;
    cfg.tile.currency.offset_y = 2.0;
    cfg.tile.banner.height_a = 30.0;
    cfg.tile.banner.height_b = 34.0;
    cfg.tile.banner.height = 8.0;
    cfg.tile.banner.font_size = 6.0;
    cfg.tile.banner.shadow_blur = 0.0;
    cfg
}

fn entry(size: TileSize, banner: Option<Banner>) -> Entry {
    let mut b = Entry::builder(
        "CID_1",
        "Renegade",
        size,
        vec![Item::new("CID_1", "Renegade", Rarity::Rare)],
    )
    .price(1200, 800)
    .image_url("https://img.example/CID_1.png");
    if let Some(banner) = banner {
        b = b.banner(banner);
    }
    b.build().unwrap()
}

fn solid(w: u32, h: u32, color: Rgba8) -> Surface {
    let mut s = Surface::new(w, h).unwrap();
    s.fill(color);
    s
}

#[test]
fn tile_matches_its_size_class() {
    let cfg = small_config();
    let image = solid(10, 10, Rgba8::rgb(255, 0, 0));
    let icon = Surface::new(2, 2).unwrap();
    let inputs = EntryInputs {
        image: &image,
        currency_icon: &icon,
    };
    let normal = draw_entry(&entry(TileSize::Normal, None), &cfg, &NoGlyphs, &inputs).unwrap();
    assert_eq!((normal.width(), normal.height()), (40, 60));
    let small = draw_entry(&entry(TileSize::Small, None), &cfg, &NoGlyphs, &inputs).unwrap();
    assert_eq!((small.width(), small.height()), (40, 24));
}

#[test]
fn image_covers_the_top_and_panel_covers_the_bottom() {
    let cfg = small_config();
    let image = solid(10, 10, Rgba8::rgb(255, 0, 0));
    let icon = Surface::new(2, 2).unwrap();
    let inputs = EntryInputs {
        image: &image,
        currency_icon: &icon,
    };
    let tile = draw_entry(&entry(TileSize::Normal, None), &cfg, &NoGlyphs, &inputs).unwrap();

    let top = tile.pixel(20, 10).unwrap();
    assert!(top[0] >= 240 && top[1] <= 15 && top[3] == 255, "{top:?}");
    let bottom = tile.pixel(30, 59).unwrap();
    assert!(bottom[1] >= 240 && bottom[0] <= 15, "{bottom:?}");
}

#[test]
fn banner_paints_the_right_edge() {
    let cfg = small_config();
    let image = solid(10, 10, Rgba8::rgb(255, 0, 0));
    let icon = Surface::new(2, 2).unwrap();
    let inputs = EntryInputs {
        image: &image,
        currency_icon: &icon,
    };
    let plain = draw_entry(&entry(TileSize::Normal, None), &cfg, &NoGlyphs, &inputs).unwrap();
    let banner = Banner {
        text: "New".to_string(),
        intensity: BannerIntensity::High,
        backend_value: "New".to_string(),
    };
    let with = draw_entry(
        &entry(TileSize::Normal, Some(banner)),
        &cfg,
        &NoGlyphs,
        &inputs,
    )
    .unwrap();
    assert_ne!(plain, with);
    assert_eq!(plain.pixel(2, 2), with.pixel(2, 2));
}

#[test]
fn missing_rarity_colours_fail_the_tile() {
    let mut cfg = small_config();
    cfg.tile.panel.rarity.colors.clear();
    let image = solid(10, 10, Rgba8::rgb(255, 0, 0));
    let icon = Surface::new(2, 2).unwrap();
    let inputs = EntryInputs {
        image: &image,
        currency_icon: &icon,
    };
    let err = draw_entry(&entry(TileSize::Normal, None), &cfg, &NoGlyphs, &inputs).unwrap_err();
    assert!(matches!(err, ShopframeError::Config(_)));
}
