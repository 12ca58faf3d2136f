use super::*;
use crate::catalog::model::{Entry, Item, Rarity};

fn entry(id: &str, size: TileSize) -> Entry {
    Entry::builder(id, id, size, vec![Item::new(id, id, Rarity::Rare)])
        .build()
        .unwrap()
}

fn section(sizes: &[TileSize]) -> Section {
    let entries = sizes
        .iter()
        .enumerate()
        .map(|(i, s)| entry(&format!("e{i}"), *s))
        .collect();
    Section::new("s", "S", 0, 0, entries).unwrap()
}

fn pos(x: u32, y: u32) -> TilePos {
    TilePos { x, y }
}

#[test]
fn normal_tiles_advance_by_width_and_gap() {
    let cfg = ShopConfig::default();
    let (gap, w) = (cfg.tile.gap, cfg.tile.size.normal.width);
    let s = section(&[TileSize::Normal, TileSize::Normal]);
    assert_eq!(
        tile_coordinates(&s, &cfg),
        vec![pos(gap, gap), pos(gap + w + gap, gap)]
    );
    assert_eq!(section_extent(&s, &cfg), gap + 2 * (w + gap));
}

#[test]
fn small_pair_stacks_then_advances_once() {
    let cfg = ShopConfig::default();
    let gap = cfg.tile.gap;
    let small = cfg.tile.size.small;
    let s = section(&[TileSize::Small, TileSize::Small, TileSize::Normal]);
    assert_eq!(
        tile_coordinates(&s, &cfg),
        vec![
            pos(gap, gap),
            pos(gap, gap + small.height + gap),
            pos(gap + small.width + gap, gap),
        ]
    );
}

#[test]
fn interrupted_small_slot_is_closed_before_the_next_tile() {
    let cfg = ShopConfig::default();
    let gap = cfg.tile.gap;
    let small = cfg.tile.size.small;
    let wide = cfg.tile.size.double_wide;
    let s = section(&[TileSize::Small, TileSize::DoubleWide, TileSize::Small]);
    assert_eq!(
        tile_coordinates(&s, &cfg),
        vec![
            pos(gap, gap),
            pos(gap + small.width + gap, gap),
            pos(gap + small.width + gap + wide.width + gap, gap),
        ]
    );
    assert_eq!(
        section_extent(&s, &cfg),
        gap + small.width + gap + wide.width + gap + small.width + gap
    );
}

#[test]
fn tiles_never_overlap() {
    let cfg = ShopConfig::default();
    let sizes = [
        TileSize::Small,
        TileSize::Normal,
        TileSize::Small,
        TileSize::Small,
        TileSize::Small,
        TileSize::DoubleWide,
        TileSize::Normal,
    ];
    let s = section(&sizes);
    let coords = tile_coordinates(&s, &cfg);
    let rects: Vec<(u32, u32, u32, u32)> = coords
        .iter()
        .zip(sizes)
        .map(|(p, size)| {
            let d = cfg.tile_dims(size);
            (p.x, p.y, p.x + d.width, p.y + d.height)
        })
        .collect();
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            let overlap = a.0 < b.2 && b.0 < a.2 && a.1 < b.3 && b.1 < a.3;
            assert!(!overlap, "{a:?} overlaps {b:?}");
        }
        assert!(a.2 + cfg.tile.gap <= section_extent(&s, &cfg));
    }
}

#[test]
fn shop_width_is_widest_section() {
    let cfg = ShopConfig::default();
    let narrow = section(&[TileSize::Normal]);
    let wide = Section::new(
        "wide",
        "Wide",
        1,
        0,
        vec![entry("a", TileSize::DoubleWide), entry("b", TileSize::Normal)],
    )
    .unwrap();
    let expected = section_extent(&wide, &cfg);
    let shop = Shop::new("fp", "d", vec![narrow, wide]).unwrap();
    assert_eq!(section_width(&shop, &cfg), expected);

    let empty_shop = Shop::new("fp", "d", Vec::new()).unwrap();
    assert_eq!(section_width(&empty_shop, &cfg), 0);
    let empty_section = section(&[]);
    assert_eq!(section_extent(&empty_section, &cfg), cfg.tile.gap);
}
