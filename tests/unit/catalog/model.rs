use super::*;

fn item(id: &str, rarity: Rarity) -> Item {
    Item::new(id, id.to_uppercase(), rarity)
}

fn entry(id: &str, priority: i64) -> Entry {
    Entry::builder(id, id, TileSize::Normal, vec![item(id, Rarity::Rare)])
        .price(1200, 1000)
        .sort_priority(priority)
        .build()
        .unwrap()
}

#[test]
fn builder_takes_rarity_and_series_from_first_item() {
    let mut first = item("a", Rarity::Epic);
    first.series = Some(Series::MarvelSeries);
    let e = Entry::builder("a", "A", TileSize::Small, vec![first, item("b", Rarity::Common)])
        .build()
        .unwrap();
    assert_eq!(e.rarity(), Rarity::Epic);
    assert_eq!(e.series(), Some(Series::MarvelSeries));
}

#[test]
fn builder_rejects_invalid_entries() {
    assert!(
        Entry::builder("a", "A", TileSize::Normal, Vec::new())
            .build()
            .is_err()
    );
    assert!(
        Entry::builder("", "A", TileSize::Normal, vec![item("a", Rarity::Rare)])
            .build()
            .is_err()
    );
    let err = Entry::builder("a", "A", TileSize::Normal, vec![item("a", Rarity::Rare)])
        .price(500, 800)
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("exceeds regular price"));
}

#[test]
fn offer_id_and_bundle_helpers() {
    assert_eq!(Entry::offer_id("cid_001", true), "cid_001-Bundle");
    assert_eq!(Entry::offer_id("cid_001", false), "cid_001");

    let e = Entry::builder("x-Bundle", "X", TileSize::DoubleWide, vec![item("x", Rarity::Rare)])
        .price(2000, 1500)
        .bundle("Starter")
        .build()
        .unwrap();
    assert!(e.is_bundle());
    assert_eq!(e.discount(), 500);
    assert_eq!(e.image_cache_name(), "x-Bundle.png");
}

#[test]
fn section_sorts_entries_by_priority_descending_and_keeps_ties_in_insertion_order() {
    let s = Section::new(
        "daily",
        "Daily",
        0,
        0,
        vec![entry("low", 1), entry("tie_a", 5), entry("high", 9), entry("tie_b", 5)],
    )
    .unwrap();
    let ids: Vec<&str> = s.entries().iter().map(Entry::id).collect();
    assert_eq!(ids, vec!["high", "tie_a", "tie_b", "low"]);
}

#[test]
fn push_entry_resorts() {
    let mut s = Section::new("daily", "Daily", 0, 0, vec![entry("a", 1)]).unwrap();
    s.push_entry(entry("b", 3)).unwrap();
    s.push_entry(entry("c", 1)).unwrap();
    let ids: Vec<&str> = s.entries().iter().map(Entry::id).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
}

#[test]
fn shop_orders_sections_by_index() {
    let shop = Shop::new(
        "hash",
        "2024-01-01",
        vec![
            Section::new("c", "C", 2, 0, Vec::new()).unwrap(),
            Section::new("a", "A", 0, 0, Vec::new()).unwrap(),
            Section::new("b", "B", 1, 0, Vec::new()).unwrap(),
        ],
    )
    .unwrap();
    let ids: Vec<&str> = shop.sections().iter().map(Section::id).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn shop_requires_fingerprint() {
    assert!(Shop::new(" ", "2024-01-01", Vec::new()).is_err());
}

#[test]
fn rarity_accepts_backend_values() {
    let r: Rarity = serde_json::from_str("\"EFortRarity::Legendary\"").unwrap();
    assert_eq!(r, Rarity::Legendary);
    let r: Rarity = serde_json::from_str("\"Uncommon\"").unwrap();
    assert_eq!(r, Rarity::Uncommon);
    assert_eq!(Rarity::Mythic.key(), "Mythic");
}
