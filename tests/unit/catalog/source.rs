use super::*;

const SHOP_JSON: &str = r#"{
  "fingerprint": "abc123",
  "date": "2024-05-01",
  "sections": [
    {
      "id": "featured",
      "name": "Featured",
      "index": 1,
      "entries": [
        {
          "id": "cid_2",
          "name": "Second",
          "rarity": "EFortRarity::Epic",
          "regular_price": 1500,
          "final_price": 1500,
          "sort_priority": 1,
          "tile_size": "Normal",
          "image_url": "https://img.example/cid_2.png",
          "items": [{ "id": "cid_2", "name": "Second", "rarity": "Epic" }]
        },
        {
          "id": "cid_3",
          "name": "Third",
          "rarity": "Rare",
          "regular_price": 800,
          "final_price": 800,
          "sort_priority": 7,
          "tile_size": "Small",
          "image_url": "https://img.example/cid_3.png",
          "items": [{ "id": "cid_3", "name": "Third", "rarity": "Rare", "type": "Emote" }]
        }
      ]
    },
    { "id": "daily", "name": "Daily", "index": 0 }
  ]
}"#;

#[test]
fn parses_and_normalizes_ordering() {
    let shop = shop_from_json_str(SHOP_JSON).unwrap();
    assert_eq!(shop.fingerprint(), "abc123");
    assert_eq!(shop.sections()[0].id(), "daily");
    let featured = &shop.sections()[1];
    assert_eq!(featured.entries()[0].id(), "cid_3");
    assert_eq!(featured.entries()[0].items()[0].item_type, "Emote");
}

#[test]
fn invalid_prices_are_rejected_on_load() {
    let bad = SHOP_JSON.replace("\"final_price\": 800", "\"final_price\": 900");
    let err = shop_from_json_str(&bad).unwrap_err();
    assert!(matches!(err, ShopframeError::Validation(_)));
}

#[test]
fn json_file_source_reads_from_disk() {
    let dir = std::env::temp_dir().join(format!("shopframe_catalog_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("shop.json");
    std::fs::write(&path, SHOP_JSON).unwrap();

    let source = JsonCatalogFile::new(&path);
    let shop = source.current_shop().unwrap();
    assert_eq!(shop.sections().len(), 2);

    let missing = JsonCatalogFile::new(dir.join("missing.json"));
    assert!(matches!(
        missing.current_shop().unwrap_err(),
        ShopframeError::Retrieval(_)
    ));
    let _ = std::fs::remove_dir_all(&dir);
}
