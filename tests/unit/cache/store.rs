use std::io::Cursor;
use std::sync::Mutex;

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "shopframe_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

struct StubSource {
    payload: Option<Vec<u8>>,
    fetched: Mutex<Vec<String>>,
}

impl AssetSource for StubSource {
    fn fetch(&self, url: &str) -> ShopframeResult<Vec<u8>> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.payload
            .clone()
            .ok_or_else(|| ShopframeError::retrieval(format!("no payload for {url}")))
    }

    fn resource(&self, name: &str) -> ShopframeResult<Vec<u8>> {
        Err(ShopframeError::retrieval(name))
    }
}

#[test]
fn bytes_round_trip_and_missing_is_not_found() {
    let dir = temp_dir("cache_bytes");
    let cache = ContentCache::open(&dir).unwrap();

    assert!(!cache.exists("a.bin"));
    assert!(cache.read_bytes("a.bin").unwrap_err().is_not_found());

    cache.write_bytes("a.bin", b"first").unwrap();
    cache.write_bytes("a.bin", b"2nd").unwrap();
    assert!(cache.exists("a.bin"));
    assert_eq!(cache.read_bytes("a.bin").unwrap(), b"2nd");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn invalid_names_are_rejected() {
    let dir = temp_dir("cache_names");
    let cache = ContentCache::open(&dir).unwrap();
    for bad in ["", ".", "..", "a/b", "a\\b"] {
        assert!(matches!(
            cache.write_bytes(bad, b"x").unwrap_err(),
            ShopframeError::Validation(_)
        ));
        assert!(!cache.exists(bad));
    }
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn text_encodings() {
    let dir = temp_dir("cache_text");
    let cache = ContentCache::open(&dir).unwrap();

    cache.write_text("u8", "héllo", TextEncoding::Utf8).unwrap();
    assert_eq!(cache.read_text("u8", TextEncoding::Utf8).unwrap(), "héllo");

    cache.write_text("u16", "héllo", TextEncoding::Utf16Le).unwrap();
    assert_eq!(cache.read_bytes("u16").unwrap().len(), 10);
    assert_eq!(cache.read_text("u16", TextEncoding::Utf16Le).unwrap(), "héllo");

    cache.write_text("l1", "héllo", TextEncoding::Latin1).unwrap();
    assert_eq!(cache.read_bytes("l1").unwrap(), vec![b'h', 0xe9, b'l', b'l', b'o']);
    assert_eq!(cache.read_text("l1", TextEncoding::Latin1).unwrap(), "héllo");
    assert!(cache.write_text("l1", "€", TextEncoding::Latin1).is_err());

    cache.write_text("hex", "DEADbeef", TextEncoding::Hex).unwrap();
    assert_eq!(cache.read_bytes("hex").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    assert_eq!(cache.read_text("hex", TextEncoding::Hex).unwrap(), "deadbeef");
    assert!(cache.write_text("hex", "abc", TextEncoding::Hex).is_err());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn list_by_prefix_is_sorted_and_skips_temp_files() {
    let dir = temp_dir("cache_list");
    let cache = ContentCache::open(&dir).unwrap();
    for name in ["page-2.png", "page-0.png", "page-10.png", "abc.png", "last-shop"] {
        cache.write_bytes(name, b"x").unwrap();
    }
    std::fs::write(dir.join(".page-3.png.1.1.tmp"), b"partial").unwrap();

    assert_eq!(
        cache.list_by_prefix("page-").unwrap(),
        vec!["page-0.png", "page-10.png", "page-2.png"]
    );
    assert_eq!(cache.list_by_prefix("").unwrap().len(), 5);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn delete_all_ignores_missing_names() {
    let dir = temp_dir("cache_delete");
    let cache = ContentCache::open(&dir).unwrap();
    cache.write_bytes("a", b"1").unwrap();
    cache.write_bytes("b", b"2").unwrap();

    cache.delete_all(["a", "missing"]).unwrap();
    assert!(!cache.exists("a"));
    assert!(cache.exists("b"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn concurrent_identical_writes_leave_a_complete_entry() {
    let dir = temp_dir("cache_race");
    let cache = ContentCache::open(&dir).unwrap();
    let payload = vec![7u8; 64 * 1024];

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| cache.write_bytes("same.bin", &payload).unwrap());
        }
    });
    assert_eq!(cache.read_bytes("same.bin").unwrap(), payload);
    assert_eq!(cache.list_by_prefix("").unwrap(), vec!["same.bin"]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn fetch_image_cached_defaults_name_and_fetches_once() {
    let dir = temp_dir("cache_fetch");
    let cache = ContentCache::open(&dir).unwrap();
    let source = StubSource {
        payload: Some(png_bytes()),
        fetched: Mutex::new(Vec::new()),
    };

    let url = "https://img.example/items/cid_1/icon.png?v=3#x";
    let first = cache.fetch_image_cached(url, None, &source).unwrap();
    assert!(cache.exists("icon.png"));
    let second = cache.fetch_image_cached(url, None, &source).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.pixel(1, 0), Some([0, 0, 255, 255]));
    assert_eq!(source.fetched.lock().unwrap().len(), 1);

    cache
        .fetch_image_cached(url, Some("cid_1.png"), &source)
        .unwrap();
    assert!(cache.exists("cid_1.png"));
    assert_eq!(source.fetched.lock().unwrap().len(), 2);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn failed_retrieval_leaves_no_entry() {
    let dir = temp_dir("cache_fetch_fail");
    let cache = ContentCache::open(&dir).unwrap();

    let failing = StubSource {
        payload: None,
        fetched: Mutex::new(Vec::new()),
    };
    let err = cache
        .fetch_image_cached("https://img.example/a.png", None, &failing)
        .unwrap_err();
    assert!(matches!(err, ShopframeError::Retrieval(_)));
    assert!(!cache.exists("a.png"));

    let garbage = StubSource {
        payload: Some(b"<html>oops</html>".to_vec()),
        fetched: Mutex::new(Vec::new()),
    };
    assert!(
        cache
            .fetch_image_cached("https://img.example/a.png", None, &garbage)
            .is_err()
    );
    assert!(cache.list_by_prefix("").unwrap().is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn url_basename_strips_query_and_fragment() {
    assert_eq!(url_basename("https://x/y/z.png?a=1").unwrap(), "z.png");
    assert_eq!(url_basename("z.png#frag").unwrap(), "z.png");
    assert!(url_basename("https://x/y/").is_err());
}
