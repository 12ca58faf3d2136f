use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::assets::decode::decode_image;
use crate::assets::source::AssetSource;
use crate::cache::store::ContentCache;
use crate::catalog::model::{Entry, Section};
use crate::config::model::ShopConfig;
use crate::foundation::error::{ShopframeError, ShopframeResult};
use crate::pipeline::settle::settle_all;
use crate::render::entry::{EntryInputs, draw_entry};
use crate::render::page::draw_page;
use crate::render::section::draw_section;
use crate::render::surface::Surface;
use crate::render::text::TextShaper;

/// Counters accumulated by a [`Compositor`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Entry tiles drawn from scratch.
    pub entries_drawn: u64,
    /// Entry tiles served from the cache.
    pub entries_cached: u64,
    /// Sections drawn from scratch.
    pub sections_drawn: u64,
    /// Sections served from the cache.
    pub sections_cached: u64,
    /// Pages drawn.
    pub pages_drawn: u64,
    /// Entries or sections that failed and were left as gaps.
    pub children_failed: u64,
}

#[derive(Default)]
struct Counters {
    entries_drawn: AtomicU64,
    entries_cached: AtomicU64,
    sections_drawn: AtomicU64,
    sections_cached: AtomicU64,
    pages_drawn: AtomicU64,
    children_failed: AtomicU64,
}

impl Counters {
    fn read(&self, take: bool) -> RenderStats {
        let get = |c: &AtomicU64| {
            if take {
                c.swap(0, Ordering::Relaxed)
            } else {
                c.load(Ordering::Relaxed)
            }
        };
        RenderStats {
            entries_drawn: get(&self.entries_drawn),
            entries_cached: get(&self.entries_cached),
            sections_drawn: get(&self.sections_drawn),
            sections_cached: get(&self.sections_cached),
            pages_drawn: get(&self.pages_drawn),
            children_failed: get(&self.children_failed),
        }
    }
}

fn bump(c: &AtomicU64, n: u64) {
    c.fetch_add(n, Ordering::Relaxed);
}

/// A rendered section or page.
#[derive(Clone, Debug)]
pub struct Rendered {
    /// Rendered pixels.
    pub surface: Surface,
    /// `false` when some child failed and left a gap; such renders are never persisted.
    pub complete: bool,
}

/// Cache-aware renderer for entries, sections and pages.
///
/// Entry tiles and sections are content-addressed as `<fingerprint>.png`. A complete render is
/// persisted and the persisted representation is returned, so a later cache hit yields the same
/// bytes. Children are rendered in parallel; a failed child leaves a gap and marks its parent
/// incomplete.
pub struct Compositor {
    config: Arc<ShopConfig>,
    cache: ContentCache,
    assets: Arc<dyn AssetSource>,
    shaper: Arc<dyn TextShaper>,
    currency_icon: Mutex<Option<Arc<Surface>>>,
    counters: Counters,
}

impl Compositor {
    /// Compositor drawing with `config` and storing artifacts in `cache`.
    pub fn new(
        config: Arc<ShopConfig>,
        cache: ContentCache,
        assets: Arc<dyn AssetSource>,
        shaper: Arc<dyn TextShaper>,
    ) -> Self {
        Self {
            config,
            cache,
            assets,
            shaper,
            currency_icon: Mutex::new(None),
            counters: Counters::default(),
        }
    }

    /// Drawing configuration.
    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// Artifact cache.
    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Counters accumulated since construction or the last reset.
    pub fn stats(&self) -> RenderStats {
        self.counters.read(false)
    }

    pub(crate) fn take_stats(&self) -> RenderStats {
        self.counters.read(true)
    }

    /// Render one entry tile, or return its cached artifact.
    #[tracing::instrument(skip_all, fields(entry = entry.id()))]
    pub fn render_entry(&self, entry: &Entry, ignore_cache: bool) -> ShopframeResult<Surface> {
        let key = format!("{}.png", entry.fingerprint());
        let dims = self.config.tile_dims(entry.tile_size());
        if let Some(hit) = self.lookup(&key, ignore_cache, dims.width, dims.height)? {
            bump(&self.counters.entries_cached, 1);
            tracing::debug!(key = %key, "entry served from cache");
            return Ok(hit);
        }

        let t0 = Instant::now();
        let image = self.cache.fetch_image_cached(
            entry.image_url(),
            Some(&entry.image_cache_name()),
            self.assets.as_ref(),
        )?;
        let icon = self.currency_icon()?;
        let tile = draw_entry(
            entry,
            &self.config,
            self.shaper.as_ref(),
            &EntryInputs {
                image: &image,
                currency_icon: &icon,
            },
        )?;
        let out = self.persist(&key, &tile)?;
        bump(&self.counters.entries_drawn, 1);
        tracing::debug!(key = %key, elapsed_ms = t0.elapsed().as_millis() as u64, "entry drawn");
        Ok(out)
    }

    /// Render a `width` x `height` section, or return its cached artifact.
    #[tracing::instrument(skip_all, fields(section = section.id()))]
    pub fn render_section(
        &self,
        section: &Section,
        width: u32,
        height: u32,
        ignore_cache: bool,
    ) -> ShopframeResult<Rendered> {
        let key = format!("{}.png", section.fingerprint());
        if let Some(hit) = self.lookup(&key, ignore_cache, width, height)? {
            bump(&self.counters.sections_cached, 1);
            tracing::debug!(key = %key, "section served from cache");
            return Ok(Rendered {
                surface: hit,
                complete: true,
            });
        }

        let t0 = Instant::now();
        let tiles = settle_all(section.entries(), |entry| {
            self.render_entry(entry, ignore_cache)
        });
        let mut failed = 0u64;
        for (entry, tile) in section.entries().iter().zip(&tiles) {
            if let Err(e) = tile {
                failed += 1;
                tracing::warn!(
                    section = section.id(),
                    entry = entry.id(),
                    error = %e,
                    "entry failed; leaving a gap"
                );
            }
        }
        let placed: Vec<Option<&Surface>> = tiles.iter().map(|t| t.as_ref().ok()).collect();
        let surface = draw_section(
            section,
            &self.config,
            self.shaper.as_ref(),
            width,
            height,
            &placed,
        )?;
        bump(&self.counters.sections_drawn, 1);
        bump(&self.counters.children_failed, failed);
        tracing::debug!(
            key = %key,
            entries = tiles.len(),
            failed,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "section drawn"
        );

        if failed > 0 {
            return Ok(Rendered {
                surface,
                complete: false,
            });
        }
        Ok(Rendered {
            surface: self.persist(&key, &surface)?,
            complete: true,
        })
    }

    /// Render page `index` of `total` from its sections. Pages are not persisted here.
    #[tracing::instrument(skip(self, sections, width, section_height, ignore_cache))]
    pub fn render_page(
        &self,
        sections: &[Section],
        index: usize,
        total: usize,
        width: u32,
        section_height: u32,
        ignore_cache: bool,
    ) -> ShopframeResult<Rendered> {
        let t0 = Instant::now();
        let rendered = settle_all(sections, |section| {
            self.render_section(section, width, section_height, ignore_cache)
        });

        let mut complete = true;
        let mut failed = 0u64;
        for (section, r) in sections.iter().zip(&rendered) {
            match r {
                Ok(r) => complete &= r.complete,
                Err(e) => {
                    complete = false;
                    failed += 1;
                    tracing::warn!(
                        section = section.id(),
                        error = %e,
                        "section failed; leaving a gap"
                    );
                }
            }
        }
        let rows: Vec<Option<&Surface>> = rendered
            .iter()
            .map(|r| r.as_ref().ok().map(|r| &r.surface))
            .collect();
        let surface = draw_page(
            &self.config,
            self.shaper.as_ref(),
            index,
            total,
            width,
            section_height,
            &rows,
        )?;
        bump(&self.counters.pages_drawn, 1);
        bump(&self.counters.children_failed, failed);
        tracing::debug!(
            complete,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "page drawn"
        );
        Ok(Rendered { surface, complete })
    }

    /// Cached artifact under `key` if present and of the expected size.
    ///
    /// An undecodable or wrongly-sized artifact is treated as a miss and will be overwritten.
    fn lookup(
        &self,
        key: &str,
        ignore_cache: bool,
        width: u32,
        height: u32,
    ) -> ShopframeResult<Option<Surface>> {
        if ignore_cache {
            return Ok(None);
        }
        match self.cache.read_image(key) {
            Ok(hit) if hit.width() == width && hit.height() == height => Ok(Some(hit)),
            Ok(hit) => {
                tracing::debug!(
                    key = %key,
                    cached = ?(hit.width(), hit.height()),
                    wanted = ?(width, height),
                    "cached artifact has stale dimensions"
                );
                Ok(None)
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(ShopframeError::Render(msg)) => {
                tracing::warn!(key = %key, error = %msg, "discarding undecodable cached artifact");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn persist(&self, key: &str, surface: &Surface) -> ShopframeResult<Surface> {
        let png = self.cache.write_image(key, surface)?;
        decode_image(&png)
    }

    fn currency_icon(&self) -> ShopframeResult<Arc<Surface>> {
        let mut slot = self
            .currency_icon
            .lock()
            .map_err(|_| ShopframeError::render("currency icon lock poisoned"))?;
        if let Some(icon) = slot.as_ref() {
            return Ok(Arc::clone(icon));
        }
        let name = &self.config.tile.currency.icon;
        let bytes = self.assets.resource(name)?;
        let icon = decode_image(&bytes)
            .map_err(|e| ShopframeError::retrieval(format!("decode currency icon '{name}': {e}")))?;
        let icon = Arc::new(icon);
        *slot = Some(Arc::clone(&icon));
        Ok(icon)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
