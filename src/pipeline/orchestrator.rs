use std::sync::Arc;
use std::time::Instant;

use crate::assets::decode::decode_image;
use crate::assets::source::AssetSource;
use crate::cache::store::{ContentCache, TextEncoding};
use crate::catalog::model::{Section, Shop};
use crate::catalog::source::CatalogSource;
use crate::config::model::ShopConfig;
use crate::foundation::error::{ShopframeError, ShopframeResult};
use crate::layout::pages::{PageGeometry, assign_pages};
use crate::pipeline::settle::{build_thread_pool, settle_all};
use crate::render::compositor::{Compositor, RenderStats};
use crate::render::surface::Surface;
use crate::render::text::TextShaper;

/// Cache entry holding the fingerprint of the last fully rendered shop.
pub const LAST_SHOP_MARKER: &str = "last-shop";

const PAGE_PREFIX: &str = "page-";

/// Cache name of page `index`.
pub fn page_cache_name(index: usize) -> String {
    format!("{PAGE_PREFIX}{index}.png")
}

fn page_index(name: &str) -> Option<usize> {
    name.strip_prefix(PAGE_PREFIX)?
        .strip_suffix(".png")?
        .parse()
        .ok()
}

/// Options for [`ShopRenderer`].
#[derive(Clone, Default)]
pub struct RendererOptions {
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Where to get the shop when [`ShopRenderer::render_shop`] is called without one.
    pub catalog: Option<Arc<dyn CatalogSource>>,
}

/// Result of one [`ShopRenderer::render_shop`] call.
#[derive(Debug)]
pub struct RenderedShop {
    /// One slot per page, in page order. A failed page is an `Err` in its slot.
    pub pages: Vec<ShopframeResult<Surface>>,
    /// `true` when the pages were read back from a previous render.
    pub from_cache: bool,
    /// Work done by the compositor during this call.
    pub stats: RenderStats,
}

impl RenderedShop {
    /// Number of page slots that failed.
    pub fn failed_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.is_err()).count()
    }
}

/// Incremental shop renderer.
///
/// Pages are reused wholesale while the shop fingerprint matches the persisted marker. Otherwise
/// every page is re-rendered, reusing whatever entry and section artifacts are still cached.
pub struct ShopRenderer {
    compositor: Compositor,
    catalog: Option<Arc<dyn CatalogSource>>,
    pool: rayon::ThreadPool,
}

impl ShopRenderer {
    /// Validate `config` and build the worker pool.
    pub fn new(
        config: ShopConfig,
        cache: ContentCache,
        assets: Arc<dyn AssetSource>,
        shaper: Arc<dyn TextShaper>,
        opts: RendererOptions,
    ) -> ShopframeResult<Self> {
        config.validate()?;
        let pool = build_thread_pool(opts.threads)?;
        Ok(Self {
            compositor: Compositor::new(Arc::new(config), cache, assets, shaper),
            catalog: opts.catalog,
            pool,
        })
    }

    /// Compositor that draws and caches entries, sections and pages.
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Render `shop`, or the catalog source's current shop when `None`.
    #[tracing::instrument(skip(self, shop))]
    pub fn render_shop(
        &self,
        shop: Option<&Shop>,
        ignore_cache: bool,
    ) -> ShopframeResult<RenderedShop> {
        let t0 = Instant::now();
        let fetched;
        let shop = match shop {
            Some(shop) => shop,
            None => {
                let source = self.catalog.as_ref().ok_or_else(|| {
                    ShopframeError::config("no shop supplied and no catalog source configured")
                })?;
                fetched = source.current_shop()?;
                &fetched
            }
        };
        tracing::info!(
            shop = shop.fingerprint(),
            sections = shop.sections().len(),
            "rendering shop"
        );
        self.compositor.take_stats();

        if !ignore_cache && let Some(pages) = self.cached_pages(shop)? {
            tracing::info!(
                pages = pages.len(),
                elapsed_s = t0.elapsed().as_secs_f64(),
                "shop unchanged; serving cached pages"
            );
            return Ok(RenderedShop {
                pages: pages.into_iter().map(Ok).collect(),
                from_cache: true,
                stats: RenderStats::default(),
            });
        }

        let cache = self.compositor.cache();
        let stale = cache.list_by_prefix(PAGE_PREFIX)?;
        cache.delete_all(stale.iter().map(String::as_str).chain([LAST_SHOP_MARKER]))?;

        if shop.sections().is_empty() {
            cache.write_text(LAST_SHOP_MARKER, shop.fingerprint(), TextEncoding::Utf8)?;
            tracing::info!("shop has no sections; nothing to render");
            return Ok(RenderedShop {
                pages: Vec::new(),
                from_cache: false,
                stats: self.compositor.take_stats(),
            });
        }

        let geometry = PageGeometry::for_shop(shop, self.compositor.config())?;
        let groups: Vec<(usize, &[Section])> = assign_pages(shop.sections(), &geometry.pagination)?
            .into_iter()
            .enumerate()
            .collect();
        let total = groups.len();

        let outcomes = self.pool.install(|| {
            settle_all(&groups, |&(index, sections)| {
                self.render_and_persist_page(sections, index, total, &geometry, ignore_cache)
            })
        });

        let mut complete = true;
        let mut pages = Vec::with_capacity(total);
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok((surface, persisted)) => {
                    if !persisted {
                        complete = false;
                        tracing::warn!(page = index, "page has gaps; not cached");
                    }
                    pages.push(Ok(surface));
                }
                Err(e) => {
                    complete = false;
                    tracing::warn!(page = index, error = %e, "page failed");
                    pages.push(Err(e));
                }
            }
        }

        if complete {
            cache.write_text(LAST_SHOP_MARKER, shop.fingerprint(), TextEncoding::Utf8)?;
        }
        let stats = self.compositor.take_stats();
        tracing::info!(
            pages = total,
            complete,
            entries_drawn = stats.entries_drawn,
            entries_cached = stats.entries_cached,
            elapsed_s = t0.elapsed().as_secs_f64(),
            "shop rendered"
        );
        Ok(RenderedShop {
            pages,
            from_cache: false,
            stats,
        })
    }

    /// Render one page and persist it when it has no gaps. Returns the surface and whether it
    /// was persisted.
    fn render_and_persist_page(
        &self,
        sections: &[Section],
        index: usize,
        total: usize,
        geometry: &PageGeometry,
        ignore_cache: bool,
    ) -> ShopframeResult<(Surface, bool)> {
        let page = self.compositor.render_page(
            sections,
            index,
            total,
            geometry.width,
            geometry.section_height,
            ignore_cache,
        )?;
        if !page.complete {
            return Ok((page.surface, false));
        }
        let png = self
            .compositor
            .cache()
            .write_image(&page_cache_name(index), &page.surface)?;
        Ok((decode_image(&png)?, true))
    }

    /// Previously rendered pages, when the marker matches `shop` and pages `0..n` are all
    /// present and readable.
    fn cached_pages(&self, shop: &Shop) -> ShopframeResult<Option<Vec<Surface>>> {
        let cache = self.compositor.cache();
        let marker = match cache.read_text(LAST_SHOP_MARKER, TextEncoding::Utf8) {
            Ok(marker) => marker,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => {
                tracing::warn!(error = %e, "shop marker unreadable; re-rendering");
                return Ok(None);
            }
        };
        if marker.trim() != shop.fingerprint() {
            tracing::debug!(previous = marker.trim(), "shop fingerprint changed");
            return Ok(None);
        }

        let mut names: Vec<(usize, String)> = cache
            .list_by_prefix(PAGE_PREFIX)?
            .into_iter()
            .filter_map(|name| page_index(&name).map(|i| (i, name)))
            .collect();
        if names.is_empty() {
            return Ok(None);
        }
        names.sort_by_key(|(i, _)| *i);
        if names.iter().enumerate().any(|(pos, (i, _))| pos != *i) {
            tracing::warn!("cached pages are not contiguous; re-rendering");
            return Ok(None);
        }

        let mut pages = Vec::with_capacity(names.len());
        for (_, name) in &names {
            match cache.read_image(name) {
                Ok(page) => pages.push(page),
                Err(e) => {
                    tracing::warn!(name = %name, error = %e, "cached page unreadable; re-rendering");
                    return Ok(None);
                }
            }
        }
        Ok(Some(pages))
    }
}
