use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use shopframe::{CatalogSource as _, ShopConfig};

#[derive(Parser, Debug)]
#[command(name = "shopframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every page of a shop as PNG files.
    Render(RenderArgs),
    /// Print the page geometry and section assignment as JSON.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Shop catalog JSON.
    #[arg(long)]
    catalog: PathBuf,

    /// Drawing configuration JSON. Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Content cache directory.
    #[arg(long)]
    cache_dir: PathBuf,

    /// Directory holding static resources such as the currency icon.
    #[arg(long)]
    resources: PathBuf,

    /// TTF/OTF font used for all text.
    #[arg(long)]
    font: PathBuf,

    /// Output directory for `page-<i>.png`.
    #[arg(long)]
    out: PathBuf,

    /// Redraw entries and sections even when cached artifacts exist.
    #[arg(long, default_value_t = false)]
    ignore_cache: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Shop catalog JSON.
    #[arg(long)]
    catalog: PathBuf,

    /// Drawing configuration JSON. Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ShopConfig> {
    match path {
        Some(path) => Ok(ShopConfig::from_path(path)?),
        None => Ok(ShopConfig::default()),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let font = std::fs::read(&args.font)
        .with_context(|| format!("read font '{}'", args.font.display()))?;
    let shaper = shopframe::ParleyShaper::new(font)?;
    let cache = shopframe::ContentCache::open(&args.cache_dir)?;
    let assets = shopframe::HttpAssetSource::new(&args.resources);

    let renderer = shopframe::ShopRenderer::new(
        config,
        cache,
        Arc::new(assets),
        Arc::new(shaper),
        shopframe::RendererOptions {
            threads: args.threads,
            catalog: Some(Arc::new(shopframe::JsonCatalogFile::new(&args.catalog))),
        },
    )?;
    let rendered = renderer.render_shop(None, args.ignore_cache)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;
    for (index, page) in rendered.pages.iter().enumerate() {
        match page {
            Ok(surface) => {
                let path = args.out.join(shopframe::page_cache_name(index));
                std::fs::write(&path, surface.encode_png()?)
                    .with_context(|| format!("write png '{}'", path.display()))?;
                eprintln!("wrote {}", path.display());
            }
            Err(e) => eprintln!("page {index} failed: {e}"),
        }
    }

    let failed = rendered.failed_pages();
    if failed > 0 {
        anyhow::bail!("{failed} of {} pages failed", rendered.pages.len());
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let shop = shopframe::JsonCatalogFile::new(&args.catalog).current_shop()?;
    let geometry = shopframe::PageGeometry::for_shop(&shop, &config)?;
    let pages: Vec<Vec<&str>> = if shop.sections().is_empty() {
        Vec::new()
    } else {
        shopframe::assign_pages(shop.sections(), &geometry.pagination)?
            .into_iter()
            .map(|page| page.iter().map(|s| s.id()).collect())
            .collect()
    };

    let plan = serde_json::json!({
        "fingerprint": shop.fingerprint(),
        "geometry": geometry,
        "page_height": pages
            .iter()
            .map(|p| shopframe::page_height(p.len(), &config))
            .collect::<Vec<_>>(),
        "pages": pages,
    });
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
