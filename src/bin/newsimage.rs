//! CLI binary for newsimage.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `GeneratorConfig` and the stores, then prints results.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use newsimage::{
    CategorizedTerms, GenerationOutput, GenerationProgressCallback, GeneratorConfig, HttpArticleStore, ImageGenerator,
    Inspection, LocalImageStore, ProgressCallback, Slot, StoredImage, Strategy, UnsplashConfig,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner plus one log line per finished stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Generating");
        bar.set_message("Reading title…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl GenerationProgressCallback for CliProgressCallback {
    fn on_generation_start(&self, title: &str) {
        self.bar.println(format!("{} {}", cyan("◆"), bold(title)));
    }

    fn on_terms_extracted(&self, terms: &CategorizedTerms) {
        self.bar.println(format!(
            "  {} people {:?}  locations {:?}  objects {:?}",
            dim("·"),
            terms.people,
            terms.locations,
            terms.objects
        ));
        self.bar.set_message("Planning searches…");
    }

    fn on_strategy_planned(&self, _strategy: &Strategy) {
        self.bar.set_message("Searching photos…");
    }

    fn on_slot_resolved(&self, slot: Slot, found: bool) {
        let mark = if found { green("✓") } else { dim("–") };
        self.bar.println(format!("  {} {:<10} {}", mark, slot.to_string(), dim(if found { "photo" } else { "none" })));
    }

    fn on_composed(&self, bytes: usize) {
        self.bar.println(format!("  {} composed {}", green("✓"), dim(&format!("{bytes} bytes"))));
        self.bar.set_message("Saving…");
    }

    fn on_stored(&self, locator: &str) {
        self.bar.println(format!("  {} stored {}", green("✓"), dim(locator)));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Show extracted terms and search plan (no API key needed)
  newsimage plan "Prime Minister Visits New York"

  # Compose an image for a headline
  newsimage compose "Prime Minister Visits New York" -o news.jpg

  # Generate (or reuse) the stored image for article 42
  newsimage article 42

  # Force regeneration, serve from a CDN base URL
  newsimage article 42 --force --public-url https://cdn.example.com/generated

  # Remove a stored image
  newsimage delete 42

ENVIRONMENT VARIABLES:
  UNSPLASH_ACCESS_KEY   Unsplash API access key (required for compose/article)
  ARTICLES_API_URL      Article list endpoint
  NEWSIMAGE_DIR         Directory for stored images (default public/generated)
  RUST_LOG              Override log filter
"#;

/// Generate captioned news images from headlines.
#[derive(Parser, Debug)]
#[command(
    name = "newsimage",
    version,
    about = "Generate captioned news images from headlines",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "NEWSIMAGE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "NEWSIMAGE_QUIET")]
    quiet: bool,

    /// Disable the progress spinner.
    #[arg(long, global = true, env = "NEWSIMAGE_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print extracted terms and the search strategy for a title.
    Plan {
        title: String,

        /// Output JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Compose an image for a title and write it to a file.
    Compose {
        title: String,

        /// Output JPEG path.
        #[arg(short, long, default_value = "news.jpg")]
        output: PathBuf,

        /// Print a JSON report (strategy, photos, stats) to stdout.
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        gen: GenArgs,
    },

    /// Return the stored image for an article, generating it if needed.
    Article {
        id: u64,

        /// Regenerate even if an image is already stored.
        #[arg(long)]
        force: bool,

        /// Article list endpoint.
        #[arg(long, env = "ARTICLES_API_URL", default_value = newsimage::articles::DEFAULT_ARTICLES_URL)]
        articles_url: String,

        #[command(flatten)]
        store: StoreArgs,

        #[command(flatten)]
        gen: GenArgs,
    },

    /// Delete the stored image for an article.
    Delete {
        id: u64,

        #[command(flatten)]
        store: StoreArgs,
    },
}

#[derive(Args, Debug)]
struct GenArgs {
    /// Unsplash access key.
    #[arg(long, env = "UNSPLASH_ACCESS_KEY", hide_env_values = true)]
    access_key: Option<String>,

    /// Unsplash API base URL.
    #[arg(long, env = "UNSPLASH_API_URL", default_value = newsimage::transport::unsplash::DEFAULT_API_URL)]
    api_url: String,

    /// Candidates requested per search (1–30).
    #[arg(long, env = "NEWSIMAGE_PER_PAGE", default_value_t = 5)]
    per_page: u32,

    /// JPEG quality (1–100).
    #[arg(long, env = "NEWSIMAGE_QUALITY", default_value_t = 90)]
    quality: u8,

    /// Extra directory of .ttf/.otf fonts for the caption.
    #[arg(long, env = "NEWSIMAGE_FONT_DIR")]
    font_dir: Option<PathBuf>,

    /// Run the photo searches and downloads one after another.
    #[arg(long)]
    sequential: bool,
}

#[derive(Args, Debug)]
struct StoreArgs {
    /// Directory for stored images.
    #[arg(long, env = "NEWSIMAGE_DIR", default_value = newsimage::storage::DEFAULT_IMAGE_DIR)]
    dir: PathBuf,

    /// Public base URL reported instead of the file path.
    #[arg(long, env = "NEWSIMAGE_PUBLIC_URL")]
    public_url: Option<String>,
}

impl StoreArgs {
    fn store(&self) -> LocalImageStore {
        let store = LocalImageStore::new(self.dir.clone());
        match &self.public_url {
            Some(url) => store.with_public_base_url(url),
            None => store,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let generating = matches!(cli.command, Command::Compose { json: false, .. } | Command::Article { .. });
    let show_progress = generating && !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let progress = show_progress.then(CliProgressCallback::new);
    let progress_cb = progress.clone().map(|cb| cb as ProgressCallback);

    let result = run(cli.command, cli.quiet, progress_cb).await;
    if let Some(p) = progress {
        p.finish();
    }
    result
}

async fn run(command: Command, quiet: bool, progress: Option<ProgressCallback>) -> Result<()> {
    match command {
        // ── Plan ─────────────────────────────────────────────────────────
        Command::Plan { title, json } => {
            let terms = newsimage::extract(&title);
            let strategy = newsimage::plan(&terms);
            let report = Inspection { title, terms, strategy };
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("Failed to serialise plan")?
                );
            } else {
                print_inspection(&report);
            }
        }

        // ── Compose ──────────────────────────────────────────────────────
        Command::Compose {
            title,
            output,
            json,
            gen,
        } => {
            let generator = build_generator(&gen, progress)?;
            let result = generator.generate(&title).await.context("Generation failed")?;
            write_atomic(&output, &result.image.bytes).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report_json(&result, &output.display().to_string()))?);
            } else if !quiet {
                print_summary(&result, &output.display().to_string());
            }
        }

        // ── Article ──────────────────────────────────────────────────────
        Command::Article {
            id,
            force,
            articles_url,
            store,
            gen,
        } => {
            let articles = HttpArticleStore::new(articles_url).context("Failed to build article client")?;
            let generator = build_generator(&gen, progress)?
                .with_article_store(Arc::new(articles))
                .with_image_store(Arc::new(store.store()));

            let stored = if force {
                generator.regenerate_for_article(id).await
            } else {
                generator.generate_for_article(id).await
            }
            .with_context(|| format!("Failed to produce image for article {id}"))?;

            match &stored {
                StoredImage::Existing { locator, .. } => {
                    if !quiet {
                        eprintln!("{} cached", cyan("◆"));
                    }
                    println!("{locator}");
                }
                StoredImage::Generated { locator, output, .. } => {
                    if !quiet {
                        print_summary(output, locator);
                    }
                    println!("{locator}");
                }
            }
        }

        // ── Delete ───────────────────────────────────────────────────────
        Command::Delete { id, store } => {
            let store = store.store();
            let path = store.path_for(id);
            let removed = newsimage::ImageStore::delete(&store, id)
                .await
                .with_context(|| format!("Failed to delete {}", path.display()))?;
            if !quiet {
                if removed {
                    eprintln!("{} deleted {}", green("✔"), path.display());
                } else {
                    eprintln!("{} no image for article {}", red("✘"), id);
                }
            }
        }
    }
    Ok(())
}

/// Map CLI args to a generator backed by Unsplash.
fn build_generator(gen: &GenArgs, progress: Option<ProgressCallback>) -> Result<ImageGenerator> {
    let mut builder = GeneratorConfig::builder()
        .per_page(gen.per_page)
        .jpeg_quality(gen.quality)
        .concurrent_slots(!gen.sequential);
    if let Some(ref dir) = gen.font_dir {
        builder = builder.font_dir(dir.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    let key = gen.access_key.clone().unwrap_or_default();
    let mut unsplash = UnsplashConfig::new(key);
    unsplash.api_url = gen.api_url.clone();

    ImageGenerator::unsplash(config, unsplash).context("Failed to set up the photo index")
}

/// Write through a temp file so a crash never leaves a truncated image.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let tmp = path.with_extension("jpg.tmp");
    tokio::fs::write(&tmp, bytes)
        .await
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn print_inspection(report: &Inspection) {
    let slot = |s: &Option<newsimage::SearchSlot>| match s {
        Some(s) => format!("{} {}", s.query, dim(&format!("({})", s.kind))),
        None => dim("—"),
    };
    println!("Title:        {}", report.title);
    println!("People:       {:?}", report.terms.people);
    println!("Locations:    {:?}", report.terms.locations);
    println!("Objects:      {:?}", report.terms.objects);
    println!("General:      {:?}", report.terms.general);
    println!("Main:         {}", slot(&report.strategy.main_subject));
    println!("Secondary:    {}", slot(&report.strategy.secondary_subject));
    println!("Background:   {}", slot(&report.strategy.background));
}

fn print_summary(output: &GenerationOutput, locator: &str) {
    let stats = &output.stats;
    eprintln!(
        "{}  {} mode  {}/{} photos{}  {}ms  →  {}",
        green("✔"),
        stats.mode,
        stats.photos_downloaded,
        stats.photos_found,
        if stats.used_fallback { " (fallback)" } else { "" },
        stats.total_duration_ms,
        bold(locator),
    );
    let photos = output.photos();
    for slot in Slot::ALL {
        if let Some(p) = photos.get(slot) {
            eprintln!("   {:<10} {}", slot.to_string(), dim(&format!("Photo by {} ({})", p.photographer, p.photographer_url)));
        }
    }
}

fn report_json(output: &GenerationOutput, locator: &str) -> serde_json::Value {
    serde_json::json!({
        "output": locator,
        "terms": output.terms,
        "strategy": output.strategy,
        "photos": output.photos(),
        "stats": output.stats,
    })
}
