use std::path::{Path, PathBuf};

use anyhow::Context as _;
use carddiv::{
    CarddivConfig, DeckCache, RenderOpts, Spread, SpreadRenderer, SpreadRequest, catalogue_json,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "carddiv", version)]
struct Cli {
    /// Settings JSON. Flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the deck archives.
    #[arg(long, global = true)]
    decks: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one spread as a JPEG.
    Render(RenderArgs),
    /// Render several spreads of the same layout in parallel.
    Batch(BatchArgs),
    /// Print the layout catalogue as JSON.
    Layouts,
    /// List the deck archives available under the deck directory.
    Decks,
}

#[derive(Args, Debug)]
struct SpreadArgs {
    /// Layout to draw.
    #[arg(value_enum)]
    layout: LayoutChoice,

    /// Deck name (with or without `.zip`).
    #[arg(long, default_value = "Lenormand")]
    deck: String,

    /// Spread width in pixels. Defaults to the configured width.
    #[arg(long)]
    width: Option<u32>,

    /// Cards in a row spread.
    #[arg(long, default_value_t = 3)]
    cards: usize,

    /// Percentage of each row card left showing.
    #[arg(long, default_value_t = 100)]
    pct: u32,

    /// Seed for a reproducible draw.
    #[arg(long)]
    seed: Option<u64>,

    /// Never reverse cards.
    #[arg(long)]
    no_reverse: bool,

    /// JPEG quality (1..=100). Defaults to the configured quality.
    #[arg(long)]
    quality: Option<u8>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    spread: SpreadArgs,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct BatchArgs {
    #[command(flatten)]
    spread: SpreadArgs,

    /// Number of spreads to render.
    #[arg(long)]
    count: usize,

    /// Worker threads. Defaults to the configured count.
    #[arg(long)]
    threads: Option<usize>,

    /// Output directory; files are named `<layout>-<n>.jpg`.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutChoice {
    Row,
    Celtic,
    Houses,
    Tableau,
}

impl SpreadArgs {
    fn spread(&self) -> Spread {
        match self.layout {
            LayoutChoice::Row => Spread::Row {
                cards: self.cards,
                showing_pct: self.pct,
            },
            LayoutChoice::Celtic => Spread::CelticCross,
            LayoutChoice::Houses => Spread::Houses,
            LayoutChoice::Tableau => Spread::GrandTableau,
        }
    }

    fn request(&self, cfg: &CarddivConfig) -> SpreadRequest {
        SpreadRequest::new(
            self.deck.clone(),
            self.width.unwrap_or(cfg.default_width),
            self.spread(),
        )
    }

    fn opts(&self, cfg: &CarddivConfig) -> RenderOpts {
        let mut opts = RenderOpts::from_config(cfg);
        if self.no_reverse {
            opts.allow_reversed = false;
        }
        if let Some(q) = self.quality {
            opts.jpeg_quality = q;
        }
        opts
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = load_config(cli.config.as_deref(), cli.decks)?;
    match cli.cmd {
        Command::Render(args) => cmd_render(&cfg, args),
        Command::Batch(args) => cmd_batch(&cfg, args),
        Command::Layouts => {
            println!("{}", catalogue_json()?);
            Ok(())
        }
        Command::Decks => {
            for name in carddiv::DeckLibrary::new(&cfg.deck_root).list()? {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>, decks: Option<PathBuf>) -> anyhow::Result<CarddivConfig> {
    let mut cfg = match path {
        Some(p) => CarddivConfig::from_json_file(p)?,
        None => CarddivConfig::default(),
    };
    if let Some(root) = decks {
        cfg.deck_root = root;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_render(cfg: &CarddivConfig, args: RenderArgs) -> anyhow::Result<()> {
    let cache = DeckCache::from_config(cfg);
    let renderer = SpreadRenderer::new(&cache, args.spread.opts(cfg));
    let req = args.spread.request(cfg);

    let bytes = match args.spread.seed {
        Some(seed) => renderer.render_jpeg(&req, &mut ChaCha8Rng::seed_from_u64(seed))?,
        None => renderer.render_jpeg(&req, &mut rand::thread_rng())?,
    };
    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_batch(cfg: &CarddivConfig, args: BatchArgs) -> anyhow::Result<()> {
    if args.count == 0 {
        anyhow::bail!("--count must be >= 1");
    }
    let mut opts = args.spread.opts(cfg);
    if args.threads.is_some() {
        opts.threads = args.threads;
    }

    let cache = DeckCache::from_config(cfg);
    let renderer = SpreadRenderer::new(&cache, opts);
    let req = args.spread.request(cfg);
    let reqs = vec![req; args.count];
    let seed = args.spread.seed.unwrap_or_else(rand::random);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let layout = reqs[0].spread.id();
    let results = renderer.render_batch(&reqs, seed)?;
    let mut failed = 0usize;
    for (i, result) in results.into_iter().enumerate() {
        let path = args.out_dir.join(format!("{layout}-{i:03}.jpg"));
        match result {
            Ok(bytes) => {
                std::fs::write(&path, &bytes)
                    .with_context(|| format!("write '{}'", path.display()))?;
            }
            Err(err) => {
                tracing::error!(spread = i, error = %err, "spread failed");
                failed += 1;
            }
        }
    }

    let stats = cache.stats();
    eprintln!(
        "wrote {} spreads to {} (seed {seed}, decks opened {})",
        args.count - failed,
        args.out_dir.display(),
        stats.opened
    );
    if failed > 0 {
        anyhow::bail!("{failed} of {} spreads failed", args.count);
    }
    Ok(())
}
