use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use geochunk_core::{ChunkKey, Direction};
use geochunk_storage::{CacheError, ChunkCache, JsonFileCache};
use geochunk_stream::{GenerationMode, StreamingConfig, TraversalController};

#[derive(Parser)]
#[command(
    name = "geochunk",
    about = "Deterministic geographic chunk streaming with an on-disk cache"
)]
pub struct Args {
    /// JSON file with a StreamingConfig; flags below override it
    #[arg(long, env = "GEOCHUNK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache root. Without it chunks only live in memory
    #[arg(short, long, env = "GEOCHUNK_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Draw content from a random stream instead of the key's seed
    #[arg(long, env = "GEOCHUNK_NON_DETERMINISTIC")]
    pub non_deterministic: bool,

    /// Print the streaming report when done
    #[arg(long)]
    pub report: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Clone, Copy)]
pub struct KeyArgs {
    #[arg(allow_hyphen_values = true)]
    pub latitude: i32,
    #[arg(allow_hyphen_values = true)]
    pub longitude: i32,
    #[arg(allow_hyphen_values = true)]
    pub level_of_detail: i32,
}

impl From<KeyArgs> for ChunkKey {
    fn from(args: KeyArgs) -> Self {
        ChunkKey::new(args.latitude, args.longitude, args.level_of_detail)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Page a chunk in and print it
    Request {
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Page a chunk in, unload it, and print the unloaded chunk
    Unload {
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Print the cached record for a key, if any
    Show {
        #[command(flatten)]
        key: KeyArgs,
    },
    /// Start at a key and step through directions (n/s/e/w)
    Walk {
        #[command(flatten)]
        key: KeyArgs,
        #[arg(required = true)]
        directions: Vec<String>,
    },
}

fn load_config(args: &Args) -> Result<StreamingConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => StreamingConfig::default(),
    };
    if args.cache_dir.is_some() {
        config.cache_dir = args.cache_dir.clone();
    }
    if args.non_deterministic {
        config.mode = GenerationMode::NonDeterministic;
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(&args)?;
    log::info!("Streaming config: {}", config.summary());

    let service = config.build().context("Failed to open chunk cache")?;

    match &args.command {
        Command::Request { key } => {
            let chunk = service.request_chunk((*key).into())?;
            println!("{}", serde_json::to_string_pretty(&chunk)?);
        }
        Command::Unload { key } => {
            let key = ChunkKey::from(*key);
            service.request_chunk(key)?;
            let chunk = service.unload_chunk(key)?;
            println!("{}", serde_json::to_string_pretty(&chunk)?);
        }
        Command::Show { key } => {
            let key = ChunkKey::from(*key);
            let dir = config
                .cache_dir
                .as_ref()
                .context("`show` needs a cache directory (--cache-dir)")?;
            let cache = JsonFileCache::open(dir)?;
            match cache.load(&key) {
                Ok(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                Err(CacheError::NotFound { .. }) => println!("No cached record for chunk {}", key),
                Err(e) => return Err(e).context("Failed to read cache record"),
            }
        }
        Command::Walk { key, directions } => {
            let directions = directions
                .iter()
                .map(|d| Direction::parse(d).with_context(|| format!("Unknown direction '{}'", d)))
                .collect::<Result<Vec<_>>>()?;
            let origin = ChunkKey::from(*key);
            service.request_chunk(origin)?;
            let mut controller = TraversalController::new(origin);
            for visited in controller.walk(&service, directions)? {
                println!("{}", visited);
            }
        }
    }

    if args.report {
        println!("{}", service.metrics().generate_report());
    }
    Ok(())
}
