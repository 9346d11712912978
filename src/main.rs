use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use hashtag_vectorizer::config;
use hashtag_vectorizer::{HashtagRecommender, SnapshotCache};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hashtag-vectorizer", about = "Recommend hashtags for text from a labeled CSV corpus")]
struct Args {
    /// Directory holding the labeled `*.csv` files
    #[arg(short, long, default_value = config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Directory for the fitted snapshot cache
    #[arg(short, long, default_value = config::DEFAULT_CACHE_DIR)]
    cache_dir: PathBuf,

    /// Restrict the corpus to the file matching this topic (always refits)
    #[arg(short, long)]
    topic: Option<String>,

    /// Number of hashtags to print per query
    #[arg(short = 'n', long, default_value_t = config::DEFAULT_TOP_N)]
    top_n: usize,

    /// Neither read nor write the snapshot cache
    #[arg(long, default_value_t = false)]
    no_cache: bool,

    /// Delete the snapshot cache and refit from the data directory
    #[arg(long, default_value_t = false)]
    rebuild: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hashtag_vectorizer=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    println!("Initializing hashtag recommender...");
    let cache = (!args.no_cache).then(|| SnapshotCache::new(&args.cache_dir));
    if let (Some(cache), true) = (&cache, args.rebuild) {
        cache.clear()?;
    }
    let mut recommender: HashtagRecommender = HashtagRecommender::new();
    recommender.initialize(&args.data_dir, cache.as_ref(), args.topic.as_deref())?;
    println!("Ready to recommend hashtags!");
    println!("\nEnter text to get hashtag recommendations (or 'quit' to exit)");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\n> ");
        stdout.flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("quit") {
            break;
        }

        match recommender.recommend(text, args.top_n) {
            Ok(tags) => {
                println!("\nRecommended hashtags:");
                for tag in tags.keys() {
                    println!("  {tag}");
                }
            }
            Err(e) => println!("Error: {e}"),
        }
    }
    Ok(())
}
