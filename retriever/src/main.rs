use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ranker::DEFAULT_TOP_K;
use retriever::{load_queries, prepare, rank_queries, summarize, write_results};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "retriever")]
#[command(about = "Rank documents against queries with a vector-space model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank every query in a query file
    Rank {
        /// Inverted index JSON file
        #[arg(long)]
        index: PathBuf,
        /// Query file, one `<id> <term> ...` line per query
        #[arg(long)]
        queries: PathBuf,
        /// Weighting scheme: binary, term-frequency (tf) or tfidf; anything else means binary
        #[arg(long, default_value = "binary")]
        weighting: String,
        /// Number of documents to return per query
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
        /// Results file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Reject indexes with zero counts or empty posting lists
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Print a JSON summary of the digested index
    Inspect {
        #[arg(long)]
        index: PathBuf,
        #[arg(long, default_value = "binary")]
        weighting: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank { index, queries, weighting, top_k, output, strict } => {
            let digest = prepare(&index, &weighting, strict)?;
            let queries = load_queries(&queries)?;
            let results = rank_queries(&digest, &queries, top_k);
            tracing::info!(queries = results.len(), top_k, "ranking complete");
            match output {
                Some(path) => {
                    let f = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
                    write_results(BufWriter::new(f), &results)
                }
                None => write_results(io::stdout().lock(), &results),
            }
        }
        Commands::Inspect { index, weighting } => {
            let digest = prepare(&index, &weighting, false)?;
            println!("{}", serde_json::to_string_pretty(&summarize(&digest))?);
            Ok(())
        }
    }
}
