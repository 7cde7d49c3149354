mod tools;
mod workspace;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use workspace::Workspace;

#[derive(Parser)]
#[command(name = "atpath", version, about = "Resolve and maintain @path references in a notes directory")]
struct Opts {
    /// Root directory of the notes corpus.
    #[arg(long, short, env = "ATPATH_DIR", default_value = ".")]
    dir: PathBuf,

    /// TOML config file (marker, suggestion_limit, document_extensions).
    #[arg(long, env = "ATPATH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the @path references of a document and where they point.
    Refs {
        file: String,
        #[arg(long)]
        json: bool,
    },

    /// Suggest completions for `@QUERY` typed inside a document.
    Suggest {
        file: String,
        #[arg(default_value = "")]
        query: String,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },

    /// Print the corpus path a reference in FILE points to.
    Resolve { file: String, capture: String },

    /// Show backlinks and forward links of a document.
    Links { file: String },

    /// Move a file or folder and rewrite every reference to it.
    Mv { old_path: String, new_path: String },
}

fn run(opts: Opts) -> Result<String> {
    let mut ws = Workspace::open(&opts.dir, opts.config.as_deref())?;
    match opts.command {
        Command::Refs { file, json } => tools::refs::execute(&ws, &file, json),
        Command::Suggest {
            file,
            query,
            limit,
            json,
        } => tools::suggest::execute(&ws, &file, &query, limit, json),
        Command::Resolve { file, capture } => tools::resolve::execute(&ws, &file, &capture),
        Command::Links { file } => tools::get_links::execute(&ws, &file),
        Command::Mv { old_path, new_path } => {
            tools::move_doc::execute(&mut ws, &old_path, &new_path)
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    match run(opts) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}
