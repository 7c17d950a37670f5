mod blocks;
mod commands;
mod config;
mod diagnosis;
mod diagnostics;
mod diagram;
mod error;
mod export;
mod info;
mod inline;
mod page;
mod rules;
mod scanner;
mod seo;
mod styles;
mod types;
mod watch;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::commands::{ExportRequest, PageFormat, ScoreRequest};
use crate::types::Platform;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "BLOGPORT_LOG";

#[derive(Parser)]
#[command(name = "blogport", version, about = "Markdown blog posts to platform-styled HTML, with SEO scoring")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log debug output to stderr (`BLOGPORT_LOG` overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every configured post to a directory
    Batch {
        /// Output directory
        #[arg(long, default_value = "dist")]
        out_dir: PathBuf,
        /// Target platform (defaults to the config, then naver)
        #[arg(long, value_enum)]
        platform: Option<Platform>,
    },
    /// Print the render tree of a post as JSON
    Blocks {
        /// Markdown post
        file: PathBuf,
    },
    /// Render a post as inline-styled HTML for one platform
    Export {
        /// Markdown post
        file: PathBuf,
        /// Header image: URL, data URI or local image file
        #[arg(long)]
        header_image: Option<String>,
        /// Print HTML and the markdown fallback as JSON
        #[arg(long)]
        json: bool,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Target platform (defaults to the config, then naver)
        #[arg(long, value_enum)]
        platform: Option<Platform>,
        /// Post title (defaults to the first `# ` heading, then the file name)
        #[arg(long)]
        title: Option<String>,
    },
    /// Output comprehensive reference for humans and LLM agents
    Info {
        /// Output as JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
    /// Write a standalone HTML page, markdown file or plain text
    Page {
        /// Markdown post
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "html")]
        format: PageFormat,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Post title
        #[arg(long)]
        title: Option<String>,
    },
    /// Score a post for SEO (exit 1 when below `fail_below`)
    Score {
        /// Markdown post
        file: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Target keyword
        #[arg(long, default_value = "")]
        keyword: String,
        /// JSON file with deep-analysis suggestions
        #[arg(long)]
        suggestions: Option<PathBuf>,
        /// Post title
        #[arg(long)]
        title: Option<String>,
    },
    /// Re-export a post whenever it changes
    Watch {
        /// Markdown post
        file: PathBuf,
        /// Output HTML file
        #[arg(long)]
        out: PathBuf,
        /// Target platform (defaults to the config, then naver)
        #[arg(long, value_enum)]
        platform: Option<Platform>,
    },
}

/// Install the stderr log subscriber.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_err| return tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    return match run(cli.command).await {
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(3)
        },
        Ok(code) => code,
    };
}

/// Dispatch a subcommand.
///
/// # Errors
///
/// Returns whatever the subcommand returns; `main` renders it.
async fn run(command: Commands) -> Result<ExitCode, error::Error> {
    let root = Path::new(".");

    match command {
        Commands::Batch { out_dir, platform } => {
            let config = config::Config::load(root)?;
            return commands::batch(root, platform, &out_dir, &config).await;
        },
        Commands::Blocks { file } => commands::blocks(&file)?,
        Commands::Export { file, header_image, json, out, platform, title } => {
            let config = config::Config::load(root)?;
            let request = ExportRequest {
                file: &file,
                header_image: header_image.as_deref(),
                json,
                out: out.as_deref(),
                platform,
                title: title.as_deref(),
            };
            commands::export(&request, &config).await?;
        },
        Commands::Info { json } => commands::info(json),
        Commands::Page { file, format, out, title } => {
            commands::page(&file, title.as_deref(), format, out.as_deref())?;
        },
        Commands::Score { file, json, keyword, suggestions, title } => {
            let config = config::Config::load(root)?;
            let request = ScoreRequest {
                file: &file,
                json,
                keyword: &keyword,
                suggestions: suggestions.as_deref(),
                title: title.as_deref(),
            };
            return commands::score(&request, &config);
        },
        Commands::Watch { file, out, platform } => {
            let config = config::Config::load(root)?;
            let platform = commands::resolve_platform(platform, &config);
            watch::run(&file, platform, &out, &config).await?;
        },
    }

    return Ok(ExitCode::SUCCESS);
}
