//! chatmeme - 聊天记录表情包生成器
//!
//! ```bash
//! # 上传聊天记录并交互式生成
//! chatmeme run WhatsApp-Chat.zip
//!
//! # 对已上传的聊天直接生成
//! chatmeme generate "meme about @Dana being late" --open
//!
//! # 查看剩余次数
//! chatmeme quota
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use chatmeme_lib::commands::{generate_cmd, ingest_cmd, ping_cmd, quota_cmd, run_cmd, suggest_cmd};
use chatmeme_lib::config::{self, expand_tilde, Config};
use chatmeme_lib::logger;

/// Turn a group chat export into memes
#[derive(Parser)]
#[command(name = "chatmeme")]
#[command(about = "Upload a chat export and generate memes grounded in it")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default ~/.chatmeme/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Backend base URL, overrides config and environment
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// User identity for quota counting
    #[arg(short, long, global = true)]
    user: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is reachable
    Ping,
    /// Upload a .txt or .zip chat export
    Ingest {
        /// Chat export file
        file: PathBuf,
    },
    /// Generate a meme from a prompt
    Generate {
        /// What the meme should be about
        prompt: String,
        /// Where to save the image
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Open the image after saving
        #[arg(long)]
        open: bool,
    },
    /// Show @mention suggestions for a prompt
    Suggest {
        /// Prompt text
        text: String,
        /// Cursor position in characters (default: end of text)
        #[arg(long)]
        cursor: Option<usize>,
        /// Participant names, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        names: Vec<String>,
    },
    /// Upload a chat, then generate memes from prompts read on stdin
    Run {
        /// Chat export file
        file: PathBuf,
        /// Directory for generated images
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Preview each image with the system viewer
        #[arg(long)]
        open: bool,
    },
    /// Show used and remaining generations
    Quota,
}

fn load(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => config::load_config_from(&expand_tilde(path))?,
        None => config::load_config()?,
    };
    if let Some(url) = &cli.base_url {
        config.api.base_url = url.clone();
    }
    if let Some(user) = &cli.user {
        config.user_id = user.clone();
    }
    Ok(config::validate(config)?)
}

async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Ping => ping_cmd::ping(&config).await,
        Commands::Ingest { file } => ingest_cmd::ingest(&config, &file).await,
        Commands::Generate { prompt, out, open } => {
            generate_cmd::generate(&config, &prompt, out.as_deref(), open).await
        }
        Commands::Suggest {
            text,
            cursor,
            names,
        } => suggest_cmd::suggest_mentions(&text, cursor, &names),
        Commands::Run { file, out, open } => {
            run_cmd::run(&config, &file, out.as_deref(), open).await
        }
        Commands::Quota => quota_cmd::quota(&config).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    logger::init_logging(&config.logging);

    if let Err(e) = dispatch(cli, config).await {
        tracing::debug!("[MAIN] 命令失败: {:?}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
