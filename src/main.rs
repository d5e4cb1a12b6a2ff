use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use ttybbs::{Bbs, BbsOptions, BoardFile, Config, PostFile};

fn main() -> ExitCode {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    // Initialize logging
    if let Err(e) = ttybbs::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        ttybbs::logging::init_console_only(&config.logging.level);
    }

    let mut posts = PostFile::new(&config.storage.posts_dir);
    match config.encryption_cipher() {
        Ok(Some(cipher)) => {
            posts = posts.with_cipher(cipher);
            info!("Encryption enabled for post storage");
        }
        Ok(None) => {}
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    }

    let bbs = match Bbs::open(
        BbsOptions::from(&config.bbs),
        Arc::new(BoardFile::new(&config.storage.boards_file)),
        Arc::new(posts),
    ) {
        Ok(bbs) => bbs,
        Err(e) => {
            error!("Failed to open boards: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("ttybbs - multi-board bulletin board");
    for summary in bbs.list_boards() {
        info!(board = %summary.name, posts = summary.post_count, "Board ready");
    }

    ExitCode::SUCCESS
}
