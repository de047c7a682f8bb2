// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lazydevd`: the daemon binary. Not a verb-based CLI — the interactive
//! wizard, YAML editing, and shell completions are explicitly out of scope
//! (spec.md §1); this binary takes only an optional `--config` override.

use clap::Parser;
use lazydev_daemon::Paths;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lazydevd", about = "Scale-to-zero reverse proxy for dev servers")]
struct Cli {
    /// Override the config file path (default: ~/.config/lazydev/config.yaml).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let paths = Paths::resolve(cli.config);

    if let Err(e) = std::fs::create_dir_all(&paths.state_dir) {
        eprintln!("failed to create state directory {}: {e}", paths.state_dir.display());
        std::process::exit(1);
    }

    let _logging_guard = match lazydev_daemon::logging::init(&paths.log_path) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("failed to initialize logging at {}: {e}", paths.log_path.display());
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    let exit_code = runtime.block_on(async move {
        match lazydev_daemon::run(paths).await {
            Ok(()) => 0,
            Err(e) => {
                tracing::error!(error = %e, "daemon exited with an error");
                1
            }
        }
    });

    std::process::exit(exit_code);
}
