// SPDX-License-Identifier: MIT
//
// Foliant — interactive PDF toolbox for the terminal.
//
// Entry point. Initialises logging, resolves the shell mode from stdin, and
// runs the menu loop until the user exits.

mod menu;
mod ops;
mod output;
mod samples;
mod shell;

use std::io::IsTerminal;

use foliant_core::AppConfig;

use output::ConsoleSink;
use shell::{Shell, ShellMode};

fn main() {
    // Diagnostics go to stderr and stay quiet by default; the menu owns
    // stdout. RUST_LOG overrides the level as usual.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Foliant starting");

    let mode = if std::io::stdin().is_terminal() {
        ShellMode::Interactive
    } else {
        ShellMode::Piped
    };

    let sink = ConsoleSink::new();
    let stdin = std::io::stdin();
    let mut shell = Shell::new(stdin.lock(), &sink, AppConfig::default(), mode);
    shell.run();
}
