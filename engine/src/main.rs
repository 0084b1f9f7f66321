// Forbid unwrap() in production code to prevent panics on bad input.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use std::io::{BufRead, Write};

use btree_engine::{CommandSession, DEFAULT_SESSION_ID, EngineConfig, SessionRegistry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Logs go to stderr so stdout carries only JSON responses.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "btree_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from environment variables
    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: min_degree={}, session_ttl_secs={}",
        config.min_degree,
        config.session_ttl_secs
    );

    let registry = SessionRegistry::new(&config);
    let mut session = CommandSession::new(&registry, DEFAULT_SESSION_ID);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read input: {e}");
                std::process::exit(1);
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match registry.evict_expired() {
            Ok(0) => {}
            Ok(evicted) => tracing::debug!("evicted {evicted} idle sessions"),
            Err(e) => tracing::warn!("session eviction failed: {e}"),
        }

        let response = session.handle_line(&line);
        if let Err(e) = writeln!(stdout, "{}", response.to_json()) {
            tracing::debug!("output closed: {e}");
            return;
        }
    }
}
