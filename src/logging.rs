use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging based on verbosity level
pub fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("bteb_results=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bteb_results=warn"))
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if verbose {
        tracing::info!("Verbose logging enabled");
    }

    Ok(())
}

/// Log result-service requests
pub fn log_http_request(method: &str, url: &str, status: Option<u16>) {
    if let Some(status_code) = status {
        tracing::info!(
            method = method,
            url = url,
            status = status_code,
            "HTTP request completed"
        );
    } else {
        tracing::debug!(method = method, url = url, "HTTP request initiated");
    }
}

/// Log result cache hits, misses and writes
pub fn log_cache_event(key: &str, event: &str) {
    tracing::debug!(key = key, event = event, "Result cache");
}

/// Log a lookup outcome without the full payload
pub fn log_result_lookup(roll: &str, regulation: &str, success: bool) {
    if success {
        tracing::info!(roll = roll, regulation = regulation, "Result found");
    } else {
        tracing::warn!(roll = roll, regulation = regulation, "Result lookup failed");
    }
}

pub fn log_performance(operation: &str, duration_ms: u64) {
    tracing::debug!(
        operation = operation,
        duration_ms = duration_ms,
        "Operation performance"
    );
}
