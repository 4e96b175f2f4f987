use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map `ER_LOG_LEVEL` spellings onto a tracing level, defaulting to info
pub fn level_from_str(level: &str) -> &'static str {
    match level.trim().to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

pub fn default_directives(level: &str) -> String {
    let level = level_from_str(level);
    format!(
        "er_cloudflare_account={},import_tfstate={},reqwest=warn,hyper=warn",
        level, level
    )
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `ER_LOG_LEVEL`.
pub fn init_logging() {
    let log_level = std::env::var("ER_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(&log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!(level_from_str("DEBUG"), "debug");
        assert_eq!(level_from_str("warning"), "warn");
        assert_eq!(level_from_str("verbose"), "info");
    }

    #[test]
    fn test_default_directives() {
        assert_eq!(
            default_directives("error"),
            "er_cloudflare_account=error,import_tfstate=error,reqwest=warn,hyper=warn"
        );
    }
}
