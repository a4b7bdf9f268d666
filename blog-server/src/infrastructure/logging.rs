use crate::infrastructure::config::Environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
/// Local runs get colored output with thread and source locations.
pub fn init_logging(environment: Environment) {
    let default_filter = match environment {
        Environment::Local => "info,blog_server=debug,sqlx=warn",
        Environment::Production => "info,sqlx=warn",
    };
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let local = environment == Environment::Local;
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_ansi(local)
        .with_thread_ids(local)
        .with_thread_names(local)
        .with_file(local)
        .with_line_number(local);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    tracing::info!("Logging initialized ({:?})", environment);
}
