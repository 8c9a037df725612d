use anyhow::{Context, Result, anyhow};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

pub struct LogConfig {
    pub filter: String,
}

/// Line layout of the log output. Fixed for the life of the process.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    /// One JSON object per line, for log shippers.
    Json,
}

/// Global subscriber whose filter can be swapped once settings are loaded.
pub struct Logger {
    filter_handle: reload::Handle<EnvFilter, Registry>,
}

impl Logger {
    /// Installs the global subscriber. `RUST_LOG` wins over `default_filter`
    /// until [`Logger::reload_from_config`] runs.
    pub fn new_bootstrap(default_filter: &str, format: LogFormat) -> Result<Self> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => parse_filter(default_filter)?,
        };
        let (filter, filter_handle) = reload::Layer::new(filter);

        let output = match format {
            LogFormat::Full => fmt::layer().with_target(true).boxed(),
            LogFormat::Compact => fmt::layer().compact().with_target(false).boxed(),
            LogFormat::Json => fmt::layer().json().flatten_event(true).boxed(),
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(output)
            .try_init()
            .context("install global subscriber")?;

        Ok(Self { filter_handle })
    }

    pub fn reload_from_config(&self, config: &LogConfig) -> Result<()> {
        let filter = parse_filter(&config.filter)?;
        self.filter_handle.reload(filter).map_err(|e| anyhow!(e))?;
        tracing::debug!(filter = %config.filter, "log filter reloaded");
        Ok(())
    }
}

fn parse_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter).with_context(|| format!("invalid log filter {filter:?}"))
}
