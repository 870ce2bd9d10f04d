//! Logging and tracing setup

use crate::config::LoggingSettings;
use anyhow::Result;
use std::str::FromStr;
use tracing::{error, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(format!("unknown log format `{}`", other)),
        }
    }
}

/// Initialize logging; `RUST_LOG` wins over the configured level
pub fn initialize_logging(settings: &LoggingSettings) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format = settings.format.parse().unwrap_or(LogFormat::Pretty);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer(format, std::io::stdout))
        .try_init()?;

    Ok(())
}

fn fmt_layer<S, W>(format: LogFormat, writer: W) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(false).with_writer(writer).boxed(),
    }
}

/// Log the full cause chain of a fatal error, then hand the result back
pub fn report_failure<T>(result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        let cause = format!("{:#}", e);
        error!(error = %cause, "League history failed");
    }
    result
}
