//! Tracing setup shared by HR suite binaries.

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{Resource, trace::SdkTracerProvider};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,tower_http=warn";

static PROVIDER: OnceCell<Option<SdkTracerProvider>> = OnceCell::new();

#[derive(Clone, Debug)]
pub struct ObsConfig {
    pub service_name: &'static str,
    pub env_filter: Option<String>,
    pub otlp_endpoint: Option<String>,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            service_name: "hr-server",
            env_filter: None,
            otlp_endpoint: None,
        }
    }
}

impl ObsConfig {
    /// Defaults overlaid with `RUST_LOG` and `OTLP_ENDPOINT`.
    pub fn from_env() -> Self {
        Self {
            env_filter: std::env::var("RUST_LOG").ok(),
            otlp_endpoint: std::env::var("OTLP_ENDPOINT")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            ..Self::default()
        }
    }

    fn filter(&self) -> Result<EnvFilter> {
        let directives = self.env_filter.as_deref().unwrap_or(DEFAULT_FILTER);
        EnvFilter::try_new(directives).with_context(|| format!("invalid log filter {directives:?}"))
    }
}

/// Install the fmt subscriber, plus an OTLP span exporter when configured.
/// Later calls are no-ops.
pub fn init_tracing(config: ObsConfig) -> Result<()> {
    if PROVIDER.get().is_some() {
        return Ok(());
    }

    let registry = tracing_subscriber::registry()
        .with(config.filter()?)
        .with(tracing_subscriber::fmt::layer().with_target(false));

    let provider = match &config.otlp_endpoint {
        Some(endpoint) => {
            let provider = otlp_provider(config.service_name, endpoint)?;
            let tracer = provider.tracer(config.service_name);
            registry
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .try_init()?;
            Some(provider)
        }
        None => {
            registry.try_init()?;
            None
        }
    };

    PROVIDER
        .set(provider)
        .map_err(|_| anyhow!("tracing already initialized"))?;
    tracing::debug!(service = config.service_name, "tracing initialized");
    Ok(())
}

/// Flush pending spans before exit.
pub fn shutdown_tracing() {
    if let Some(Some(provider)) = PROVIDER.get() {
        if let Err(err) = provider.shutdown() {
            tracing::warn!(error = %err, "failed to flush OTLP spans");
        }
    }
}

fn otlp_provider(service_name: &'static str, endpoint: &str) -> Result<SdkTracerProvider> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint)
        .build()
        .context("failed to build OTLP exporter")?;
    let resource = Resource::builder().with_service_name(service_name).build();
    Ok(SdkTracerProvider::builder()
        .with_resource(resource)
        .with_batch_exporter(exporter)
        .build())
}
