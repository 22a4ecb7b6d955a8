/// Installs a `tracing` subscriber printing to stderr, filtered by
/// `RUST_LOG` (default `aotgraph=info`).
#[cfg(feature = "logging")]
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("aotgraph=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|err| anyhow::anyhow!("Couldn't install the tracing subscriber: {err}"))?;

    Ok(())
}

#[cfg(not(feature = "logging"))]
pub fn init_logging() -> anyhow::Result<()> {
    Ok(())
}
