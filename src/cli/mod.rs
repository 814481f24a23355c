pub mod boards;
pub mod inspect;
pub mod record;

use tracing::Level;

/// Install the stderr log subscriber and route `log` records from
/// dependencies through it.
pub fn init_logging(level: Level) -> anyhow::Result<()> {
    tracing_log::LogTracer::init()?;

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(level > Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
