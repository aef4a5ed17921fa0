use anyhow::Result;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, Registry};

/// Changes the level of the installed subscriber, e.g. once the config file has been read.
pub struct LogLevel(reload::Handle<LevelFilter, Registry>);

impl LogLevel {
    pub fn set(&self, level: LevelFilter) -> Result<()> {
        self.0.modify(|filter| *filter = level)?;

        Ok(())
    }
}

pub fn init_tracing(level: LevelFilter) -> Result<LogLevel> {
    let (filter, handle) = reload::Layer::new(level);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(LogLevel(handle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_can_be_changed_after_init() {
        let log_level = init_tracing(LevelFilter::INFO).unwrap();
        assert!(tracing::enabled!(tracing::Level::INFO));

        log_level.set(LevelFilter::WARN).unwrap();
        assert!(!tracing::enabled!(tracing::Level::INFO));
        assert!(tracing::enabled!(tracing::Level::WARN));

        assert!(init_tracing(LevelFilter::DEBUG).is_err());
    }
}
