use tracing::subscriber::set_global_default;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};
use trackgate_error::GateResult;

/// Logging bootstrap: console plus a daily-rolling file under `logs/`.
///
/// The returned guard must stay alive for the duration of the process or
/// buffered file output is lost.
pub struct Logger {
    _file_guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn init() -> GateResult<Self> {
        let file_appender = rolling::daily("logs", "trackgate.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let console_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

        let subscriber = Registry::default().with(console_layer).with(file_layer);
        set_global_default(subscriber).map_err(|_| "failed to install the logger")?;

        Ok(Logger {
            _file_guard: Some(guard),
        })
    }
}
