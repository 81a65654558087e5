use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Уровень по умолчанию: CLI молчит, пока не попросят подробностей.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Директивы, которые глушат шум транспортного стека.
const TRANSPORT_DIRECTIVES: [&str; 2] = ["hyper_util=warn", "reqwest=warn"];

/// Включает логирование CLI.
///
/// Уровень приходит из настроек (`LOG_LEVEL`, затем `RUST_LOG`). Логи пишутся
/// в stderr, stdout остаётся за выводом команд (в том числе `--json`).
pub fn init_logging(level: &str) -> Result<()> {
    fmt()
        .with_env_filter(build_filter(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

fn build_filter(level: &str) -> EnvFilter {
    let directives = std::iter::once(level)
        .chain(TRANSPORT_DIRECTIVES)
        .collect::<Vec<_>>()
        .join(",");

    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}
