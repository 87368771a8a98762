use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

pub const LOG_DIR: &str = "./logs";
pub const LOG_FILE: &str = "web3-starter.log";

/// Crates whose events we keep, everything else is capped at `warn`
const LOG_TARGETS: [&str; 2] = ["web3_starter", "web3_types"];

/// Filter directives that log our crates at `level`
fn directives(level: &str) -> String {
   let mut directives: Vec<String> = LOG_TARGETS
      .iter()
      .map(|target| format!("{}={}", target, level))
      .collect();
   directives.push("warn".to_string());
   directives.join(",")
}

/// Console at `info` (`RUST_LOG` overrides it), a daily file under `log_dir` at `debug`
///
/// Keep the guard alive for the whole run or buffered file lines are lost.
pub fn setup_tracing(log_dir: &Path) -> WorkerGuard {
   let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
   let (file_writer, guard) = tracing_appender::non_blocking(appender);

   let console_filter =
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives("info")));

   let console_layer = fmt::layer()
      .with_writer(std::io::stdout)
      .with_filter(console_filter);

   let file_layer = fmt::layer()
      .with_ansi(false)
      .with_writer(file_writer)
      .with_filter(EnvFilter::new(directives("debug")));

   Registry::default()
      .with(console_layer)
      .with(file_layer)
      .init();

   guard
}
