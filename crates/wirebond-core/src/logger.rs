//! Logging for the inspection tools.
//!
//! Records from the `wirebond*` crates pass at the requested level; every
//! other target (image decoding, third-party crates) is capped at `warn`.
//! `init_with_level` installs a plain stderr logger printing
//! `[elapsed LEVEL] crate::module: message`; `init_tracing` installs a
//! `tracing` subscriber with the same filter unless `RUST_LOG` overrides it.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

/// Target prefix shared by every crate of the workspace.
pub const CRATE_PREFIX: &str = "wirebond";

/// Ceiling for records that do not come from this workspace.
const FOREIGN_LEVEL: LevelFilter = LevelFilter::Warn;

/// `-v` count to level: none is `info`, one is `debug`, more is `trace`.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn target_level(target: &str, level: LevelFilter) -> LevelFilter {
    if target.starts_with(CRATE_PREFIX) {
        level
    } else {
        level.min(FOREIGN_LEVEL)
    }
}

/// `wirebond_wires::locate` prints as `wires::locate`.
fn short_target(target: &str) -> &str {
    target
        .strip_prefix(CRATE_PREFIX)
        .and_then(|rest| rest.strip_prefix('_'))
        .unwrap_or(target)
}

struct InspectLogger {
    level: LevelFilter,
    started: Instant,
}

impl InspectLogger {
    fn allows(&self, level: Level, target: &str) -> bool {
        level <= target_level(target, self.level)
    }
}

impl Log for InspectLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.allows(metadata.level(), metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5}] {}: {}",
            elapsed,
            record.level(),
            short_target(record.target()),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<InspectLogger> = OnceLock::new();

/// Install the stderr logger; `level` applies to the `wirebond*` crates.
///
/// Calling this more than once is a no-op after the first successful
/// initialization.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| InspectLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level.max(FOREIGN_LEVEL));
    }
    Ok(())
}

/// `EnvFilter` directives equivalent to the stderr logger's filter.
pub fn filter_directives(level: LevelFilter) -> String {
    let name = |l: LevelFilter| l.to_string().to_ascii_lowercase();
    format!(
        "{},{}={}",
        name(level.min(FOREIGN_LEVEL)),
        CRATE_PREFIX,
        name(level)
    )
}

/// Install a `tracing` subscriber; `RUST_LOG` wins over `level` when set.
///
/// `log` records from the library crates are forwarded into the subscriber.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, level: LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(level)));
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}
