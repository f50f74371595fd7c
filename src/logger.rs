//! Stderr logger for the command-line host
//!
//! The library itself only talks to the `log` facade; a host installs
//! whatever backend it wants. This one writes `LEVEL target: message` lines
//! to standard error.

use std::io::Write;

pub struct StderrLogger;

impl StderrLogger {
    fn format(record: &log::Record) -> String {
        format!("{:<5} {}: {}", record.level(), record.target(), record.args())
    }
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let line = Self::format(record);
            let _ = writeln!(std::io::stderr().lock(), "{line}");
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

pub fn init_logger(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let line = StderrLogger::format(
            &log::Record::builder()
                .level(log::Level::Warn)
                .target("dmgcore::cart")
                .args(format_args!("ROM header checksum invalid"))
                .build(),
        );
        assert_eq!(line, "WARN  dmgcore::cart: ROM header checksum invalid");
    }

    fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}

    #[test]
    fn test_log_errors_convert_to_anyhow() {
        assert_error::<log::SetLoggerError>();
        assert_error::<log::ParseLevelError>();
        assert_eq!("debug".parse::<log::LevelFilter>(), Ok(log::LevelFilter::Debug));
        assert!("loud".parse::<log::LevelFilter>().is_err());
    }
}
