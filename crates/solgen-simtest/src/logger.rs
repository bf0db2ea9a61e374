//! Minimal stdout logger for the harness.

pub struct Logger;

impl Logger {
    pub fn init(max_level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_logger(&LOGGER)?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        println!(
            "{} {}:{} {}",
            record.level(),
            record.file().unwrap_or(""),
            record.line().unwrap_or(0),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: Logger = Logger;
