//! Utilities: leveled diagnostic logging (stderr only, so stdout stays clean
//! for scripting).
//!
//! Key items:
//!   init_logging / derive_level
//!   log_error! / log_info! / log_debug! / log_trace!

/// Logging helpers.
pub mod logging {
    use std::sync::atomic::{AtomicU8, Ordering};

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
    #[repr(u8)]
    pub enum LogLevel {
        Error = 0,
        Info = 1,
        Debug = 2,
        Trace = 3,
    }

    impl LogLevel {
        pub fn as_str(&self) -> &'static str {
            match self {
                LogLevel::Error => "ERROR",
                LogLevel::Info => "INFO",
                LogLevel::Debug => "DEBUG",
                LogLevel::Trace => "TRACE",
            }
        }

        fn from_u8(raw: u8) -> Self {
            match raw {
                0 => LogLevel::Error,
                1 => LogLevel::Info,
                2 => LogLevel::Debug,
                _ => LogLevel::Trace,
            }
        }
    }

    static LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

    /// Set the process-wide threshold. Called once from `main`.
    pub fn init_logging(level: LogLevel) {
        LEVEL.store(level as u8, Ordering::Relaxed);
    }

    pub fn current_log_level() -> LogLevel {
        LogLevel::from_u8(LEVEL.load(Ordering::Relaxed))
    }

    /// `-q` wins; otherwise each `-v` raises the level one step.
    pub fn derive_level(verbose: u8, quiet: bool) -> LogLevel {
        if quiet {
            LogLevel::Error
        } else {
            LogLevel::from_u8(verbose.saturating_add(1))
        }
    }

    pub fn enabled(level: LogLevel) -> bool {
        level <= current_log_level()
    }

    pub fn log(level: LogLevel, msg: std::fmt::Arguments<'_>) {
        if enabled(level) {
            eprintln!("[{}] {msg}", level.as_str());
        }
    }

    #[macro_export]
    macro_rules! log_error {
        ($($t:tt)*) => {
            $crate::utils::logging::log($crate::utils::logging::LogLevel::Error, format_args!($($t)*))
        };
    }
    #[macro_export]
    macro_rules! log_info {
        ($($t:tt)*) => {
            $crate::utils::logging::log($crate::utils::logging::LogLevel::Info, format_args!($($t)*))
        };
    }
    #[macro_export]
    macro_rules! log_debug {
        ($($t:tt)*) => {
            $crate::utils::logging::log($crate::utils::logging::LogLevel::Debug, format_args!($($t)*))
        };
    }
    #[macro_export]
    macro_rules! log_trace {
        ($($t:tt)*) => {
            $crate::utils::logging::log($crate::utils::logging::LogLevel::Trace, format_args!($($t)*))
        };
    }
}

pub use logging::{derive_level, init_logging};

#[cfg(test)]
mod tests {
    use super::logging::{LogLevel, current_log_level, derive_level, enabled, init_logging};

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(derive_level(2, true), LogLevel::Error);
    }

    #[test]
    fn verbosity_steps() {
        assert_eq!(derive_level(0, false), LogLevel::Info);
        assert_eq!(derive_level(1, false), LogLevel::Debug);
        assert_eq!(derive_level(5, false), LogLevel::Trace);
        assert_eq!(derive_level(u8::MAX, false), LogLevel::Trace);
    }

    #[test]
    fn threshold_gates_emission() {
        init_logging(LogLevel::Trace);
        assert_eq!(current_log_level(), LogLevel::Trace);
        assert!(enabled(LogLevel::Debug));
        assert!(LogLevel::Error < LogLevel::Info);
        assert_eq!(LogLevel::Debug.as_str(), "DEBUG");
    }
}
