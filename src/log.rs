use std::env;
use std::sync::LazyLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
}

impl Level {
    /// Accepts `err`/`warning` aliases and maps `debug` to `info`; anything else is `warn`.
    fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "error" | "err" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "info" | "debug" => Self::Info,
            _ => Self::Warn,
        }
    }
}

/// Read once from `CRI_LOG`; unset means `warn`, so malformed games are reported by default.
static CRI_LOG: LazyLock<Level> = LazyLock::new(|| {
    env::var("CRI_LOG")
        .map(|s| Level::from_str(&s))
        .unwrap_or(Level::Warn)
});

macro_rules! log {
    ($level:expr, $prefix:expr, $msg:expr) => {
        if *CRI_LOG >= $level {
            eprintln!(concat!($prefix, ": {}"), $msg.as_ref());
        }
    };
}

pub fn error(msg: impl AsRef<str>) {
    log!(Level::Error, "ERROR", msg);
}

pub fn warn(msg: impl AsRef<str>) {
    log!(Level::Warn, "WARN", msg);
}

pub fn info(msg: impl AsRef<str>) {
    log!(Level::Info, "INFO", msg);
}

#[cfg(test)]
mod tests {
    use super::Level;

    #[test]
    fn test_level_aliases() {
        assert_eq!(Level::from_str("ERR"), Level::Error);
        assert_eq!(Level::from_str(" warning "), Level::Warn);
        assert_eq!(Level::from_str("debug"), Level::Info);
    }

    #[test]
    fn test_unknown_level_falls_back_to_warn() {
        assert_eq!(Level::from_str("verbose"), Level::Warn);
        assert_eq!(Level::from_str(""), Level::Warn);
    }

    #[test]
    fn test_levels_are_ordered_by_verbosity() {
        assert!(Level::Info > Level::Warn);
        assert!(Level::Warn > Level::Error);
    }
}
