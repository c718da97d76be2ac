//! Logging macros that work across targets:
//! - Board (`stm32l4` feature): `defmt` over RTT
//! - Host tests: `println!`
//! - Host non-test: arguments are type-checked and discarded
//!
//! Only plain `{}` placeholders are portable between `defmt` and `core::fmt`,
//! and every argument must implement both `Display` and `defmt::Format`.

macro_rules! log_at {
    ($defmt:ident, $tag:literal, $($arg:tt)*) => {{
        #[cfg(feature = "stm32l4")]
        ::defmt::$defmt!($($arg)*);

        #[cfg(all(not(feature = "stm32l4"), test))]
        println!("[{}] {}", $tag, format!($($arg)*));

        #[cfg(all(not(feature = "stm32l4"), not(test)))]
        if false {
            let _ = format_args!($($arg)*);
        }
    }};
}

/// Log informational message
macro_rules! log_info {
    ($($arg:tt)*) => { log_at!(info, "INFO", $($arg)*) };
}

/// Log warning message
macro_rules! log_warn {
    ($($arg:tt)*) => { log_at!(warn, "WARN", $($arg)*) };
}

/// Log error message
macro_rules! log_error {
    ($($arg:tt)*) => { log_at!(error, "ERROR", $($arg)*) };
}

/// Log debug message
macro_rules! log_debug {
    ($($arg:tt)*) => { log_at!(debug, "DEBUG", $($arg)*) };
}

/// Log trace message
macro_rules! log_trace {
    ($($arg:tt)*) => { log_at!(trace, "TRACE", $($arg)*) };
}
