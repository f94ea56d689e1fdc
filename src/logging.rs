//! Diagnostic output infrastructure shared by every binary in this suite.
//!
//! Rust port of the `DISPLAYLEVEL`/`DISPLAY`/`DISPLAYOUT`/`END_PROCESS` macro
//! family found in the C sources' CLI front ends, generalized from one
//! binary to seven.

use std::sync::atomic::{AtomicU32, Ordering};

/// 0 = silent, 1 = errors only, 2 = normal, 3 = verbose.
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Print to stdout unconditionally.
#[macro_export]
macro_rules! displayout {
    ($($arg:tt)*) => { print!($($arg)*) };
}

/// Print to stderr unconditionally.
#[macro_export]
macro_rules! display {
    ($($arg:tt)*) => { eprint!($($arg)*) };
}

/// Print to stderr when the current display level is at or above `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::logging::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}

/// Print a diagnostic and terminate the process with the given exit code.
#[macro_export]
macro_rules! end_process {
    ($code:expr, $($arg:tt)*) => {{
        if $crate::logging::display_level() >= 1 {
            eprint!("Error: ");
            eprint!($($arg)*);
            eprint!("\n");
        }
        std::process::exit($code as i32);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_normal() {
        assert_eq!(display_level(), 2);
    }

    #[test]
    fn set_and_get_round_trips() {
        let prev = display_level();
        set_display_level(0);
        assert_eq!(display_level(), 0);
        set_display_level(prev);
    }
}
