//! Call-site macros for the process-wide writer

/// Abort the process through the process-wide writer if the expression is false
///
/// Without a message the fatal line reads `Assert failed: <expression>`. The
/// caller's file and line are captured either way.
#[macro_export]
macro_rules! log_assert {
    ($cond:expr $(,)?) => {
        $crate::instance().assert_condition($cond, concat!("Assert failed: ", stringify!($cond)))
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            $crate::instance().assert_condition(false, format!($($arg)+))
        }
    };
}

/// Log a formatted message at the given severity through the process-wide writer
///
/// ```no_run
/// sololog::log!(sololog::Severity::Warning, "retry {} of {}", 2, 5);
/// ```
#[macro_export]
macro_rules! log {
    ($severity:expr, $($arg:tt)+) => {
        $crate::instance().log($severity, &format!($($arg)+))
    };
}
