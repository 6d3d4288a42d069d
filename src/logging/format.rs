//! Line formatting
//!
//! Renders the `[DD.MM.YYYY HH:MM:SS] ` prefix and severity tag, and converts
//! primitive values into message text.

use chrono::{DateTime, Local, TimeZone};

use super::severity::Severity;

/// strftime pattern for the bracketed timestamp prefix
pub const TIMESTAMP_FORMAT: &str = "[%d.%m.%Y %H:%M:%S] ";

/// Decimal places used when a float is logged directly
pub const DEFAULT_FLOAT_PRECISION: usize = 4;

/// Render the timestamp prefix for the given instant
pub fn timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Build a complete log line stamped with the current local time
pub fn format_line(severity: Severity, message: &str) -> String {
    format_line_at(&Local::now(), severity, message)
}

/// Build a complete log line for an explicit instant
pub fn format_line_at<Tz: TimeZone>(at: &DateTime<Tz>, severity: Severity, message: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut line = timestamp(at);
    line.push_str(severity.tag());
    line.push_str(message);
    line
}

/// Format a float in fixed notation with `precision` decimals
pub fn fixed(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

/// Format an integer in base 8, 10 or 16
///
/// Base 10 is zero-padded to `width`; any other base yields `"inf"`.
pub fn radix(value: i64, base: u32, width: usize) -> String {
    match base {
        8 => format!("{:o}", value),
        10 => format!("{:0width$}", value, width = width),
        16 => format!("{:x}", value),
        _ => "inf".to_string(),
    }
}

/// A value that can be passed to the leveled logging entry points
pub trait LogValue {
    /// Render the value as message text
    fn to_log_string(&self) -> String;
}

impl LogValue for str {
    fn to_log_string(&self) -> String {
        self.to_string()
    }
}

impl LogValue for String {
    fn to_log_string(&self) -> String {
        self.clone()
    }
}

impl LogValue for bool {
    fn to_log_string(&self) -> String {
        String::from(if *self { "1" } else { "0" })
    }
}

impl LogValue for f32 {
    fn to_log_string(&self) -> String {
        fixed(f64::from(*self), DEFAULT_FLOAT_PRECISION)
    }
}

impl LogValue for f64 {
    fn to_log_string(&self) -> String {
        fixed(*self, DEFAULT_FLOAT_PRECISION)
    }
}

macro_rules! integer_log_value {
    ($($t:ty),*) => {
        $(
            impl LogValue for $t {
                fn to_log_string(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

integer_log_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl<T: LogValue + ?Sized> LogValue for &T {
    fn to_log_string(&self) -> String {
        (**self).to_log_string()
    }
}

impl LogValue for std::fmt::Arguments<'_> {
    fn to_log_string(&self) -> String {
        self.to_string()
    }
}
