//! Bridge from `tracing` events into a [`Writer`]
//!
//! Lets a host application that already uses `tracing` record its events through
//! the writer. Events from this crate's own diagnostics are dropped so a write
//! failure can never recurse into the writer.

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{Metadata, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

use super::global::instance;
use super::severity::Severity;
use super::writer::Writer;

const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

fn is_own_target(target: &str) -> bool {
    target == OWN_TARGET
        || target
            .strip_prefix(OWN_TARGET)
            .is_some_and(|rest| rest.starts_with("::"))
}

/// Collects one formatted event and logs it when dropped
pub struct EventWriter {
    target: Option<&'static Writer>,
    severity: Severity,
    pending: Vec<u8>,
}

impl Write for EventWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.target.is_some() {
            self.pending.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for EventWriter {
    fn drop(&mut self) {
        let Some(writer) = self.target else {
            return;
        };
        let text = String::from_utf8_lossy(&self.pending);
        for line in text.lines() {
            let line = line.trim();
            if !line.is_empty() {
                writer.log(self.severity, line);
            }
        }
    }
}

/// Writer factory for tracing-subscriber
#[derive(Debug, Clone, Copy)]
pub struct WriterMakeWriter {
    target: &'static Writer,
}

impl WriterMakeWriter {
    /// Forward events to `target`
    pub fn new(target: &'static Writer) -> Self {
        Self { target }
    }

    /// Forward events to the process-wide writer
    pub fn global() -> Self {
        Self::new(instance())
    }
}

impl<'a> MakeWriter<'a> for WriterMakeWriter {
    type Writer = EventWriter;

    fn make_writer(&'a self) -> Self::Writer {
        EventWriter {
            target: Some(self.target),
            severity: Severity::Info,
            pending: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        EventWriter {
            target: (!is_own_target(meta.target())).then_some(self.target),
            severity: Severity::from(*meta.level()),
            pending: Vec::new(),
        }
    }
}

/// A fmt layer writing into `target`
///
/// Timestamps and levels are left to the writer's own line format.
pub fn layer<S>(target: &'static Writer) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_writer(WriterMakeWriter::new(target))
        .with_ansi(false)
        .without_time()
        .with_level(false)
        .with_target(true)
}

/// Install a global tracing subscriber that records events through the process-wide writer
///
/// The filter comes from `RUST_LOG`, falling back to `default_filter`.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer(instance()))
        .try_init()
        .context("Failed to install tracing subscriber")
}
