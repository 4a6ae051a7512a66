//! Tracing setup: stdout always, plus a plain-text file when `LOG_FILE` is set.

use std::io::{self, Write};

/// Writer that strips ANSI escape sequences (e.g. `ESC [ 0 m`) so file logs are plain text.
pub struct StripAnsiWriter<W> {
    inner: W,
    /// Incomplete escape sequence: ESC or ESC [ ... (waiting for final letter).
    pending: Vec<u8>,
}

impl<W: Write> StripAnsiWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            pending: Vec::with_capacity(16),
        }
    }

    fn is_csi_parameter(b: u8) -> bool {
        matches!(b, b'[' | b'?' | b';' | b':' | b'0'..=b'9')
    }

    fn is_csi_final(b: u8) -> bool {
        (0x40..=0x7e).contains(&b)
    }

    fn flush_pending(&mut self) -> io::Result<()> {
        self.inner.write_all(&self.pending)?;
        self.pending.clear();
        Ok(())
    }
}

impl<W: Write> Write for StripAnsiWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &b in buf {
            match self.pending.len() {
                0 if b == 0x1b => self.pending.push(b),
                0 => self.inner.write_all(&[b])?,
                1 => {
                    self.pending.push(b);
                    if b != b'[' {
                        self.flush_pending()?;
                    }
                }
                _ if Self::is_csi_final(b) => self.pending.clear(),
                _ if Self::is_csi_parameter(b) => {
                    self.pending.push(b);
                    if self.pending.len() > 64 {
                        self.flush_pending()?;
                    }
                }
                _ => {
                    self.flush_pending()?;
                    self.inner.write_all(&[b])?;
                }
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            self.flush_pending()?;
        }
        self.inner.flush()
    }
}

const DEFAULT_FILTER: &str = "info,queryflow=debug,queryflow_server=debug,tower_http=debug";

/// Installs the global subscriber. `RUST_LOG` overrides [`DEFAULT_FILTER`]; `LOG_FILE`
/// adds an appending plain-text file layer next to stdout.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{fmt, EnvFilter, Layer};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let log_file = std::env::var("LOG_FILE").ok();
    let file_layer = match &log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_writer(std::sync::Mutex::new(StripAnsiWriter::new(file)))
                    .with_ansi(false)
                    .with_filter(filter.clone()),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_filter(filter))
        .with(file_layer)
        .try_init()?;
    match log_file {
        Some(path) => tracing::info!(path = %path, "logging to file"),
        None => tracing::info!("LOG_FILE not set, logging to stdout only"),
    }
    Ok(())
}
