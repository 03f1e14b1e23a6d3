// Diagnostic output for the cache and subscriber setup for the host.
// Messages carry the add-on prefix the media center log expects.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::addon::AddonInfo;
use crate::error::{CacheError, Result};

/// Where the cache reports its directory, writes and misses.
pub trait DiagnosticSink {
    fn debug(&self, message: &str);
}

/// Forwards diagnostics to `tracing`, prefixed with `[<id> (<version>)]: `.
#[derive(Debug, Clone)]
pub struct TracingSink {
    prefix: String,
}

impl TracingSink {
    pub fn new(info: &AddonInfo) -> Self {
        Self {
            prefix: format!("[{} ({})]: ", info.id, info.version),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn info(&self, message: &str) {
        tracing::info!("{}{}", self.prefix, message);
    }

    pub fn error(&self, message: &str) {
        tracing::error!("{}{}", self.prefix, message);
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(&AddonInfo::default())
    }
}

impl DiagnosticSink for TracingSink {
    fn debug(&self, message: &str) {
        tracing::debug!("{}{}", self.prefix, message);
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init(default_filter: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| CacheError::Logging(e.to_string()))
}

/// Log capture for tests, also exported under the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
pub mod capture {
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    /// In-memory writer for asserting on formatted log output.
    #[derive(Clone, Default)]
    pub struct MockWriter {
        buf: Arc<Mutex<Vec<u8>>>,
    }

    impl MockWriter {
        pub fn output(&self) -> String {
            String::from_utf8(self.buf.lock().unwrap().clone()).unwrap()
        }
    }

    impl std::io::Write for MockWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.buf.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for MockWriter {
        type Writer = MockWriter;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Capture everything at debug and above on the current thread.
    pub fn setup() -> (MockWriter, tracing::subscriber::DefaultGuard) {
        let writer = MockWriter::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();

        (writer, tracing::subscriber::set_default(subscriber))
    }
}
