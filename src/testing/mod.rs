pub mod storefront;

use crate::browser::{ChromeDriver, Session};
use crate::core::{SessionConfig, SuiteConfig};
use crate::errors::Result;
use std::io;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;

pub use storefront::{default_catalog, CatalogItem, CheckoutInfo, FakeStorefront, Keystroke};

pub struct TestHelper;

impl TestHelper {
    /// Short timeouts and no typing delay, for runs against the in-memory store.
    pub fn fast_config() -> SessionConfig {
        SessionConfig {
            action_timeout_ms: 500,
            assertion_timeout_ms: 500,
            poll_interval_ms: 10,
            password_typing_delay_ms: 0,
            ..Default::default()
        }
    }

    pub fn fake_session() -> Result<(Arc<FakeStorefront>, Session)> {
        Self::fake_session_with(FakeStorefront::new(), Self::fast_config())
    }

    pub fn fake_session_with(
        store: FakeStorefront,
        config: SessionConfig,
    ) -> Result<(Arc<FakeStorefront>, Session)> {
        let store = Arc::new(store);
        let session = Session::new(store.clone(), config)?;
        Ok((store, session))
    }

    pub fn create_test_browser() -> Result<Session> {
        let mut config = SuiteConfig::default();
        config.browser.headless = true;
        let driver = ChromeDriver::launch(&config.browser, &config.session)?;
        Session::new(Arc::new(driver), config.session)
    }
}

/// Collects formatted tracing output while its guard is alive.
///
/// The subscriber is installed as the thread default, so it only sees
/// events from the current thread (the `#[tokio::test]` runtime).
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self.0.lock().unwrap_or_else(|e| e.into_inner());
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&self) -> DefaultGuard {
        let buffer = self.buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || CaptureWriter(buffer.clone()))
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buffer).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.contents().contains(needle)
    }

    pub fn clear(&self) {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{error, info};

    #[test]
    fn capture_sees_events_only_while_installed() {
        let logs = LogCapture::new();
        {
            let _guard = logs.install();
            info!(page = "LoginPage", "Clicking: 'Login Button' element");
            error!(page = "LoginPage", "boom");
        }
        info!("after the guard");

        let lines = logs.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("INFO"));
        assert!(lines[0].contains("Clicking: 'Login Button' element"));
        assert!(lines[0].contains("page=\"LoginPage\""));
        assert!(lines[1].contains("ERROR"));
        assert!(!logs.contains("after the guard"));
    }
}
