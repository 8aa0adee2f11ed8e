//! Full-page screenshots of built pages.
//!
//! The browser sits behind [`BrowserLauncher`] / [`Browser`] so the capture
//! loop can be driven by a headless Chrome in production and a fake in tests.

mod chrome;

pub use chrome::ChromeLauncher;

use crate::config::ScreenshotConfig;
use crate::error::{Result, ShutterError};
use crate::io;
use crate::project::Project;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const HTML_NOT_FOUND: &str = "HTML file not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl From<ScreenshotConfig> for Viewport {
    fn from(cfg: ScreenshotConfig) -> Self {
        Self {
            width: cfg.width,
            height: cfg.height,
        }
    }
}

pub trait BrowserLauncher {
    /// Whether a browser binary can be found at all.
    fn is_available(&self) -> bool;

    fn launch(&self, viewport: Viewport) -> Result<Box<dyn Browser>>;
}

pub trait Browser {
    /// Open `url` in a fresh page, wait for it to settle, write a full-page
    /// PNG to `dest` and close the page.
    fn capture(&mut self, url: &str, dest: &Path) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// BrowserSession
// ---------------------------------------------------------------------------

/// Owns a launched browser and closes it exactly once, either through
/// [`BrowserSession::close`] or on drop.
pub struct BrowserSession {
    browser: Option<Box<dyn Browser>>,
}

impl BrowserSession {
    pub fn launch(launcher: &dyn BrowserLauncher, viewport: Viewport) -> Result<Self> {
        let browser = launcher.launch(viewport)?;
        Ok(Self {
            browser: Some(browser),
        })
    }

    pub fn capture(&mut self, url: &str, dest: &Path) -> Result<()> {
        match self.browser.as_mut() {
            Some(browser) => browser.capture(url, dest),
            None => Err(ShutterError::Browser("browser already closed".to_string())),
        }
    }

    pub fn close(mut self) -> Result<()> {
        match self.browser.take() {
            Some(mut browser) => browser.close(),
            None => Ok(()),
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close() {
                tracing::warn!("failed to close browser: {e}");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotResult {
    pub service: String,
    pub success: bool,
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScreenshotResult {
    fn saved(service: &str, path: PathBuf) -> Self {
        Self {
            service: service.to_string(),
            success: true,
            path: Some(path),
            error: None,
        }
    }

    fn failed(service: &str, error: impl Into<String>) -> Self {
        Self {
            service: service.to_string(),
            success: false,
            path: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotReport {
    pub results: Vec<ScreenshotResult>,
}

impl ScreenshotReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }
}

// ---------------------------------------------------------------------------
// Capture loop
// ---------------------------------------------------------------------------

fn file_url(page: &Path) -> Result<String> {
    let abs = std::fs::canonicalize(page)?;
    Ok(format!("file://{}", abs.display()))
}

/// Capture one screenshot per service into `out_dir` using a single browser.
///
/// `prepare` runs before each capture; a failing hook or capture is recorded
/// against that service and the loop moves on. Failing to launch the browser
/// is an error.
pub fn generate_screenshots(
    project: &Project,
    launcher: &dyn BrowserLauncher,
    services: &[String],
    out_dir: &Path,
    prepare: &mut dyn FnMut(&str) -> Result<()>,
) -> Result<ScreenshotReport> {
    if services.is_empty() {
        return Err(ShutterError::NoServices);
    }
    io::ensure_dir(out_dir)?;
    tracing::info!("Generating screenshots for {} service(s)...", services.len());

    let mut session = BrowserSession::launch(launcher, project.config.screenshot.into())
        .inspect_err(|e| tracing::error!("Error launching browser: {e}"))?;

    let page = project.page_path();
    let mut report = ScreenshotReport::default();
    for service in services {
        tracing::info!("Generating screenshot for: {service}");

        if let Err(e) = prepare(service) {
            tracing::error!("✗ Could not prepare {service}: {e}");
            report.results.push(ScreenshotResult::failed(service, e.to_string()));
            continue;
        }
        if !page.is_file() {
            tracing::error!("✗ {HTML_NOT_FOUND}: {}", page.display());
            report.results.push(ScreenshotResult::failed(service, HTML_NOT_FOUND));
            continue;
        }

        let dest = out_dir.join(format!("{service}.png"));
        match file_url(&page).and_then(|url| session.capture(&url, &dest)) {
            Ok(()) => {
                tracing::info!("✓ Screenshot saved: {}", dest.display());
                report.results.push(ScreenshotResult::saved(service, dest));
            }
            Err(e) => {
                tracing::error!("✗ Error generating screenshot for {service}: {e}");
                report.results.push(ScreenshotResult::failed(service, e.to_string()));
            }
        }
    }
    session.close()?;

    tracing::info!("=== Screenshot Generation Summary ===");
    tracing::info!(
        "Total services: {}, Success: {}, Failed: {}",
        services.len(),
        report.succeeded(),
        report.failed()
    );
    tracing::info!("Screenshots saved to: {}", out_dir.display());

    let results_path = project.screenshot_results();
    io::write_json(&results_path, &report)?;
    tracing::info!("Results written to: {}", results_path.display());
    Ok(report)
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Writes a placeholder PNG for each capture and counts launches and
    /// closes.
    #[derive(Clone, Default)]
    pub struct FakeLauncher {
        pub available: bool,
        pub fail_launch: bool,
        pub fail_urls_containing: Option<String>,
        pub launches: Arc<AtomicUsize>,
        pub closes: Arc<AtomicUsize>,
        pub urls: Arc<Mutex<Vec<String>>>,
    }

    impl FakeLauncher {
        pub fn new() -> Self {
            Self {
                available: true,
                ..Self::default()
            }
        }

        pub fn launches(&self) -> usize {
            self.launches.load(Ordering::SeqCst)
        }

        pub fn closes(&self) -> usize {
            self.closes.load(Ordering::SeqCst)
        }
    }

    struct FakeBrowser {
        launcher: FakeLauncher,
    }

    impl BrowserLauncher for FakeLauncher {
        fn is_available(&self) -> bool {
            self.available
        }

        fn launch(&self, _viewport: Viewport) -> Result<Box<dyn Browser>> {
            if self.fail_launch {
                return Err(ShutterError::Browser("no chrome here".to_string()));
            }
            self.launches.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeBrowser {
                launcher: self.clone(),
            }))
        }
    }

    impl Browser for FakeBrowser {
        fn capture(&mut self, url: &str, dest: &Path) -> Result<()> {
            self.launcher.urls.lock().unwrap().push(url.to_string());
            if let Some(needle) = &self.launcher.fail_urls_containing {
                if url.contains(needle.as_str()) {
                    return Err(ShutterError::Browser("navigation timed out".to_string()));
                }
            }
            std::fs::write(dest, b"\x89PNG")?;
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.launcher.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
