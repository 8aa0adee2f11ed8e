//! Headless Chrome over the DevTools protocol.

use super::{Browser, BrowserLauncher, Viewport};
use crate::error::{Result, ShutterError};
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{LaunchOptions, Tab};
use std::path::Path;

fn browser_err(e: impl std::fmt::Display) -> ShutterError {
    ShutterError::Browser(format!("{e:#}"))
}

/// Launches a local Chrome/Chromium found on the system.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChromeLauncher;

impl BrowserLauncher for ChromeLauncher {
    fn is_available(&self) -> bool {
        headless_chrome::browser::default_executable().is_ok()
    }

    fn launch(&self, viewport: Viewport) -> Result<Box<dyn Browser>> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((viewport.width, viewport.height)))
            .build()
            .map_err(browser_err)?;
        let browser = headless_chrome::Browser::new(options).map_err(browser_err)?;
        tracing::debug!("launched headless chrome ({}x{})", viewport.width, viewport.height);
        Ok(Box::new(ChromeBrowser {
            browser: Some(browser),
            viewport,
        }))
    }
}

struct ChromeBrowser {
    browser: Option<headless_chrome::Browser>,
    viewport: Viewport,
}

impl Browser for ChromeBrowser {
    fn capture(&mut self, url: &str, dest: &Path) -> Result<()> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| ShutterError::Browser("browser already closed".to_string()))?;

        let tab = browser.new_tab().map_err(browser_err)?;
        let captured = capture_page(&tab, self.viewport, url, dest);
        let closed = tab.close(true).map(|_| ()).map_err(browser_err);
        finish_capture(captured, closed)
    }

    fn close(&mut self) -> Result<()> {
        // dropping the handle terminates the Chrome process
        if self.browser.take().is_some() {
            tracing::debug!("closed headless chrome");
        }
        Ok(())
    }
}

fn capture_page(tab: &Tab, viewport: Viewport, url: &str, dest: &Path) -> Result<()> {
    tab.navigate_to(url)
        .map_err(browser_err)?
        .wait_until_navigated()
        .map_err(browser_err)?;

    // Full page: clip to the document height, never shorter than the viewport.
    let height = tab
        .evaluate("document.documentElement.scrollHeight", false)
        .map_err(browser_err)?
        .value
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
        .max(f64::from(viewport.height));
    let clip = Page::Viewport {
        x: 0.0,
        y: 0.0,
        width: f64::from(viewport.width),
        height,
        scale: 1.0,
    };

    let png = tab
        .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, Some(clip), true)
        .map_err(browser_err)?;
    std::fs::write(dest, png)?;
    Ok(())
}

/// The tab is closed whether or not the capture worked; a capture error
/// wins over a close error.
fn finish_capture(captured: Result<()>, closed: Result<()>) -> Result<()> {
    match (captured, closed) {
        (Err(e), closed) => {
            if let Err(close_err) = closed {
                tracing::debug!("failed to close tab after error: {close_err}");
            }
            Err(e)
        }
        (Ok(()), closed) => closed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_error_wins_over_close_error() {
        let err = finish_capture(
            Err(ShutterError::Browser("navigation timed out".into())),
            Err(ShutterError::Browser("tab gone".into())),
        )
        .unwrap_err();
        assert!(err.to_string().contains("navigation timed out"));
    }

    #[test]
    fn close_error_surfaces_after_successful_capture() {
        let err = finish_capture(Ok(()), Err(ShutterError::Browser("tab gone".into())))
            .unwrap_err();
        assert!(err.to_string().contains("tab gone"));
        assert!(finish_capture(Ok(()), Ok(())).is_ok());
    }
}
