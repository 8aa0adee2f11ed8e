use crate::error::Result;
use std::path::Path;

/// Shows a built page to the user.
pub trait Previewer {
    fn open(&self, page: &Path) -> Result<()>;
}

/// Opens pages in the system's default viewer.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPreviewer;

impl Previewer for SystemPreviewer {
    fn open(&self, page: &Path) -> Result<()> {
        tracing::info!("Opening {}", page.display());
        open::that(page)?;
        Ok(())
    }
}
