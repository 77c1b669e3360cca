use std::sync::Arc;

use crate::domain::entities::{FileId, Page};
use crate::domain::grid::GridController;
use crate::usecase::ports::source::{DataSource, SourceError};

pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 25, 50, 100];
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Host of one grid: tracks which file and page are shown and refetches from
/// the source when either changes.
///
/// Search, sort and column visibility live in the [`GridController`] and only
/// act on the page currently loaded; page and page size are remote concerns
/// handled here.
pub struct ViewSession {
    source: Arc<dyn DataSource>,
    file_id: FileId,
    page: usize,
    page_size: usize,
    grid: GridController,
}

impl ViewSession {
    pub fn new(source: Arc<dyn DataSource>, file_id: FileId, page_size: usize) -> Self {
        Self {
            source,
            file_id,
            page: 0,
            page_size,
            grid: GridController::new(),
        }
    }

    /// Starts a session on `file_id` and loads its first page.
    pub fn open(
        source: Arc<dyn DataSource>,
        file_id: FileId,
        page_size: usize,
    ) -> Result<Self, SourceError> {
        log::info!("opening file {file_id} with page size {page_size}");
        let mut session = Self::new(source, file_id, page_size);
        session.reload()?;
        Ok(session)
    }

    pub fn file_id(&self) -> &FileId {
        &self.file_id
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn grid(&self) -> &GridController {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridController {
        &mut self.grid
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.grid.page()
    }

    /// Refetches the current page. On failure the page already on screen is
    /// kept and the error is returned for the host to report.
    pub fn reload(&mut self) -> Result<(), SourceError> {
        self.load(self.page, self.page_size)
    }

    pub fn set_page(&mut self, page: usize) -> Result<(), SourceError> {
        let target = match self.grid.page() {
            Some(current) => page.min(current.total_pages() - 1),
            None => page,
        };
        self.load(target, self.page_size)
    }

    pub fn next_page(&mut self) -> Result<(), SourceError> {
        self.set_page(self.page + 1)
    }

    pub fn previous_page(&mut self) -> Result<(), SourceError> {
        self.set_page(self.page.saturating_sub(1))
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), SourceError> {
        self.load(0, page_size)
    }

    fn load(&mut self, page: usize, page_size: usize) -> Result<(), SourceError> {
        if page_size == 0 {
            return Err(SourceError::InvalidRequest(
                "page size must be greater than zero".to_string(),
            ));
        }

        log::debug!(
            "fetching page {page} (size {page_size}) of file {}",
            self.file_id
        );
        match self.source.fetch_page(&self.file_id, page, page_size) {
            Ok(fetched) => {
                self.page = page;
                self.page_size = page_size;
                self.grid.set_page(fetched);
                Ok(())
            }
            Err(err) => {
                log::warn!(
                    "failed to fetch page {page} of file {}: {err}",
                    self.file_id
                );
                Err(err)
            }
        }
    }
}
