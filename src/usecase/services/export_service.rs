use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use rust_xlsxwriter::Workbook;

use crate::domain::entities::{FileId, Page};
use crate::infra::export::csv::write_csv;
use crate::infra::export::xlsx::write_xlsx;
use crate::usecase::ports::source::{DataSource, SourceError};

/// Rows fetched per round trip while exporting a whole file.
const EXPORT_BATCH_SIZE: usize = 1_000;

/// The download formats offered for a whole file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Excel => "Excel",
        }
    }
}

pub struct ExportService {
    source: Arc<dyn DataSource>,
}

impl ExportService {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    /// Calls `write` with every page of `id` in order, fetching
    /// `EXPORT_BATCH_SIZE` rows at a time. The flag is set for the first page.
    fn for_each_page(
        &self,
        id: &FileId,
        mut write: impl FnMut(&Page, bool) -> anyhow::Result<()>,
    ) -> Result<(), SourceError> {
        let mut page_number = 0;
        loop {
            let page = self.source.fetch_page(id, page_number, EXPORT_BATCH_SIZE)?;
            write(&page, page_number == 0).map_err(SourceError::export)?;
            if page.is_empty() || page.is_last_page() {
                return Ok(());
            }
            page_number += 1;
        }
    }

    /// Writes every row of `id` as CSV and returns the number of data rows.
    pub fn export_csv<W: Write>(&self, id: &FileId, writer: W) -> Result<usize, SourceError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let mut written = 0;
        self.for_each_page(id, |page, first| {
            written += write_csv(&mut csv_writer, page, first)?;
            Ok(())
        })?;

        csv_writer
            .flush()
            .map_err(|err| SourceError::Export(err.to_string()))?;
        Ok(written)
    }

    pub fn export_csv_to_path(&self, id: &FileId, path: &Path) -> Result<usize, SourceError> {
        let file = create_target(path)?;
        let written = self.export_csv(id, file)?;
        log::info!(
            "exported {written} rows of file {id} to {}",
            path.display()
        );
        Ok(written)
    }

    /// Writes every row of `id` as a single-sheet xlsx workbook and returns
    /// the number of data rows.
    pub fn export_xlsx<W: Write>(
        &self,
        id: &FileId,
        mut writer: W,
    ) -> Result<usize, SourceError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let mut next_row = 0;
        let mut written = 0;
        self.for_each_page(id, |page, first| {
            next_row = write_xlsx(worksheet, page, next_row, first)?;
            written += page.rows.len();
            Ok(())
        })?;

        let bytes = workbook
            .save_to_buffer()
            .map_err(|err| SourceError::Export(err.to_string()))?;
        writer
            .write_all(&bytes)
            .and_then(|()| writer.flush())
            .map_err(|err| SourceError::Export(err.to_string()))?;
        Ok(written)
    }

    pub fn export_xlsx_to_path(&self, id: &FileId, path: &Path) -> Result<usize, SourceError> {
        let file = create_target(path)?;
        let written = self.export_xlsx(id, file)?;
        log::info!(
            "exported {written} rows of file {id} to {}",
            path.display()
        );
        Ok(written)
    }

    /// Writes every row of `id` to `path` in `format`.
    pub fn export_to_path(
        &self,
        id: &FileId,
        format: ExportFormat,
        path: &Path,
    ) -> Result<usize, SourceError> {
        match format {
            ExportFormat::Csv => self.export_csv_to_path(id, path),
            ExportFormat::Excel => self.export_xlsx_to_path(id, path),
        }
    }
}

fn create_target(path: &Path) -> Result<File, SourceError> {
    File::create(path).map_err(|err| SourceError::Export(format!("{}: {err}", path.display())))
}
