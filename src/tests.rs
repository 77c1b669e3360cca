use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use crate::domain::entities::{
    CellValue, Column, ColumnType, FileId, FileMetadata, FileSummary, Page, Row,
};
use crate::infra::import::xlsx::read_workbook;
use crate::infra::sqlite::repo::SqliteSource;
use crate::usecase::ports::source::{Catalog, DataSource, SourceError};
use crate::usecase::services::browse_service::BrowseService;
use crate::usecase::services::export_service::ExportService;
use crate::usecase::services::import_service::ImportService;
use crate::usecase::services::view_service::ViewSession;

const PEOPLE_CSV: &str = "\
name,qty,price,active,joined
Alpha,10,2.5,true,2024-01-05
beta,9,,false,2023-12-31
Gamma,,1,TRUE,
";

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("should write fixture file");
    path
}

/// A fresh catalog holding `people.csv`, plus the id it was imported as.
fn imported_people() -> (TempDir, Arc<SqliteSource>, FileId) {
    let temp_dir = tempfile::tempdir().expect("should create temp dir");
    let source = Arc::new(SqliteSource::new(temp_dir.path().join("catalog.sqlite")));
    source.init().expect("catalog should initialize");

    let csv_path = write_file(temp_dir.path(), "people.csv", PEOPLE_CSV);
    let imported = ImportService::new(source.clone())
        .import_path(&csv_path)
        .expect("csv import should succeed");
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].name, "people");
    assert_eq!(imported[0].row_count, 3);

    let file_id = imported[0].file_id.clone();
    (temp_dir, source, file_id)
}

fn names(rows: &[&Row]) -> Vec<String> {
    rows.iter()
        .map(|row| Page::value(row, "name").display().into_owned())
        .collect()
}

#[test]
fn imported_csv_is_served_in_typed_pages() {
    let (_temp_dir, source, file_id) = imported_people();

    let first = source
        .fetch_page(&file_id, 0, 2)
        .expect("first page should load");
    assert_eq!(first.total_rows, 3);
    assert_eq!(first.current_page, 0);
    assert_eq!(first.page_size, 2);
    assert_eq!(first.rows.len(), 2);

    let types: Vec<ColumnType> = first.columns.iter().map(|c| c.column_type).collect();
    assert_eq!(
        types,
        vec![
            ColumnType::String,
            ColumnType::Integer,
            ColumnType::Double,
            ColumnType::Boolean,
            ColumnType::Date,
        ]
    );

    let alpha = &first.rows[0];
    assert_eq!(alpha["name"], CellValue::from("Alpha"));
    assert_eq!(alpha["qty"], CellValue::Integer(10));
    assert_eq!(alpha["price"], CellValue::Double(2.5));
    assert_eq!(alpha["active"], CellValue::Bool(true));
    assert_eq!(
        alpha["joined"],
        CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 5).expect("valid date"))
    );
    assert_eq!(first.rows[1]["price"], CellValue::Null);

    let last = source
        .fetch_page(&file_id, 1, 2)
        .expect("last page should load");
    assert_eq!(last.rows.len(), 1);
    assert_eq!(last.rows[0]["qty"], CellValue::Null);
    assert_eq!(last.rows[0]["price"], CellValue::Double(1.0));
    assert_eq!(last.rows[0]["active"], CellValue::Bool(true));
    assert!(last.is_last_page());

    let past_end = source
        .fetch_page(&file_id, 7, 2)
        .expect("pages past the end are empty, not errors");
    assert!(past_end.is_empty());
    assert_eq!(past_end.total_rows, 3);
}

#[test]
fn unknown_files_are_not_found() {
    let (_temp_dir, source, _file_id) = imported_people();

    for id in ["999", "not-a-number"] {
        let err = source
            .fetch_page(&FileId::from(id), 0, 10)
            .expect_err("unknown id should fail");
        assert!(matches!(err, SourceError::NotFound(_)), "got {err:?}");

        let err = source
            .file_metadata(&FileId::from(id))
            .expect_err("unknown id should fail");
        assert!(matches!(err, SourceError::NotFound(_)), "got {err:?}");
    }

    let err = source
        .fetch_page(&FileId::from(1), 0, 0)
        .expect_err("zero page size should be rejected");
    assert!(matches!(err, SourceError::InvalidRequest(_)), "got {err:?}");
}

#[test]
fn file_list_and_metadata_describe_the_import() {
    let (_temp_dir, source, file_id) = imported_people();
    let browse = BrowseService::new(source.clone());

    let files: Vec<FileSummary> = browse.list_files().expect("files should list");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].id, file_id);
    assert_eq!(files[0].name, "people");
    assert_eq!(files[0].row_count, 3);
    assert_eq!(files[0].column_count, 5);
    assert_eq!(files[0].size, PEOPLE_CSV.len() as u64);
    assert!(files[0].path.ends_with("people.csv"));

    let metadata: FileMetadata = browse
        .file_metadata(&file_id)
        .expect("metadata should load");
    assert_eq!(metadata.format, "CSV");
    assert_eq!(metadata.summary(), files[0]);

    let qty: &Column = &metadata.schema[1];
    assert_eq!(qty.name, "qty");
    assert!(qty.nullable);
    let stats = qty.statistics.as_ref().expect("qty should carry statistics");
    assert_eq!(stats.min, Some(CellValue::Integer(9)));
    assert_eq!(stats.max, Some(CellValue::Integer(10)));
    assert_eq!(stats.null_count, Some(1));
    assert_eq!(stats.distinct_count, Some(2));

    assert!(!metadata.schema[0].nullable);
    let file_stats = metadata.statistics.expect("file statistics are derived");
    assert_eq!(file_stats.total_size, PEOPLE_CSV.len() as u64);
}

#[test]
fn removing_a_file_drops_it_from_the_catalog() {
    let (_temp_dir, source, file_id) = imported_people();
    let importer = ImportService::new(source.clone());

    importer.remove(&file_id).expect("remove should succeed");
    assert!(source.list_files().expect("files should list").is_empty());

    let err = importer
        .remove(&file_id)
        .expect_err("second remove should fail");
    assert!(matches!(err, SourceError::NotFound(_)), "got {err:?}");
}

#[test]
fn unsupported_extensions_are_rejected() {
    let temp_dir = tempfile::tempdir().expect("should create temp dir");
    let source = Arc::new(SqliteSource::new(temp_dir.path().join("catalog.sqlite")));
    let path = write_file(temp_dir.path(), "notes.txt", "hello");

    let err = ImportService::new(source)
        .import_path(&path)
        .expect_err("txt files are not importable");
    assert!(matches!(err, SourceError::InvalidRequest(_)), "got {err:?}");
}

#[test]
fn export_writes_every_row_as_csv() {
    let (_temp_dir, source, file_id) = imported_people();

    let mut bytes = Vec::new();
    let written = ExportService::new(source)
        .export_csv(&file_id, &mut bytes)
        .expect("export should succeed");
    assert_eq!(written, 3);

    let text = String::from_utf8(bytes).expect("export should be utf8");
    assert_eq!(
        text,
        "name,qty,price,active,joined\n\
         Alpha,10,2.5,true,2024-01-05\n\
         beta,9,,false,2023-12-31\n\
         Gamma,,1,true,\n"
    );
}

#[test]
fn excel_export_reads_back_as_the_same_table() {
    let (temp_dir, source, file_id) = imported_people();
    let target = temp_dir.path().join("people.xlsx");

    let written = ExportService::new(source)
        .export_xlsx_to_path(&file_id, &target)
        .expect("excel export should succeed");
    assert_eq!(written, 3);

    let sheets = read_workbook(&target).expect("exported workbook should open");
    assert_eq!(sheets.len(), 1);
    let table = &sheets[0].1;
    assert_eq!(table.headers, vec!["name", "qty", "price", "active", "joined"]);

    let text = |cell: &str| Some(cell.to_string());
    assert_eq!(
        table.rows,
        vec![
            vec![text("Alpha"), text("10"), text("2.5"), text("true"), text("2024-01-05")],
            vec![text("beta"), text("9"), None, text("false"), text("2023-12-31")],
            vec![text("Gamma"), None, text("1"), text("true"), None],
        ]
    );
}

#[test]
fn session_sorts_and_filters_the_loaded_page() {
    let (_temp_dir, source, file_id) = imported_people();
    let mut session = ViewSession::open(source, file_id, 50).expect("session should open");

    let grid = session.grid_mut();
    assert!(grid.sort_by("qty"));
    assert_eq!(names(&grid.derived_rows()), vec!["Gamma", "beta", "Alpha"]);

    assert!(grid.sort_by("qty"));
    assert_eq!(names(&grid.derived_rows()), vec!["Alpha", "beta", "Gamma"]);

    assert!(grid.sort_by("name"));
    assert_eq!(names(&grid.derived_rows()), vec!["Alpha", "beta", "Gamma"]);

    grid.set_filter("  2023 ");
    assert_eq!(names(&grid.derived_rows()), vec!["beta"]);
}

/// In-memory source over a single `name` column, with a switch to make
/// fetches fail.
struct MemorySource {
    rows: Vec<Row>,
    failing: AtomicBool,
}

impl MemorySource {
    fn with_rows(count: usize) -> Self {
        let rows = (0..count)
            .map(|idx| Row::from([("name".to_string(), CellValue::from(format!("r{idx}")))]))
            .collect();
        Self {
            rows,
            failing: AtomicBool::new(false),
        }
    }
}

impl DataSource for MemorySource {
    fn list_files(&self) -> Result<Vec<FileSummary>, SourceError> {
        Ok(Vec::new())
    }

    fn file_metadata(&self, id: &FileId) -> Result<FileMetadata, SourceError> {
        Err(SourceError::NotFound(id.clone()))
    }

    fn fetch_page(
        &self,
        _id: &FileId,
        page: usize,
        page_size: usize,
    ) -> Result<Page, SourceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Storage("connection reset".to_string()));
        }
        let rows = self
            .rows
            .iter()
            .skip(page * page_size)
            .take(page_size)
            .cloned()
            .collect();
        Ok(Page::new(
            vec![Column::new("name", ColumnType::String)],
            rows,
            self.rows.len(),
            page,
            page_size,
        ))
    }
}

fn page_names(session: &ViewSession) -> Vec<String> {
    names(&session.grid().derived_rows())
}

#[test]
fn session_paging_is_clamped_and_keeps_grid_state() {
    let source = Arc::new(MemorySource::with_rows(5));
    let mut session =
        ViewSession::open(source, FileId::from("mem"), 2).expect("session should open");
    assert_eq!(page_names(&session), vec!["r0", "r1"]);

    session.set_page(10).expect("page should load");
    assert_eq!(session.page(), 2);
    assert_eq!(page_names(&session), vec!["r4"]);

    session.next_page().expect("next page should load");
    assert_eq!(session.page(), 2);

    session.previous_page().expect("previous page should load");
    assert_eq!(session.page(), 1);
    assert_eq!(page_names(&session), vec!["r2", "r3"]);

    session.grid_mut().set_filter("R3");
    session.grid_mut().sort_by("name");
    session.set_page(1).expect("reload should succeed");
    assert_eq!(session.grid().filter(), "R3");
    assert_eq!(session.grid().sort().column_name(), Some("name"));
    assert_eq!(page_names(&session), vec!["r3"]);

    session.grid_mut().set_filter("");
    session.set_page_size(25).expect("page size change should load");
    assert_eq!(session.page(), 0);
    assert_eq!(session.page_size(), 25);
    assert_eq!(session.grid().filtered_count(), 5);
}

#[test]
fn failed_fetch_keeps_the_current_page() {
    let source = Arc::new(MemorySource::with_rows(5));
    let mut session = ViewSession::open(source.clone(), FileId::from("mem"), 2)
        .expect("session should open");
    session.next_page().expect("second page should load");

    source.failing.store(true, Ordering::SeqCst);
    let err = session.next_page().expect_err("fetch should fail");
    assert!(matches!(err, SourceError::Storage(_)), "got {err:?}");
    assert_eq!(session.page(), 1);
    assert_eq!(page_names(&session), vec!["r2", "r3"]);

    source.failing.store(false, Ordering::SeqCst);
    let err = session
        .set_page_size(0)
        .expect_err("zero page size should be rejected");
    assert!(matches!(err, SourceError::InvalidRequest(_)), "got {err:?}");
    assert_eq!(session.page_size(), 2);
    assert_eq!(
        session.current_page().map(|page| page.current_page),
        Some(1)
    );
}
