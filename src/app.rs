use std::sync::Arc;

use dioxus::prelude::*;
use rfd::FileDialog;

use crate::config::AppConfig;
use crate::domain::entities::{FileId, FileMetadata, FileSummary};
use crate::infra::sqlite::repo::SqliteSource;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::components::{FileExplorer, FileMetadataPanel, GridTable};
use crate::ui::state::app_state::AppState;
use crate::usecase::ports::source::{Catalog, DataSource, SourceError};
use crate::usecase::services::browse_service::BrowseService;
use crate::usecase::services::export_service::{ExportFormat, ExportService};
use crate::usecase::services::import_service::ImportService;
use crate::usecase::services::view_service::ViewSession;

fn refresh_files(
    source: Arc<dyn DataSource>,
    mut files: Signal<Vec<FileSummary>>,
    mut status: Signal<String>,
) {
    match run_blocking("list files", || BrowseService::new(source).list_files()) {
        Ok(available) => files.set(available),
        Err(err) => {
            log::error!("failed to list files: {err}");
            status.set(format!("Failed to list files: {err}"));
        }
    }
}

/// Loads the metadata and first page of `id`. Nothing is replaced unless
/// both succeed.
fn open_file(
    source: Arc<dyn DataSource>,
    id: FileId,
    page_size: usize,
    mut selected_file: Signal<Option<FileId>>,
    mut metadata: Signal<Option<FileMetadata>>,
    mut session: Signal<Option<ViewSession>>,
    mut status: Signal<String>,
) {
    let result = run_blocking("open file", || -> Result<_, SourceError> {
        let loaded = BrowseService::new(source.clone()).file_metadata(&id)?;
        let opened = ViewSession::open(source, id.clone(), page_size)?;
        Ok((loaded, opened))
    });
    match result {
        Ok((loaded, opened)) => {
            status.set(format!("Opened {}", loaded.name));
            selected_file.set(Some(id));
            metadata.set(Some(loaded));
            session.set(Some(opened));
        }
        Err(err) => {
            log::error!("failed to open file {id}: {err}");
            status.set(format!("Failed to open file: {err}"));
        }
    }
}

#[component]
pub fn App() -> Element {
    let config = use_context::<AppConfig>();
    let source = use_hook(|| Arc::new(SqliteSource::new(config.db_path.clone())));

    let AppState {
        files,
        file_query,
        file_sort,
        mut selected_file,
        mut metadata,
        mut session,
        mut busy,
        mut status,
    } = AppState::new();

    let source_for_init = source.clone();
    use_effect(move || {
        let source = source_for_init.clone();
        *busy.write() = true;
        match run_blocking("init catalog", || source.init()) {
            Ok(()) => refresh_files(source, files, status),
            Err(err) => {
                log::error!("failed to initialize catalog: {err}");
                status.set(format!("Failed to initialize database: {err}"));
            }
        }
        *busy.write() = false;
    });

    let page_size = config.default_page_size;

    let source_for_select = source.clone();
    let source_for_import = source.clone();
    let source_for_remove = source.clone();
    let source_for_export = source.clone();

    let handle_select = move |id: FileId| {
        if selected_file().as_ref() == Some(&id) {
            return;
        }
        open_file(
            source_for_select.clone(),
            id,
            page_size,
            selected_file,
            metadata,
            session,
            status,
        );
    };

    let handle_import = move |_: ()| {
        let Some(file_path) = FileDialog::new()
            .add_filter("Tables", &["csv", "xlsx", "xlsm", "xls", "ods"])
            .add_filter("CSV", &["csv"])
            .add_filter("Excel", &["xlsx", "xlsm", "xls"])
            .pick_file()
        else {
            return;
        };

        *busy.write() = true;
        status.set(format!("Importing {}", file_path.display()));
        let catalog: Arc<dyn Catalog> = source_for_import.clone();
        match run_blocking("import", || ImportService::new(catalog).import_path(&file_path)) {
            Ok(imported) => {
                refresh_files(source_for_import.clone(), files, status);
                let total: usize = imported.iter().map(|item| item.row_count).sum();
                status.set(format!(
                    "Imported {} table(s), {total} rows",
                    imported.len()
                ));
                if let Some(first) = imported.into_iter().next() {
                    open_file(
                        source_for_import.clone(),
                        first.file_id,
                        page_size,
                        selected_file,
                        metadata,
                        session,
                        status,
                    );
                }
            }
            Err(err) => {
                log::error!("import of {} failed: {err}", file_path.display());
                status.set(format!("Import failed: {err}"));
            }
        }
        *busy.write() = false;
    };

    let handle_remove = move |id: FileId| {
        *busy.write() = true;
        let catalog: Arc<dyn Catalog> = source_for_remove.clone();
        match run_blocking("remove file", || ImportService::new(catalog).remove(&id)) {
            Ok(()) => {
                if selected_file().as_ref() == Some(&id) {
                    selected_file.set(None);
                    metadata.set(None);
                    session.set(None);
                }
                refresh_files(source_for_remove.clone(), files, status);
                status.set(format!("Removed file {id}"));
            }
            Err(err) => status.set(format!("Failed to remove file: {err}")),
        }
        *busy.write() = false;
    };

    let handle_export = move |format: ExportFormat| {
        let Some(current) = metadata() else {
            return;
        };
        let extension = format.extension();
        let Some(target) = FileDialog::new()
            .set_file_name(format!("{}.{extension}", current.name))
            .add_filter(format.label(), &[extension])
            .save_file()
        else {
            return;
        };

        *busy.write() = true;
        let exporter = ExportService::new(source_for_export.clone());
        match run_blocking("export", || exporter.export_to_path(&current.id, format, &target)) {
            Ok(written) => status.set(format!("Exported {written} rows to {}", target.display())),
            Err(err) => status.set(format!("Export failed: {err}")),
        }
        *busy.write() = false;
    };

    rsx! {
        div {
            style: "display: flex; flex-direction: column; height: 100vh; font-family: sans-serif; padding: 12px; box-sizing: border-box;",
            div {
                style: "display: flex; flex: 1; gap: 12px; min-height: 0;",
                FileExplorer {
                    files: files(),
                    query: file_query,
                    sort: file_sort,
                    selected: selected_file(),
                    busy: busy(),
                    on_select: handle_select,
                    on_import: handle_import,
                    on_remove: handle_remove,
                }
                div {
                    style: "display: flex; flex-direction: column; flex: 1; gap: 12px; min-width: 0;",
                    if let Some(current) = metadata() {
                        FileMetadataPanel {
                            metadata: current,
                            busy: busy(),
                            on_export: handle_export,
                        }
                    }
                    GridTable { session: session, status: status }
                }
            }
            div {
                style: "margin-top: 8px; font-size: 12px; color: #555;",
                if busy() { "Working... " }
                "{status}"
            }
        }
    }
}
