use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::{FileId, FileMetadata, FileSummary};
use crate::usecase::services::browse_service::{default_file_sort, FileSort};
use crate::usecase::services::view_service::ViewSession;

pub struct AppState {
    pub files: Signal<Vec<FileSummary>>,
    pub file_query: Signal<String>,
    pub file_sort: Signal<FileSort>,
    pub selected_file: Signal<Option<FileId>>,
    pub metadata: Signal<Option<FileMetadata>>,
    pub session: Signal<Option<ViewSession>>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            files: use_signal(Vec::<FileSummary>::new),
            file_query: use_signal(String::new),
            file_sort: use_signal(default_file_sort),
            selected_file: use_signal(|| None::<FileId>),
            metadata: use_signal(|| None::<FileMetadata>),
            session: use_signal(|| None::<ViewSession>),
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
        }
    }
}
