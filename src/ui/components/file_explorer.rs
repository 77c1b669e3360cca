use dioxus::prelude::*;

use super::{ACTIVE_BUTTON_STYLE, BUTTON_STYLE};
use crate::domain::entities::{FileId, FileSummary, SortDirection};
use crate::ui::view::{format_file_size, format_instant};
use crate::usecase::services::browse_service::{search_files, sort_files, FileSort, FileSortField};

#[component]
pub fn FileExplorer(
    files: Vec<FileSummary>,
    mut query: Signal<String>,
    mut sort: Signal<FileSort>,
    selected: Option<FileId>,
    busy: bool,
    on_select: EventHandler<FileId>,
    on_import: EventHandler<()>,
    on_remove: EventHandler<FileId>,
) -> Element {
    let mut shown = search_files(&files, &query());
    let current_sort = sort();
    sort_files(&mut shown, &current_sort);
    let file_count = shown.len();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 8px; width: 320px; padding-right: 12px; border-right: 1px solid #ddd;",
            div {
                style: "display: flex; gap: 8px;",
                input {
                    style: "flex: 1; padding: 4px 8px;",
                    placeholder: "Search files",
                    value: "{query}",
                    oninput: move |event| query.set(event.value()),
                }
                button {
                    style: BUTTON_STYLE,
                    disabled: busy,
                    onclick: move |_| on_import.call(()),
                    "Import"
                }
            }
            div {
                style: "display: flex; gap: 4px; flex-wrap: wrap;",
                {FileSortField::ALL.iter().map(|&field| {
                    let active = current_sort.is_sorted_by(&field);
                    let arrow = match (active, current_sort.direction) {
                        (false, _) => "",
                        (true, SortDirection::Asc) => " ▲",
                        (true, SortDirection::Desc) => " ▼",
                    };
                    let label = field.label();
                    rsx!(
                        button {
                            style: if active { ACTIVE_BUTTON_STYLE } else { BUTTON_STYLE },
                            onclick: move |_| sort.write().toggle(field),
                            "{label}{arrow}"
                        }
                    )
                })}
            }
            span { style: "font-size: 12px; color: #666;", "{file_count} files" }
            div {
                style: "display: flex; flex-direction: column; gap: 6px; overflow-y: auto;",
                {shown.into_iter().map(|file| {
                    let is_selected = selected.as_ref() == Some(&file.id);
                    let select_id = file.id.clone();
                    let remove_id = file.id.clone();
                    let size = format_file_size(file.size);
                    let modified = format_instant(&file.last_modified);
                    rsx!(
                        div {
                            style: if is_selected {
                                "border: 1px solid #4c6ef5; background: #eef4ff; border-radius: 8px; padding: 8px; cursor: pointer;"
                            } else {
                                "border: 1px solid #ddd; background: #fff; border-radius: 8px; padding: 8px; cursor: pointer;"
                            },
                            onclick: move |_| on_select.call(select_id.clone()),
                            div { style: "font-weight: 600;", "{file.name}" }
                            div { style: "font-size: 12px; color: #666; overflow-wrap: anywhere;", "{file.path}" }
                            div {
                                style: "display: flex; justify-content: space-between; font-size: 12px; color: #444;",
                                span { "{size} · {file.row_count} rows · {file.column_count} cols" }
                                button {
                                    style: "border: none; background: none; color: #c92a2a; cursor: pointer;",
                                    disabled: busy,
                                    onclick: move |event| {
                                        event.stop_propagation();
                                        on_remove.call(remove_id.clone());
                                    },
                                    "Remove"
                                }
                            }
                            div { style: "font-size: 11px; color: #888;", "{modified}" }
                        }
                    )
                })}
            }
        }
    }
}
