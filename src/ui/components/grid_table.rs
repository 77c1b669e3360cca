use dioxus::prelude::*;

use super::BUTTON_STYLE;
use crate::domain::entities::Page;
use crate::ui::view::{
    cell_text, empty_state_message, footer_summary, page_label, sort_indicator, PAGE_SCOPE_HINT,
    PAGE_SIZE_OPTIONS,
};
use crate::usecase::services::view_service::ViewSession;

const HEADER_CELL_STYLE: &str = "border: 1px solid #bbb; padding: 6px; background: #f5f5f5; text-align: left; cursor: pointer; user-select: none; white-space: nowrap;";
const BODY_CELL_STYLE: &str = "border: 1px solid #bbb; padding: 4px 6px;";

/// Everything the table draws, copied out of the session so no borrow of
/// the signal outlives rendering.
struct GridSnapshot {
    filter: String,
    page_size: usize,
    headers: Vec<(String, &'static str)>,
    columns: Vec<(String, bool)>,
    rows: Vec<Vec<String>>,
    empty_message: Option<&'static str>,
    summary: String,
    label: String,
    first_page: bool,
    last_page: bool,
}

impl GridSnapshot {
    fn capture(session: &ViewSession) -> Option<Self> {
        let grid = session.grid();
        let page = grid.page()?;
        let visible = grid.visible_columns();

        let headers = visible
            .iter()
            .map(|column| {
                (
                    column.name.clone(),
                    sort_indicator(grid.sort(), &column.name),
                )
            })
            .collect();
        let columns = page
            .column_names()
            .map(|name| (name.to_string(), grid.is_column_visible(name)))
            .collect();
        let rows = grid
            .derived_rows()
            .into_iter()
            .map(|row| {
                visible
                    .iter()
                    .map(|column| cell_text(Page::value(row, &column.name)))
                    .collect()
            })
            .collect();

        Some(Self {
            filter: grid.filter().to_string(),
            page_size: session.page_size(),
            headers,
            columns,
            rows,
            empty_message: empty_state_message(grid),
            summary: footer_summary(page),
            label: page_label(page),
            first_page: page.is_first_page(),
            last_page: page.is_last_page(),
        })
    }
}

#[component]
fn ColumnVisibilityDropdown(
    columns: Vec<(String, bool)>,
    mut open: Signal<bool>,
    on_toggle: EventHandler<String>,
) -> Element {
    rsx! {
        div {
            style: "position: relative; display: inline-flex; align-items: center;",
            button {
                style: BUTTON_STYLE,
                onclick: move |event| {
                    event.stop_propagation();
                    let next = !open();
                    open.set(next);
                },
                "Columns"
            }
            if open() {
                div {
                    style: "position: absolute; right: 0; top: 32px; min-width: 220px; max-height: 320px; overflow-y: auto; background: #fff; border: 1px solid #bbb; border-radius: 8px; box-shadow: 0 10px 24px rgba(0,0,0,0.15); z-index: 1200; padding: 6px;",
                    onclick: move |event| event.stop_propagation(),
                    {columns.iter().map(|(name, visible)| {
                        let checked = *visible;
                        let name = name.clone();
                        let text = name.clone();
                        rsx!(
                            label {
                                style: "display: flex; align-items: center; gap: 8px; padding: 6px 4px; cursor: pointer;",
                                input {
                                    r#type: "checkbox",
                                    checked: checked,
                                    onclick: move |_| on_toggle.call(name.clone()),
                                }
                                span { "{text}" }
                            }
                        )
                    })}
                }
            }
        }
    }
}

/// Search box, sortable table and page controls for the open file.
#[component]
pub fn GridTable(mut session: Signal<Option<ViewSession>>, mut status: Signal<String>) -> Element {
    let columns_open = use_signal(|| false);

    let snapshot = session.read().as_ref().and_then(GridSnapshot::capture);
    let Some(GridSnapshot {
        filter,
        page_size,
        headers,
        columns,
        rows,
        empty_message,
        summary,
        label,
        first_page,
        last_page,
    }) = snapshot
    else {
        return rsx! {
            div { style: "padding: 24px; color: #666;", "Select a file to view its rows" }
        };
    };

    let mut change_page = move |target: PageTarget| {
        let result = match session.write().as_mut() {
            Some(current) => match target {
                PageTarget::Previous => current.previous_page(),
                PageTarget::Next => current.next_page(),
                PageTarget::Size(size) => current.set_page_size(size),
            },
            None => Ok(()),
        };
        if let Err(err) = result {
            status.set(format!("Failed to load page: {err}"));
        }
    };

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 8px;",
            div {
                style: "display: flex; gap: 12px; align-items: center;",
                input {
                    style: "flex: 1; padding: 4px 8px;",
                    placeholder: "Search this page",
                    value: "{filter}",
                    oninput: move |event| {
                        if let Some(current) = session.write().as_mut() {
                            current.grid_mut().set_filter(event.value());
                        }
                    },
                }
                select {
                    value: "{page_size}",
                    onchange: move |event| {
                        if let Ok(size) = event.value().parse::<usize>() {
                            change_page(PageTarget::Size(size));
                        }
                    },
                    {PAGE_SIZE_OPTIONS.iter().map(|size| rsx!(
                        option { value: "{size}", selected: *size == page_size, "{size} rows" }
                    ))}
                }
                ColumnVisibilityDropdown {
                    columns: columns.clone(),
                    open: columns_open,
                    on_toggle: move |name: String| {
                        if let Some(current) = session.write().as_mut() {
                            current.grid_mut().toggle_column(&name);
                        }
                    },
                }
            }
            p { style: "margin: 0; font-size: 12px; color: #666;", "{PAGE_SCOPE_HINT}" }

            if let Some(message) = empty_message {
                div { style: "padding: 24px; color: #666;", "{message}" }
            } else {
                div {
                    style: "overflow: auto; max-height: 70vh;",
                    table { style: "border-collapse: collapse; width: 100%; background: #fff;",
                        thead {
                            tr {
                                {headers.iter().map(|(name, indicator)| {
                                    let column = name.clone();
                                    rsx!(
                                        th {
                                            style: HEADER_CELL_STYLE,
                                            onclick: move |_| {
                                                if let Some(current) = session.write().as_mut() {
                                                    current.grid_mut().sort_by(&column);
                                                }
                                            },
                                            "{name} {indicator}"
                                        }
                                    )
                                })}
                            }
                        }
                        tbody {
                            {rows.iter().map(|row| rsx!(
                                tr {
                                    {row.iter().map(|text| rsx!(
                                        td { style: BODY_CELL_STYLE, "{text}" }
                                    ))}
                                }
                            ))}
                        }
                    }
                }
            }

            div {
                style: "display: flex; align-items: center; justify-content: space-between;",
                span { style: "font-size: 13px; color: #555;", "{summary}" }
                div {
                    style: "display: flex; align-items: center; gap: 8px;",
                    button {
                        style: BUTTON_STYLE,
                        disabled: first_page,
                        onclick: move |_| change_page(PageTarget::Previous),
                        "Previous"
                    }
                    span { "{label}" }
                    button {
                        style: BUTTON_STYLE,
                        disabled: last_page,
                        onclick: move |_| change_page(PageTarget::Next),
                        "Next"
                    }
                }
            }
        }
    }
}

#[derive(Clone, Copy)]
enum PageTarget {
    Previous,
    Next,
    Size(usize),
}
