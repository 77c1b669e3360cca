use dioxus::prelude::*;

use super::BUTTON_STYLE;
use crate::domain::entities::FileMetadata;
use crate::ui::view::{cell_text, format_file_size, format_instant};
use crate::usecase::services::export_service::ExportFormat;

#[component]
pub fn FileMetadataPanel(
    metadata: FileMetadata,
    busy: bool,
    on_export: EventHandler<ExportFormat>,
) -> Element {
    let size = format_file_size(metadata.size);
    let created = format_instant(&metadata.created_at);
    let modified = format_instant(&metadata.last_modified);
    let average_row = metadata
        .statistics
        .as_ref()
        .map(|stats| format_file_size(stats.average_row_size.round() as u64))
        .unwrap_or_else(|| "-".to_string());
    let column_count = metadata.schema.len();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 8px; padding-bottom: 12px; border-bottom: 1px solid #ddd;",
            div {
                style: "display: flex; align-items: center; justify-content: space-between;",
                h2 { style: "margin: 0;", "{metadata.name}" }
                div {
                    style: "display: flex; gap: 8px;",
                    {[ExportFormat::Csv, ExportFormat::Excel].into_iter().map(|format| {
                        let key = format.extension();
                        let label = format.label();
                        rsx!(
                            button {
                                key: "{key}",
                                style: BUTTON_STYLE,
                                disabled: busy,
                                onclick: move |_| on_export.call(format),
                                "Download as {label}"
                            }
                        )
                    })}
                }
            }
            div {
                style: "display: flex; gap: 24px; font-size: 13px; color: #444; flex-wrap: wrap;",
                span { "Format: {metadata.format}" }
                span { "Compression: {metadata.compression}" }
                span { "Size: {size}" }
                span { "Rows: {metadata.row_count}" }
                span { "Columns: {column_count}" }
                span { "Avg row: {average_row}" }
                span { "Imported: {created}" }
                span { "Modified: {modified}" }
            }
            details {
                summary { style: "cursor: pointer;", "Schema" }
                table { style: "border-collapse: collapse; font-size: 13px; margin-top: 6px;",
                    thead {
                        tr {
                            th { style: "text-align: left; padding: 2px 12px 2px 0;", "Column" }
                            th { style: "text-align: left; padding: 2px 12px 2px 0;", "Type" }
                            th { style: "text-align: left; padding: 2px 12px 2px 0;", "Nullable" }
                            th { style: "text-align: left; padding: 2px 12px 2px 0;", "Nulls" }
                            th { style: "text-align: left; padding: 2px 12px 2px 0;", "Distinct" }
                            th { style: "text-align: left; padding: 2px 12px 2px 0;", "Min" }
                            th { style: "text-align: left; padding: 2px 12px 2px 0;", "Max" }
                        }
                    }
                    tbody {
                        {metadata.schema.iter().map(|column| {
                            let stats = column.statistics.clone().unwrap_or_default();
                            let nulls = stats.null_count.map(|n| n.to_string()).unwrap_or_default();
                            let distinct = stats.distinct_count.map(|n| n.to_string()).unwrap_or_default();
                            let min = stats.min.as_ref().map(cell_text).unwrap_or_default();
                            let max = stats.max.as_ref().map(cell_text).unwrap_or_default();
                            let nullable = if column.nullable { "yes" } else { "no" };
                            rsx!(
                                tr {
                                    td { style: "padding: 2px 12px 2px 0;", "{column.name}" }
                                    td { style: "padding: 2px 12px 2px 0;", "{column.column_type}" }
                                    td { style: "padding: 2px 12px 2px 0;", "{nullable}" }
                                    td { style: "padding: 2px 12px 2px 0;", "{nulls}" }
                                    td { style: "padding: 2px 12px 2px 0;", "{distinct}" }
                                    td { style: "padding: 2px 12px 2px 0;", "{min}" }
                                    td { style: "padding: 2px 12px 2px 0;", "{max}" }
                                }
                            )
                        })}
                    }
                }
            }
        }
    }
}
