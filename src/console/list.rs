//! List pane rendering.
//!
//! Produces the table-body HTML fragments and the pagination view-model for
//! one page of records. Rendering is pure; fetching and state transitions
//! live on the screen engine.

use jiff::Timestamp;

use crate::format::{escape_html, format_number, format_percent, time_ago};
use crate::types::{Page, Record, ResourceKind, Status};

/// Number of columns in the table, for placeholder rows.
const COLSPAN: u32 = 9;

/// Pagination affordances derived from the server envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    /// Human-readable "Hiển thị X đến Y của N ..." label.
    pub label: String,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

/// Build the pagination view for the current page.
///
/// `start`/`end` are computed from the query position and the reported
/// total; `end` is floor-clamped so it never exceeds the count. The
/// prev/next affordances follow the server's `previous`/`next` links, not
/// local arithmetic.
pub fn pagination_view(
    kind: ResourceKind,
    page: u32,
    page_size: u32,
    envelope: &Page<Record>,
) -> PaginationView {
    let start = u64::from(page - 1) * u64::from(page_size) + 1;
    let end = (u64::from(page) * u64::from(page_size)).min(envelope.count);
    PaginationView {
        label: format!(
            "Hiển thị {start} đến {end} của {} {}",
            format_number(envelope.count as i64),
            kind.noun()
        ),
        prev_disabled: envelope.previous.is_none(),
        next_disabled: envelope.next.is_none(),
    }
}

/// Placeholder shown while a list request is outstanding.
pub fn loading_row() -> String {
    placeholder_row("Đang tải...", "text-slate-500")
}

/// Placeholder for an empty result set.
pub fn empty_row() -> String {
    placeholder_row("Không có dữ liệu", "text-slate-500")
}

/// Inline error row; the message is escaped before insertion.
pub fn error_row(message: &str) -> String {
    placeholder_row(
        &format!("Lỗi tải dữ liệu: {}", escape_html(message)),
        "text-orange-600",
    )
}

fn placeholder_row(text: &str, class: &str) -> String {
    format!(
        r#"<tr><td colspan="{COLSPAN}" class="px-4 py-6 text-center {class}">{text}</td></tr>"#
    )
}

/// Render the table body for a page of records.
pub fn render_rows(kind: ResourceKind, records: &[Record], now: Timestamp) -> String {
    records
        .iter()
        .map(|record| row_html(kind, record, now))
        .collect()
}

fn status_badge(status: Status) -> String {
    let classes = match status {
        Status::Active => "bg-blue-100 text-blue-700",
        Status::Training => "bg-indigo-700 text-white",
        Status::Review => "bg-orange-600 text-white",
        Status::Inactive => "bg-slate-200 text-slate-700",
    };
    format!(
        r#"<span class="inline-flex items-center rounded-full {classes} px-2.5 py-1 text-xs font-medium">{}</span>"#,
        status.label()
    )
}

fn row_html(kind: ResourceKind, record: &Record, now: Timestamp) -> String {
    let accuracy = record
        .accuracy_rate
        .map(format_percent)
        .unwrap_or_else(|| "-".to_string());
    let detections = format_number(record.detection_count.unwrap_or(0));
    let updated = record
        .last_updated_at
        .as_deref()
        .map(|iso| time_ago(iso, now))
        .unwrap_or_else(|| "-".to_string());
    // Only store rows participate in selection sync.
    let checkbox = match kind {
        ResourceKind::Stores => format!(
            r#"<input type="checkbox" class="row-select" data-id="{}"/>"#,
            record.id
        ),
        ResourceKind::Products => r#"<input type="checkbox"/>"#.to_string(),
    };
    format!(
        r#"<tr class="border-t border-slate-100">
  <td class="px-4 py-4 align-top">{checkbox}</td>
  <td class="px-4 py-4">
    <div class="font-medium">{name}</div>
    <div class="text-xs text-slate-500">{description}</div>
  </td>
  <td class="px-4 py-4">{category}</td>
  <td class="px-4 py-4">{code}</td>
  <td class="px-4 py-4">{badge}</td>
  <td class="px-4 py-4">{accuracy}</td>
  <td class="px-4 py-4">{detections}</td>
  <td class="px-4 py-4">{updated}</td>
  <td class="px-4 py-4">
    <button title="Xem" data-action="view" data-id="{id}"></button>
    <button title="Sửa" data-action="edit" data-id="{id}"></button>
    <button title="Xóa" data-action="delete" data-id="{id}"></button>
  </td>
</tr>"#,
        name = escape_html(&record.name),
        description = escape_html(record.description.as_deref().unwrap_or("")),
        category = escape_html(record.category_name.as_deref().unwrap_or("")),
        code = escape_html(record.code_value(kind)),
        badge = status_badge(record.status),
        id = record.id,
    )
}
