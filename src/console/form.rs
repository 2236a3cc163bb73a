//! Form lifecycle: modal state, field population, validation, payloads,
//! and the read-only detail view.
//!
//! Field values are kept as input strings and parsed only when the payload
//! is built, matching the form edge where numbers may be blank or partially
//! typed. The engine keeps accuracy as a 0-100 percent everywhere; the
//! store form's 0-1 confidence decimal is converted at this edge only.

use jiff::Timestamp;

use crate::error::{ConsoleError, Result};
use crate::format::{format_datetime, format_number, format_percent, format_price, time_ago};
use crate::types::{Category, FormPayload, Record, ResourceKind, Status};

/// The three modal views per resource; never more than one open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    Closed,
    Create,
    Edit {
        id: i64,
    },
    View {
        id: i64,
    },
}

impl Modal {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::Closed)
    }
}

/// Raw form inputs shared by the create and edit views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    pub name: String,
    /// SKU or store code, depending on the screen.
    pub code: String,
    /// Selected category id as the dropdown value; empty for none.
    pub category: String,
    pub status: Status,
    pub price: String,
    pub accuracy: String,
    pub detection_count: String,
    pub description: String,
    pub address: String,
    /// Store confidence input in 0-1 decimal form.
    pub confidence_decimal: String,
}

impl FormFields {
    /// Defaults for a fresh create form. Status starts `active`; the
    /// category is prefilled from the list's active category filter.
    pub fn for_create(category_filter: &str) -> Self {
        Self {
            status: Status::Active,
            category: category_filter.to_string(),
            ..Default::default()
        }
    }

    /// Populate every field from a fetched record for the edit view.
    pub fn populate(kind: ResourceKind, record: &Record) -> Self {
        let mut fields = Self {
            name: record.name.clone(),
            code: record.code_value(kind).to_string(),
            category: record
                .category
                .map(|id| id.to_string())
                .unwrap_or_default(),
            status: record.status,
            description: record.description.clone().unwrap_or_default(),
            ..Default::default()
        };
        match kind {
            ResourceKind::Products => {
                fields.price = record.price.map(|p| p.to_string()).unwrap_or_default();
                fields.accuracy = record
                    .accuracy_rate
                    .map(|a| a.to_string())
                    .unwrap_or_default();
                fields.detection_count = record
                    .detection_count
                    .map(|c| c.to_string())
                    .unwrap_or_default();
            }
            ResourceKind::Stores => {
                fields.address = record.address.clone().unwrap_or_default();
                // The stored percent feeds the 0-1 decimal input.
                fields.confidence_decimal = record
                    .accuracy_rate
                    .map(|a| (a / 100.0).to_string())
                    .unwrap_or_default();
            }
        }
        fields
    }

    /// Client-side validation; failures never reach the network.
    ///
    /// Name and the unique code must be non-blank. On the store screen a
    /// chosen category must be among the loaded options, guarding against a
    /// stale dropdown.
    pub fn validate(&self, kind: ResourceKind, categories: &[Category]) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConsoleError::Validation {
                field: "name",
                message: kind.name_required_message(),
            });
        }
        if self.code.trim().is_empty() {
            return Err(ConsoleError::Validation {
                field: "code",
                message: kind.code_required_message(),
            });
        }
        if kind.guards_category() && !self.category.is_empty() {
            let known = self
                .category
                .parse::<i64>()
                .ok()
                .is_some_and(|id| categories.iter().any(|c| c.id == id));
            if !known {
                return Err(ConsoleError::Validation {
                    field: "category",
                    message: "Danh mục đã chọn không hợp lệ. Vui lòng chọn lại.",
                });
            }
        }
        Ok(())
    }

    /// Build the write payload. Blank numeric inputs are omitted; the store
    /// confidence decimal is clamped to 0-1 and converted to an integer
    /// percent.
    pub fn to_payload(&self, kind: ResourceKind) -> FormPayload {
        let mut payload = FormPayload {
            name: self.name.trim().to_string(),
            category: self.category.parse::<i64>().ok(),
            status: Some(self.status),
            description: self.description.trim().to_string(),
            ..Default::default()
        };
        match kind {
            ResourceKind::Products => {
                payload.sku = Some(self.code.trim().to_string());
                payload.price = self.price.trim().parse::<f64>().ok();
                payload.accuracy_rate = self.accuracy.trim().parse::<f64>().ok();
                payload.detection_count =
                    Some(self.detection_count.trim().parse::<i64>().unwrap_or(0));
            }
            ResourceKind::Stores => {
                payload.code = Some(self.code.trim().to_string());
                payload.address = Some(self.address.trim().to_string());
                payload.confidence = self
                    .confidence_decimal
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .map(|dec| (dec.clamp(0.0, 1.0) * 100.0).round() as i64);
            }
        }
        payload
    }
}

/// Derived display fields for the read-only detail view. Carries no staged
/// files and cannot persist; its only action is handing off to Edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub name: String,
    /// "{category} • Mã SP: {code}" style subtitle.
    pub subtitle: String,
    pub status: String,
    pub accuracy: String,
    pub detection_count: String,
    pub last_detected: String,
    pub category: String,
    /// Formatted price; products only.
    pub price: Option<String>,
    /// Street address; stores only.
    pub address: Option<String>,
    pub created_at: String,
    pub image_url: Option<String>,
}

pub fn detail_view(kind: ResourceKind, record: &Record, now: Timestamp) -> DetailView {
    let category_name = record
        .category_name
        .clone()
        .or_else(|| record.category.map(|id| id.to_string()))
        .unwrap_or_default();
    DetailView {
        name: record.name.clone(),
        subtitle: format!(
            "{category_name} • {}: {}",
            kind.code_label(),
            record.code_value(kind)
        ),
        status: record
            .status_display
            .clone()
            .unwrap_or_else(|| record.status.label().to_string()),
        accuracy: record
            .accuracy_rate
            .map(format_percent)
            .unwrap_or_else(|| "—".to_string()),
        detection_count: format_number(record.detection_count.unwrap_or(0)),
        last_detected: record
            .last_detected_at
            .as_deref()
            .map(|iso| time_ago(iso, now))
            .unwrap_or_else(|| "Chưa phát hiện".to_string()),
        category: if category_name.is_empty() {
            "—".to_string()
        } else {
            category_name.clone()
        },
        price: kind.has_price().then(|| {
            record
                .price
                .map(format_price)
                .unwrap_or_else(|| "—".to_string())
        }),
        address: matches!(kind, ResourceKind::Stores).then(|| {
            record
                .address
                .clone()
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| "—".to_string())
        }),
        created_at: record
            .created_at
            .as_deref()
            .map(format_datetime)
            .unwrap_or_else(|| "—".to_string()),
        image_url: record.image_url.clone(),
    }
}
