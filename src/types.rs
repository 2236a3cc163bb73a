//! Wire types for the GEM admin API.
//!
//! The two managed resources (catalog products and retail stores) share one
//! normalized `Record` shape; fields that only one kind carries are optional.
//! `ResourceKind` is the schema descriptor the generic screen engine is
//! parameterized by.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};

/// Record status. Products use all four states; stores only
/// `active`/`inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Training,
    Review,
    Inactive,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Training => "training",
            Status::Review => "review",
            Status::Inactive => "inactive",
        }
    }

    /// Vietnamese display label, as rendered in list badges.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Active => "Hoạt Động",
            Status::Training => "Đang Huấn Luyện",
            Status::Review => "Cần Xem Xét",
            Status::Inactive => "Ngừng",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(Status::Active),
            "training" => Ok(Status::Training),
            "review" => Ok(Status::Review),
            "inactive" => Ok(Status::Inactive),
            _ => Err(ConsoleError::Api(format!("invalid status '{s}'"))),
        }
    }
}

/// The two managed resource collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Products,
    Stores,
}

impl ResourceKind {
    /// API path segment under `/api/`.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Products => "products",
            ResourceKind::Stores => "stores",
        }
    }

    /// Vietnamese noun used in pagination labels and confirmations.
    pub fn noun(&self) -> &'static str {
        match self {
            ResourceKind::Products => "sản phẩm",
            ResourceKind::Stores => "cửa hàng",
        }
    }

    /// Statuses selectable on this screen.
    pub fn statuses(&self) -> &'static [Status] {
        match self {
            ResourceKind::Products => &[
                Status::Active,
                Status::Training,
                Status::Review,
                Status::Inactive,
            ],
            ResourceKind::Stores => &[Status::Active, Status::Inactive],
        }
    }

    /// Whether records of this kind carry a price.
    pub fn has_price(&self) -> bool {
        matches!(self, ResourceKind::Products)
    }

    /// Whether save must reject a category id that is not among the loaded
    /// category options (protects against stale dropdown state).
    pub fn guards_category(&self) -> bool {
        matches!(self, ResourceKind::Stores)
    }

    pub fn name_required_message(&self) -> &'static str {
        match self {
            ResourceKind::Products => "Vui lòng nhập tên sản phẩm",
            ResourceKind::Stores => "Vui lòng nhập tên cửa hàng",
        }
    }

    pub fn code_required_message(&self) -> &'static str {
        match self {
            ResourceKind::Products => "Vui lòng nhập mã SKU",
            ResourceKind::Stores => "Vui lòng nhập mã cửa hàng",
        }
    }

    /// Label prefix for the unique code in the detail subtitle.
    pub fn code_label(&self) -> &'static str {
        match self {
            ResourceKind::Products => "Mã SP",
            ResourceKind::Stores => "Mã CH",
        }
    }

    pub fn confirm_delete_message(&self) -> String {
        format!("Bạn có chắc muốn xóa {} này?", self.noun())
    }

    /// Declared bulk-action endpoints (store screen only). These are wired
    /// into the page but never invoked from the inspected control flow, so
    /// only the URLs are exposed; no request shape is assumed.
    pub fn bulk_endpoints(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::Products => &[],
            ResourceKind::Stores => &[
                "bulk_restart",
                "bulk_alert",
                "bulk_update_model",
                "bulk_configure",
            ],
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Normalized record for either resource kind.
///
/// `sku` is populated for products, `code` and `address` for stores.
/// `accuracy_rate` is canonically a percentage (0-100); the 0-1 decimal
/// form exists only at the store form edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub category: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub status_display: Option<String>,
    #[serde(default)]
    pub accuracy_rate: Option<f64>,
    #[serde(default)]
    pub detection_count: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_updated_at: Option<String>,
    #[serde(default)]
    pub last_detected_at: Option<String>,
}

impl Record {
    /// The unique code field for the given kind (SKU or store code).
    pub fn code_value(&self, kind: ResourceKind) -> &str {
        let field = match kind {
            ResourceKind::Products => &self.sku,
            ResourceKind::Stores => &self.code,
        };
        field.as_deref().unwrap_or("")
    }
}

/// Read-only category lookup, loaded once per screen session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Paginated list envelope returned by every collection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Aggregate KPI object from `/api/{resource}/metrics/`. Product and store
/// variants report different totals, so every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub total_products: Option<u64>,
    #[serde(default)]
    pub active_products: Option<u64>,
    #[serde(default)]
    pub total_stores: Option<u64>,
    #[serde(default)]
    pub active_stores: Option<u64>,
    #[serde(default)]
    pub avg_accuracy_rate: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u64>,
}

/// Write payload for create/update. Serialized as-is on the JSON path and
/// field-by-field on the multipart path.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub category: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Write-only store confidence as an integer percent (0-100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<i64>,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for s in [
            Status::Active,
            Status::Training,
            Status::Review,
            Status::Inactive,
        ] {
            assert_eq!(s.as_str().parse::<Status>().unwrap(), s);
        }
        assert!("archived".parse::<Status>().is_err());
    }

    #[test]
    fn test_store_statuses_are_binary() {
        assert_eq!(
            ResourceKind::Stores.statuses(),
            &[Status::Active, Status::Inactive]
        );
        assert_eq!(ResourceKind::Products.statuses().len(), 4);
    }

    #[test]
    fn test_record_code_value_per_kind() {
        let record = Record {
            sku: Some("SKU-1".into()),
            code: Some("CH-9".into()),
            ..Default::default()
        };
        assert_eq!(record.code_value(ResourceKind::Products), "SKU-1");
        assert_eq!(record.code_value(ResourceKind::Stores), "CH-9");
    }

    #[test]
    fn test_record_tolerates_sparse_json() {
        let record: Record = serde_json::from_str(r#"{"id": 7, "name": "Trà sữa"}"#).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.status, Status::Active);
        assert!(record.sku.is_none());
        assert!(record.price.is_none());
    }

    #[test]
    fn test_payload_omits_absent_optionals_but_keeps_category_null() {
        let payload = FormPayload {
            name: "Kệ A".into(),
            code: Some("CH-01".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("sku").is_none());
        assert!(json.get("price").is_none());
        assert_eq!(json["category"], serde_json::Value::Null);
    }

    #[test]
    fn test_bulk_endpoints_declared_only_for_stores() {
        assert!(ResourceKind::Products.bulk_endpoints().is_empty());
        assert_eq!(ResourceKind::Stores.bulk_endpoints().len(), 4);
    }
}
