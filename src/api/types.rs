//! Backend data-transfer types
//!
//! Every response type deserializes from `{}` so that an empty success body
//! yields a usable (empty) value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Prova,
    Treino,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Prova => "prova",
            EventType::Treino => "treino",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventType::Prova => "Prova",
            EventType::Treino => "Treino",
        }
    }
}

/// Sport of an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    #[default]
    #[serde(rename = "corrida")]
    Corrida,
    #[serde(rename = "triathlon")]
    Triathlon,
    #[serde(rename = "ciclismo")]
    Ciclismo,
    #[serde(rename = "vôlei")]
    Volei,
    #[serde(rename = "futebol")]
    Futebol,
    /// Any value the backend adds later
    #[serde(rename = "outros", other)]
    Other,
}

impl Sport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Corrida => "corrida",
            Sport::Triathlon => "triathlon",
            Sport::Ciclismo => "ciclismo",
            Sport::Volei => "vôlei",
            Sport::Futebol => "futebol",
            Sport::Other => "outros",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sport::Corrida => "Corrida",
            Sport::Triathlon => "Triathlon",
            Sport::Ciclismo => "Ciclismo",
            Sport::Volei => "Vôlei",
            Sport::Futebol => "Futebol",
            Sport::Other => "Outros",
        }
    }
}

/// Processing status, owned by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Created,
    Processing,
    Completed,
    Failed,
}

impl EventStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Created => "Criado",
            EventStatus::Processing => "Processando",
            EventStatus::Completed => "Concluído",
            EventStatus::Failed => "Falhou",
        }
    }
}

/// Sports event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub id: String,
    pub event_name: String,
    pub event_type: EventType,
    pub sport: Sport,
    pub event_date: String,
    pub event_location: String,
    pub total_photos: u64,
    pub total_athletes_estimated: u64,
    pub status: EventStatus,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Paginated event list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventListResponse {
    pub events: Vec<Event>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}

/// Per-event brand aggregate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandSummary {
    pub event_id: String,
    pub event_name: String,
    pub event_date: String,
    pub brand: String,
    pub persons_with_brand: u64,
    pub total_items: u64,
    pub brand_share_percent: f64,
    pub person_coverage_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventBrandsResponse {
    pub event_id: String,
    pub brands: Vec<BrandSummary>,
}

/// Per-event product aggregate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductSummary {
    pub event_id: String,
    pub event_name: String,
    pub product_type: String,
    pub persons_with_product: u64,
    pub total_items: u64,
    pub product_share_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventProductsResponse {
    pub event_id: String,
    pub products: Vec<ProductSummary>,
}

/// Dashboard KPI aggregate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardMetrics {
    pub total_events: u64,
    pub total_photos_analyzed: u64,
    pub total_athletes_identified: u64,
    pub total_brands_tracked: u64,
}

/// One month of brand counts
///
/// `brands` is sparse: a missing key means the backend has no data for that
/// brand in that month. Keys keep the order the backend sent them in, and
/// every value is a number or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTimeSeriesEntry")]
pub struct BrandTimeSeriesEntry {
    pub date: String,
    pub year: i32,
    pub month: u32,
    #[serde(flatten)]
    pub brands: Map<String, Value>,
}

impl BrandTimeSeriesEntry {
    /// Count for a brand, `None` when absent or null
    pub fn count(&self, brand: &str) -> Option<f64> {
        self.brands.get(brand).and_then(Value::as_f64)
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawTimeSeriesEntry {
    date: String,
    year: i32,
    month: u32,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl From<RawTimeSeriesEntry> for BrandTimeSeriesEntry {
    fn from(raw: RawTimeSeriesEntry) -> Self {
        let brands = raw
            .rest
            .into_iter()
            .filter(|(_, value)| value.is_null() || value.is_number())
            .collect();

        Self {
            date: raw.date,
            year: raw.year,
            month: raw.month,
            brands,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandTimeSeriesResponse {
    pub data: Vec<BrandTimeSeriesEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_parses_backend_payload() {
        let event: Event = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "event_name": "Maratona do Recife",
            "event_type": "prova",
            "sport": "vôlei",
            "event_date": "2025-01-15",
            "event_location": "Recife, PE",
            "total_photos": 4520,
            "total_athletes_estimated": 1200,
            "status": "completed",
            "created_at": "2025-01-10T12:00:00+00:00"
        }))
        .unwrap();

        assert_eq!(event.sport, Sport::Volei);
        assert_eq!(event.status, EventStatus::Completed);
        assert!(event.metadata.is_none());
        assert!(event.processed_at.is_none());
    }

    #[test]
    fn test_unknown_sport_is_tolerated() {
        let event: Event = serde_json::from_value(json!({"sport": "natação"})).unwrap();
        assert_eq!(event.sport, Sport::Other);
        assert_eq!(serde_json::to_value(event.sport).unwrap(), json!(Sport::Other.as_str()));
    }

    #[test]
    fn test_empty_object_yields_defaults() {
        let list: EventListResponse = serde_json::from_str("{}").unwrap();
        assert!(list.events.is_empty());
        assert!(!list.has_more);

        let metrics: DashboardMetrics = serde_json::from_str("{}").unwrap();
        assert_eq!(metrics, DashboardMetrics::default());
    }

    #[test]
    fn test_time_series_keeps_sparse_brand_keys() {
        let response: BrandTimeSeriesResponse = serde_json::from_value(json!({
            "data": [
                {"date": "2025-01", "year": 2025, "month": 1, "nike": 120, "adidas": 80},
                {"date": "2025-02", "year": 2025, "month": 2, "nike": 95, "label": "Fev"},
                {"date": "2025-03", "year": 2025, "month": 3, "adidas": null}
            ]
        }))
        .unwrap();

        let feb = &response.data[1];
        assert_eq!(feb.count("nike"), Some(95.0));
        assert_eq!(feb.count("adidas"), None);
        assert!(!feb.brands.contains_key("adidas"));
        assert!(!feb.brands.contains_key("label"));

        let mar = &response.data[2];
        assert!(mar.brands.contains_key("adidas"));
        assert_eq!(mar.count("adidas"), None);
    }

    #[test]
    fn test_time_series_keeps_backend_key_order() {
        let entry: BrandTimeSeriesEntry = serde_json::from_str(
            r#"{"date": "2025-01", "year": 2025, "month": 1, "nike": 5, "adidas": 3, "asics": null}"#,
        )
        .unwrap();
        let keys: Vec<_> = entry.brands.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["nike", "adidas", "asics"]);
    }
}
