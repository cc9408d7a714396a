//! Dashboard filter state and its projection onto the backend query contract
//!
//! The filter panel lets users pick several values per field, but the backend
//! accepts one value per key. [`DashboardFilters::project`] keeps the first
//! selected value of each field; selection order is preserved so the chosen
//! element never changes silently.

use crate::api::client::QueryParams;
use crate::error::{AppError, Result};
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Single-valued backend filter contract; `None` means no constraint
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

impl FilterParams {
    /// Number of constrained fields
    pub fn len(&self) -> usize {
        [
            self.sport.is_some(),
            self.event_type.is_some(),
            self.location.is_some(),
            self.date_from.is_some(),
            self.date_to.is_some(),
            self.brand.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the event filters (everything except `brand`)
    pub fn write_event_params(&self, params: &mut QueryParams) {
        params.insert_opt("sport", self.sport.as_deref());
        params.insert_opt("event_type", self.event_type.as_deref());
        params.insert_opt("location", self.location.as_deref());
        params.insert_opt("date_from", self.date_from.map(|d| d.format(DATE_FORMAT)));
        params.insert_opt("date_to", self.date_to.map(|d| d.format(DATE_FORMAT)));
    }

    /// All constrained fields, including `brand`
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.write_event_params(&mut params);
        params.insert_opt("brand", self.brand.as_deref());
        params
    }
}

/// Multi-select fields of the filter panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Sport,
    EventType,
    Location,
    Brand,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Sport,
        FilterField::EventType,
        FilterField::Brand,
        FilterField::Location,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterField::Sport => "Esporte",
            FilterField::EventType => "Tipo",
            FilterField::Location => "Local",
            FilterField::Brand => "Marca",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FilterField::Sport => "Todos os esportes",
            FilterField::EventType => "Todos os tipos",
            FilterField::Location => "Todas as localizações",
            FilterField::Brand => "Todas as marcas",
        }
    }

    pub fn options(&self) -> &'static [FilterOption] {
        match self {
            FilterField::Sport => SPORTS,
            FilterField::EventType => EVENT_TYPES,
            FilterField::Location => LOCATIONS,
            FilterField::Brand => BRANDS,
        }
    }

    /// Display label for a value, falling back to the value itself
    pub fn label_for<'a>(&self, value: &'a str) -> &'a str {
        self.options()
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label)
            .unwrap_or(value)
    }
}

/// Selectable value of a filter field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> FilterOption {
    FilterOption { value, label }
}

pub const SPORTS: &[FilterOption] = &[
    opt("corrida", "Corrida"),
    opt("triathlon", "Triathlon"),
    opt("ciclismo", "Ciclismo"),
    opt("vôlei", "Vôlei"),
    opt("futebol", "Futebol"),
];

pub const EVENT_TYPES: &[FilterOption] = &[opt("prova", "Prova"), opt("treino", "Treino")];

pub const BRANDS: &[FilterOption] = &[
    opt("Nike", "Nike"),
    opt("Adidas", "Adidas"),
    opt("Mizuno", "Mizuno"),
    opt("Track&Field", "Track&Field"),
    opt("Asics", "Asics"),
    opt("Olympikus", "Olympikus"),
];

pub const LOCATIONS: &[FilterOption] = &[
    opt("Recife, PE", "Recife, PE"),
    opt("Olinda, PE", "Olinda, PE"),
    opt("Jaboatão, PE", "Jaboatão, PE"),
    opt("Ipojuca, PE", "Ipojuca, PE"),
    opt("Caruaru, PE", "Caruaru, PE"),
    opt("Garanhuns, PE", "Garanhuns, PE"),
];

/// UI-local filter state
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DashboardFilters {
    sport: Vec<String>,
    event_type: Vec<String>,
    location: Vec<String>,
    brand: Vec<String>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
}

impl DashboardFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::Sport => &self.sport,
            FilterField::EventType => &self.event_type,
            FilterField::Location => &self.location,
            FilterField::Brand => &self.brand,
        }
    }

    fn values_mut(&mut self, field: FilterField) -> &mut Vec<String> {
        match field {
            FilterField::Sport => &mut self.sport,
            FilterField::EventType => &mut self.event_type,
            FilterField::Location => &mut self.location,
            FilterField::Brand => &mut self.brand,
        }
    }

    /// Select `value` if absent, deselect it if present
    pub fn toggle(&mut self, field: FilterField, value: &str) {
        let values = self.values_mut(field);
        match values.iter().position(|v| v == value) {
            Some(index) => {
                values.remove(index);
            }
            None => values.push(value.to_string()),
        }
    }

    /// Replace the selection, dropping blanks and duplicates
    pub fn set_values<I, S>(&mut self, field: FilterField, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if !value.is_empty() && !selected.contains(&value) {
                selected.push(value);
            }
        }
        *self.values_mut(field) = selected;
    }

    pub fn with_values<I, S>(mut self, field: FilterField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_values(field, values);
        self
    }

    pub fn clear(&mut self, field: FilterField) {
        self.values_mut(field).clear();
    }

    pub fn date_from(&self) -> Option<NaiveDate> {
        self.date_from
    }

    pub fn date_to(&self) -> Option<NaiveDate> {
        self.date_to
    }

    /// Set the start date; rejected if it would land after the end date
    pub fn set_date_from(&mut self, date: Option<NaiveDate>) -> Result<()> {
        if let (Some(from), Some(to)) = (date, self.date_to) {
            if from > to {
                return Err(AppError::Validation(format!(
                    "Data inicial {} é posterior à data final {}",
                    from.format(DATE_FORMAT),
                    to.format(DATE_FORMAT)
                )));
            }
        }
        self.date_from = date;
        Ok(())
    }

    /// Set the end date; the start date is its minimum bound
    pub fn set_date_to(&mut self, date: Option<NaiveDate>) -> Result<()> {
        if let (Some(to), Some(from)) = (date, self.date_from) {
            if to < from {
                return Err(AppError::Validation(format!(
                    "Data final {} é anterior à data inicial {}",
                    to.format(DATE_FORMAT),
                    from.format(DATE_FORMAT)
                )));
            }
        }
        self.date_to = date;
        Ok(())
    }

    pub fn clear_dates(&mut self) {
        self.date_from = None;
        self.date_to = None;
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// Badge count: every selected value plus one per set date
    pub fn active_count(&self) -> usize {
        self.sport.len()
            + self.event_type.len()
            + self.brand.len()
            + self.location.len()
            + usize::from(self.date_from.is_some())
            + usize::from(self.date_to.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Narrow to the single-valued backend contract
    pub fn project(&self) -> FilterParams {
        FilterParams {
            sport: self.sport.first().cloned(),
            event_type: self.event_type.first().cloned(),
            location: self.location.first().cloned(),
            date_from: self.date_from,
            date_to: self.date_to,
            brand: self.brand.first().cloned(),
        }
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| AppError::Validation(format!("Data inválida '{}', use AAAA-MM-DD", raw)))
}

/// Memoized projection: equal filter state yields the same `Arc`
#[derive(Debug, Default)]
pub struct FilterProjector {
    last: Mutex<Option<(DashboardFilters, Arc<FilterParams>)>>,
}

impl FilterProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&self, filters: &DashboardFilters) -> Arc<FilterParams> {
        let mut last = self.last.lock();
        if let Some((cached_filters, params)) = last.as_ref() {
            if cached_filters == filters {
                return Arc::clone(params);
            }
        }

        let params = Arc::new(filters.project());
        *last = Some((filters.clone(), Arc::clone(&params)));
        params
    }
}
