//! Events table

use super::format::{format_date, format_number};
use crate::api::types::{Event, EventListResponse};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub id: String,
    pub name: String,
    pub sport: &'static str,
    pub event_type: &'static str,
    pub date: String,
    pub location: String,
    pub photos: String,
    pub athletes: String,
    pub status: &'static str,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            name: event.event_name.clone(),
            sport: event.sport.label(),
            event_type: event.event_type.label(),
            date: format_date(&event.event_date),
            location: event.event_location.clone(),
            photos: format_number(event.total_photos),
            athletes: format_number(event.total_athletes_estimated),
            status: event.status.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventsTable {
    pub rows: Vec<EventRow>,
    pub total: u64,
    pub has_more: bool,
}

impl EventsTable {
    /// `None` when the page has no events
    pub fn from_response(response: &EventListResponse) -> Option<Self> {
        if response.events.is_empty() {
            return None;
        }
        Some(Self {
            rows: response.events.iter().map(EventRow::from).collect(),
            total: response.total,
            has_more: response.has_more,
        })
    }
}

impl fmt::Display for EventsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Eventos Recentes")?;
        for row in &self.rows {
            writeln!(
                f,
                "  {:<28} {:<10} {:<7} {:>10}  {:<18} {:>9} fotos {:>8} atletas  {}",
                row.name,
                row.sport,
                row.event_type,
                row.date,
                row.location,
                row.photos,
                row.athletes,
                row.status
            )?;
        }
        write!(
            f,
            "  {} de {} eventos",
            format_number(self.rows.len() as u64),
            format_number(self.total)
        )?;
        if self.has_more {
            write!(f, " (mais disponíveis)")?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EventStatus;
    use crate::tests::mocks::sample_event;

    #[test]
    fn test_row_formatting() {
        let mut event = sample_event("evt-1", "corrida");
        event.total_photos = 12_500;
        event.status = EventStatus::Processing;
        let row = EventRow::from(&event);

        assert_eq!(row.date, "21/04/2024");
        assert_eq!(row.photos, "12.500");
        assert_eq!(row.sport, "Corrida");
        assert_eq!(row.event_type, "Prova");
        assert_eq!(row.status, "Processando");
    }

    #[test]
    fn test_table_from_response() {
        let response = EventListResponse {
            events: vec![sample_event("1", "ciclismo"), sample_event("2", "futebol")],
            total: 1520,
            limit: 2,
            offset: 0,
            has_more: true,
        };
        let table = EventsTable::from_response(&response).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert!(table.to_string().contains("2 de 1.520 eventos (mais disponíveis)"));

        assert!(EventsTable::from_response(&EventListResponse::default()).is_none());
    }
}
