//! KPI cards

use super::format::{format_change, format_number};
use crate::api::types::DashboardMetrics;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct KpiCard {
    pub title: &'static str,
    pub value: u64,
    /// Change against the previous period, in percent
    pub change: Option<f64>,
}

impl KpiCard {
    pub fn formatted_value(&self) -> String {
        format_number(self.value)
    }
}

impl fmt::Display for KpiCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<24} {:>12}", self.title, self.formatted_value())?;
        if let Some(change) = self.change {
            write!(f, "  {} vs. mês anterior", format_change(change))?;
        }
        Ok(())
    }
}

/// The four dashboard headline numbers
#[derive(Debug, Clone, PartialEq)]
pub struct KpiCards {
    pub cards: [KpiCard; 4],
}

impl KpiCards {
    pub fn from_metrics(metrics: &DashboardMetrics) -> Self {
        let card = |title, value| KpiCard {
            title,
            value,
            change: None,
        };
        Self {
            cards: [
                card("Fotos Analisadas", metrics.total_photos_analyzed),
                card("Eventos Processados", metrics.total_events),
                card("Marcas Rastreadas", metrics.total_brands_tracked),
                card("Atletas Identificados", metrics.total_athletes_identified),
            ],
        }
    }

    /// Attach change percentages, in card order
    pub fn with_changes(mut self, changes: [Option<f64>; 4]) -> Self {
        for (card, change) in self.cards.iter_mut().zip(changes) {
            card.change = change;
        }
        self
    }
}

impl fmt::Display for KpiCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for card in &self.cards {
            writeln!(f, "{}", card)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> DashboardMetrics {
        DashboardMetrics {
            total_events: 12,
            total_photos_analyzed: 2_847_650,
            total_athletes_identified: 45_200,
            total_brands_tracked: 38,
        }
    }

    #[test]
    fn test_cards_order_and_values() {
        let kpis = KpiCards::from_metrics(&metrics());
        let titles: Vec<_> = kpis.cards.iter().map(|c| c.title).collect();
        assert_eq!(
            titles,
            ["Fotos Analisadas", "Eventos Processados", "Marcas Rastreadas", "Atletas Identificados"]
        );
        assert_eq!(kpis.cards[0].formatted_value(), "2.847.650");
        assert_eq!(kpis.cards[3].formatted_value(), "45.200");
    }

    #[test]
    fn test_changes_render_signed() {
        let kpis = KpiCards::from_metrics(&metrics()).with_changes([Some(14.2), None, Some(-5.3), None]);
        let text = kpis.to_string();
        assert!(text.contains("+14,2% vs. mês anterior"));
        assert!(text.contains("-5,3% vs. mês anterior"));
        assert_eq!(text.matches("vs. mês anterior").count(), 2);
    }

    #[test]
    fn test_zero_metrics() {
        let kpis = KpiCards::from_metrics(&DashboardMetrics::default());
        assert!(kpis.cards.iter().all(|c| c.formatted_value() == "0"));
    }
}
