//! Sport distribution over the currently loaded event page

use super::format::format_percent;
use crate::api::types::{Event, Sport};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct SportShare {
    pub sport: Sport,
    pub count: usize,
    /// Rounded to one decimal place
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SportDistribution {
    pub shares: Vec<SportShare>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl SportDistribution {
    /// Counts only the events passed in, not the whole dataset.
    /// `None` when there are no events.
    pub fn from_events(events: &[Event]) -> Option<Self> {
        if events.is_empty() {
            return None;
        }

        // First-appearance order, kept as the tie-break by the stable sort
        let mut counts: Vec<(Sport, usize)> = Vec::new();
        for event in events {
            match counts.iter_mut().find(|(sport, _)| *sport == event.sport) {
                Some((_, count)) => *count += 1,
                None => counts.push((event.sport, 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        let total = events.len() as f64;
        let shares = counts
            .into_iter()
            .map(|(sport, count)| SportShare {
                sport,
                count,
                percentage: round1(count as f64 * 100.0 / total),
            })
            .collect();
        Some(Self { shares })
    }
}

impl fmt::Display for SportDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Distribuição por Esporte")?;
        for share in &self.shares {
            writeln!(
                f,
                "  {:<12} {:>4}  {:>7}",
                share.sport.label(),
                share.count,
                format_percent(share.percentage)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::sample_event;

    #[test]
    fn test_counts_and_percentages() {
        let events = vec![
            sample_event("1", "ciclismo"),
            sample_event("2", "corrida"),
            sample_event("3", "corrida"),
        ];
        let dist = SportDistribution::from_events(&events).unwrap();

        assert_eq!(dist.shares.len(), 2);
        assert_eq!(dist.shares[0].sport, Sport::Corrida);
        assert_eq!(dist.shares[0].count, 2);
        assert_eq!(dist.shares[0].percentage, 66.7);
        assert_eq!(dist.shares[1].percentage, 33.3);
    }

    #[test]
    fn test_ties_keep_first_appearance() {
        let events = vec![
            sample_event("1", "triathlon"),
            sample_event("2", "futebol"),
            sample_event("3", "futebol"),
            sample_event("4", "triathlon"),
            sample_event("5", "vôlei"),
        ];
        let dist = SportDistribution::from_events(&events).unwrap();
        let order: Vec<_> = dist.shares.iter().map(|s| s.sport).collect();
        assert_eq!(order, vec![Sport::Triathlon, Sport::Futebol, Sport::Volei]);
    }

    #[test]
    fn test_unknown_sport_and_empty_page() {
        let dist = SportDistribution::from_events(&[sample_event("1", "natação")]).unwrap();
        assert_eq!(dist.shares[0].sport, Sport::Other);
        assert_eq!(dist.shares[0].percentage, 100.0);
        assert!(dist.to_string().contains("Outros"));

        assert!(SportDistribution::from_events(&[]).is_none());
    }
}
