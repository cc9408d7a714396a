//! Brand presence over time

use super::format::{format_decimal, format_month};
use crate::api::types::BrandTimeSeriesEntry;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct BrandSeries {
    pub brand: String,
    /// One point per label; `None` is a gap
    pub points: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrandChart {
    /// X axis labels, `MM/YYYY`
    pub labels: Vec<String>,
    pub series: Vec<BrandSeries>,
    /// Lines are drawn across gaps
    pub connect_nulls: bool,
}

impl BrandChart {
    /// One series per brand, brands in order of first appearance.
    /// `None` when the time series is empty.
    pub fn from_entries(entries: &[BrandTimeSeriesEntry]) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }

        let mut brands: Vec<&str> = Vec::new();
        for entry in entries {
            for brand in entry.brands.keys() {
                if !brands.contains(&brand.as_str()) {
                    brands.push(brand);
                }
            }
        }

        let labels = entries
            .iter()
            .map(|e| format_month(e.year, e.month))
            .collect();
        let series = brands
            .into_iter()
            .map(|brand| BrandSeries {
                brand: brand.to_string(),
                points: entries.iter().map(|e| e.count(brand)).collect(),
            })
            .collect();

        Some(Self {
            labels,
            series,
            connect_nulls: true,
        })
    }

    pub fn series(&self, brand: &str) -> Option<&BrandSeries> {
        self.series.iter().find(|s| s.brand == brand)
    }

    /// Largest value across all series
    pub fn max_value(&self) -> Option<f64> {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().flatten().copied())
            .reduce(f64::max)
    }
}

impl fmt::Display for BrandChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Presença de Marca ao Longo do Tempo")?;
        write!(f, "  {:<8}", "")?;
        for series in &self.series {
            write!(f, " {:>10}", series.brand)?;
        }
        writeln!(f)?;

        for (i, label) in self.labels.iter().enumerate() {
            write!(f, "  {:<8}", label)?;
            for series in &self.series {
                let cell = series.points[i]
                    .map(|v| format_decimal(v, 0))
                    .unwrap_or_else(|| "-".to_string());
                write!(f, " {:>10}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
