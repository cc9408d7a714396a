//! Brand ranking by detected items

use super::format::{format_number, format_percent};
use crate::api::types::BrandSummary;
use std::fmt;

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct RankedBrand {
    pub rank: usize,
    pub brand: String,
    pub total_items: u64,
    pub persons: u64,
    /// Share of all items in the ranking, in percent
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrandRanking {
    pub brands: Vec<RankedBrand>,
    pub total_items: u64,
}

impl BrandRanking {
    /// Aggregate summaries by brand and keep the `top_n` largest.
    /// Ties keep first-appearance order. `None` when there is nothing to rank.
    pub fn from_summaries(summaries: &[BrandSummary], top_n: usize) -> Option<Self> {
        let mut totals: Vec<(String, u64, u64)> = Vec::new();
        for summary in summaries {
            match totals.iter_mut().find(|(brand, _, _)| *brand == summary.brand) {
                Some((_, items, persons)) => {
                    *items += summary.total_items;
                    *persons += summary.persons_with_brand;
                }
                None => totals.push((
                    summary.brand.clone(),
                    summary.total_items,
                    summary.persons_with_brand,
                )),
            }
        }
        if totals.is_empty() {
            return None;
        }

        totals.sort_by(|a, b| b.1.cmp(&a.1));
        let total_items: u64 = totals.iter().map(|(_, items, _)| items).sum();

        let brands = totals
            .into_iter()
            .take(top_n)
            .enumerate()
            .map(|(i, (brand, items, persons))| RankedBrand {
                rank: i + 1,
                brand,
                total_items: items,
                persons,
                share: if total_items == 0 {
                    0.0
                } else {
                    items as f64 * 100.0 / total_items as f64
                },
            })
            .collect();

        Some(Self {
            brands,
            total_items,
        })
    }
}

impl fmt::Display for BrandRanking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Top Marcas Detectadas")?;
        for brand in &self.brands {
            writeln!(
                f,
                "  {:>2}. {:<16} {:>10} itens  {:>7}",
                brand.rank,
                brand.brand,
                format_number(brand.total_items),
                format_percent(brand.share)
            )?;
        }
        Ok(())
    }
}
