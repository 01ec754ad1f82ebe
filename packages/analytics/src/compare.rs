//! Cross-region comparison and seasonal heatmap for a single year.

use std::collections::BTreeMap;

use dengue_ews_analytics_models::{HeatmapCell, RegionComparison};
use dengue_ews_region_models::Region;
use dengue_ews_surveillance_models::ObservationRecord;

use crate::mean;

const MONTHS: u32 = 12;

fn weekly_cases_by_region(records: &[ObservationRecord], year: i32) -> BTreeMap<Region, Vec<u32>> {
    let mut by_region: BTreeMap<Region, Vec<u32>> = BTreeMap::new();
    for record in records.iter().filter(|r| r.year() == year) {
        by_region
            .entry(record.region)
            .or_default()
            .push(record.case_count);
    }
    by_region
}

#[allow(clippy::cast_precision_loss)]
fn sample_std_dev(cases: &[u32], mean_cases: f64) -> Option<f64> {
    let n = cases.len();
    if n < 2 {
        return None;
    }
    let sum_sq: f64 = cases
        .iter()
        .map(|&c| (f64::from(c) - mean_cases).powi(2))
        .sum();
    Some((sum_sq / (n - 1) as f64).sqrt())
}

/// Per-region totals for `year`, largest total first.
///
/// Regions with no rows in `year` are omitted. Ties keep region order.
#[must_use]
pub fn compare_regions(records: &[ObservationRecord], year: i32) -> Vec<RegionComparison> {
    let mut comparison: Vec<RegionComparison> = weekly_cases_by_region(records, year)
        .into_iter()
        .filter_map(|(region, cases)| {
            let mean_cases = mean(cases.iter().map(|&c| f64::from(c)))?;
            Some(RegionComparison {
                region,
                year,
                weeks: cases.len(),
                total_cases: cases.iter().map(|&c| u64::from(c)).sum(),
                mean_cases,
                peak_cases: cases.iter().copied().max().unwrap_or(0),
                min_cases: cases.iter().copied().min().unwrap_or(0),
                std_dev: sample_std_dev(&cases, mean_cases),
            })
        })
        .collect();

    comparison.sort_by(|a, b| b.total_cases.cmp(&a.total_cases));
    comparison
}

/// Region × month case totals for `year`.
///
/// Every region with rows in `year` gets all twelve months, zero-filled,
/// ordered by region then month. Weeks are bucketed by the month of
/// `week_start`.
#[must_use]
pub fn seasonal_heatmap(records: &[ObservationRecord], year: i32) -> Vec<HeatmapCell> {
    let mut totals: BTreeMap<Region, [u64; MONTHS as usize]> = BTreeMap::new();

    for record in records.iter().filter(|r| r.year() == year) {
        let month = record.month() as usize - 1;
        totals.entry(record.region).or_default()[month] += u64::from(record.case_count);
    }

    totals
        .into_iter()
        .flat_map(|(region, months)| {
            (1..=MONTHS).zip(months).map(move |(month, total_cases)| HeatmapCell {
                region,
                year,
                month,
                total_cases,
            })
        })
        .collect()
}
