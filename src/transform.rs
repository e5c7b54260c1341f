//! Reshape fetched records into what the table, selector, map and chart consume.
//! All functions are pure; inputs are never mutated.

use crate::models::{ChartPoint, CountryOption, CountryStat, LatLng, StatKind, Timeline};
use serde::Serialize;
use std::collections::HashSet;

/// Countries ordered by `cases`, highest first. Equal counts keep their input order.
pub fn to_sorted_list(stats: &[CountryStat]) -> Vec<CountryStat> {
    let mut sorted = stats.to_vec();
    // `sort_by` is stable, so ties keep fetch order.
    sorted.sort_by(|a, b| b.cases.cmp(&a.cases));
    sorted
}

/// Selector options in input order, one per ISO code. Records without a code are
/// skipped; when two records share a code the first one wins.
pub fn to_option_list(stats: &[CountryStat]) -> Vec<CountryOption> {
    let mut seen = HashSet::new();
    stats
        .iter()
        .filter_map(|s| {
            let code = s.iso_code.as_deref().map(str::trim).filter(|c| !c.is_empty())?;
            if !seen.insert(code) {
                return None;
            }
            Some(CountryOption {
                name: s.name.clone(),
                value: code.to_string(),
            })
        })
        .collect()
}

/// A proportional circle drawn on the map for one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapCircle {
    pub name: String,
    pub iso_code: Option<String>,
    pub center: LatLng,
    /// Radius in metres.
    pub radius: f64,
    pub color: &'static str,
    pub cases: u64,
    pub recovered: u64,
    pub deaths: u64,
}

/// One circle per country, sized by `sqrt(value) * multiplier` for the chosen statistic.
pub fn map_circles(countries: &[CountryStat], kind: StatKind) -> Vec<MapCircle> {
    countries
        .iter()
        .map(|c| MapCircle {
            name: c.name.clone(),
            iso_code: c.iso_code.clone(),
            center: c.center(),
            radius: (c.value(kind) as f64).sqrt() * kind.radius_multiplier(),
            color: kind.color_hex(),
            cases: c.cases,
            recovered: c.recovered,
            deaths: c.deaths,
        })
        .collect()
}

/// Day-over-day change of a cumulative series. The first day has no predecessor
/// and yields no point; downward corrections come out negative.
pub fn chart_series(timeline: &Timeline, kind: StatKind) -> Vec<ChartPoint> {
    let series = timeline.series(kind);
    let mut out = Vec::with_capacity(series.len().saturating_sub(1));
    let mut last: Option<u64> = None;
    for (&date, &value) in series {
        if let Some(prev) = last {
            out.push(ChartPoint {
                date,
                value: delta(prev, value),
            });
        }
        last = Some(value);
    }
    out
}

/// `value - prev` as a signed count, saturating at the `i64` bounds.
fn delta(prev: u64, value: u64) -> i64 {
    if value >= prev {
        i64::try_from(value - prev).unwrap_or(i64::MAX)
    } else {
        i64::try_from(prev - value).map_or(i64::MIN, |d| -d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(name: &str, iso: Option<&str>, cases: u64) -> CountryStat {
        CountryStat {
            name: name.into(),
            iso_code: iso.map(Into::into),
            cases,
            today_cases: 0,
            deaths: cases / 100,
            today_deaths: 0,
            recovered: cases / 2,
            today_recovered: 0,
            lat: 10.0,
            long: 20.0,
        }
    }

    #[test]
    fn sorted_list_leaves_input_untouched() {
        let input = vec![stat("A", Some("AA"), 1), stat("B", Some("BB"), 3)];
        let before = input.clone();
        let sorted = to_sorted_list(&input);
        assert_eq!(input, before);
        assert_eq!(sorted[0].name, "B");
    }

    #[test]
    fn circle_radius_scales_with_sqrt() {
        let circles = map_circles(&[stat("A", Some("AA"), 10_000)], StatKind::Cases);
        assert_eq!(circles.len(), 1);
        assert!((circles[0].radius - 100.0 * 800.0).abs() < 1e-9);
        assert_eq!(circles[0].color, "#CC1034");
        assert_eq!(circles[0].center, LatLng::new(10.0, 20.0));
    }

    #[test]
    fn deltas_saturate_instead_of_wrapping() {
        assert_eq!(delta(100, 130), 30);
        assert_eq!(delta(130, 125), -5);
        assert_eq!(delta(0, u64::MAX), i64::MAX);
        assert_eq!(delta(u64::MAX, 0), i64::MIN);
        assert_eq!(delta(1 << 63, 0), i64::MIN);
    }
}
