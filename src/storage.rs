use crate::models::CountryStat;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn sanitize_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{s}"),
        _ => s.to_string(),
    }
}

/// Save the country table as CSV with header.
pub fn save_csv<P: AsRef<Path>>(rows: &[CountryStat], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize((
        "country",
        "iso2",
        "cases",
        "today_cases",
        "deaths",
        "today_deaths",
        "recovered",
        "today_recovered",
        "lat",
        "long",
    ))?;
    for r in rows {
        wtr.serialize((
            sanitize_cell(&r.name),
            r.iso_code.as_deref().map(sanitize_cell),
            r.cases,
            r.today_cases,
            r.deaths,
            r.today_deaths,
            r.recovered,
            r.today_recovered,
            r.lat,
            r.long,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the country table as a pretty JSON array.
pub fn save_json<P: AsRef<Path>>(rows: &[CountryStat], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
