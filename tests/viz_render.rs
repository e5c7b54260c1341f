use chrono::NaiveDate;
use covid_tracker::StatKind;
use covid_tracker::models::ChartPoint;
use covid_tracker::viz;
use tempfile::tempdir;

fn points(values: &[i64]) -> Vec<ChartPoint> {
    let start = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| ChartPoint {
            date: start + chrono::Days::new(i as u64),
            value,
        })
        .collect()
}

#[test]
fn renders_svg_in_stat_color() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("cases.svg");
    viz::plot_series(&points(&[10, 30, -5, 80, 60]), StatKind::Cases, &out, 640, 320).unwrap();

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.to_uppercase().contains("#CC1034"));
}

#[test]
fn renders_png() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("deaths.png");
    viz::plot_series(&points(&[1, 2, 3]), StatKind::Deaths, &out, 320, 200).unwrap();
    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn single_flat_point_still_renders() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("flat.svg");
    viz::plot_series(&points(&[0]), StatKind::Recovered, &out, 200, 100).unwrap();
    assert!(out.exists());
}

#[test]
fn empty_series_is_an_error() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("empty.svg");
    assert!(viz::plot_series(&[], StatKind::Cases, &out, 200, 100).is_err());
}
