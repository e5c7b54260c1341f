use chrono::NaiveDate;
use covid_tracker::models::{ChartPoint, Timeline};
use covid_tracker::transform::{chart_series, map_circles, to_option_list, to_sorted_list};
use covid_tracker::{CountryStat, StatKind};

fn stat(name: &str, iso: Option<&str>, cases: u64) -> CountryStat {
    CountryStat {
        name: name.into(),
        iso_code: iso.map(Into::into),
        cases,
        today_cases: 0,
        deaths: 0,
        today_deaths: 0,
        recovered: 0,
        today_recovered: 0,
        lat: 0.0,
        long: 0.0,
    }
}

/// Small deterministic generator so the property checks run over many shapes.
fn pseudo_random_list(seed: u64, len: usize) -> Vec<CountryStat> {
    let mut x = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (0..len)
        .map(|i| {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            // Small range so ties are frequent.
            let cases = (x >> 33) % 7;
            let iso = if (x >> 20) % 5 == 0 { None } else { Some(format!("C{i}")) };
            stat(&format!("country-{i}"), iso.as_deref(), cases)
        })
        .collect()
}

#[test]
fn sorted_list_is_a_non_increasing_permutation() {
    for seed in 0..50 {
        for len in [0usize, 1, 2, 5, 17, 64] {
            let input = pseudo_random_list(seed, len);
            let sorted = to_sorted_list(&input);

            assert_eq!(sorted.len(), input.len());
            assert!(sorted.windows(2).all(|w| w[0].cases >= w[1].cases));

            let mut a: Vec<&str> = input.iter().map(|c| c.name.as_str()).collect();
            let mut b: Vec<&str> = sorted.iter().map(|c| c.name.as_str()).collect();
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b);
        }
    }
}

#[test]
fn sorted_list_is_stable_for_ties() {
    let input = vec![
        stat("first", Some("AA"), 5),
        stat("big", Some("BB"), 9),
        stat("second", Some("CC"), 5),
        stat("third", Some("DD"), 5),
    ];
    let names: Vec<String> = to_sorted_list(&input).into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["big", "first", "second", "third"]);

    for seed in 0..20 {
        let input = pseudo_random_list(seed, 40);
        let sorted = to_sorted_list(&input);
        let pos = |name: &str| input.iter().position(|c| c.name == name).unwrap();
        for w in sorted.windows(2) {
            if w[0].cases == w[1].cases {
                assert!(pos(&w[0].name) < pos(&w[1].name));
            }
        }
    }
}

#[test]
fn option_list_skips_missing_codes_and_keeps_order() {
    let input = vec![
        stat("Afghanistan", Some("AF"), 1),
        stat("Diamond Princess", None, 2),
        stat("Blank", Some("  "), 3),
        stat("Albania", Some("AL"), 4),
    ];
    let options = to_option_list(&input);
    let pairs: Vec<(&str, &str)> = options
        .iter()
        .map(|o| (o.name.as_str(), o.value.as_str()))
        .collect();
    assert_eq!(pairs, vec![("Afghanistan", "AF"), ("Albania", "AL")]);

    for seed in 0..50 {
        let input = pseudo_random_list(seed, 30);
        let options = to_option_list(&input);
        assert!(options.len() <= input.len());
        assert!(options.iter().all(|o| !o.value.is_empty()));
    }
}

#[test]
fn option_list_has_one_entry_per_code() {
    let input = vec![
        stat("Congo", Some("CG"), 10),
        stat("Congo (Brazzaville)", Some("CG"), 20),
        stat("France", Some("FR"), 30),
        stat("France (dup)", Some(" FR "), 40),
    ];
    let options = to_option_list(&input);
    let pairs: Vec<(&str, &str)> = options
        .iter()
        .map(|o| (o.name.as_str(), o.value.as_str()))
        .collect();
    assert_eq!(pairs, vec![("Congo", "CG"), ("France", "FR")]);

    for seed in 0..50 {
        // Collapse codes onto a few values so repeats are common.
        let input: Vec<CountryStat> = pseudo_random_list(seed, 40)
            .into_iter()
            .enumerate()
            .map(|(i, mut c)| {
                if c.iso_code.is_some() {
                    c.iso_code = Some(format!("K{}", i % 6));
                }
                c
            })
            .collect();
        let options = to_option_list(&input);
        let mut values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        let listed = values.len();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), listed, "seed {seed}");
    }
}

#[test]
fn map_circles_follow_stat_kind() {
    let mut c = stat("Testland", Some("TL"), 400);
    c.deaths = 4;
    c.recovered = 100;
    let deaths = map_circles(&[c.clone()], StatKind::Deaths);
    assert!((deaths[0].radius - 2.0 * 2000.0).abs() < 1e-9);
    assert_eq!(deaths[0].color, "#fb4443");

    let recovered = map_circles(&[c], StatKind::Recovered);
    assert!((recovered[0].radius - 10.0 * 1200.0).abs() < 1e-9);
}

#[test]
fn chart_series_yields_daily_deltas() {
    let d = |m, day| NaiveDate::from_ymd_opt(2021, m, day).unwrap();
    let mut tl = Timeline::default();
    tl.cases.insert(d(1, 1), 100);
    tl.cases.insert(d(1, 2), 130);
    tl.cases.insert(d(1, 3), 125); // correction
    tl.cases.insert(d(1, 4), 200);

    let series = chart_series(&tl, StatKind::Cases);
    assert_eq!(
        series,
        vec![
            ChartPoint { date: d(1, 2), value: 30 },
            ChartPoint { date: d(1, 3), value: -5 },
            ChartPoint { date: d(1, 4), value: 75 },
        ]
    );
    assert!(chart_series(&tl, StatKind::Deaths).is_empty());
}
