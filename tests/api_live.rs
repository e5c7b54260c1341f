// Live API tests (opt-in): cargo test --features online
#![cfg(feature = "online")]

use covid_tracker::{Client, Coordinator, Outcome, Scope, StatsSource};

#[test]
fn live_country_list_and_worldwide() {
    let client = Client::default();
    let countries = client.fetch_country_list().expect("country list");
    assert!(countries.len() > 100);
    let all = client.fetch_aggregate(&Scope::Worldwide).expect("worldwide");
    assert!(all.cases > 0);
}

#[test]
fn live_unknown_country_is_a_404() {
    let client = Client::default();
    let err = client
        .fetch_aggregate(&Scope::Country("XX".into()))
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.endpoint, "/countries/XX");
}

#[test]
fn live_dashboard_selects_a_country() {
    let client = Client::default();
    let mut view = Coordinator::new();
    assert_eq!(view.initialize(&client), Outcome::Applied);
    assert_eq!(
        view.select_country(&client, Scope::parse("de").unwrap()),
        Outcome::Applied
    );
    assert_eq!(view.state().selected_country, Scope::Country("DE".into()));
    assert_eq!(view.state().map_zoom, 4);
}

#[test]
fn live_history_has_daily_points() {
    let client = Client::default();
    let tl = client.fetch_historical(30).expect("timeline");
    assert!(tl.cases.len() >= 29);
}
