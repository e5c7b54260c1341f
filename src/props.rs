//! Render contracts handed to the presentational collaborators.
//!
//! Callbacks of the original widgets map onto coordinator methods: the selector's
//! `onChange` is [`Coordinator::begin_select`](crate::state::Coordinator::begin_select)
//! and an info box's `onActivate` is
//! [`Coordinator::set_stat_kind`](crate::state::Coordinator::set_stat_kind) with the
//! box's `kind`.

use crate::format::{format_count, pretty_print_stat};
use crate::models::{CountryOption, LatLng, StatKind, WORLDWIDE};
use crate::state::{LoadFailure, LoadPhase, ViewState};
use crate::transform::{MapCircle, map_circles};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectorProps {
    /// "Worldwide" first, then one entry per country.
    pub options: Vec<CountryOption>,
    pub selected: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoBoxProps {
    pub kind: StatKind,
    pub title: &'static str,
    pub today_value: String,
    pub total_value: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapProps {
    pub center: LatLng,
    pub zoom: u8,
    pub stat_kind: StatKind,
    pub circles: Vec<MapCircle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub name: String,
    pub iso_code: Option<String>,
    pub cases: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableProps {
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartProps {
    pub stat_kind: StatKind,
    pub title: String,
}

/// Everything one frame of the dashboard needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardProps {
    pub loading: bool,
    pub error: Option<LoadFailure>,
    pub selector: SelectorProps,
    pub info_boxes: Vec<InfoBoxProps>,
    pub map: MapProps,
    pub table: TableProps,
    pub chart: ChartProps,
}

impl SelectorProps {
    pub fn from_state(state: &ViewState) -> Self {
        let mut options = Vec::with_capacity(state.country_options.len() + 1);
        options.push(CountryOption {
            name: "Worldwide".into(),
            value: WORLDWIDE.into(),
        });
        options.extend(state.country_options.iter().cloned());
        Self {
            options,
            selected: state.selected_country.code().to_string(),
        }
    }
}

/// The three counters (cases, recovered, deaths). Values are blank until a stat is loaded.
pub fn info_boxes(state: &ViewState) -> Vec<InfoBoxProps> {
    StatKind::ALL
        .iter()
        .map(|&kind| {
            let (today_value, total_value) = match &state.current_stat {
                Some(stat) => (
                    pretty_print_stat(stat.today(kind)),
                    pretty_print_stat(stat.total(kind)),
                ),
                None => (String::new(), String::new()),
            };
            InfoBoxProps {
                kind,
                title: kind.title(),
                today_value,
                total_value,
                is_active: state.selected_stat_kind == kind,
            }
        })
        .collect()
}

impl MapProps {
    pub fn from_state(state: &ViewState) -> Self {
        Self {
            center: state.map_center,
            zoom: state.map_zoom,
            stat_kind: state.selected_stat_kind,
            circles: map_circles(&state.countries, state.selected_stat_kind),
        }
    }
}

impl TableProps {
    pub fn from_state(state: &ViewState, locale: &str) -> Self {
        let rows = state
            .sorted_countries
            .iter()
            .map(|c| TableRow {
                name: c.name.clone(),
                iso_code: c.iso_code.clone(),
                cases: format_count(c.cases, locale),
            })
            .collect();
        Self { rows }
    }
}

impl ChartProps {
    pub fn new(stat_kind: StatKind) -> Self {
        Self {
            stat_kind,
            title: format!("Worldwide new {stat_kind}"),
        }
    }
}

impl DashboardProps {
    pub fn from_state(state: &ViewState, locale: &str) -> Self {
        Self {
            loading: state.pending_selection.is_some() || state.phase == LoadPhase::Loading,
            error: state.load_error.clone(),
            selector: SelectorProps::from_state(state),
            info_boxes: info_boxes(state),
            map: MapProps::from_state(state),
            table: TableProps::from_state(state, locale),
            chart: ChartProps::new(state.selected_stat_kind),
        }
    }
}
