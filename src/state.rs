//! View state and the transitions that are allowed to change it.
//!
//! The [`Coordinator`] is I/O free. Each fetch is split into a `begin_*` call, which
//! hands out a ticket stamped with a generation number, and a `complete_*` call, which
//! applies the response only if its ticket is still the newest one. Whoever performs the
//! actual request (the [`Dashboard`](crate::dashboard::Dashboard) driver, a test, or the
//! blocking helpers below) can therefore let responses arrive in any order without the
//! view ever regressing to stale data.

use crate::api::StatsSource;
use crate::error::FetchError;
use crate::models::{AggregateStat, CountryOption, CountryStat, LatLng, Scope, StatKind};
use crate::transform::{to_option_list, to_sorted_list};
use log::{debug, info, warn};
use serde::Serialize;

/// Map centre before any country is picked (mid-Atlantic).
pub const DEFAULT_MAP_CENTER: LatLng = LatLng::new(34.80746, -40.4796);
pub const DEFAULT_MAP_ZOOM: u8 = 2;
/// Zoom applied when a single country is selected.
pub const COUNTRY_MAP_ZOOM: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPhase {
    #[default]
    Unloaded,
    Loading,
    Loaded,
}

/// Which transition a failure belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "scope", rename_all = "snake_case")]
pub enum FailedEvent {
    Initialize,
    SelectCountry(Scope),
}

/// Observable "load failed" flag for the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    pub event: FailedEvent,
    pub endpoint: Option<String>,
    pub message: String,
}

impl LoadFailure {
    fn from_fetch(event: FailedEvent, err: &FetchError) -> Self {
        Self {
            event,
            endpoint: Some(err.endpoint.clone()),
            message: err.cause.to_string(),
        }
    }
}

/// Everything the dashboard renders from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub phase: LoadPhase,
    pub selected_country: Scope,
    pub current_stat: Option<AggregateStat>,
    /// Countries in fetch order (map circles).
    pub countries: Vec<CountryStat>,
    /// Countries by `cases`, descending (table).
    pub sorted_countries: Vec<CountryStat>,
    pub country_options: Vec<CountryOption>,
    pub map_center: LatLng,
    pub map_zoom: u8,
    pub selected_stat_kind: StatKind,
    /// Selection whose response has not arrived yet.
    pub pending_selection: Option<Scope>,
    pub load_error: Option<LoadFailure>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            phase: LoadPhase::Unloaded,
            selected_country: Scope::Worldwide,
            current_stat: None,
            countries: Vec::new(),
            sorted_countries: Vec::new(),
            country_options: Vec::new(),
            map_center: DEFAULT_MAP_CENTER,
            map_zoom: DEFAULT_MAP_ZOOM,
            selected_stat_kind: StatKind::Cases,
            pending_selection: None,
            load_error: None,
        }
    }
}

impl ViewState {
    pub fn is_loaded(&self) -> bool {
        self.phase == LoadPhase::Loaded
    }

    /// Canonical form of `code` in the loaded country list, if present.
    pub fn resolve_code(&self, code: &str) -> Option<&str> {
        let code = code.trim();
        self.country_options
            .iter()
            .find(|o| o.value.eq_ignore_ascii_case(code))
            .map(|o| o.value.as_str())
    }
}

/// Proof that an Initialize was issued; pass it back to [`Coordinator::complete_initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitTicket {
    generation: u64,
    select_generation: u64,
}

/// Proof that a SelectCountry was issued; pass it back to [`Coordinator::complete_select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectTicket {
    generation: u64,
    scope: Scope,
}

impl SelectTicket {
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State was updated from the response.
    Applied,
    /// The request failed; state is unchanged apart from the failure flag.
    Failed,
    /// A newer request superseded this one; the response was discarded.
    Stale,
}

/// Sole owner and mutator of [`ViewState`].
#[derive(Debug, Default)]
pub struct Coordinator {
    state: ViewState,
    init_generation: u64,
    select_generation: u64,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn into_state(self) -> ViewState {
        self.state
    }

    pub fn begin_initialize(&mut self) -> InitTicket {
        self.init_generation += 1;
        if !self.state.is_loaded() {
            self.state.phase = LoadPhase::Loading;
        }
        InitTicket {
            generation: self.init_generation,
            select_generation: self.select_generation,
        }
    }

    /// Apply both startup fetches. Either both succeed and are installed together, or
    /// nothing but the failure flag changes.
    pub fn complete_initialize(
        &mut self,
        ticket: InitTicket,
        countries: Result<Vec<CountryStat>, FetchError>,
        worldwide: Result<AggregateStat, FetchError>,
    ) -> Outcome {
        if ticket.generation != self.init_generation {
            debug!("discarding stale initialize #{}", ticket.generation);
            return Outcome::Stale;
        }
        let (countries, worldwide) = match (countries, worldwide) {
            (Ok(c), Ok(w)) => (c, w),
            (Err(e), _) | (_, Err(e)) => {
                warn!("initialize failed: {e}");
                self.state.load_error = Some(LoadFailure::from_fetch(FailedEvent::Initialize, &e));
                if !self.state.is_loaded() {
                    self.state.phase = LoadPhase::Unloaded;
                }
                return Outcome::Failed;
            }
        };

        self.state.sorted_countries = to_sorted_list(&countries);
        self.state.country_options = to_option_list(&countries);
        self.state.countries = countries;

        // A selection issued while we were loading owns the stat and viewport,
        // as long as it produced one and the new list still knows its code.
        let keep_selection = ticket.select_generation != self.select_generation
            && self.state.current_stat.is_some()
            && self.selection_still_listed();
        if keep_selection {
            debug!("initialize keeps selection {}", self.state.selected_country);
        } else {
            self.state.selected_country = Scope::Worldwide;
            self.state.current_stat = Some(worldwide);
            self.state.map_center = DEFAULT_MAP_CENTER;
            self.state.map_zoom = DEFAULT_MAP_ZOOM;
        }

        self.state.phase = LoadPhase::Loaded;
        self.state.load_error = None;
        info!("loaded {} countries", self.state.countries.len());
        Outcome::Applied
    }

    fn selection_still_listed(&self) -> bool {
        match &self.state.selected_country {
            Scope::Worldwide => true,
            Scope::Country(code) => self.state.resolve_code(code).is_some(),
        }
    }

    /// Register a selection request. Any earlier selection still in flight becomes stale.
    pub fn begin_select(&mut self, scope: Scope) -> SelectTicket {
        self.select_generation += 1;
        self.state.pending_selection = Some(scope.clone());
        SelectTicket {
            generation: self.select_generation,
            scope,
        }
    }

    /// Apply a selection response. Selection, stat and viewport change together or not at all.
    pub fn complete_select(
        &mut self,
        ticket: SelectTicket,
        result: Result<AggregateStat, FetchError>,
    ) -> Outcome {
        if ticket.generation != self.select_generation {
            debug!(
                "discarding stale response for {} (#{} < #{})",
                ticket.scope, ticket.generation, self.select_generation
            );
            return Outcome::Stale;
        }
        self.state.pending_selection = None;
        let event = FailedEvent::SelectCountry(ticket.scope.clone());

        let stat = match result {
            Ok(stat) => stat,
            Err(e) => {
                warn!("selecting {} failed: {e}", ticket.scope);
                self.state.load_error = Some(LoadFailure::from_fetch(event, &e));
                return Outcome::Failed;
            }
        };

        let selected = match &ticket.scope {
            Scope::Worldwide => Scope::Worldwide,
            Scope::Country(code) => {
                let listed = self
                    .state
                    .resolve_code(code)
                    .or_else(|| stat.iso_code.as_deref().and_then(|iso| self.state.resolve_code(iso)));
                match listed {
                    Some(canonical) => Scope::Country(canonical.to_string()),
                    None => {
                        warn!("selecting {code} failed: not in the loaded country list");
                        self.state.load_error = Some(LoadFailure {
                            event,
                            endpoint: None,
                            message: format!("unknown country code `{code}`"),
                        });
                        return Outcome::Failed;
                    }
                }
            }
        };

        if let (false, Some(center)) = (selected.is_worldwide(), stat.center) {
            self.state.map_center = center;
            self.state.map_zoom = COUNTRY_MAP_ZOOM;
        }
        self.state.selected_country = selected;
        self.state.current_stat = Some(stat);
        self.state.load_error = None;
        Outcome::Applied
    }

    /// Local UI state only; no fetch involved.
    pub fn set_stat_kind(&mut self, kind: StatKind) {
        self.state.selected_stat_kind = kind;
    }

    /// Run Initialize to completion on the calling thread.
    pub fn initialize<S: StatsSource + ?Sized>(&mut self, source: &S) -> Outcome {
        let ticket = self.begin_initialize();
        let countries = source.fetch_country_list();
        let worldwide = source.fetch_aggregate(&Scope::Worldwide);
        self.complete_initialize(ticket, countries, worldwide)
    }

    /// Run SelectCountry to completion on the calling thread.
    pub fn select_country<S: StatsSource + ?Sized>(&mut self, source: &S, scope: Scope) -> Outcome {
        let ticket = self.begin_select(scope);
        let result = source.fetch_aggregate(ticket.scope());
        self.complete_select(ticket, result)
    }
}
