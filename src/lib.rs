//! covid_tracker
//!
//! Fetch COVID-19 statistics from the disease.sh API and keep a dashboard's view
//! state consistent while the user clicks around. Pairs with the `covid` CLI.
//!
//! ### Features
//! - Worldwide and per-country totals, plus the full country list
//! - Table data sorted by cases, selector options, map circles, "new per day" series
//! - A view-state coordinator where the most recent selection always wins, no matter
//!   in which order responses arrive
//! - Export of the country table as CSV or JSON, chart rendering to SVG/PNG
//!
//! ### Example
//! ```no_run
//! use covid_tracker::{Client, Coordinator, Scope};
//!
//! let client = Client::default();
//! let mut view = Coordinator::new();
//! view.initialize(&client);
//! view.select_country(&client, Scope::parse("DE")?);
//! let state = view.state();
//! println!("{} -> {:?}", state.selected_country, state.current_stat);
//! covid_tracker::storage::save_csv(&state.sorted_countries, "countries.csv")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod models;
pub mod props;
pub mod state;
pub mod storage;
pub mod transform;
pub mod viz;

pub use api::{Client, ClientConfig, StatsSource};
pub use dashboard::Dashboard;
pub use error::{FetchCause, FetchError};
pub use models::{AggregateStat, CountryOption, CountryStat, LatLng, Scope, StatKind};
pub use state::{Coordinator, Outcome, ViewState};
