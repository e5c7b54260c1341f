//! Event-loop driver for the coordinator.
//!
//! Fetches run on short-lived worker threads and report back over a channel; the
//! owning thread applies completions in [`Dashboard::poll`] (or blocks for them in
//! [`Dashboard::wait_idle`]). View state is therefore only ever touched by one thread,
//! and responses may complete in any order.

use crate::api::{StatsSource, aggregate_endpoint};
use crate::error::{FetchCause, FetchError};
use crate::models::{AggregateStat, CountryStat, Scope, StatKind};
use crate::props::DashboardProps;
use crate::state::{Coordinator, InitTicket, Outcome, SelectTicket, ViewState};
use log::debug;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

enum Completion {
    Initialize {
        ticket: InitTicket,
        countries: Result<Vec<CountryStat>, FetchError>,
        worldwide: Result<AggregateStat, FetchError>,
    },
    Select {
        ticket: SelectTicket,
        result: Result<AggregateStat, FetchError>,
    },
}

impl Completion {
    /// What to report when the worker unwinds before it has an answer.
    fn abandoned_init(ticket: InitTicket) -> Self {
        Completion::Initialize {
            ticket,
            countries: Err(FetchError::new("/countries", FetchCause::WorkerPanicked)),
            worldwide: Err(FetchError::new(
                aggregate_endpoint(&Scope::Worldwide),
                FetchCause::WorkerPanicked,
            )),
        }
    }

    fn abandoned_select(ticket: SelectTicket) -> Self {
        let endpoint = aggregate_endpoint(ticket.scope());
        Completion::Select {
            ticket,
            result: Err(FetchError::new(endpoint, FetchCause::WorkerPanicked)),
        }
    }
}

/// Owned by a worker thread. Every request reports exactly once: the real completion
/// through [`Reply::deliver`], or the fallback from `Drop` if the source panics.
struct Reply {
    sender: Sender<Completion>,
    fallback: Option<Completion>,
}

impl Reply {
    fn deliver(mut self, completion: Completion) {
        self.fallback = None;
        // Receiver gone means the dashboard was dropped; nothing to report to.
        let _ = self.sender.send(completion);
    }
}

impl Drop for Reply {
    fn drop(&mut self) {
        if let Some(fallback) = self.fallback.take() {
            let _ = self.sender.send(fallback);
        }
    }
}

pub struct Dashboard<S> {
    source: Arc<S>,
    coordinator: Coordinator,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    in_flight: usize,
}

impl<S> Dashboard<S>
where
    S: StatsSource + Send + Sync + 'static,
{
    pub fn new(source: S) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            source: Arc::new(source),
            coordinator: Coordinator::new(),
            sender,
            receiver,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        self.coordinator.state()
    }

    /// Render contracts for the current state.
    pub fn props(&self, locale: &str) -> DashboardProps {
        DashboardProps::from_state(self.state(), locale)
    }

    /// Number of requests whose responses have not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Fetch the country list and worldwide totals in the background.
    pub fn initialize(&mut self) {
        let ticket = self.coordinator.begin_initialize();
        let source = Arc::clone(&self.source);
        let reply = Reply {
            sender: self.sender.clone(),
            fallback: Some(Completion::abandoned_init(ticket)),
        };
        self.in_flight += 1;
        thread::spawn(move || {
            let countries = source.fetch_country_list();
            let worldwide = source.fetch_aggregate(&Scope::Worldwide);
            reply.deliver(Completion::Initialize {
                ticket,
                countries,
                worldwide,
            });
        });
    }

    /// Fetch totals for `scope` in the background. Supersedes any selection still in flight.
    pub fn select_country(&mut self, scope: Scope) {
        let ticket = self.coordinator.begin_select(scope);
        let source = Arc::clone(&self.source);
        let reply = Reply {
            sender: self.sender.clone(),
            fallback: Some(Completion::abandoned_select(ticket.clone())),
        };
        self.in_flight += 1;
        thread::spawn(move || {
            let result = source.fetch_aggregate(ticket.scope());
            reply.deliver(Completion::Select { ticket, result });
        });
    }

    pub fn set_stat_kind(&mut self, kind: StatKind) {
        self.coordinator.set_stat_kind(kind);
    }

    fn apply(&mut self, completion: Completion) -> Outcome {
        self.in_flight = self.in_flight.saturating_sub(1);
        let outcome = match completion {
            Completion::Initialize {
                ticket,
                countries,
                worldwide,
            } => self
                .coordinator
                .complete_initialize(ticket, countries, worldwide),
            Completion::Select { ticket, result } => {
                self.coordinator.complete_select(ticket, result)
            }
        };
        debug!("completion applied: {outcome:?}");
        outcome
    }

    /// Apply every completion that has already arrived, without blocking.
    pub fn poll(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.receiver.try_recv() {
            outcomes.push(self.apply(completion));
        }
        outcomes
    }

    /// Block until every request issued so far has completed, or `timeout` elapses.
    /// Returns `false` on timeout (requests themselves are never cancelled).
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.in_flight > 0 {
            let left = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(left) {
                Ok(completion) => {
                    self.apply(completion);
                }
                Err(RecvTimeoutError::Timeout) => return false,
                // We hold a sender ourselves, so this cannot happen.
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }
}
