use serde::Serialize;
use thiserror::Error;
use crate::core::radius::RadiusFilter;
use crate::models::{Candidate, FilteredCandidate, GeoError, GeoPoint, SortKey};
use crate::services::store::{KeyValueStore, StoreError};

/// Storage key for the last placed pin
pub const PIN_KEY: &str = "tayibPin";
/// Storage key for the last selected radius
pub const RADIUS_KEY: &str = "tayibRadius";

/// Where the map session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Idle,
    PlacingPin,
    PinPlaced,
    Filtering,
    ResultsShown,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::PlacingPin => "placing-pin",
            Phase::PinPlaced => "pin-placed",
            Phase::Filtering => "filtering",
            Phase::ResultsShown => "results-shown",
        };
        f.write_str(s)
    }
}

/// Errors returned by session transitions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("cannot {action} while {phase}")]
    InvalidTransition { phase: Phase, action: &'static str },

    #[error("no pin has been placed")]
    NoPin,

    #[error("invalid pin: {0}")]
    InvalidPin(#[from] GeoError),
}

/// Handle for an in-flight filter run
///
/// Any pin or radius change after the ticket was issued makes it stale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterTicket {
    generation: u64,
    center: GeoPoint,
    radius_km: f64,
}

impl FilterTicket {
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }
}

/// Read-only view for the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub pin: Option<GeoPoint>,
    #[serde(rename = "radiusKm")]
    pub radius_km: f64,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<SortKey>,
    pub results: Vec<FilteredCandidate>,
}

/// Map filter session: pin, radius, phase, and the last result set
///
/// Owned by a single control flow. Only the pin and radius are written to the
/// store; phase and results always start empty.
pub struct FilterSession<S: KeyValueStore> {
    filter: RadiusFilter,
    store: S,
    pin: Option<GeoPoint>,
    radius_km: f64,
    phase: Phase,
    results: Vec<FilteredCandidate>,
    sort_by: Option<SortKey>,
    generation: u64,
    pending: Option<u64>,
}

impl<S: KeyValueStore> FilterSession<S> {
    /// Start a session, restoring the persisted pin and radius from `store`
    ///
    /// A restored pin puts the session straight into `PinPlaced`. The filter is
    /// not run.
    pub fn new(filter: RadiusFilter, store: S) -> Self {
        let bounds = *filter.bounds();

        let pin = match store.get(PIN_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<GeoPoint>(&raw) {
                Ok(p) if p.is_valid() => Some(p),
                Ok(p) => {
                    tracing::warn!("Ignoring persisted pin with invalid coordinates: {:?}", p);
                    None
                }
                Err(e) => {
                    tracing::warn!("Ignoring unreadable persisted pin: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read persisted pin: {}", e);
                None
            }
        };

        let radius_km = match store.get(RADIUS_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<f64>() {
                Ok(r) => bounds.clamp(r),
                Err(e) => {
                    tracing::warn!("Ignoring unreadable persisted radius {:?}: {}", raw, e);
                    bounds.default_km()
                }
            },
            Ok(None) => bounds.default_km(),
            Err(e) => {
                tracing::warn!("Failed to read persisted radius: {}", e);
                bounds.default_km()
            }
        };

        let phase = if pin.is_some() { Phase::PinPlaced } else { Phase::Idle };

        tracing::debug!("Filter session started in {} (pin: {:?}, radius: {} km)", phase, pin, radius_km);

        Self {
            filter,
            store,
            pin,
            radius_km,
            phase,
            results: Vec::new(),
            sort_by: None,
            generation: 0,
            pending: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pin(&self) -> Option<GeoPoint> {
        self.pin
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    pub fn results(&self) -> &[FilteredCandidate] {
        &self.results
    }

    pub fn results_visible(&self) -> bool {
        self.phase == Phase::ResultsShown
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            pin: self.pin,
            radius_km: self.radius_km,
            sort_by: self.sort_by,
            results: self.results.clone(),
        }
    }

    /// Enter pin-placement mode
    pub fn enter_pin_placement(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Idle | Phase::PinPlaced => {}
            Phase::PlacingPin => return Ok(()),
            Phase::ResultsShown => self.invalidate(),
            Phase::Filtering => return Err(self.invalid("enter pin placement")),
        }

        self.phase = Phase::PlacingPin;
        Ok(())
    }

    /// Leave pin-placement mode without picking a location
    pub fn cancel_pin_placement(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::PlacingPin {
            return Err(self.invalid("cancel pin placement"));
        }

        self.phase = if self.pin.is_some() { Phase::PinPlaced } else { Phase::Idle };
        Ok(())
    }

    /// Place or move the pin
    ///
    /// Allowed in placement mode and whenever a pin already exists (dragging).
    /// Any previous results are discarded.
    pub fn place_pin(&mut self, point: GeoPoint) -> Result<(), SessionError> {
        if self.phase == Phase::Idle {
            return Err(self.invalid("place a pin"));
        }
        let point = GeoPoint::try_new(point.latitude(), point.longitude())?;

        self.invalidate();
        self.pin = Some(point);
        self.phase = Phase::PinPlaced;
        self.persist_pin();

        tracing::debug!("Pin placed at {:.6}, {:.6}", point.latitude(), point.longitude());
        Ok(())
    }

    /// Change the radius, returning the value actually applied
    pub fn set_radius(&mut self, radius_km: f64) -> f64 {
        let radius_km = self.filter.bounds().clamp(radius_km);
        if radius_km == self.radius_km {
            return radius_km;
        }

        self.radius_km = radius_km;
        if matches!(self.phase, Phase::ResultsShown | Phase::Filtering) {
            self.invalidate();
            self.phase = Phase::PinPlaced;
        }
        self.persist_radius();

        radius_km
    }

    /// Start a filter run against the current pin and radius
    pub fn begin_filter(&mut self) -> Result<FilterTicket, SessionError> {
        if !matches!(self.phase, Phase::PinPlaced | Phase::ResultsShown) {
            return Err(self.invalid("run the filter"));
        }
        let center = self.pin.ok_or(SessionError::NoPin)?;

        self.invalidate();
        self.pending = Some(self.generation);
        self.phase = Phase::Filtering;

        Ok(FilterTicket {
            generation: self.generation,
            center,
            radius_km: self.radius_km,
        })
    }

    /// Finish a filter run with the candidate list
    ///
    /// Returns `false` when the ticket is stale; the candidates are then ignored.
    pub fn complete_filter(
        &mut self,
        ticket: &FilterTicket,
        candidates: &[Candidate],
        key: SortKey,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!("Discarding stale filter completion (generation {})", ticket.generation);
            return false;
        }

        let nearby = self
            .filter
            .find_nearby(&ticket.center, Some(ticket.radius_km), candidates, key);

        self.results = nearby.results;
        self.sort_by = Some(key);
        self.pending = None;
        self.phase = Phase::ResultsShown;
        true
    }

    /// Abandon a filter run, returning to `PinPlaced`
    pub fn fail_filter(&mut self, ticket: &FilterTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        self.pending = None;
        self.phase = Phase::PinPlaced;
        true
    }

    /// Run the filter synchronously and show the results
    pub fn run_filter(
        &mut self,
        candidates: &[Candidate],
        key: SortKey,
    ) -> Result<&[FilteredCandidate], SessionError> {
        let ticket = self.begin_filter()?;
        self.complete_filter(&ticket, candidates, key);
        Ok(&self.results)
    }

    /// Re-order the visible results without recomputing distances
    pub fn resort(&mut self, key: SortKey) -> Result<(), SessionError> {
        if self.phase != Phase::ResultsShown {
            return Err(self.invalid("sort results"));
        }

        self.results = crate::core::sorting::sort_results(&self.results, key);
        self.sort_by = Some(key);
        Ok(())
    }

    /// Hide the results but keep the pin and radius
    pub fn dismiss_results(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::ResultsShown {
            return Err(self.invalid("dismiss results"));
        }

        self.invalidate();
        self.phase = Phase::PinPlaced;
        Ok(())
    }

    /// Remove the pin, keeping the selected radius
    pub fn remove_pin(&mut self) {
        self.invalidate();
        self.pin = None;
        self.phase = Phase::Idle;
        self.persist_pin();
    }

    /// Back to a fresh session: no pin, default radius, no results
    pub fn reset(&mut self) {
        self.invalidate();
        self.pin = None;
        self.radius_km = self.filter.bounds().default_km();
        self.phase = Phase::Idle;

        for key in [PIN_KEY, RADIUS_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!("Failed to clear {} from session store: {}", key, e);
            }
        }
    }

    fn is_current(&self, ticket: &FilterTicket) -> bool {
        self.phase == Phase::Filtering && self.pending == Some(ticket.generation)
    }

    fn invalidate(&mut self) {
        self.results.clear();
        self.sort_by = None;
        self.pending = None;
        self.generation += 1;
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition { phase: self.phase, action }
    }

    fn persist_pin(&mut self) {
        let result = match self.pin {
            Some(pin) => serde_json::to_string(&pin)
                .map_err(StoreError::from)
                .and_then(|json| self.store.set(PIN_KEY, &json)),
            None => self.store.remove(PIN_KEY),
        };

        if let Err(e) = result {
            tracing::warn!("Failed to persist pin: {}", e);
        }
    }

    fn persist_radius(&mut self) {
        if let Err(e) = self.store.set(RADIUS_KEY, &self.radius_km.to_string()) {
            tracing::warn!("Failed to persist radius: {}", e);
        }
    }
}
