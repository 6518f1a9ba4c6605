//! Page-level application state.
//!
//! [`Session`] is the single writer for everything the page shows. Input
//! handlers call one update method and get back the [`Effect`]s to run
//! (lookups, requests, camera moves); async completions come back through
//! another update method carrying the ticket they were issued with, so a
//! late answer for a superseded city is dropped instead of overwriting newer
//! state.

use advisor::client::AdvisorError;
use advisor::panel::{Operation, Outcome, ResultPanel};
use advisor::protocol::{AdvisorRequest, AdvisorResponse};
use advisor::subtitles::{LoadingSubtitles, SubtitleFrame};
use effects::connection::SequenceView;
use foundation::geo::LngLat;
use foundation::time::Millis;
use geocoding::client::GeocodeError;
use geocoding::protocol::Place;
use map::climate_zones::{ZoneMap, ZoneMapError};
use runtime::generation::{Generation, Ticket};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Intro,
    Connecting,
    Explore,
}

/// Why "use my location" did not produce a city.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationError {
    Unsupported,
    /// Permission denied, position unavailable or timeout.
    PositionUnavailable,
    CityNotFound,
    ReverseLookupFailed,
}

impl LocationError {
    pub fn user_message(self) -> &'static str {
        match self {
            LocationError::Unsupported => "Geolocation not supported",
            LocationError::PositionUnavailable => "Impossible d'obtenir la position",
            LocationError::CityNotFound => "Ville non trouvée",
            LocationError::ReverseLookupFailed => "Erreur lors du reverse geocoding",
        }
    }
}

/// Work requested by an update, run by the browser shell.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start the connection interlude.
    StartConnection,
    /// Speed up the idle globe now that the user is past the intro.
    EngageMap,
    /// Forward-geocode `city`; report via [`Session::location_resolved`].
    Geocode { city: String, ticket: Ticket },
    FocusMap(LngLat),
    ResetMap,
    /// Ask the device for its position; report via
    /// [`Session::position_acquired`] or [`Session::geolocation_failed`].
    LocateDevice { ticket: Ticket },
    /// Reverse-geocode a device position; report via
    /// [`Session::reverse_geocoded`].
    ReverseGeocode { position: LngLat, ticket: Ticket },
    /// POST to the backend; report via [`Session::request_finished`].
    Request {
        op: Operation,
        ticket: Ticket,
        request: AdvisorRequest,
    },
}

#[derive(Debug, Default)]
pub struct Session {
    screen: Screen,
    city_input: String,
    selected_city: Option<String>,
    location: Option<LngLat>,
    location_validated: bool,
    locating: bool,
    location_error: Option<LocationError>,
    locate: Generation,
    lookup: Generation,
    panel: ResultPanel,
    subtitles: LoadingSubtitles,
    show_zone_maps: bool,
    zone_map: ZoneMap,
}

impl Session {
    pub fn new() -> Self {
        Self {
            show_zone_maps: true,
            ..Self::default()
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selected_city(&self) -> Option<&str> {
        self.selected_city.as_deref()
    }

    pub fn location(&self) -> Option<LngLat> {
        self.location
    }

    pub fn panel(&self) -> &ResultPanel {
        &self.panel
    }

    pub fn zone_map(&self) -> &ZoneMap {
        &self.zone_map
    }

    pub fn location_error(&self) -> Option<LocationError> {
        self.location_error
    }

    pub fn dismiss_intro(&mut self) -> Vec<Effect> {
        if self.screen != Screen::Intro {
            return Vec::new();
        }
        self.screen = Screen::Connecting;
        info!("intro dismissed");
        vec![Effect::StartConnection]
    }

    pub fn connection_complete(&mut self) -> Vec<Effect> {
        if self.screen != Screen::Connecting {
            return Vec::new();
        }
        self.screen = Screen::Explore;
        info!("data sources connected");
        vec![Effect::EngageMap]
    }

    /// Mirrors the search field; nothing is looked up until submit.
    pub fn set_city_input(&mut self, text: impl Into<String>) {
        self.city_input = text.into();
    }

    pub fn city_input(&self) -> &str {
        &self.city_input
    }

    /// Selects the city typed in the search field.
    /// A device lookup still in flight is abandoned.
    pub fn submit_city(&mut self) -> Vec<Effect> {
        let city = self.city_input.trim().to_string();
        if city.is_empty() {
            return Vec::new();
        }
        self.cancel_geolocation();
        self.select_city(city)
    }

    /// Replaces the active location. Results and in-flight requests for the
    /// previous city are retired before the lookup is issued.
    fn select_city(&mut self, city: String) -> Vec<Effect> {
        if city.is_empty() {
            return Vec::new();
        }
        self.selected_city = Some(city.clone());
        self.location = None;
        self.location_validated = false;
        self.panel.clear_all();
        self.subtitles.reset();
        self.zone_map.load(city.clone());
        let ticket = self.lookup.issue();
        debug!(%city, ticket = ticket.value(), "city selected");
        vec![Effect::Geocode { city, ticket }]
    }

    /// Back to the world view with nothing selected.
    pub fn clear_city(&mut self) -> Vec<Effect> {
        self.cancel_geolocation();
        self.city_input.clear();
        self.selected_city = None;
        self.location = None;
        self.location_validated = false;
        self.lookup.invalidate();
        self.panel.clear_all();
        self.subtitles.reset();
        self.zone_map = ZoneMap::default();
        vec![Effect::ResetMap]
    }

    /// Forward-geocoding result for the lookup issued with `ticket`.
    /// Failures leave the map where it is.
    pub fn location_resolved(
        &mut self,
        ticket: Ticket,
        result: Result<LngLat, GeocodeError>,
    ) -> Vec<Effect> {
        if !self.lookup.is_current(ticket) {
            debug!(ticket = ticket.value(), "discarding stale geocoding result");
            return Vec::new();
        }
        let Some(city) = self.selected_city.clone() else {
            return Vec::new();
        };
        match result {
            Ok(center) => {
                self.location = Some(center);
                self.zone_map.resolve(&city, Ok(center));
                vec![Effect::FocusMap(center)]
            }
            Err(err) => {
                warn!(%city, error = %err, "city lookup failed");
                let zone_err = match err {
                    GeocodeError::NotFound => ZoneMapError::CityNotFound,
                    GeocodeError::LookupFailed(_) => ZoneMapError::LookupFailed,
                };
                self.zone_map.resolve(&city, Err(zone_err));
                Vec::new()
            }
        }
    }

    pub fn begin_geolocation(&mut self) -> Vec<Effect> {
        if self.locating {
            return Vec::new();
        }
        self.locating = true;
        self.location_error = None;
        let ticket = self.locate.issue();
        vec![Effect::LocateDevice { ticket }]
    }

    pub fn is_locating(&self) -> bool {
        self.locating
    }

    fn cancel_geolocation(&mut self) {
        if self.locating {
            debug!("geolocation superseded");
        }
        self.locate.invalidate();
        self.locating = false;
    }

    fn locate_is_current(&self, ticket: Ticket) -> bool {
        if self.locating && self.locate.is_current(ticket) {
            return true;
        }
        debug!(ticket = ticket.value(), "discarding stale geolocation result");
        false
    }

    pub fn position_acquired(&mut self, ticket: Ticket, position: LngLat) -> Vec<Effect> {
        if !self.locate_is_current(ticket) {
            return Vec::new();
        }
        vec![Effect::ReverseGeocode { position, ticket }]
    }

    /// The city field is left untouched on failure.
    pub fn geolocation_failed(&mut self, ticket: Ticket, error: LocationError) {
        if !self.locate_is_current(ticket) {
            return;
        }
        self.fail_geolocation(error);
    }

    fn fail_geolocation(&mut self, error: LocationError) {
        warn!(?error, "geolocation failed");
        self.locating = false;
        self.location_error = Some(error);
    }

    /// A successful reverse lookup fills the search field and selects the
    /// city as if it had been submitted.
    pub fn reverse_geocoded(
        &mut self,
        ticket: Ticket,
        result: Result<Place, GeocodeError>,
    ) -> Vec<Effect> {
        if !self.locate_is_current(ticket) {
            return Vec::new();
        }
        match result {
            Ok(place) => {
                self.locating = false;
                self.city_input = place.name.clone();
                self.select_city(place.name)
            }
            Err(GeocodeError::NotFound) => {
                self.fail_geolocation(LocationError::CityNotFound);
                Vec::new()
            }
            Err(err) => {
                debug!(error = %err, "reverse geocoding failed");
                self.fail_geolocation(LocationError::ReverseLookupFailed);
                Vec::new()
            }
        }
    }

    /// Confirms the selected city and asks for recommendations.
    pub fn validate_location(&mut self, now: Millis) -> Vec<Effect> {
        let Some(city) = self.selected_city.clone() else {
            return Vec::new();
        };
        self.location_validated = true;
        self.subtitles.start(now, city.clone());
        self.request(Operation::Recommendation, AdvisorRequest::for_city(city))
    }

    /// Blank questions are ignored.
    pub fn ask_question(&mut self, question: &str) -> Vec<Effect> {
        let question = question.trim();
        if question.is_empty() {
            return Vec::new();
        }
        let Some(city) = self.selected_city.clone() else {
            return Vec::new();
        };
        self.request(
            Operation::FollowUp,
            AdvisorRequest::with_question(city, question),
        )
    }

    pub fn request_climate_analysis(&mut self) -> Vec<Effect> {
        let Some(city) = self.selected_city.clone() else {
            return Vec::new();
        };
        self.request(Operation::ClimateImpact, AdvisorRequest::for_city(city))
    }

    fn request(&mut self, op: Operation, request: AdvisorRequest) -> Vec<Effect> {
        let ticket = self.panel.begin(op);
        vec![Effect::Request {
            op,
            ticket,
            request,
        }]
    }

    /// Applies a backend answer. Returns `false` if it was superseded.
    pub fn request_finished(
        &mut self,
        op: Operation,
        ticket: Ticket,
        result: Result<AdvisorResponse, AdvisorError>,
    ) -> bool {
        if let Err(err) = &result {
            warn!(?op, error = %err, "backend request failed");
        }
        let applied = self.panel.complete(op, ticket, Outcome::from_result(op, result));
        if applied && op == Operation::Recommendation {
            self.subtitles.reset();
        }
        applied
    }

    pub fn dismiss_recommendation(&mut self) {
        self.panel.dismiss(Operation::Recommendation);
        self.subtitles.reset();
    }

    pub fn toggle_zone_maps(&mut self) {
        self.show_zone_maps = !self.show_zone_maps;
    }

    pub fn show_city_on_zone_map(&mut self) {
        self.zone_map.show_city();
    }

    /// Everything the page renders, at time `now`.
    pub fn snapshot(&self, now: Millis, connection: Option<SequenceView>) -> SessionView {
        let subtitle = self
            .panel
            .is_loading(Operation::Recommendation)
            .then(|| self.subtitles.frame(now));
        SessionView {
            screen: self.screen,
            city_input: self.city_input.clone(),
            selected_city: self.selected_city.clone(),
            location: self.location,
            location_validated: self.location_validated,
            locating: self.locating,
            location_error: self.location_error.map(LocationError::user_message),
            panel: self.panel.clone(),
            subtitle,
            show_zone_maps: self.show_zone_maps,
            zone_map: self.zone_map.clone(),
            zone_map_url: self.zone_map.iframe_url(),
            connection,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub screen: Screen,
    pub city_input: String,
    pub selected_city: Option<String>,
    pub location: Option<LngLat>,
    pub location_validated: bool,
    pub locating: bool,
    pub location_error: Option<&'static str>,
    pub panel: ResultPanel,
    pub subtitle: Option<SubtitleFrame>,
    pub show_zone_maps: bool,
    pub zone_map: ZoneMap,
    pub zone_map_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<SequenceView>,
}
