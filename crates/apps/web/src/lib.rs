//! Browser entry point for Climate Hive.
//!
//! The host page owns the DOM. It calls the exported functions on user input
//! and renders [`session_snapshot`]; this module owns the canvases, the map
//! widget, and every network call.

use std::cell::RefCell;
use std::rc::Rc;

use advisor::client::AdvisorClient;
use advisor::panel::Operation;
use advisor::protocol::{AdvisorRequest, AdvisorResponse};
use effects::background::BackgroundLayer;
use effects::connection::{ConnectionScene, ConnectionSequence};
use foundation::time::Millis;
use geocoding::client::GeocodingClient;
use geocoding::endpoint::GeocodingEndpoint;
use map::camera::MapOptions;
use map::controller::MapController;
use rand::SeedableRng;
use rand::rngs::StdRng;
use runtime::animation_loop::{Animation, LoopControl};
use runtime::frame::Frame;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod canvas;
mod config;
mod frame_loop;
mod geolocation;
mod http;
mod logging;
mod mapbox;
mod session;

pub use config::{ConfigError, HiveConfig};
pub use session::{Effect, LocationError, Screen, Session, SessionView};

use canvas::WebCanvas;
use frame_loop::FrameLoop;
use http::FetchTransport;
use mapbox::MapboxWidget;

type Scene = ConnectionScene<StdRng, WebCanvas>;

struct App {
    config: HiveConfig,
    session: Session,
    map: MapController<MapboxWidget>,
    geocoder: GeocodingClient<FetchTransport>,
    advisor: AdvisorClient<FetchTransport>,
    on_change: Option<js_sys::Function>,
    background: Option<FrameLoop>,
    map_ticker: Option<FrameLoop>,
    connection: Option<FrameLoop>,
    scene: Option<Rc<RefCell<Scene>>>,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Runs `f` against the live app. Returns `None` before `start_app`, after
/// `stop_app`, or when called re-entrantly (e.g. a map event fired from
/// inside a camera call).
fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.as_mut().map(f),
        Err(_) => {
            tracing::debug!("app state busy; event dropped");
            None
        }
    })
}

fn now() -> Millis {
    Millis(
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0),
    )
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64((js_sys::Math::random() * u64::MAX as f64) as u64)
}

/// Tells the host page to re-read the snapshot.
fn notify() {
    let Some(Some(callback)) = with_app(|app| app.on_change.clone()) else {
        return;
    };
    if let Err(err) = callback.call0(&JsValue::NULL) {
        tracing::warn!(?err, "change listener threw");
    }
}

/// Applies `update` to the session, runs its effects and notifies the page.
fn update(f: impl FnOnce(&mut Session) -> Vec<Effect>) {
    let effects = with_app(|app| f(&mut app.session)).unwrap_or_default();
    dispatch(effects);
    notify();
}

fn dispatch(effects: Vec<Effect>) {
    for effect in effects {
        run(effect);
    }
}

fn run(effect: Effect) {
    match effect {
        Effect::StartConnection => {
            with_app(App::start_connection);
        }
        Effect::EngageMap => {
            with_app(|app| {
                app.connection = None;
                app.scene = None;
                app.map.set_animate(true);
            });
        }
        Effect::FocusMap(target) => {
            with_app(|app| app.map.focus(target));
        }
        Effect::ResetMap => {
            with_app(|app| app.map.reset());
        }
        Effect::Geocode { city, ticket } => {
            let Some(geocoder) = with_app(|app| app.geocoder.clone()) else {
                return;
            };
            spawn_local(async move {
                let result = geocoder.forward(&city).await;
                update(|s| s.location_resolved(ticket, result));
            });
        }
        Effect::LocateDevice { ticket } => spawn_local(async move {
            match geolocation::current_position().await {
                Ok(position) => update(|s| s.position_acquired(ticket, position)),
                Err(err) => update(|s| {
                    s.geolocation_failed(ticket, err);
                    Vec::new()
                }),
            }
        }),
        Effect::ReverseGeocode { position, ticket } => {
            let Some(geocoder) = with_app(|app| app.geocoder.clone()) else {
                return;
            };
            spawn_local(async move {
                let result = geocoder.reverse(position).await;
                update(|s| s.reverse_geocoded(ticket, result));
            });
        }
        Effect::Request {
            op,
            ticket,
            request,
        } => {
            let Some(advisor) = with_app(|app| app.advisor.clone()) else {
                return;
            };
            spawn_local(async move {
                let result = ask_backend(&advisor, op, &request).await;
                update(|s| {
                    if !s.request_finished(op, ticket, result) {
                        tracing::debug!(?op, "superseded backend answer dropped");
                    }
                    Vec::new()
                });
            });
        }
    }
}

async fn ask_backend(
    advisor: &AdvisorClient<FetchTransport>,
    op: Operation,
    request: &AdvisorRequest,
) -> Result<AdvisorResponse, advisor::client::AdvisorError> {
    match (op, request.question.as_deref()) {
        (Operation::FollowUp, Some(question)) => advisor.follow_up(&request.city, question).await,
        (Operation::ClimateImpact, _) => advisor.climate_impact(&request.city).await,
        _ => advisor.recommendations(&request.city).await,
    }
}

/// Forwards animation frames to a scene shared with the snapshot.
struct SharedScene(Rc<RefCell<Scene>>);

impl Animation for SharedScene {
    fn frame(&mut self, frame: Frame) -> LoopControl {
        match self.0.try_borrow_mut() {
            Ok(mut scene) => scene.frame(frame),
            Err(_) => LoopControl::Continue,
        }
    }
}

impl App {
    fn new(config: HiveConfig) -> Self {
        let endpoint = GeocodingEndpoint::new(&config.geocoding_base_url, &config.mapbox_token);
        Self {
            geocoder: GeocodingClient::new(endpoint, FetchTransport),
            advisor: AdvisorClient::new(&config.api_base_url, FetchTransport),
            config,
            session: Session::new(),
            map: MapController::new(),
            on_change: None,
            background: None,
            map_ticker: None,
            connection: None,
            scene: None,
        }
    }

    fn start_background(&mut self) {
        match WebCanvas::from_id(&self.config.background_canvas_id) {
            Ok(canvas) => {
                let layer = BackgroundLayer::new(seeded_rng(), canvas).with_clock(js_sys::Date::now);
                match FrameLoop::start("background", layer) {
                    Ok(lp) => self.background = Some(lp),
                    Err(err) => tracing::warn!(?err, "background animation did not start"),
                }
            }
            Err(err) => tracing::warn!(%err, "background disabled"),
        }
    }

    fn start_map(&mut self) {
        if !self.config.has_map() {
            tracing::info!("no map token configured; map disabled");
            return;
        }
        let options = MapOptions::globe(
            &self.config.map_container_id,
            &self.config.map_style,
            &self.config.mapbox_token,
        );
        let created = self.map.initialize(&options, |opts| {
            MapboxWidget::create(opts, || {
                with_app(|app| app.map.on_move_end());
            })
        });
        match created {
            Ok(_) => {
                self.map.set_animate(false);
                let ticker = FrameLoop::start("map", |frame: Frame| {
                    with_app(|app| app.map.tick(frame.now));
                    LoopControl::Continue
                });
                match ticker {
                    Ok(lp) => self.map_ticker = Some(lp),
                    Err(err) => tracing::warn!(?err, "map rotation did not start"),
                }
            }
            Err(err) => tracing::error!(%err, "map creation failed"),
        }
    }

    /// Starts the interlude. Without its canvases the session moves straight
    /// on to the explore screen.
    fn start_connection(&mut self) {
        let canvases = WebCanvas::from_id(&self.config.connection_canvas_id).and_then(|particles| {
            WebCanvas::from_id(&self.config.honeycomb_canvas_id).map(|honeycomb| (particles, honeycomb))
        });
        let sequence = ConnectionSequence::default().on_complete(|| {
            // Deferred: completion fires inside the scene's frame.
            spawn_local(async { update(Session::connection_complete) });
        });
        let (particles, honeycomb) = match canvases {
            Ok(pair) => pair,
            Err(err) => {
                tracing::warn!(%err, "connection canvases missing; skipping interlude");
                spawn_local(async { update(Session::connection_complete) });
                return;
            }
        };
        let scene = Rc::new(RefCell::new(ConnectionScene::new(
            seeded_rng(),
            sequence,
            particles,
            honeycomb,
        )));
        match FrameLoop::start("connection", SharedScene(scene.clone())) {
            Ok(lp) => {
                self.connection = Some(lp);
                self.scene = Some(scene);
            }
            Err(err) => {
                tracing::warn!(?err, "connection animation did not start");
                spawn_local(async { update(Session::connection_complete) });
            }
        }
    }

    fn shutdown(&mut self) {
        for lp in [&self.background, &self.map_ticker, &self.connection].into_iter().flatten() {
            lp.stop();
        }
        self.map.teardown();
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    logging::init_panic_hook();
}

/// Boots the app from a JSON configuration (`""` or `"{}"` for defaults).
/// Calling it again while running is a no-op.
#[wasm_bindgen]
pub fn start_app(config_json: &str) -> Result<(), JsValue> {
    let config = HiveConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    logging::init(&config.log_level);

    let already_running = APP.with(|cell| cell.borrow().is_some());
    if already_running {
        tracing::debug!("start_app called twice");
        return Ok(());
    }
    APP.with(|cell| *cell.borrow_mut() = Some(App::new(config)));
    with_app(|app| {
        app.start_background();
        app.start_map();
    });
    tracing::info!("climate hive started");
    Ok(())
}

/// Tears everything down. The page may call `start_app` again afterwards.
#[wasm_bindgen]
pub fn stop_app() {
    let app = APP.with(|cell| cell.try_borrow_mut().ok().and_then(|mut slot| slot.take()));
    if let Some(mut app) = app {
        app.shutdown();
        tracing::info!("climate hive stopped");
    }
}

/// Registers a zero-argument callback run after every state change.
#[wasm_bindgen]
pub fn on_change(callback: js_sys::Function) {
    with_app(|app| app.on_change = Some(callback));
}

#[wasm_bindgen]
pub fn dismiss_intro() {
    update(Session::dismiss_intro);
}

#[wasm_bindgen]
pub fn set_city_input(text: &str) {
    let text = text.to_string();
    update(move |s| {
        s.set_city_input(text);
        Vec::new()
    });
}

#[wasm_bindgen]
pub fn submit_city() {
    update(Session::submit_city);
}

#[wasm_bindgen]
pub fn clear_city() {
    update(Session::clear_city);
}

#[wasm_bindgen]
pub fn use_my_location() {
    update(Session::begin_geolocation);
}

#[wasm_bindgen]
pub fn validate_location() {
    let at = now();
    update(move |s| s.validate_location(at));
}

#[wasm_bindgen]
pub fn ask_question(question: &str) {
    let question = question.to_string();
    update(move |s| s.ask_question(&question));
}

#[wasm_bindgen]
pub fn request_climate_analysis() {
    update(Session::request_climate_analysis);
}

#[wasm_bindgen]
pub fn dismiss_recommendation() {
    update(|s| {
        s.dismiss_recommendation();
        Vec::new()
    });
}

#[wasm_bindgen]
pub fn toggle_zone_maps() {
    update(|s| {
        s.toggle_zone_maps();
        Vec::new()
    });
}

#[wasm_bindgen]
pub fn show_city_on_zone_map() {
    update(|s| {
        s.show_city_on_zone_map();
        Vec::new()
    });
}

/// Current page state as JSON. Poll it per frame while the connection
/// interlude runs; otherwise re-read it from the `on_change` callback.
#[wasm_bindgen]
pub fn session_snapshot() -> Result<String, JsValue> {
    let at = now();
    let view = with_app(|app| {
        let connection = app
            .scene
            .as_ref()
            .and_then(|scene| scene.try_borrow().ok().map(|s| s.sequence().view()));
        app.session.snapshot(at, connection)
    })
    .ok_or_else(|| JsValue::from_str("app not started"))?;
    serde_json::to_string(&view).map_err(|e| JsValue::from_str(&e.to_string()))
}
