//! Mapbox GL JS bindings and the [`MapWidget`] over them.
//!
//! `mapboxgl` is loaded by the host page as a global script.

use map::camera::{CameraOptions, MapOptions};
use map::widget::{MapError, MapWidget};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl, js_name = Map)]
    #[derive(Debug, Clone)]
    type JsMap;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Map", catch)]
    fn new(options: &JsValue) -> Result<JsMap, JsValue>;

    #[wasm_bindgen(method, js_name = flyTo)]
    fn fly_to(this: &JsMap, options: &JsValue);

    #[wasm_bindgen(method, js_name = jumpTo)]
    fn jump_to(this: &JsMap, options: &JsValue);

    #[wasm_bindgen(method, js_name = getBearing)]
    fn get_bearing(this: &JsMap) -> f64;

    #[wasm_bindgen(method, js_name = setBearing)]
    fn set_bearing(this: &JsMap, bearing: f64);

    #[wasm_bindgen(method, js_name = getZoom)]
    fn get_zoom(this: &JsMap) -> f64;

    #[wasm_bindgen(method, js_name = setZoom)]
    fn set_zoom(this: &JsMap, zoom: f64);

    #[wasm_bindgen(method, js_name = setPitch)]
    fn set_pitch(this: &JsMap, pitch: f64);

    #[wasm_bindgen(method, js_name = addControl)]
    fn add_control(this: &JsMap, control: &JsValue);

    #[wasm_bindgen(method, js_name = setConfigProperty)]
    fn set_config_property(this: &JsMap, import_id: &str, name: &str, value: &JsValue);

    #[wasm_bindgen(method)]
    fn on(this: &JsMap, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method)]
    fn remove(this: &JsMap);

    #[wasm_bindgen(js_namespace = mapboxgl, js_name = NavigationControl)]
    #[derive(Debug, Clone)]
    type JsNavigationControl;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "NavigationControl")]
    fn new() -> JsNavigationControl;
}

const LIGHT_PRESET: &str = "dawn";

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

/// A live `mapboxgl.Map` plus the listeners it holds on to.
pub struct MapboxWidget {
    map: JsMap,
    listeners: Vec<Closure<dyn FnMut()>>,
}

impl MapboxWidget {
    /// Creates the map. `on_move_end` runs at the end of every camera
    /// animation.
    pub fn create(options: &MapOptions, on_move_end: impl FnMut() + 'static) -> Result<Self, MapError> {
        let js_options = to_js(options).map_err(|e| MapError::Create(format!("{e:?}")))?;
        let map = JsMap::new(&js_options).map_err(|e| MapError::Create(format!("{e:?}")))?;

        let nav: JsValue = JsNavigationControl::new().into();
        map.add_control(&nav);

        let styled = map.clone();
        let on_style = Closure::<dyn FnMut()>::new(move || {
            styled.set_config_property("basemap", "lightPreset", &JsValue::from_str(LIGHT_PRESET));
        });
        map.on("style.load", on_style.as_ref().unchecked_ref());

        let on_move = Closure::<dyn FnMut()>::new(on_move_end);
        map.on("moveend", on_move.as_ref().unchecked_ref());

        Ok(Self {
            map,
            listeners: vec![on_style, on_move],
        })
    }

    fn send(&self, camera: &CameraOptions, f: fn(&JsMap, &JsValue)) {
        match to_js(camera) {
            Ok(options) => f(&self.map, &options),
            Err(err) => tracing::warn!(?err, "could not encode camera options"),
        }
    }
}

impl MapWidget for MapboxWidget {
    fn fly_to(&mut self, camera: &CameraOptions) {
        self.send(camera, JsMap::fly_to);
    }

    fn jump_to(&mut self, camera: &CameraOptions) {
        self.send(camera, JsMap::jump_to);
    }

    fn bearing(&self) -> f64 {
        self.map.get_bearing()
    }

    fn set_bearing(&mut self, bearing_deg: f64) {
        self.map.set_bearing(bearing_deg);
    }

    fn zoom(&self) -> f64 {
        self.map.get_zoom()
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.map.set_zoom(zoom);
    }

    fn set_pitch(&mut self, pitch_deg: f64) {
        self.map.set_pitch(pitch_deg);
    }

    fn remove(&mut self) {
        self.map.remove();
        self.listeners.clear();
    }
}
