//! One-shot device position through `navigator.geolocation`.

use foundation::geo::LngLat;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Position;

use crate::session::LocationError;

/// Asks the browser for the current position. Denied permission, timeouts
/// and unavailable fixes all map to [`LocationError::PositionUnavailable`].
pub async fn current_position() -> Result<LngLat, LocationError> {
    let geolocation = web_sys::window()
        .and_then(|w| w.navigator().geolocation().ok())
        .ok_or(LocationError::Unsupported)?;

    let promise = js_sys::Promise::new(&mut |resolve, reject| {
        if let Err(err) = geolocation.get_current_position_with_error_callback(&resolve, Some(&reject)) {
            let _ = reject.call1(&wasm_bindgen::JsValue::NULL, &err);
        }
    });
    let position = JsFuture::from(promise).await.map_err(|err| {
        tracing::debug!(?err, "position request rejected");
        LocationError::PositionUnavailable
    })?;

    let coords = position.unchecked_into::<Position>().coords();
    let here = LngLat::new(coords.longitude(), coords.latitude());
    if !here.is_valid() {
        return Err(LocationError::PositionUnavailable);
    }
    tracing::debug!(%here, "device position acquired");
    Ok(here)
}
