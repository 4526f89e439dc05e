use crate::host::{Driver, DriverWeak};
use ambient_core::Signal;
use wasm_bindgen::closure::Closure;

/// requestAnimationFrame callback for one driver. Reused for every request;
/// the effect decides whether to ask for another frame.
pub fn make_tick(owner: DriverWeak) -> Closure<dyn FnMut()> {
    Closure::wrap(Box::new(move || {
        let timestamp_ms = instant::now();
        Driver::dispatch(&owner, Signal::Frame { timestamp_ms });
    }) as Box<dyn FnMut()>)
}
