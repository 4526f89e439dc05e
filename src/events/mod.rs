//! DOM listener wiring: one closure per subscription, translating the raw
//! event into a [`Signal`] for the owning driver.

pub mod pointer;
pub mod scroll;

use crate::dom;
use crate::host::{Driver, DriverWeak, Installed, WebHost};
use ambient_core::{Disposition, HostEvent, Signal};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

fn listen(
    target: web::EventTarget,
    name: &str,
    passive: bool,
    owner: DriverWeak,
    mut translate: impl FnMut(&web::Event) -> Option<Signal> + 'static,
) -> Result<Installed, JsValue> {
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        let Some(signal) = translate(&ev) else {
            return;
        };
        if Driver::dispatch(&owner, signal) == Disposition::Consumed {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(web::Event)>);
    let options = web::AddEventListenerOptions::new();
    options.set_passive(passive);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        name,
        closure.as_ref().unchecked_ref(),
        &options,
    )?;
    Ok(Installed {
        target,
        name: name.to_string(),
        closure,
    })
}

pub(crate) fn install(
    host: &WebHost,
    event: HostEvent,
    owner: DriverWeak,
) -> Result<Installed, JsValue> {
    let window = host.window.clone();
    let document = host.document.clone();
    let window_target: web::EventTarget = window.clone().into();
    let document_target: web::EventTarget = document.clone().into();

    match event {
        HostEvent::Resize => listen(window_target, "resize", true, owner, move |_| {
            Some(Signal::Resize {
                viewport: dom::viewport(&window),
                scroll: dom::scroll_metrics(&window, &document),
            })
        }),
        HostEvent::Scroll => listen(window_target, "scroll", true, owner, move |_| {
            Some(Signal::Scroll(dom::scroll_metrics(&window, &document)))
        }),
        HostEvent::ScrollProgress => listen(
            window_target,
            &host.scroll_event,
            true,
            owner,
            scroll::progress_signal,
        ),
        HostEvent::PointerMove => listen(document_target, "mousemove", true, owner, |ev| {
            let ev = ev.dyn_ref::<web::MouseEvent>()?;
            Some(Signal::PointerMove {
                x: ev.client_x() as f32,
                y: ev.client_y() as f32,
            })
        }),
        HostEvent::PointerEnter => {
            let root = document
                .document_element()
                .ok_or_else(|| JsValue::from_str("no document element"))?;
            listen(root.into(), "mouseenter", true, owner, |_| {
                Some(Signal::PointerEnter)
            })
        }
        HostEvent::PointerLeave => {
            let root = document
                .document_element()
                .ok_or_else(|| JsValue::from_str("no document element"))?;
            listen(root.into(), "mouseleave", true, owner, |_| {
                Some(Signal::PointerLeave)
            })
        }
        HostEvent::PointerOver => listen(document_target, "pointerover", true, owner, |ev| {
            Some(Signal::PointerOver(pointer::hover_target(ev)))
        }),
        HostEvent::PointerOut => listen(document_target, "pointerout", true, owner, |ev| {
            Some(Signal::PointerOut(pointer::hover_target(ev)))
        }),
        HostEvent::Visibility => listen(document_target, "visibilitychange", true, owner, move |_| {
            Some(Signal::Visibility(dom::page_visible(&document)))
        }),
        HostEvent::AnchorClick => listen(document_target, "click", false, owner, scroll::anchor_click),
        HostEvent::Wheel => listen(window_target, "wheel", false, owner, move |ev| {
            scroll::wheel_signal(ev, dom::viewport(&window).height as f64)
        }),
        HostEvent::MediaChange(query) => {
            let list = window
                .match_media(query.as_str())?
                .ok_or_else(|| JsValue::from_str("matchMedia unsupported"))?;
            listen(list.into(), "change", true, owner, move |ev| {
                let ev = ev.dyn_ref::<web::MediaQueryListEvent>()?;
                Some(Signal::MediaChange {
                    query,
                    matches: ev.matches(),
                })
            })
        }
    }
}
