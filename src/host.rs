//! Browser implementation of [`ambient_core::Host`].
//!
//! Each mounted module gets its own [`Driver`]: the effect plus a `WebHost`
//! owning that module's DOM listeners and animation frame. Callbacks hold a
//! weak handle back to the driver so dropping it tears everything down.

use crate::events;
use crate::frame;
use ambient_core::{
    Disposition, Effect, EffectError, FrameId, Host, HostEvent, ListenerId, Signal,
};
use fnv::FnvHashMap;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type DriverRef = Rc<RefCell<Driver>>;
pub type DriverWeak = Weak<RefCell<Driver>>;

pub(crate) struct Installed {
    pub target: web::EventTarget,
    pub name: String,
    pub closure: Closure<dyn FnMut(web::Event)>,
}

impl Installed {
    fn detach(&self) {
        _ = self
            .target
            .remove_event_listener_with_callback(&self.name, self.closure.as_ref().unchecked_ref());
    }
}

pub struct WebHost {
    owner: DriverWeak,
    pub(crate) window: web::Window,
    pub(crate) document: web::Document,
    pub(crate) scroll_event: String,
    next_listener: u32,
    listeners: FnvHashMap<ListenerId, Installed>,
    // Detached closures may still be on the JS stack; drop them on the next
    // frame instead of immediately.
    retired: Vec<Installed>,
    next_frame: u32,
    pending_frame: Option<(FrameId, i32)>,
    tick: Option<Closure<dyn FnMut()>>,
}

impl WebHost {
    fn new(
        owner: DriverWeak,
        window: web::Window,
        document: web::Document,
        scroll_event: String,
    ) -> Self {
        Self {
            owner,
            window,
            document,
            scroll_event,
            next_listener: 0,
            listeners: FnvHashMap::default(),
            retired: Vec::new(),
            next_frame: 0,
            pending_frame: None,
            tick: None,
        }
    }

    fn frame_delivered(&mut self) {
        self.pending_frame = None;
        self.retired.clear();
    }

    fn release_all(&mut self) {
        if let Some((_, handle)) = self.pending_frame.take() {
            _ = self.window.cancel_animation_frame(handle);
        }
        for (_, installed) in self.listeners.drain() {
            installed.detach();
            self.retired.push(installed);
        }
    }
}

impl Host for WebHost {
    fn request_frame(&mut self) -> FrameId {
        if let Some((id, _)) = self.pending_frame {
            return id;
        }
        let id = FrameId(self.next_frame);
        self.next_frame = self.next_frame.wrapping_add(1);
        let tick = self
            .tick
            .get_or_insert_with(|| frame::make_tick(self.owner.clone()));
        match self
            .window
            .request_animation_frame(tick.as_ref().unchecked_ref())
        {
            Ok(handle) => self.pending_frame = Some((id, handle)),
            Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
        }
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if let Some((pending, handle)) = self.pending_frame {
            if pending == id {
                _ = self.window.cancel_animation_frame(handle);
                self.pending_frame = None;
            }
        }
    }

    fn add_listener(&mut self, event: HostEvent) -> Result<ListenerId, EffectError> {
        let installed = events::install(self, event, self.owner.clone()).map_err(|e| {
            EffectError::ListenerRegistration {
                event,
                reason: format!("{:?}", e),
            }
        })?;
        let id = ListenerId(self.next_listener);
        self.next_listener = self.next_listener.wrapping_add(1);
        self.listeners.insert(id, installed);
        Ok(id)
    }

    fn remove_listener(&mut self, id: ListenerId) {
        if let Some(installed) = self.listeners.remove(&id) {
            installed.detach();
            self.retired.push(installed);
        }
    }
}

/// One mounted module and the host it talks to.
pub struct Driver {
    name: &'static str,
    effect: Option<Box<dyn Effect>>,
    pub(crate) host: WebHost,
}

impl Driver {
    pub fn new(
        name: &'static str,
        window: web::Window,
        document: web::Document,
        scroll_event: String,
    ) -> DriverRef {
        Rc::new_cyclic(|weak: &DriverWeak| {
            RefCell::new(Driver {
                name,
                effect: None,
                host: WebHost::new(weak.clone(), window, document, scroll_event),
            })
        })
    }

    /// Run `mount` against this driver's host and keep the effect it returns.
    /// Returns whether an effect is now mounted.
    pub fn mount_with<F>(this: &DriverRef, mount: F) -> bool
    where
        F: FnOnce(&mut dyn Host) -> Result<Option<Box<dyn Effect>>, EffectError>,
    {
        let mut driver = this.borrow_mut();
        let name = driver.name;
        match mount(&mut driver.host) {
            Ok(Some(effect)) => {
                driver.effect = Some(effect);
                log::info!("[{}] mounted", name);
                true
            }
            Ok(None) => false,
            Err(e) => {
                log::warn!("[{}] not mounted: {}", name, e);
                driver.host.release_all();
                false
            }
        }
    }

    /// Deliver a signal from a DOM callback. Re-entrant deliveries are
    /// dropped.
    pub fn dispatch(owner: &DriverWeak, signal: Signal) -> Disposition {
        let Some(driver) = owner.upgrade() else {
            return Disposition::Ignored;
        };
        let Ok(mut driver) = driver.try_borrow_mut() else {
            log::debug!("dropped re-entrant {:?}", signal);
            return Disposition::Ignored;
        };
        let Driver { effect, host, .. } = &mut *driver;
        if matches!(signal, Signal::Frame { .. }) {
            host.frame_delivered();
        }
        match effect {
            Some(effect) => effect.on_signal(host, &signal),
            None => Disposition::Ignored,
        }
    }

    pub fn unmount(&mut self) {
        if let Some(mut effect) = self.effect.take() {
            effect.unmount(&mut self.host);
            log::info!("[{}] unmounted", self.name);
        }
        self.host.release_all();
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        self.unmount();
    }
}
