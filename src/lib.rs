#![cfg(target_arch = "wasm32")]
//! Browser front-end: wires the core effects to the DOM, a 2D canvas and a
//! wgpu surface.

use ambient_core::constants::SCENE_OPACITY;
use ambient_core::cursor::CursorOverlay;
use ambient_core::field::FieldEffect;
use ambient_core::scene::SceneEffect;
use ambient_core::scroll::ScrollBroadcaster;
use ambient_core::{Capabilities, Effect, EffectError, EffectsConfig, MountPlan};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod canvas2d;
mod constants;
mod css;
mod dom;
mod events;
mod frame;
mod host;
mod overlay;
mod probe;
mod render;

use constants::*;
use host::{Driver, DriverRef};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("ambient-web loaded");
    Ok(())
}

struct Mounted {
    window: web::Window,
    document: web::Document,
    config: EffectsConfig,
    drivers: Vec<DriverRef>,
    alive: bool,
}

impl Mounted {
    fn driver(&self, name: &'static str) -> DriverRef {
        Driver::new(
            name,
            self.window.clone(),
            self.document.clone(),
            self.config.scroll_event.clone(),
        )
    }

    fn keep(&mut self, driver: DriverRef, mounted: bool) -> bool {
        if mounted {
            self.drivers.push(driver);
        }
        mounted
    }

    fn teardown(&mut self) {
        for driver in self.drivers.drain(..) {
            match driver.try_borrow_mut() {
                Ok(mut d) => d.unmount(),
                // Unmounted from inside one of this driver's own callbacks;
                // let the callback return before dropping its closures.
                Err(_) => spawn_local(async move { drop(driver) }),
            }
        }
        for id in [FIELD_CANVAS_ID, SCENE_CANVAS_ID] {
            dom::remove_element_by_id(&self.document, id);
        }
        self.alive = false;
    }
}

fn boxed<E: Effect + 'static>(
    mounted: Result<Option<E>, EffectError>,
) -> Result<Option<Box<dyn Effect>>, EffectError> {
    mounted.map(|effect| effect.map(|e| Box::new(e) as Box<dyn Effect>))
}

fn parse_config(config: &JsValue) -> EffectsConfig {
    if config.is_undefined() || config.is_null() {
        return EffectsConfig::default();
    }
    #[allow(deprecated)]
    match config.into_serde::<EffectsConfig>() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("invalid effects config, using defaults: {}", e);
            EffectsConfig::default()
        }
    }
}

/// Handle for the mounted effects. Construct once per page; call `unmount`
/// to remove every listener, frame and DOM node the effects added.
#[wasm_bindgen]
pub struct AmbientEffects {
    inner: Option<Rc<RefCell<Mounted>>>,
}

#[wasm_bindgen]
impl AmbientEffects {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> AmbientEffects {
        let config = parse_config(&config);
        let inner = match mount_all(config) {
            Ok(inner) => Some(inner),
            Err(e) => {
                log::error!("effects not mounted: {:?}", e);
                None
            }
        };
        AmbientEffects { inner }
    }

    pub fn unmount(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.borrow_mut().teardown();
            log::info!("effects unmounted");
        }
    }
}

impl Drop for AmbientEffects {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn mount_all(config: EffectsConfig) -> anyhow::Result<Rc<RefCell<Mounted>>> {
    let (window, document) =
        dom::window_document().ok_or_else(|| anyhow::anyhow!("no window/document"))?;

    let caps = Capabilities::detect(&probe::WebProbe::new(window.clone(), document.clone()));
    let plan = MountPlan::resolve(&caps, &config);
    log::info!(
        "[mount] particles={} scene={} cursor={} smooth_scroll={}",
        plan.particles,
        plan.scene,
        plan.cursor,
        config.smooth_scroll && !caps.reduced_motion
    );

    let viewport = dom::viewport(&window);
    let scroll = dom::scroll_metrics(&window, &document);
    let mounted = Rc::new(RefCell::new(Mounted {
        window: window.clone(),
        document: document.clone(),
        config: config.clone(),
        drivers: Vec::new(),
        alive: true,
    }));
    let mut m = mounted.borrow_mut();

    if plan.scroll {
        let driver = m.driver("scroll");
        let port = events::scroll::WebScrollPort::new(
            window.clone(),
            document.clone(),
            config.scroll_event.clone(),
        );
        let ok = Driver::mount_with(&driver, |host| {
            boxed(
                ScrollBroadcaster::mount(
                    host,
                    port,
                    config.smooth_scroll,
                    caps.reduced_motion,
                    config.header_offset_px,
                )
                .map(Some),
            )
        });
        m.keep(driver, ok);
    }

    if plan.particles {
        if let Err(e) = mount_field(&mut m, caps, viewport, scroll) {
            log::warn!("[field] not mounted: {:?}", e);
            dom::remove_element_by_id(&document, FIELD_CANVAS_ID);
        }
    }

    if plan.cursor {
        let driver = m.driver("cursor");
        let surface = overlay::DomCursor::new(document.clone());
        let ok = Driver::mount_with(&driver, |host| {
            boxed(CursorOverlay::mount(host, surface, caps))
        });
        m.keep(driver, ok);
    }

    if plan.scene {
        match dom::create_fixed_canvas(&document, SCENE_CANVAS_ID, SCENE_Z_INDEX, SCENE_OPACITY) {
            Ok(canvas) => {
                _ = canvas.style().set_property("display", "none");
                let progress = scroll.progress();
                let weak = Rc::downgrade(&mounted);
                spawn_local(async move {
                    if let Err(e) = mount_scene(weak, canvas, caps, progress).await {
                        log::warn!("[scene] not mounted: {:?}", e);
                    }
                });
            }
            Err(e) => log::warn!("[scene] no canvas: {:?}", e),
        }
    }

    drop(m);
    Ok(mounted)
}

fn mount_field(
    m: &mut Mounted,
    caps: Capabilities,
    viewport: ambient_core::Viewport,
    scroll: ambient_core::ScrollMetrics,
) -> anyhow::Result<()> {
    let canvas = dom::create_fixed_canvas(&m.document, FIELD_CANVAS_ID, FIELD_Z_INDEX, 1.0)?;
    let surface = canvas2d::CanvasSurface::new(canvas)?;
    let seed = m.config.seed.unwrap_or_else(rand::random);
    let page_visible = dom::page_visible(&m.document);
    let driver = m.driver("field");
    let ok = Driver::mount_with(&driver, |host| {
        boxed(
            FieldEffect::mount(host, surface, caps, viewport, scroll, page_visible, seed).map(Some),
        )
    });
    if !m.keep(driver, ok) {
        anyhow::bail!("field effect failed to mount");
    }
    Ok(())
}

async fn mount_scene(
    mounted: Weak<RefCell<Mounted>>,
    canvas: web::HtmlCanvasElement,
    caps: Capabilities,
    progress: f64,
) -> anyhow::Result<()> {
    let gpu = render::GpuScene::new(canvas.clone()).await;
    // The page may have unmounted while the adapter was being requested.
    let Some(mounted) = mounted.upgrade().filter(|m| m.borrow().alive) else {
        canvas.remove();
        return Ok(());
    };
    let gpu = match gpu {
        Ok(gpu) => gpu,
        Err(e) => {
            canvas.remove();
            return Err(e);
        }
    };
    let mut m = mounted.borrow_mut();
    let viewport = dom::viewport(&m.window);
    let driver = m.driver("scene");
    let ok = Driver::mount_with(&driver, |host| {
        boxed(SceneEffect::mount(host, gpu, caps, viewport, progress))
    });
    if !m.keep(driver, ok) {
        canvas.remove();
    }
    Ok(())
}
