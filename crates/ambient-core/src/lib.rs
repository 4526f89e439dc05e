//! Platform-free core of the ambient effects engine.
//!
//! Every module here is driven through the [`host::Host`] trait and a small
//! surface trait, so the same state machines run against the browser in
//! `ambient-web` and against mocks in the host-side tests.

pub mod capability;
pub mod config;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod field;
pub mod host;
pub mod math;
pub mod mesh;
pub mod particles;
pub mod pointer;
pub mod scene;
pub mod scroll;
pub mod state;

pub use capability::*;
pub use config::*;
pub use error::*;
pub use host::*;
pub use scroll::{ScrollMetrics, ScrollSignal};
pub use state::*;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../../../shaders/scene.wgsl");
