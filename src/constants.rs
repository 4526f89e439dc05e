/// DOM ids and layering for the nodes the effects insert.
///
/// Everything sits in fixed, pointer-transparent layers; the z-indices keep
/// the field behind the scene, and the cursor above page content.
pub const FIELD_CANVAS_ID: &str = "ambient-field";
pub const SCENE_CANVAS_ID: &str = "ambient-scene";
pub const CURSOR_ORB_ID: &str = "ambient-cursor";
pub const CURSOR_TRAIL_ID: &str = "ambient-cursor-trail";
pub const CURSOR_STYLE_ID: &str = "ambient-cursor-styles";

pub const FIELD_Z_INDEX: i32 = -2;
pub const SCENE_Z_INDEX: i32 = -1;
pub const CURSOR_Z_INDEX: i32 = 9999;
pub const CURSOR_TRAIL_Z_INDEX: i32 = 9998;

// Probe canvas contexts, most capable first
pub const GL_CONTEXT_NAMES: [&str; 3] = ["webgl2", "webgl", "experimental-webgl"];

// Scene lighting: direction toward the light (xyz) and intensity (w)
pub const KEY_LIGHT: [f32; 4] = [2.0, 3.0, 4.0, 1.1];
pub const FILL_LIGHT: [f32; 4] = [-3.0, -1.0, 2.0, 0.45];
