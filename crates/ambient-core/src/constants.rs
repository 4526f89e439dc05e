// Shared tuning constants for the ambient effects.
//
// Values are tuned by eye against the site's design; keep them together so the
// per-frame code stays free of magic numbers.

// ---------------- Particle field ----------------

// Particle count: area divisor and [min, max] per device class
pub const FULL_AREA_PER_PARTICLE: f32 = 18_000.0;
pub const FULL_MIN_PARTICLES: usize = 90;
pub const FULL_MAX_PARTICLES: usize = 220;
pub const REDUCED_AREA_PER_PARTICLE: f32 = 26_000.0;
pub const REDUCED_MIN_PARTICLES: usize = 45;
pub const REDUCED_MAX_PARTICLES: usize = 100;
pub const COARSE_AREA_PER_PARTICLE: f32 = 60_000.0;
pub const COARSE_MIN_PARTICLES: usize = 25;
pub const COARSE_MAX_PARTICLES: usize = 40;

// Color roll thresholds (uniform roll in [0, 1))
pub const ACCENT_CHANCE: f32 = 0.08;
pub const MUTED_CHANCE: f32 = 0.30;

// Per-particle random ranges
pub const DRIFT_SPAN: f32 = 0.1; // drift in [-span/2, span/2] px/frame
pub const RADIUS_MIN: f32 = 1.25;
pub const RADIUS_SPAN: f32 = 1.55;
pub const OPACITY_MIN: f32 = 0.45;
pub const OPACITY_SPAN: f32 = 0.45;
pub const DEPTH_MIN: f32 = 0.2;
pub const DEPTH_SPAN: f32 = 0.8;

// Smoothing factors applied once per frame
pub const SCROLL_LERP: f32 = 0.1;
pub const MOUSE_LERP: f32 = 0.1;
pub const INFLUENCE_DECAY_LERP: f32 = 0.08;
pub const DRIFT_RELAX_LERP: f32 = 0.02;
pub const INFLUENCE_MIN: f32 = 0.01; // below this the pointer exerts no force

// Parallax amplitudes (CSS px)
pub const SCROLL_AMPLITUDE_X: f32 = 18.0;
pub const SCROLL_AMPLITUDE_Y: f32 = 40.0;
pub const MOUSE_AMPLITUDE: f32 = 8.0;

// Physics
pub const WRAP_MARGIN: f32 = 18.0;
pub const REPULSE_RADIUS: f32 = 170.0;
pub const REPULSE_FORCE: f32 = 0.22;
pub const REPULSE_DEPTH_BIAS: f32 = 0.65;
pub const MAX_SPEED: f32 = 0.22; // px/frame, per axis

// Connection lines
pub const LINK_DISTANCE_FACTOR: f32 = 0.17; // of min(viewport w, h)
pub const LINK_DISTANCE_MIN: f32 = 110.0;
pub const LINK_DISTANCE_MAX: f32 = 156.0;
pub const LINK_ALPHA_SCALE: f32 = 0.22;
pub const LINK_ALPHA_MIN: f32 = 0.008;
pub const LINK_ALPHA_MAX: f32 = 0.18;
pub const ACCENT_LINK_ALPHA_MAX: f32 = 0.13;
pub const MUTED_LINK_TINT: f32 = 0.9;
pub const LINK_WIDTH_BASE: f32 = 0.45;
pub const LINK_WIDTH_SPAN: f32 = 0.35;

// Glow halos (animated mode only)
pub const ACCENT_GLOW_SCALE: f32 = 1.75;
pub const MUTED_GLOW_SCALE: f32 = 1.5;

// Backing store DPR cap for the 2D canvas
pub const FIELD_DPR_CAP: f32 = 1.25;

// ---------------- Scroll broadcaster ----------------

pub const HEADER_OFFSET_PX: f64 = -80.0; // anchor targets land below the fixed header
pub const SCROLL_ANIMATION_SEC: f64 = 1.1;
pub const SCROLL_EVENT_NAME: &str = "ambient:scroll";
// reported offsets further than this from the last one we set are user input
pub const USER_SCROLL_TOLERANCE_PX: f64 = 2.0;
// DOM_DELTA_LINE wheel events are scaled by this
pub const WHEEL_LINE_HEIGHT_PX: f64 = 100.0 / 6.0;

// ---------------- Parallax scene ----------------

pub const SCENE_DPR_CAP: f32 = 1.5;
pub const SCENE_OPACITY: f32 = 0.56;
pub const SCENE_MAX_DT_SEC: f32 = 0.1;

// Camera
pub const CAMERA_Z: f32 = 4.8;
pub const CAMERA_FOV_DEG: f32 = 35.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 20.0;

// Sculpture damping rates (1/s)
pub const SCULPTURE_PROGRESS_RATE: f32 = 4.8;
pub const SCULPTURE_ROT_Y_RATE: f32 = 5.2;
pub const SCULPTURE_ROT_X_RATE: f32 = 4.8;
pub const SCULPTURE_POS_RATE: f32 = 4.6;

// Sculpture rest pose and travel
pub const SCULPTURE_REST: [f32; 2] = [1.22, 0.04];
pub const SCULPTURE_TILT_X: f32 = -0.08;
pub const BREATHING_FREQ: f32 = 0.24;
pub const BREATHING_AMPLITUDE: f32 = 0.02;

// Free-spinning rings (rad/s)
pub const RING_PRIMARY_SPIN: f32 = 0.08;
pub const RING_SECONDARY_SPIN: f32 = -0.05;

// Ship damping rates (1/s)
pub const SHIP_PROGRESS_RATE: f32 = 4.6;
pub const SHIP_POSITION_RATE: f32 = 5.0;
pub const SHIP_BANK_RATE: f32 = 5.2;
pub const SHIP_PITCH_RATE: f32 = 4.2;

pub const SHIP_LOOK_AHEAD: f32 = 0.035; // phase offset for the heading probe
pub const SHIP_BANK_GAIN: f32 = 0.55;
pub const SHIP_BANK_LIMIT: f32 = 0.28;
pub const SHIP_SCALE: f32 = 0.33;
