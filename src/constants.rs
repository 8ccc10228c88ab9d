/// Page wiring and presentation constants for the web front-end.
///
/// Selectors and URLs must match `web/index.html`; colours are linear RGB.
pub const CANVAS_SELECTOR: &str = "canvas.webgl";
pub const TEXTURE_URL: &str = "./earth.jpg";

// Class toggled on each `.point` label while its marker faces the camera
pub const VISIBLE_CLASS: &str = "visible";

// Pointer events that end a drag; a cancelled touch or pen gesture counts
pub const DRAG_END_EVENTS: [&str; 2] = ["pointerup", "pointercancel"];

// Shown on the globe until the texture finishes decoding
pub const PLACEHOLDER_TEXEL: [u8; 4] = [255, 255, 255, 255];

// Page background behind the globe
pub const CLEAR_COLOR: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

// Shadow lookup tuning
pub const SHADOW_DEPTH_BIAS: f32 = 0.002;
