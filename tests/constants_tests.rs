// Host-side tests for page constants and their relationship to the core.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;
use globe_core::constants::{GLOBE_RADIUS, MAX_PIXEL_RATIO, SHADOW_FAR, SHADOW_NEAR};
use globe_core::EUROPE;

#[test]
fn selectors_match_the_page() {
    let html = include_str!("../web/index.html");
    assert!(CANVAS_SELECTOR.starts_with("canvas."));
    assert!(html.contains(r#"<canvas class="webgl">"#));
    for m in &EUROPE {
        let class = m.selector.trim_start_matches('.');
        assert!(html.contains(&format!("point {class}\"")), "no element for {}", m.label);
    }
    let css = include_str!("../web/style.css");
    assert!(css.contains(&format!(".point.{VISIBLE_CLASS}")));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn presentation_values_are_in_range() {
    assert!(TEXTURE_URL.ends_with(".jpg"));
    assert_eq!(PLACEHOLDER_TEXEL[3], 255);
    assert!(CLEAR_COLOR.iter().all(|c| (0.0..=1.0).contains(c)));
    assert!(SHADOW_DEPTH_BIAS > 0.0 && SHADOW_DEPTH_BIAS < 0.01);
}

#[test]
fn cancelled_pointer_ends_a_drag() {
    assert!(DRAG_END_EVENTS.contains(&"pointerup"));
    assert!(DRAG_END_EVENTS.contains(&"pointercancel"));
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn globe_fits_inside_the_shadow_camera() {
    // the sun sits at distance ~8.7 looking at the origin
    let sun = globe_core::constants::sun_position().length();
    assert!(sun - GLOBE_RADIUS > SHADOW_NEAR);
    assert!(sun + GLOBE_RADIUS < SHADOW_FAR);
    assert_eq!(MAX_PIXEL_RATIO, 2.0);
}
