//! Per-frame marker occlusion and label placement.
//!
//! For each marker the engine projects its position to NDC, casts a ray from
//! the eye through that screen position, and compares the nearest hit against
//! the eye-to-marker distance. Labels are placed at the projected position,
//! expressed as a pixel offset from the centre of the viewport.
//!
//! Nothing is cached between frames: every call recomputes every marker from
//! the camera, the scene and the viewport it is given.

use crate::camera::PerspectiveCamera;
use crate::markers::Marker;
use crate::scene::Occluder;
use crate::viewport::Viewport;
use glam::{Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Occluded,
}

/// Visual state of one label for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerOverlay {
    pub visible: bool,
    /// Translation from the label's centred rest position, in CSS pixels.
    pub offset: Vec2,
}

impl MarkerOverlay {
    /// CSS `transform` value placing the label at `offset`.
    pub fn css_transform(&self) -> String {
        format!(
            "translateX({}px) translateY({}px)",
            self.offset.x, self.offset.y
        )
    }
}

/// Receives the overlay state of marker `index` once per frame.
pub trait OverlaySink {
    fn apply(&mut self, index: usize, overlay: &MarkerOverlay);
}

impl OverlaySink for Vec<MarkerOverlay> {
    fn apply(&mut self, index: usize, overlay: &MarkerOverlay) {
        if index >= self.len() {
            self.resize(index + 1, *overlay);
        }
        self[index] = *overlay;
    }
}

/// A marker is hidden only when something lies strictly closer to the eye
/// than the marker itself; a hit at exactly the marker's distance keeps it
/// visible.
#[inline]
pub fn classify(nearest_hit: Option<f32>, marker_distance: f32) -> Visibility {
    match nearest_hit {
        Some(d) if d < marker_distance => Visibility::Occluded,
        _ => Visibility::Visible,
    }
}

pub fn evaluate_marker<O: Occluder + ?Sized>(
    position: Vec3,
    camera: &PerspectiveCamera,
    occluder: &O,
    viewport: &Viewport,
) -> MarkerOverlay {
    let ndc = camera.project(position).truncate();
    let ray = camera.ray_through_ndc(ndc);
    let nearest = occluder.intersect(&ray).first().map(|h| h.distance);
    let visibility = classify(nearest, position.distance(camera.position));
    MarkerOverlay {
        visible: visibility == Visibility::Visible,
        offset: viewport.ndc_to_offset(ndc),
    }
}

/// Recomputes every marker's overlay and hands it to `sink`.
pub fn update_markers<O, S>(
    markers: &[Marker],
    camera: &PerspectiveCamera,
    occluder: &O,
    viewport: &Viewport,
    sink: &mut S,
) where
    O: Occluder + ?Sized,
    S: OverlaySink + ?Sized,
{
    for (i, marker) in markers.iter().enumerate() {
        let overlay = evaluate_marker(marker.position, camera, occluder, viewport);
        sink.apply(i, &overlay);
    }
}
