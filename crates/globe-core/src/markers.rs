use glam::Vec3;

/// A labelled point just above the globe surface. `selector` names the HTML
/// element that carries its label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub label: &'static str,
    pub position: Vec3,
    pub selector: &'static str,
}

impl Marker {
    pub const fn new(label: &'static str, position: [f32; 3], selector: &'static str) -> Self {
        Self {
            label,
            position: Vec3::from_array(position),
            selector,
        }
    }
}

/// Capitals shown on the page, in world space of the rotated globe.
pub static EUROPE: [Marker; 9] = [
    Marker::new("Netherlands", [1.039, 1.599, 0.639], ".point-0"),
    Marker::new("Belgium", [1.047_433_6, 1.575_982_8, 0.654_116_4], ".point-1"),
    Marker::new("Germany", [1.085, 1.567, 0.627], ".point-2"),
    Marker::new("Austria", [1.242_640_4, 1.474_155_3, 0.574_322_8], ".point-3"),
    Marker::new("Sweden", [0.957_581_4, 1.732_307_5, 0.338_988_36], ".point-4"),
    Marker::new("Finland", [0.922_552_74, 1.776_733_7, 0.157_355_94], ".point-5"),
    Marker::new("Norway", [0.860_018_5, 1.756_544, 0.453_291_7], ".point-6"),
    Marker::new("Denmark", [1.013_343_6, 1.667_372, 0.504_723_2], ".point-7"),
    Marker::new("UK", [0.936_926, 1.621_198_4, 0.712_755], ".point-8"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GLOBE_RADIUS;

    #[test]
    fn markers_sit_just_outside_the_globe() {
        for m in &EUROPE {
            let r = m.position.length();
            assert!(r >= GLOBE_RADIUS && r < GLOBE_RADIUS * 1.02, "{} at r={r}", m.label);
        }
    }

    #[test]
    fn selectors_are_unique_and_indexed() {
        for (i, m) in EUROPE.iter().enumerate() {
            assert_eq!(m.selector, format!(".point-{i}"));
        }
    }
}
