use crate::constants::VISIBLE_CLASS;
use globe_core::{GlobeError, Marker, MarkerOverlay, OverlaySink};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Writes marker overlays to their `.point-N` label elements.
///
/// Markers whose element is absent from the page are reported once when
/// binding and skipped on every frame after that.
pub struct DomOverlaySink {
    elements: Vec<Option<web::HtmlElement>>,
}

impl DomOverlaySink {
    pub fn bind(document: &web::Document, markers: &[Marker]) -> Self {
        let elements = markers
            .iter()
            .map(|m| {
                let el = document
                    .query_selector(m.selector)
                    .ok()
                    .flatten()
                    .and_then(|el| el.dyn_into::<web::HtmlElement>().ok());
                if el.is_none() {
                    let err = GlobeError::MissingOverlay {
                        label: m.label,
                        selector: m.selector,
                    };
                    log::warn!("[overlay] {err}");
                }
                el
            })
            .collect::<Vec<_>>();
        log::info!(
            "[overlay] bound {}/{} labels",
            elements.iter().filter(|e| e.is_some()).count(),
            markers.len()
        );
        Self { elements }
    }
}

impl OverlaySink for DomOverlaySink {
    fn apply(&mut self, index: usize, overlay: &MarkerOverlay) {
        let Some(Some(el)) = self.elements.get(index) else {
            return;
        };
        let classes = el.class_list();
        if overlay.visible {
            _ = classes.add_1(VISIBLE_CLASS);
        } else {
            _ = classes.remove_1(VISIBLE_CLASS);
        }
        _ = el
            .style()
            .set_property("transform", &overlay.css_transform());
    }
}
