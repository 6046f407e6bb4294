//! Document snapshot fixtures.

use std::collections::HashMap;

use breakpoint::a11y::{AccessDenied, ComputedStyle, DocumentSnapshot, ElementId, RenderSubstrate};
use breakpoint::session::BreakpointId;

pub fn styled(color: &str, background: &str) -> ComputedStyle {
    ComputedStyle {
        color: color.to_string(),
        background_color: background.to_string(),
        font_size: "16px".to_string(),
        font_weight: "400".to_string(),
        ..ComputedStyle::default()
    }
}

/// A page with two readable paragraphs and one faint caption.
pub fn article() -> DocumentSnapshot {
    let mut doc = DocumentSnapshot::new().with_base_background("rgb(255, 255, 255)");
    let transparent = "rgba(0, 0, 0, 0)";
    let html = doc.push("html", None, "", styled("rgb(0, 0, 0)", transparent));
    let body = doc.push("body", Some(html), "", styled("rgb(0, 0, 0)", transparent));
    let main = doc.push("main", Some(body), "", styled("rgb(0, 0, 0)", transparent));
    doc.push("p", Some(main), "First paragraph.", styled("rgb(0, 0, 0)", transparent));
    doc.push("p", Some(main), "Second paragraph.", styled("#333333", transparent));
    doc.push("small", Some(main), "Photo credit", styled("#cccccc", transparent));
    doc
}

/// Serves fixed documents; viewports without one are cross-origin.
#[derive(Default)]
pub struct FixtureSubstrate {
    documents: HashMap<BreakpointId, DocumentSnapshot>,
    pub outlined: Vec<(BreakpointId, ElementId)>,
}

impl FixtureSubstrate {
    pub fn with_document(mut self, id: &BreakpointId, doc: DocumentSnapshot) -> Self {
        self.documents.insert(id.clone(), doc);
        self
    }
}

impl RenderSubstrate for FixtureSubstrate {
    fn try_snapshot_document(&mut self, viewport: &BreakpointId) -> Result<DocumentSnapshot, AccessDenied> {
        self.documents
            .get(viewport)
            .cloned()
            .ok_or_else(|| AccessDenied(viewport.clone()))
    }

    fn outline_element(&mut self, viewport: &BreakpointId, element: ElementId) {
        self.outlined.push((viewport.clone(), element));
    }
}
