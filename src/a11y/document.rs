//! Rendered-document snapshot handed over by the embedding substrate.
//!
//! Elements are stored flat in document order; each refers to its parent by
//! index, and a parent always precedes its children.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::BreakpointId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub usize);

/// The subset of computed style the scanner reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComputedStyle {
    pub color: String,
    pub background_color: String,
    pub visibility: String,
    pub display: String,
    pub font_size: String,
    pub font_weight: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    pub tag: String,
    #[serde(default)]
    pub parent: Option<ElementId>,
    /// Text from the element's own text nodes; descendants are separate entries
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub style: ComputedStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    /// Canvas background when no element paints one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_background: Option<String>,
    #[serde(default)]
    pub elements: Vec<ElementSnapshot>,
}

impl DocumentSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_background(mut self, color: &str) -> Self {
        self.base_background = Some(color.to_string());
        self
    }

    /// Append an element and return its id.
    pub fn push(
        &mut self,
        tag: &str,
        parent: Option<ElementId>,
        text: &str,
        style: ComputedStyle,
    ) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(ElementSnapshot {
            tag: tag.to_string(),
            parent,
            text: text.to_string(),
            style,
            rect: None,
        });
        id
    }

    pub fn element(&self, id: ElementId) -> Option<&ElementSnapshot> {
        self.elements.get(id.0)
    }

    /// Parent of `id`, ignoring links that do not point backwards.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.element(id)?.parent.filter(|p| p.0 < id.0)
    }

    /// Ancestors from nearest outward.
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

pub struct Ancestors<'a> {
    doc: &'a DocumentSnapshot,
    next: Option<ElementId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("document of viewport {0} is not accessible")]
pub struct AccessDenied(pub BreakpointId);

/// Access to the rendered content of embedded viewports.
pub trait RenderSubstrate {
    /// Fails for cross-origin content.
    fn try_snapshot_document(&mut self, viewport: &BreakpointId) -> Result<DocumentSnapshot, AccessDenied>;
    /// Visually mark an element that failed the contrast check.
    fn outline_element(&mut self, viewport: &BreakpointId, element: ElementId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ancestors_walk_outward() {
        let mut doc = DocumentSnapshot::new();
        let html = doc.push("html", None, "", ComputedStyle::default());
        let body = doc.push("body", Some(html), "", ComputedStyle::default());
        let p = doc.push("p", Some(body), "hi", ComputedStyle::default());
        assert_eq!(doc.ancestors(p).collect::<Vec<_>>(), vec![body, html]);
        assert_eq!(doc.ancestors(html).count(), 0);
    }

    #[test]
    fn test_forward_parent_links_are_ignored() {
        let mut doc = DocumentSnapshot::new();
        let a = doc.push("div", Some(ElementId(1)), "", ComputedStyle::default());
        doc.push("div", Some(a), "", ComputedStyle::default());
        assert_eq!(doc.parent(a), None);
    }

    #[test]
    fn test_deserializes_camel_case_snapshot() {
        let doc: DocumentSnapshot = serde_json::from_str(
            r#"{
                "baseBackground": "rgb(255, 255, 255)",
                "elements": [
                    {"tag": "body", "style": {"backgroundColor": "rgba(0, 0, 0, 0)"}},
                    {"tag": "p", "parent": 0, "text": "Hello", "style": {"color": "rgb(0, 0, 0)", "fontSize": "16px"}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.elements[1].parent, Some(ElementId(0)));
        assert_eq!(doc.elements[1].style.font_size, "16px");
        assert_eq!(doc.elements[0].style.background_color, "rgba(0, 0, 0, 0)");
    }
}
