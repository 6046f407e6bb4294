//! Text contrast scanning over rendered viewport documents.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use serde::Serialize;

use super::color::{parse_color, Rgb};
use super::contrast::{
    classify, contrast_ratio, is_large_text, parse_font_size, parse_font_weight, ContrastLevel,
};
use super::document::{DocumentSnapshot, ElementId, ElementSnapshot, Rect, RenderSubstrate};
use crate::session::BreakpointId;

/// Font size assumed when the computed value is missing
const FALLBACK_FONT_SIZE_PX: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    /// Elements visited per document, in document order
    pub max_elements: usize,
    /// Longer text runs are skipped
    pub max_text_chars: usize,
    /// Issue samples are cut to this many characters
    pub sample_chars: usize,
    /// Ancestors included in an issue path
    pub path_depth: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_elements: 1500,
            max_text_chars: 200,
            sample_chars: 80,
            path_depth: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastIssue {
    pub sample_text: String,
    pub foreground: Rgb,
    pub background: Rgb,
    pub ratio: f64,
    pub level: ContrastLevel,
    pub locator_path: String,
    #[serde(skip)]
    pub element: ElementId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Rect>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Elements whose contrast was judged
    pub scanned: usize,
    pub passed: usize,
    pub failed: usize,
    pub elapsed_ms: f64,
    pub issues: Vec<ContrastIssue>,
}

#[derive(Debug, Clone, Default)]
pub struct ContrastScanner {
    limits: ScanLimits,
}

impl ContrastScanner {
    pub fn new(limits: ScanLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> ScanLimits {
        self.limits
    }

    /// Scan each viewport in turn. Inaccessible viewports get no entry.
    pub fn scan(
        &self,
        viewports: &[BreakpointId],
        substrate: &mut dyn RenderSubstrate,
    ) -> BTreeMap<BreakpointId, ScanReport> {
        let mut reports = BTreeMap::new();
        for id in viewports {
            let doc = match substrate.try_snapshot_document(id) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::debug!(viewport = %id, error = %e, "Skipping viewport");
                    continue;
                }
            };
            let report = self.scan_document(&doc);
            for issue in &report.issues {
                substrate.outline_element(id, issue.element);
            }
            tracing::debug!(
                viewport = %id,
                scanned = report.scanned,
                failed = report.failed,
                elapsed_ms = report.elapsed_ms,
                "Contrast scan finished"
            );
            reports.insert(id.clone(), report);
        }
        reports
    }

    pub fn scan_document(&self, doc: &DocumentSnapshot) -> ScanReport {
        let started = Instant::now();
        let mut report = ScanReport::default();
        let mut positions: Option<SiblingPositions> = None;

        for (index, element) in doc.elements.iter().enumerate().take(self.limits.max_elements) {
            let id = ElementId(index);
            let Some(text) = self.judged_text(element) else {
                continue;
            };
            let Some(foreground) = parse_color(&element.style.color).map(|c| c.rgb) else {
                continue;
            };
            let Some(background) = resolve_background(doc, id) else {
                continue;
            };

            let ratio = contrast_ratio(foreground, background);
            let font_size = parse_font_size(&element.style.font_size).unwrap_or(FALLBACK_FONT_SIZE_PX);
            let large = is_large_text(font_size, parse_font_weight(&element.style.font_weight));
            let level = classify(ratio, large);

            report.scanned += 1;
            if !level.is_fail() {
                report.passed += 1;
                continue;
            }

            report.failed += 1;
            let siblings = positions.get_or_insert_with(|| SiblingPositions::compute(doc));
            report.issues.push(ContrastIssue {
                sample_text: sample(text, self.limits.sample_chars),
                foreground,
                background,
                ratio,
                level,
                locator_path: locator_path(doc, id, self.limits.path_depth, siblings),
                element: id,
                bounds: element.rect,
            });
        }

        report.elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        report
    }

    fn judged_text<'a>(&self, element: &'a ElementSnapshot) -> Option<&'a str> {
        let style = &element.style;
        if style.visibility.trim() == "hidden" || style.display.trim() == "none" {
            return None;
        }
        let text = element.text.trim();
        if text.is_empty() || text.chars().count() > self.limits.max_text_chars {
            return None;
        }
        Some(text)
    }
}

/// First painted background from the element outward, else the canvas.
///
/// `None` when a background on the way cannot be parsed.
fn resolve_background(doc: &DocumentSnapshot, id: ElementId) -> Option<Rgb> {
    for current in std::iter::once(id).chain(doc.ancestors(id)) {
        let raw = doc.element(current)?.style.background_color.trim();
        if raw.is_empty() {
            continue;
        }
        let color = parse_color(raw)?;
        if !color.is_transparent() {
            return Some(color.rgb);
        }
    }
    match doc.base_background.as_deref().map(str::trim) {
        None | Some("") => Some(Rgb::WHITE),
        Some(raw) => {
            let color = parse_color(raw)?;
            Some(if color.is_transparent() {
                Rgb::WHITE
            } else {
                color.rgb
            })
        }
    }
}

/// Same-tag sibling index (1-based) and count for every element.
struct SiblingPositions {
    index: Vec<usize>,
    counts: HashMap<(Option<ElementId>, String), usize>,
}

impl SiblingPositions {
    fn compute(doc: &DocumentSnapshot) -> Self {
        let mut counts: HashMap<(Option<ElementId>, String), usize> = HashMap::new();
        let mut index = Vec::with_capacity(doc.len());
        for (i, element) in doc.elements.iter().enumerate() {
            let key = (doc.parent(ElementId(i)), element.tag.to_ascii_lowercase());
            let count = counts.entry(key).or_insert(0);
            *count += 1;
            index.push(*count);
        }
        Self { index, counts }
    }

    fn segment(&self, doc: &DocumentSnapshot, id: ElementId) -> String {
        let Some(element) = doc.element(id) else {
            return String::new();
        };
        let tag = element.tag.to_ascii_lowercase();
        let siblings = self
            .counts
            .get(&(doc.parent(id), tag.clone()))
            .copied()
            .unwrap_or(1);
        if siblings > 1 {
            let nth = self.index.get(id.0).copied().unwrap_or(1);
            format!("{tag}:nth-of-type({nth})")
        } else {
            tag
        }
    }
}

fn locator_path(
    doc: &DocumentSnapshot,
    id: ElementId,
    depth: usize,
    positions: &SiblingPositions,
) -> String {
    let mut chain: Vec<ElementId> = std::iter::once(id)
        .chain(doc.ancestors(id).take(depth))
        .collect();
    chain.reverse();
    chain
        .into_iter()
        .map(|el| positions.segment(doc, el))
        .collect::<Vec<_>>()
        .join(" > ")
}

fn sample(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(max_chars).collect()
}
