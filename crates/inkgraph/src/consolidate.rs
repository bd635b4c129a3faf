//! Grouping of detector regions and OCR lines into diagrams and paragraphs.
//!
//! Consolidation runs in three steps:
//!
//! 1. Structural (non-text) regions are clustered into [`DiagramGroup`]s:
//!    two regions are linked when their boxes intersect or lie within the
//!    diagram proximity, and each connected component becomes one group.
//! 2. Each OCR line is attached to the first group, in group order, whose
//!    current box it intersects or lies within the attach proximity of. The
//!    group box grows with every attachment, so attachment is order-sensitive.
//! 3. Lines left over are merged into [`TextParagraph`]s in reading order.
//!
//! Groups are ordered by their smallest member index, and members keep the
//! order in which they were supplied.

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::unionfind::UnionFind;
use serde::Serialize;

use inkgraph_core::{
    geometry::{Bounds, union_all},
    region::{ConsolidatedRegion, DiagramElement, DiagramGroup, Region, TextLine, TextParagraph},
};

use crate::config::ConsolidationConfig;

/// The consolidated view of one page, serialized as `{"regions": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Consolidation {
    regions: Vec<ConsolidatedRegion>,
}

impl Consolidation {
    /// Diagram groups first, then paragraphs.
    pub fn regions(&self) -> &[ConsolidatedRegion] {
        &self.regions
    }

    /// Iterates over the diagram groups.
    pub fn diagrams(&self) -> impl Iterator<Item = &DiagramGroup> {
        self.regions.iter().filter_map(|region| match region {
            ConsolidatedRegion::Diagram(group) => Some(group),
            ConsolidatedRegion::Paragraph(_) => None,
        })
    }

    /// Iterates over the text paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &TextParagraph> {
        self.regions.iter().filter_map(|region| match region {
            ConsolidatedRegion::Paragraph(paragraph) => Some(paragraph),
            ConsolidatedRegion::Diagram(_) => None,
        })
    }

    /// Total number of input primitives accounted for.
    pub fn member_count(&self) -> usize {
        self.regions.iter().map(ConsolidatedRegion::member_count).sum()
    }
}

/// Groups regions and OCR lines into diagrams and paragraphs.
#[derive(Debug, Clone, Default)]
pub struct RegionConsolidator {
    config: ConsolidationConfig,
}

impl RegionConsolidator {
    pub fn new(config: ConsolidationConfig) -> Self {
        Self { config }
    }

    /// Consolidates detector regions and OCR lines.
    ///
    /// Detector regions of a textual kind are ignored: text comes from the
    /// OCR lines. Empty input on either side yields a partial result.
    pub fn consolidate(&self, regions: &[Region], lines: &[TextLine]) -> Consolidation {
        let structural: Vec<&Region> = regions.iter().filter(|r| !r.kind().is_textual()).collect();

        let mut groups = self.cluster(&structural);
        let remaining = self.attach_text(&mut groups, lines);
        let paragraphs = self.paragraphs(remaining);

        debug!(
            structural = structural.len(),
            lines = lines.len(),
            diagrams = groups.len(),
            paragraphs = paragraphs.len();
            "Consolidated regions"
        );

        let regions = groups
            .into_iter()
            .map(ConsolidatedRegion::Diagram)
            .chain(paragraphs.into_iter().map(ConsolidatedRegion::Paragraph))
            .collect();
        Consolidation { regions }
    }

    /// Step 1: connected components of the proximity graph.
    fn cluster(&self, structural: &[&Region]) -> Vec<DiagramGroup> {
        let threshold = self.config.diagram_proximity();
        let mut components = UnionFind::new(structural.len());
        for i in 0..structural.len() {
            for j in (i + 1)..structural.len() {
                if structural[i]
                    .bounds()
                    .is_near(&structural[j].bounds(), threshold)
                {
                    components.union(i, j);
                }
            }
        }

        // Keyed by root, in order of each component's first member.
        let mut members: IndexMap<usize, Vec<DiagramElement>> = IndexMap::new();
        for (i, region) in structural.iter().enumerate() {
            members
                .entry(components.find(i))
                .or_default()
                .push(DiagramElement::Structure((*region).clone()));
        }

        members
            .into_values()
            .filter_map(DiagramGroup::from_elements)
            .collect()
    }

    /// Step 2: attaches lines to groups and returns the lines left over.
    fn attach_text<'a>(
        &self,
        groups: &mut [DiagramGroup],
        lines: &'a [TextLine],
    ) -> Vec<&'a TextLine> {
        let threshold = self.config.text_attach_proximity();
        let mut remaining = Vec::new();

        for line in lines {
            let target = groups
                .iter_mut()
                .enumerate()
                .find(|(_, group)| line.bounds().is_near(&group.bounds(), threshold));
            match target {
                Some((index, group)) => {
                    trace!(group = index, text = line.text(); "Attached text line");
                    group.attach(DiagramElement::Text(line.clone()));
                }
                None => remaining.push(line),
            }
        }

        remaining
    }

    /// Step 3: greedy paragraph building over lines sorted by top edge.
    fn paragraphs(&self, mut lines: Vec<&TextLine>) -> Vec<TextParagraph> {
        lines.sort_by_key(|line| line.bounds().min_y());

        let mut paragraphs = Vec::new();
        let mut current: Vec<&TextLine> = Vec::new();

        for line in lines {
            let continues = current
                .last()
                .is_some_and(|prev| self.continues_paragraph(prev.bounds(), line.bounds()));
            if !continues && !current.is_empty() {
                paragraphs.extend(merge_lines(&mut current));
                current.clear();
            }
            current.push(line);
        }
        paragraphs.extend(merge_lines(&mut current));

        paragraphs
    }

    fn continues_paragraph(&self, prev: Bounds, curr: Bounds) -> bool {
        let gap = curr.min_y() - prev.max_y();
        let aligned = prev.horizontal_overlap(&curr) > 0
            || (curr.min_x() - prev.min_x()).abs() < self.config.paragraph_left_alignment();
        gap < self.config.paragraph_gap() && aligned
    }
}

/// Merges a run of lines into one paragraph, text in reading order.
fn merge_lines(lines: &mut [&TextLine]) -> Option<TextParagraph> {
    let bounds = union_all(lines.iter().map(|line| line.bounds()))?;
    lines.sort_by_key(|line| (line.bounds().min_y(), line.bounds().min_x()));
    let text = lines
        .iter()
        .map(|line| line.text())
        .collect::<Vec<_>>()
        .join(" ");
    Some(TextParagraph::new(bounds, text, lines.len()))
}
