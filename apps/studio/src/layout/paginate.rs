//! Pagination: flows a `LayoutTree` onto fixed-size pages as absolute draw
//! operations.
//!
//! Coordinates are PDF points measured from the top-left corner of the page;
//! the PDF painter flips the y axis. The header is placed on the first page
//! only. Each column then flows independently from below the header, breaking
//! onto continuation pages that start at the top margin.
//!
//! Break rules:
//! - an item that does not fit in the remaining space moves to the next page
//!   whole when it would fit on an empty page; otherwise it is split line by
//!   line
//! - a section heading always travels with the first line of its first item,
//!   so a heading is never the last thing on a page

use tracing::debug;

use crate::errors::StudioError;
use crate::layout::font_metrics::FontFace;
use crate::layout::tree::{
    Chip, HeaderAlignment, HeaderBlock, Heading, ItemBlock, LayoutTree, PageGeometry, Rgb, Row,
    SectionBlock, SkillIndicator, TextRun, TextStyle,
};

/// Ascender height as a share of the font size, used to place baselines.
const ASCENT: f32 = 0.8;
const ROW_GAP_PT: f32 = 2.0;
const SPLIT_GAP_PT: f32 = 8.0;
const CHIP_ROW_GAP_PT: f32 = 4.0;
const BAR_GAP_PT: f32 = 4.0;
const MARKER_PT: f32 = 6.0;
const RULE_GAP_PT: f32 = 3.0;
const HEADING_GAP_PT: f32 = 8.0;
const RAIL_WIDTH_PT: f32 = 2.0;
/// Share of the content width given to the name block of a split header.
const SPLIT_HEADER_LEFT: f32 = 0.6;
const EPSILON: f32 = 0.01;

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// One line of text; `baseline` is measured from the page top.
    Text {
        x: f32,
        baseline: f32,
        text: String,
        face: FontFace,
        size_pt: f32,
        color: Rgb,
    },
    /// Filled rectangle; `y` is the top edge.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb,
    },
}

impl DrawOp {
    fn translated(&self, dx: f32, dy: f32) -> DrawOp {
        let mut op = self.clone();
        match &mut op {
            DrawOp::Text { x, baseline, .. } => {
                *x += dx;
                *baseline += dy;
            }
            DrawOp::Rect { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            DrawOp::Line { x1, y1, x2, y2, .. } => {
                *x1 += dx;
                *x2 += dx;
                *y1 += dy;
                *y2 += dy;
            }
        }
        op
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagedDocument {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl PagedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Index of the first page showing exactly `text` as one line.
    pub fn page_of(&self, text: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.texts().any(|t| t == text))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

pub fn paginate(tree: &LayoutTree) -> Result<PagedDocument, StudioError> {
    let geometry = tree.page;
    if geometry.content_width() <= 0.0 || geometry.content_height() <= 0.0 {
        return Err(StudioError::Layout(format!(
            "page {}x{}pt with {}pt margins has no content area",
            geometry.width_pt, geometry.height_pt, geometry.margin_pt
        )));
    }

    let mut pages = vec![Page::default()];
    let body_top = place_header(&tree.header, &geometry, &mut pages[0]);
    let bottom = geometry.height_pt - geometry.margin_pt;
    if body_top >= bottom {
        return Err(StudioError::Layout(format!(
            "header needs {body_top:.1}pt, page body ends at {bottom:.1}pt"
        )));
    }

    let gaps = geometry.column_gap_pt * tree.columns.len().saturating_sub(1) as f32;
    let available = geometry.content_width() - gaps;
    let mut x = geometry.margin_pt;
    for column in &tree.columns {
        let width = available * column.width_fraction;
        let mut flow = ColumnFlow {
            x,
            width,
            y: body_top,
            page: 0,
            first_top: body_top,
            top: geometry.margin_pt,
            bottom,
        };
        for section in &column.sections {
            flow.place_section(section, &mut pages);
        }
        x += width + geometry.column_gap_pt;
    }

    debug!(
        template = %tree.template,
        pages = pages.len(),
        "Paginated layout"
    );
    Ok(PagedDocument { geometry, pages })
}

// ────────────────────────────────────────────────────────────────────────────
// Fragments: atomic vertical units with ops relative to their own top-left
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct Fragment {
    height: f32,
    ops: Vec<DrawOp>,
}

fn measure(text: &str, style: &TextStyle) -> f32 {
    FontFace::for_style(style)
        .metrics()
        .measure_pt(text, style.size_pt)
}

fn wrap(text: &str, style: &TextStyle, width: f32) -> Vec<String> {
    FontFace::for_style(style)
        .metrics()
        .wrap(text, style.size_pt, width)
}

fn baseline_offset(style: &TextStyle) -> f32 {
    (style.line_advance() - style.size_pt) / 2.0 + style.size_pt * ASCENT
}

fn text_op(x: f32, line_top: f32, text: impl Into<String>, style: &TextStyle) -> DrawOp {
    DrawOp::Text {
        x,
        baseline: line_top + baseline_offset(style),
        text: text.into(),
        face: FontFace::for_style(style),
        size_pt: style.size_pt,
        color: style.color,
    }
}

fn line_fragments(run: &TextRun, x: f32, width: f32) -> Vec<Fragment> {
    wrap(&run.text, &run.style, width)
        .into_iter()
        .map(|line| Fragment {
            height: run.style.line_advance(),
            ops: if line.is_empty() {
                Vec::new()
            } else {
                vec![text_op(x, 0.0, line, &run.style)]
            },
        })
        .collect()
}

fn split_fragments(left: &TextRun, right: Option<&TextRun>, width: f32) -> Vec<Fragment> {
    let Some(right) = right else {
        return line_fragments(left, 0.0, width);
    };
    let right_width = measure(&right.text, &right.style);
    let left_width = (width - right_width - SPLIT_GAP_PT).max(width * 0.4);

    let mut fragments = line_fragments(left, 0.0, left_width);
    if fragments.is_empty() {
        fragments.push(Fragment::default());
    }
    let first = &mut fragments[0];
    let baseline = first
        .ops
        .first()
        .and_then(|op| match op {
            DrawOp::Text { baseline, .. } => Some(*baseline),
            _ => None,
        })
        .unwrap_or_else(|| baseline_offset(&right.style));
    first.height = first.height.max(right.style.line_advance());
    first.ops.push(DrawOp::Text {
        x: (width - right_width).max(0.0),
        baseline,
        text: right.text.clone(),
        face: FontFace::for_style(&right.style),
        size_pt: right.style.size_pt,
        color: right.style.color,
    });
    fragments
}

fn indicator_fragments(indicator: &SkillIndicator, width: f32) -> Vec<Fragment> {
    let mut fragments = split_fragments(&indicator.label, Some(&indicator.level), width);
    let mut bar = vec![DrawOp::Rect {
        x: 0.0,
        y: 1.0,
        width,
        height: indicator.bar_height_pt,
        color: indicator.track,
    }];
    let filled = width * indicator.proportion.clamp(0.0, 1.0);
    if filled > 0.0 {
        bar.push(DrawOp::Rect {
            x: 0.0,
            y: 1.0,
            width: filled,
            height: indicator.bar_height_pt,
            color: indicator.fill,
        });
    }
    fragments.push(Fragment {
        height: indicator.bar_height_pt + BAR_GAP_PT,
        ops: bar,
    });
    fragments
}

fn chip_fragments(chips: &[Chip], gap: f32, width: f32) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut ops = Vec::new();
    let mut x = 0.0_f32;
    let mut line_height = 0.0_f32;

    for chip in chips {
        let style = &chip.text.style;
        let chip_width = measure(&chip.text.text, style) + 2.0 * chip.padding_pt;
        let chip_height = style.line_advance() + 2.0 * chip.padding_pt;
        if x > 0.0 && x + chip_width > width {
            fragments.push(Fragment {
                height: line_height + CHIP_ROW_GAP_PT,
                ops: std::mem::take(&mut ops),
            });
            x = 0.0;
            line_height = 0.0;
        }
        if let Some(color) = chip.background {
            ops.push(DrawOp::Rect {
                x,
                y: 0.0,
                width: chip_width,
                height: chip_height,
                color,
            });
        }
        if !chip.text.text.is_empty() {
            ops.push(text_op(x + chip.padding_pt, chip.padding_pt, chip.text.text.as_str(), style));
        }
        x += chip_width + gap;
        line_height = line_height.max(chip_height);
    }
    if line_height > 0.0 {
        fragments.push(Fragment {
            height: line_height,
            ops,
        });
    }
    fragments
}

fn row_fragments(row: &Row, width: f32) -> Vec<Fragment> {
    let mut fragments = match row {
        Row::Text { run } => line_fragments(run, 0.0, width),
        Row::Split { left, right } => split_fragments(left, right.as_ref(), width),
        Row::Indicator(indicator) => indicator_fragments(indicator, width),
        Row::Chips { chips, gap_pt } => chip_fragments(chips, *gap_pt, width),
    };
    if let Some(last) = fragments.last_mut() {
        last.height += ROW_GAP_PT;
    }
    fragments
}

fn heading_fragments(heading: &Heading, width: f32) -> Vec<Fragment> {
    let style = &heading.text.style;
    let indent = if heading.marker.is_some() { MARKER_PT + 6.0 } else { 0.0 };
    let mut fragments = line_fragments(&heading.text, indent, width - indent);

    if let (Some(color), Some(first)) = (heading.marker, fragments.first_mut()) {
        first.ops.insert(
            0,
            DrawOp::Rect {
                x: 0.0,
                y: (style.line_advance() - MARKER_PT) / 2.0,
                width: MARKER_PT,
                height: MARKER_PT,
                color,
            },
        );
    }
    if let Some(rule) = heading.rule {
        let y = RULE_GAP_PT + rule.thickness_pt / 2.0;
        fragments.push(Fragment {
            height: RULE_GAP_PT + rule.thickness_pt,
            ops: vec![DrawOp::Line {
                x1: 0.0,
                y1: y,
                x2: width,
                y2: y,
                width: rule.thickness_pt,
                color: rule.color,
            }],
        });
    }
    if let Some(last) = fragments.last_mut() {
        last.height += HEADING_GAP_PT;
    }
    fragments
}

/// An item measured against its column, ready to place.
struct LaidItem {
    fragments: Vec<Fragment>,
    inset_left: f32,
    pad_vertical: f32,
    background: Option<Rgb>,
    rail: Option<Rgb>,
    spacing_after: f32,
}

impl LaidItem {
    fn new(item: &ItemBlock, width: f32) -> Self {
        let boxed = item.background.is_some();
        let inset_left = item.padding_pt;
        let inset_right = if boxed { item.padding_pt } else { 0.0 };
        let inner = (width - inset_left - inset_right).max(1.0);
        Self {
            fragments: item.rows.iter().flat_map(|r| row_fragments(r, inner)).collect(),
            inset_left,
            pad_vertical: if boxed { item.padding_pt } else { 0.0 },
            background: item.background,
            rail: item.rail,
            spacing_after: item.spacing_after_pt,
        }
    }

    fn height(&self) -> f32 {
        2.0 * self.pad_vertical + self.fragments.iter().map(|f| f.height).sum::<f32>()
    }

    /// Height of the item's opening line including its top padding.
    fn lead(&self) -> f32 {
        self.pad_vertical + self.fragments.first().map_or(0.0, |f| f.height)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Flow
// ────────────────────────────────────────────────────────────────────────────

struct ColumnFlow {
    x: f32,
    width: f32,
    y: f32,
    page: usize,
    /// Where the body starts on the first page (below the header).
    first_top: f32,
    /// Where the body starts on continuation pages.
    top: f32,
    bottom: f32,
}

/// Decorations of an item that are drawn behind its text once the extent of
/// the item on the current page is known.
struct Segment {
    page: usize,
    start_y: f32,
    insert_at: usize,
}

impl ColumnFlow {
    fn page_top(&self) -> f32 {
        if self.page == 0 {
            self.first_top
        } else {
            self.top
        }
    }

    fn at_page_top(&self) -> bool {
        self.y <= self.page_top() + EPSILON
    }

    fn remaining(&self) -> f32 {
        self.bottom - self.y
    }

    fn next_page(&mut self, pages: &mut Vec<Page>) {
        self.page += 1;
        if pages.len() <= self.page {
            pages.push(Page::default());
        }
        self.y = self.top;
    }

    fn emit(&mut self, fragment: &Fragment, dx: f32, pages: &mut [Page]) {
        let (x, y) = (self.x + dx, self.y);
        pages[self.page]
            .ops
            .extend(fragment.ops.iter().map(|op| op.translated(x, y)));
        self.y += fragment.height;
    }

    fn place_section(&mut self, section: &SectionBlock, pages: &mut Vec<Page>) {
        let heading = heading_fragments(&section.heading, self.width);
        let items: Vec<LaidItem> = section
            .items
            .iter()
            .map(|item| LaidItem::new(item, self.width))
            .collect();

        // The heading keeps company with the whole first item when the pair
        // fits on a page, otherwise with the item's opening line.
        let heading_height: f32 = heading.iter().map(|f| f.height).sum();
        let full_page = self.bottom - self.top;
        let keep = items.first().map_or(0.0, |first| {
            if heading_height + first.height() <= full_page {
                first.height()
            } else {
                first.lead()
            }
        });
        if heading_height + keep > self.remaining() + EPSILON && !self.at_page_top() {
            self.next_page(pages);
        }
        for fragment in &heading {
            self.emit(fragment, 0.0, pages);
        }
        for item in &items {
            self.place_item(item, pages);
        }
        self.y += section.spacing_after_pt;
    }

    fn place_item(&mut self, item: &LaidItem, pages: &mut Vec<Page>) {
        let height = item.height();
        let fits_empty_page = height <= self.bottom - self.top + EPSILON;
        if height > self.remaining() + EPSILON && fits_empty_page && !self.at_page_top() {
            self.next_page(pages);
        }

        let mut segment = self.open_segment(pages);
        self.y += item.pad_vertical;
        for fragment in &item.fragments {
            if fragment.height > self.remaining() + EPSILON && !self.at_page_top() {
                self.close_segment(segment, item, pages);
                self.next_page(pages);
                segment = self.open_segment(pages);
            }
            self.emit(fragment, item.inset_left, pages);
        }
        self.y += item.pad_vertical;
        self.close_segment(segment, item, pages);
        self.y += item.spacing_after;
    }

    fn open_segment(&self, pages: &[Page]) -> Segment {
        Segment {
            page: self.page,
            start_y: self.y,
            insert_at: pages[self.page].ops.len(),
        }
    }

    fn close_segment(&self, segment: Segment, item: &LaidItem, pages: &mut [Page]) {
        let height = self.y - segment.start_y;
        if height <= 0.0 {
            return;
        }
        let ops = &mut pages[segment.page].ops;
        if let Some(color) = item.rail {
            ops.insert(
                segment.insert_at,
                DrawOp::Line {
                    x1: self.x + RAIL_WIDTH_PT / 2.0,
                    y1: segment.start_y,
                    x2: self.x + RAIL_WIDTH_PT / 2.0,
                    y2: self.y,
                    width: RAIL_WIDTH_PT,
                    color,
                },
            );
        }
        if let Some(color) = item.background {
            ops.insert(
                segment.insert_at,
                DrawOp::Rect {
                    x: self.x,
                    y: segment.start_y,
                    width: self.width,
                    height,
                    color,
                },
            );
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Header
// ────────────────────────────────────────────────────────────────────────────

/// Draws the header onto the first page and returns where the body starts.
fn place_header(header: &HeaderBlock, geometry: &PageGeometry, page: &mut Page) -> f32 {
    let left = geometry.margin_pt;
    let width = geometry.content_width();
    let top = if header.band.is_some() {
        header.padding_pt
    } else {
        geometry.margin_pt
    };

    let mut ops = Vec::new();
    let content_bottom = match header.alignment {
        HeaderAlignment::Center | HeaderAlignment::Left => {
            let mut runs = vec![header.name.clone()];
            runs.extend(header.subtitle.clone());
            if let Some(first) = header.contacts.first() {
                let joined = header
                    .contacts
                    .iter()
                    .map(|c| c.text.as_str())
                    .collect::<Vec<_>>()
                    .join(&header.contact_separator);
                runs.push(TextRun::new(joined, first.style));
            }

            let mut y = top;
            for run in &runs {
                for line in wrap(&run.text, &run.style, width) {
                    let x = match header.alignment {
                        HeaderAlignment::Center => {
                            left + (width - measure(&line, &run.style)).max(0.0) / 2.0
                        }
                        _ => left,
                    };
                    if !line.is_empty() {
                        ops.push(text_op(x, y, line, &run.style));
                    }
                    y += run.style.line_advance();
                }
            }
            y
        }
        HeaderAlignment::Split => {
            let left_width = width * SPLIT_HEADER_LEFT;
            let right_width = width - left_width;
            let right_edge = left + width;

            let mut y_left = top;
            for run in std::iter::once(&header.name).chain(header.subtitle.as_ref()) {
                for fragment in line_fragments(run, 0.0, left_width) {
                    ops.extend(fragment.ops.iter().map(|op| op.translated(left, y_left)));
                    y_left += fragment.height;
                }
            }

            let mut y_right = top;
            for contact in &header.contacts {
                for line in wrap(&contact.text, &contact.style, right_width) {
                    let x = right_edge - measure(&line, &contact.style);
                    if !line.is_empty() {
                        ops.push(text_op(x, y_right, line, &contact.style));
                    }
                    y_right += contact.style.line_advance();
                }
            }
            y_left.max(y_right)
        }
    };

    let mut y = content_bottom + header.padding_pt;
    if let Some(color) = header.band {
        ops.insert(
            0,
            DrawOp::Rect {
                x: 0.0,
                y: 0.0,
                width: geometry.width_pt,
                height: y,
                color,
            },
        );
    }
    if let Some(rule) = header.rule_below {
        let rule_y = y + rule.thickness_pt / 2.0;
        ops.push(DrawOp::Line {
            x1: left,
            y1: rule_y,
            x2: left + width,
            y2: rule_y,
            width: rule.thickness_pt,
            color: rule.color,
        });
        y += rule.thickness_pt;
    }

    page.ops.extend(ops);
    y + header.spacing_after_pt
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
