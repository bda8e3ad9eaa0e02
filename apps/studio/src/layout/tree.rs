//! The layout tree: what a renderer produces and what the preview and the
//! paginator consume.
//!
//! Geometry is expressed in PDF points (1/72 in). The tree fixes column
//! assignment, styling and content; vertical positions and page breaks are
//! left to the paginator.

use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::models::{SectionKind, TemplateId};

// ────────────────────────────────────────────────────────────────────────────
// Colour and type
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

    // Neutral and blue ramps shared by the layouts.
    pub const GRAY_50: Rgb = Rgb(0xf9, 0xfa, 0xfb);
    pub const GRAY_200: Rgb = Rgb(0xe5, 0xe7, 0xeb);
    pub const GRAY_300: Rgb = Rgb(0xd1, 0xd5, 0xdb);
    pub const GRAY_400: Rgb = Rgb(0x9c, 0xa3, 0xaf);
    pub const GRAY_500: Rgb = Rgb(0x6b, 0x72, 0x80);
    pub const GRAY_600: Rgb = Rgb(0x4b, 0x55, 0x63);
    pub const GRAY_700: Rgb = Rgb(0x37, 0x41, 0x51);
    pub const GRAY_800: Rgb = Rgb(0x1f, 0x29, 0x37);
    pub const BLUE_200: Rgb = Rgb(0xbf, 0xdb, 0xfe);
    pub const BLUE_600: Rgb = Rgb(0x25, 0x63, 0xeb);
    pub const BLUE_800: Rgb = Rgb(0x1e, 0x40, 0xaf);
    pub const BLUE_900: Rgb = Rgb(0x1e, 0x3a, 0x8a);

    /// Parses `#rrggbb` or `#rgb`. Anything else is `None`.
    pub fn from_hex(s: &str) -> Option<Rgb> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |h: &str| u8::from_str_radix(h, 16).ok();
        match hex.len() {
            6 => Some(Rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let short = |h: &str| channel(h).map(|v| v * 17);
                Some(Rgb(short(&hex[0..1])?, short(&hex[1..2])?, short(&hex[2..3])?))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Channels scaled to 0.0–1.0, as PDF colour operators expect.
    pub fn unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }

    /// Blends toward white; `amount` 0.0 keeps the colour, 1.0 gives white.
    pub fn tint(self, amount: f32) -> Rgb {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| {
            let c = f32::from(c);
            (c + (255.0 - c) * amount).round() as u8
        };
        Rgb(mix(self.0), mix(self.1), mix(self.2))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    Sans,
    Serif,
    Mono,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub family: FontFamily,
    pub size_pt: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Rgb,
    /// Line advance as a multiple of `size_pt`.
    pub line_height: f32,
}

impl TextStyle {
    pub const fn new(family: FontFamily, size_pt: f32, color: Rgb) -> Self {
        Self {
            family,
            size_pt,
            bold: false,
            italic: false,
            color,
            line_height: 1.35,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub const fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    pub const fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn line_advance(&self) -> f32 {
        self.size_pt * self.line_height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub style: TextStyle,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub color: Rgb,
    pub thickness_pt: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Page and header
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
    pub column_gap_pt: f32,
}

impl PageGeometry {
    pub const A4_WIDTH_PT: f32 = 595.28;
    pub const A4_HEIGHT_PT: f32 = 841.89;

    pub const fn a4(margin_pt: f32, column_gap_pt: f32) -> Self {
        Self {
            width_pt: Self::A4_WIDTH_PT,
            height_pt: Self::A4_HEIGHT_PT,
            margin_pt,
            column_gap_pt,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width_pt - 2.0 * self.margin_pt
    }

    pub fn content_height(&self) -> f32 {
        self.height_pt - 2.0 * self.margin_pt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderAlignment {
    /// Everything centered, contacts on one wrapped line.
    Center,
    /// Everything flush left, contacts on one wrapped line.
    Left,
    /// Name block on the left, contacts stacked flush right.
    Split,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderBlock {
    pub alignment: HeaderAlignment,
    /// Full-bleed band colour behind the header.
    pub band: Option<Rgb>,
    pub name: TextRun,
    pub subtitle: Option<TextRun>,
    pub contacts: Vec<TextRun>,
    /// Joins contacts when they share a line.
    pub contact_separator: String,
    pub rule_below: Option<Rule>,
    pub padding_pt: f32,
    pub spacing_after_pt: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Body
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Single,
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub role: ColumnRole,
    /// Share of the content width left after column gaps.
    pub width_fraction: f32,
    pub sections: Vec<SectionBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heading {
    pub text: TextRun,
    /// Small filled dot drawn before the title.
    pub marker: Option<Rgb>,
    pub rule: Option<Rule>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBlock {
    pub kind: SectionKind,
    pub heading: Heading,
    pub items: Vec<ItemBlock>,
    pub spacing_after_pt: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBlock {
    /// The entry this block was built from; `None` for synthesized blocks
    /// such as the summary paragraph or a skills chip row.
    pub source_id: Option<Uuid>,
    pub background: Option<Rgb>,
    /// Vertical line down the left edge.
    pub rail: Option<Rgb>,
    pub padding_pt: f32,
    pub rows: Vec<Row>,
    pub spacing_after_pt: f32,
}

impl ItemBlock {
    pub fn plain(source_id: Option<Uuid>, rows: Vec<Row>, spacing_after_pt: f32) -> Self {
        Self {
            source_id,
            background: None,
            rail: None,
            padding_pt: 0.0,
            rows,
            spacing_after_pt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Row {
    /// Wrapped paragraph.
    Text { run: TextRun },
    /// Left text wraps; right text sits flush right on the first line.
    Split { left: TextRun, right: Option<TextRun> },
    /// Labelled proportional bar.
    Indicator(SkillIndicator),
    /// Inline items that flow and wrap like words.
    Chips { chips: Vec<Chip>, gap_pt: f32 },
}

impl Row {
    /// A paragraph row, or `None` when there is nothing to show.
    pub fn text(text: &str, style: TextStyle) -> Option<Row> {
        let text = text.trim();
        (!text.is_empty()).then(|| Row::Text {
            run: TextRun::new(text, style),
        })
    }

    /// A split row, or `None` when both sides are blank.
    pub fn split(left: &str, right: Option<&str>, left_style: TextStyle, right_style: TextStyle) -> Option<Row> {
        let left = left.trim();
        let right = right.map(str::trim).filter(|r| !r.is_empty());
        if left.is_empty() && right.is_none() {
            return None;
        }
        Some(Row::Split {
            left: TextRun::new(left, left_style),
            right: right.map(|r| TextRun::new(r, right_style)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillIndicator {
    pub label: TextRun,
    pub level: TextRun,
    /// Filled share of the track, 0.0–1.0.
    pub proportion: f32,
    pub track: Rgb,
    pub fill: Rgb,
    pub bar_height_pt: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chip {
    pub source_id: Uuid,
    pub text: TextRun,
    pub background: Option<Rgb>,
    pub padding_pt: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Root
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutTree {
    pub template: TemplateId,
    pub page: PageGeometry,
    pub header: HeaderBlock,
    pub columns: Vec<Column>,
}

impl LayoutTree {
    pub fn sections(&self) -> impl Iterator<Item = &SectionBlock> {
        self.columns.iter().flat_map(|c| c.sections.iter())
    }

    pub fn section(&self, kind: SectionKind) -> Option<&SectionBlock> {
        self.sections().find(|s| s.kind == kind)
    }

    /// The column a section was placed in.
    pub fn column_of(&self, kind: SectionKind) -> Option<ColumnRole> {
        self.columns
            .iter()
            .find(|c| c.sections.iter().any(|s| s.kind == kind))
            .map(|c| c.role)
    }

    /// Every piece of visible text in reading order (header, then columns).
    pub fn texts(&self) -> Vec<&str> {
        let mut out = vec![self.header.name.text.as_str()];
        if let Some(subtitle) = &self.header.subtitle {
            out.push(subtitle.text.as_str());
        }
        out.extend(self.header.contacts.iter().map(|c| c.text.as_str()));
        for section in self.sections() {
            out.push(section.heading.text.text.as_str());
            for item in &section.items {
                out.extend(item.texts());
            }
        }
        out
    }
}

impl SectionBlock {
    /// Entry ids in display order, including entries rendered as chips.
    pub fn entry_ids(&self) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for item in &self.items {
            if let Some(id) = item.source_id {
                ids.push(id);
            }
            for row in &item.rows {
                if let Row::Chips { chips, .. } = row {
                    ids.extend(chips.iter().map(|c| c.source_id));
                }
            }
        }
        ids
    }
}

impl ItemBlock {
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for row in &self.rows {
            match row {
                Row::Text { run } => out.push(run.text.as_str()),
                Row::Split { left, right } => {
                    out.push(left.text.as_str());
                    if let Some(right) = right {
                        out.push(right.text.as_str());
                    }
                }
                Row::Indicator(ind) => {
                    out.push(ind.label.text.as_str());
                    out.push(ind.level.text.as_str());
                }
                Row::Chips { chips, .. } => out.extend(chips.iter().map(|c| c.text.text.as_str())),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_parses_long_and_short_hex() {
        assert_eq!(Rgb::from_hex("#1e3a8a"), Some(Rgb(0x1e, 0x3a, 0x8a)));
        assert_eq!(Rgb::from_hex("#FFF"), Some(Rgb::WHITE));
        assert_eq!(Rgb::from_hex(" #000000 "), Some(Rgb::BLACK));
    }

    #[test]
    fn test_rgb_rejects_malformed() {
        assert_eq!(Rgb::from_hex("000000"), None);
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#gggggg"), None);
        assert_eq!(Rgb::from_hex("#ééé"), None);
        assert_eq!(Rgb::from_hex("blue"), None);
    }

    #[test]
    fn test_tint_bounds() {
        let blue = Rgb(0x1e, 0x3a, 0x8a);
        assert_eq!(blue.tint(0.0), blue);
        assert_eq!(blue.tint(1.0), Rgb::WHITE);
        assert_eq!(blue.tint(7.0), Rgb::WHITE);
    }

    #[test]
    fn test_rgb_serializes_as_hex_string() {
        let json = serde_json::to_string(&Rgb(1, 2, 255)).unwrap();
        assert_eq!(json, "\"#0102ff\"");
    }

    #[test]
    fn test_blank_rows_are_dropped() {
        let style = TextStyle::new(FontFamily::Sans, 10.0, Rgb::BLACK);
        assert!(Row::text("   ", style).is_none());
        assert!(Row::split(" ", Some(""), style, style).is_none());

        match Row::split("", Some(" 2020 "), style, style) {
            Some(Row::Split { left, right }) => {
                assert_eq!(left.text, "");
                assert_eq!(right.map(|r| r.text).as_deref(), Some("2020"));
            }
            other => panic!("expected split row, got {other:?}"),
        }
    }

    #[test]
    fn test_a4_content_box() {
        let page = PageGeometry::a4(36.0, 24.0);
        assert!((page.content_width() - (595.28 - 72.0)).abs() < 1e-3);
        assert!((page.content_height() - (841.89 - 72.0)).abs() < 1e-3);
    }
}
