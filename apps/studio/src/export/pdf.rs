//! Paints a `PagedDocument` into PDF bytes with `pdf-writer`.
//!
//! Text uses the non-embedded base-14 faces with WinAnsiEncoding, so glyph
//! widths match the tables the paginator measured with.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Timelike, Utc};
use pdf_writer::{Content, Date, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::layout::font_metrics::FontFace;
use crate::layout::paginate::{DrawOp, PagedDocument};

const PRODUCER: &str = concat!("studio ", env!("CARGO_PKG_VERSION"));

/// Hands out sequential object ids.
struct RefAlloc(i32);

impl RefAlloc {
    fn next(&mut self) -> Ref {
        let r = Ref::new(self.0);
        self.0 += 1;
        r
    }
}

pub fn write_pdf(doc: &PagedDocument, title: &str, generated_at: DateTime<Utc>) -> Vec<u8> {
    let mut alloc = RefAlloc(1);
    let catalog_id = alloc.next();
    let tree_id = alloc.next();
    let info_id = alloc.next();

    let faces: Vec<FontFace> = doc
        .pages
        .iter()
        .flat_map(|p| p.ops.iter())
        .filter_map(|op| match op {
            DrawOp::Text { face, .. } => Some(*face),
            _ => None,
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let fonts: Vec<(FontFace, String, Ref)> = faces
        .iter()
        .enumerate()
        .map(|(i, face)| (*face, format!("F{i}"), alloc.next()))
        .collect();
    let page_ids: Vec<(Ref, Ref)> = doc
        .pages
        .iter()
        .map(|_| (alloc.next(), alloc.next()))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);

    for (face, _, font_id) in &fonts {
        pdf.type1_font(*font_id)
            .base_font(Name(face.base_font().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let geometry = doc.geometry;
    for (page, (page_id, content_id)) in doc.pages.iter().zip(&page_ids) {
        {
            let mut page_writer = pdf.page(*page_id);
            page_writer
                .media_box(Rect::new(0.0, 0.0, geometry.width_pt, geometry.height_pt))
                .parent(tree_id)
                .contents(*content_id);
            let mut resources = page_writer.resources();
            let mut font_dict = resources.fonts();
            for (_, name, font_id) in &fonts {
                font_dict.pair(Name(name.as_bytes()), *font_id);
            }
            font_dict.finish();
            resources.finish();
            page_writer.finish();
        }

        let content = paint_page(&page.ops, &fonts, geometry.height_pt);
        pdf.stream(*content_id, &content);
    }

    {
        let mut info = pdf.document_info(info_id);
        info.title(TextStr(title));
        info.producer(TextStr(PRODUCER));
        info.creation_date(pdf_date(generated_at));
        info.finish();
    }

    pdf.finish()
}

fn pdf_date(at: DateTime<Utc>) -> Date {
    Date::new(at.year().clamp(0, 9999) as u16)
        .month(at.month() as u8)
        .day(at.day() as u8)
        .hour(at.hour() as u8)
        .minute(at.minute() as u8)
        .second(at.second() as u8)
        .utc_offset_hour(0)
}

fn paint_page(ops: &[DrawOp], fonts: &[(FontFace, String, Ref)], page_height: f32) -> Vec<u8> {
    let mut content = Content::new();
    for op in ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                let (r, g, b) = color.unit();
                content.set_fill_rgb(r, g, b);
                content.rect(*x, page_height - y - height, *width, *height);
                content.fill_nonzero();
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                let (r, g, b) = color.unit();
                content.set_stroke_rgb(r, g, b);
                content.set_line_width(*width);
                content.move_to(*x1, page_height - y1);
                content.line_to(*x2, page_height - y2);
                content.stroke();
            }
            DrawOp::Text {
                x,
                baseline,
                text,
                face,
                size_pt,
                color,
            } => {
                let Some((_, name, _)) = fonts.iter().find(|(f, _, _)| f == face) else {
                    continue;
                };
                let (r, g, b) = color.unit();
                content.set_fill_rgb(r, g, b);
                content.begin_text();
                content.set_font(Name(name.as_bytes()), *size_pt);
                content.next_line(*x, page_height - baseline);
                content.show(Str(&encode_win_ansi(text)));
                content.end_text();
            }
        }
    }
    content.finish()
}

/// Encodes text for a WinAnsiEncoding simple font. Latin-1 passes through,
/// the common typographic marks map to their cp1252 slots, and anything the
/// encoding cannot express becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}
