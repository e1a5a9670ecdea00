//! PDF writer: typesets layout blocks onto US-letter pages and serializes
//! them with `lopdf`.
//!
//! Two passes. `typeset` is pure and decides where every line lands (page,
//! x, baseline). `write_pdf` turns the placed lines into content streams.
//! Pages break automatically when the cursor reaches the bottom margin;
//! nothing is ever truncated.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::render::font_metrics::Font;
use crate::render::layout::Block;
use crate::render::RenderError;

// ────────────────────────────────────────────────────────────────────────────
// Page setup and styles
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PageSetup {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_left_pt: f32,
    pub margin_right_pt: f32,
    pub margin_top_pt: f32,
    pub margin_bottom_pt: f32,
}

impl PageSetup {
    /// US letter with the margins the résumé template has always used.
    pub fn letter() -> Self {
        Self {
            width_pt: 612.0,
            height_pt: 792.0,
            margin_left_pt: 50.0,
            margin_right_pt: 50.0,
            margin_top_pt: 50.0,
            margin_bottom_pt: 40.0,
        }
    }

    fn text_width(&self) -> f32 {
        self.width_pt - self.margin_left_pt - self.margin_right_pt
    }

    fn top(&self) -> f32 {
        self.height_pt - self.margin_top_pt
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
/// #E85C41
const ACCENT: Rgb = Rgb(0.910, 0.361, 0.255);

const BULLET_INDENT_PT: f32 = 20.0;
const BULLET_GLYPH: &str = "•";

#[derive(Debug, Clone, Copy)]
struct Style {
    font: Font,
    size: f32,
    leading: f32,
    color: Rgb,
    space_before: f32,
    space_after: f32,
}

fn style_for(block: &Block) -> Style {
    let body = Style {
        font: Font::Helvetica,
        size: 10.0,
        leading: 14.0,
        color: BLACK,
        space_before: 0.0,
        space_after: 0.0,
    };
    match block {
        Block::Name(_) => Style {
            font: Font::HelveticaBold,
            size: 18.0,
            leading: 22.0,
            space_after: 6.0,
            ..body
        },
        Block::Title(_) => Style {
            size: 12.0,
            leading: 14.4,
            color: ACCENT,
            space_after: 12.0,
            ..body
        },
        Block::SectionHeading(_) => Style {
            font: Font::HelveticaBold,
            size: 12.0,
            leading: 14.4,
            color: ACCENT,
            space_before: 12.0,
            space_after: 6.0,
        },
        Block::Strong(_) => Style {
            font: Font::HelveticaBold,
            ..body
        },
        Block::Body(_) | Block::EntryHeader(_) | Block::Bullet(_) | Block::Spacer(_) => body,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Typesetting
// ────────────────────────────────────────────────────────────────────────────

/// A single line of text at its final position. `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub font: Font,
    pub size: f32,
    pub color: Rgb,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct TypesetDocument {
    pub page_count: usize,
    pub lines: Vec<PlacedLine>,
}

struct Cursor<'a> {
    setup: &'a PageSetup,
    page: usize,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn at_page_top(&self) -> bool {
        (self.y - self.setup.top()).abs() < f32::EPSILON
    }

    /// Reserves one line of `leading` height, breaking the page if needed.
    /// Returns the baseline for the line.
    fn next_line(&mut self, style: &Style) -> f32 {
        if self.y - style.leading < self.setup.margin_bottom_pt && !self.at_page_top() {
            self.page += 1;
            self.y = self.setup.top();
        }
        self.y -= style.leading;
        // Baseline sits above the bottom of the line box by the descender allowance.
        self.y + (style.leading - style.size) / 2.0 + style.size * 0.2
    }

    fn skip(&mut self, gap: f32) {
        if !self.at_page_top() {
            self.y -= gap;
        }
    }
}

pub fn typeset(blocks: &[Block], setup: &PageSetup) -> TypesetDocument {
    let mut cursor = Cursor {
        setup,
        page: 0,
        y: setup.top(),
    };
    let mut lines = Vec::new();

    for block in blocks {
        let style = style_for(block);
        let (text, indent) = match block {
            Block::Spacer(gap) => {
                cursor.skip(*gap);
                continue;
            }
            Block::SectionHeading(text) => (*text, 0.0),
            Block::Bullet(text) => (text.as_str(), BULLET_INDENT_PT),
            Block::Name(text)
            | Block::Title(text)
            | Block::Body(text)
            | Block::Strong(text)
            | Block::EntryHeader(text) => (text.as_str(), 0.0),
        };

        cursor.skip(style.space_before);
        let wrapped = style
            .font
            .metrics()
            .wrap(text, style.size, setup.text_width() - indent);

        for (i, line) in wrapped.into_iter().enumerate() {
            let baseline = cursor.next_line(&style);
            if i == 0 && matches!(block, Block::Bullet(_)) {
                lines.push(PlacedLine {
                    page: cursor.page,
                    x: setup.margin_left_pt + BULLET_INDENT_PT / 2.0,
                    y: baseline,
                    font: style.font,
                    size: style.size,
                    color: style.color,
                    text: BULLET_GLYPH.to_string(),
                });
            }
            lines.push(PlacedLine {
                page: cursor.page,
                x: setup.margin_left_pt + indent,
                y: baseline,
                font: style.font,
                size: style.size,
                color: style.color,
                text: line,
            });
        }
        cursor.skip(style.space_after);
    }

    TypesetDocument {
        page_count: cursor.page + 1,
        lines,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Serialization
// ────────────────────────────────────────────────────────────────────────────

/// Typesets `blocks` and serializes the result as a PDF byte stream.
pub fn write_pdf(blocks: &[Block], setup: &PageSetup) -> Result<Vec<u8>, RenderError> {
    let laid_out = typeset(blocks, setup);

    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(Font::Helvetica));
    let bold_id = doc.add_object(font_dictionary(Font::HelveticaBold));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Helvetica.resource_name() => regular_id,
            Font::HelveticaBold.resource_name() => bold_id,
        },
    });

    let mut page_ids: Vec<Object> = Vec::with_capacity(laid_out.page_count);
    for page in 0..laid_out.page_count {
        let operations: Vec<Operation> = laid_out
            .lines
            .iter()
            .filter(|line| line.page == page)
            .flat_map(text_operations)
            .collect();
        let content = Content { operations }
            .encode()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), setup.width_pt.into(), setup.height_pt.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids,
            "Count" => laid_out.page_count as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(buf)
}

fn font_dictionary(font: Font) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn text_operations(line: &PlacedLine) -> Vec<Operation> {
    let Rgb(r, g, b) = line.color;
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![line.font.resource_name().into(), line.size.into()]),
        Operation::new("rg", vec![r.into(), g.into(), b.into()]),
        Operation::new(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                line.x.into(),
                line.y.into(),
            ],
        ),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&line.text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// Encodes text for a WinAnsiEncoding base-14 font. Latin-1 maps directly;
/// common typographic punctuation maps into the 0x80..0x9F block; anything
/// else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        })
        .collect()
}
