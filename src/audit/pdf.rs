//! Fixed-layout PDF rendering of a stored audit record.

use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rgb};

use super::domain::AuditRecord;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("pdf rendering failed: {0}")]
    Render(String),
}

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const MARGIN_MM: f64 = 50.0 * 25.4 / 72.0; // pdfkit's default 50pt margin
const BOTTOM_MM: f64 = 20.0;
const BODY_WIDTH_CHARS: usize = 92;

fn brand_color() -> Color {
    Color::Rgb(Rgb::new(0.635, 0.816, 0.2, None))
}

fn ink_color() -> Color {
    Color::Rgb(Rgb::new(0.094, 0.094, 0.106, None))
}

fn muted_color() -> Color {
    Color::Rgb(Rgb::new(0.33, 0.33, 0.33, None))
}

/// Greedy word wrap by character count; Helvetica at body sizes stays
/// inside the margins at this width.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

struct Cursor<'a> {
    doc: &'a printpdf::PdfDocumentReference,
    layer: PdfLayerReference,
    y: f64,
}

impl<'a> Cursor<'a> {
    fn ensure_room(&mut self, needed: f64) {
        if self.y - needed < BOTTOM_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM as f32), Mm(PAGE_HEIGHT_MM as f32), "content");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
    }

    fn text(
        &mut self,
        text: &str,
        size_pt: f64,
        indent_mm: f64,
        color: Color,
        font: &IndirectFontRef,
    ) {
        let leading = size_pt * 0.55;
        self.ensure_room(leading);
        self.layer.set_fill_color(color);
        self.layer
            .use_text(text, size_pt as f32, Mm((MARGIN_MM + indent_mm) as f32), Mm(self.y as f32), font);
        self.y -= leading;
    }

    fn paragraph(&mut self, text: &str, size_pt: f64, indent_mm: f64, color: Color, font: &IndirectFontRef) {
        for line in wrap(text, BODY_WIDTH_CHARS) {
            self.text(&line, size_pt, indent_mm, color.clone(), font);
        }
    }

    fn gap(&mut self, mm: f64) {
        self.y -= mm;
    }
}

/// Render the record to PDF bytes, mirroring the emailed report layout:
/// brand header, readiness index, executive summary, structural signals
/// with rationale, focus signal, and numbered next steps.
pub fn render_pdf(record: &AuditRecord) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) = PdfDocument::new(
        "ONQO Digital Readiness Audit",
        Mm(PAGE_WIDTH_MM as f32),
        Mm(PAGE_HEIGHT_MM as f32),
        "content",
    );

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| ExportError::Render(err.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| ExportError::Render(err.to_string()))?;

    let mut cursor = Cursor {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT_MM - MARGIN_MM,
    };

    let report = &record.report;

    cursor.text("ONQO.", 26.0, 0.0, brand_color(), &bold);
    cursor.text("Digital Readiness Index", 10.0, 0.0, ink_color(), &regular);
    cursor.gap(8.0);

    cursor.text(
        &format!(
            "Readiness Index: {}/10 - {}",
            report.score, report.readiness_label
        ),
        20.0,
        0.0,
        ink_color(),
        &bold,
    );
    cursor.gap(6.0);

    cursor.text("Executive Summary", 14.0, 0.0, ink_color(), &bold);
    cursor.paragraph(&report.summary, 10.0, 0.0, ink_color(), &regular);
    cursor.gap(6.0);

    cursor.text("Structural Signals", 14.0, 0.0, ink_color(), &bold);
    for impact in &report.gap_impacts {
        cursor.paragraph(
            &format!("- {}", impact.gap),
            10.0,
            0.0,
            ink_color(),
            &regular,
        );
        cursor.paragraph(
            &format!("Why this matters: {}", impact.why_it_matters),
            9.0,
            4.0,
            muted_color(),
            &regular,
        );
        cursor.gap(2.0);
    }
    cursor.gap(4.0);

    cursor.text("Focus Signal", 14.0, 0.0, ink_color(), &bold);
    cursor.paragraph(&report.focus_signal, 10.0, 0.0, ink_color(), &regular);
    cursor.gap(6.0);

    cursor.text("What to Examine Next", 14.0, 0.0, ink_color(), &bold);
    for (index, step) in report.next_steps.iter().enumerate() {
        cursor.paragraph(
            &format!("{}. {}", index + 1, step),
            10.0,
            0.0,
            ink_color(),
            &regular,
        );
    }

    doc.save_to_bytes()
        .map_err(|err| ExportError::Render(err.to_string()))
}
