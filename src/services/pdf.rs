//! PDF rendition of the printable remito.
//!
//! The document is laid out as text lines on A4 pages with the built-in
//! Helvetica font; content taller than one page continues on new pages. All
//! free text is stripped of markup (scripts and event handlers included)
//! before it reaches the page.

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use crate::dto::remito::PrintableRemito;
use crate::services::render::RenderError;

const A4_WIDTH_MM: f32 = 210.0;
const A4_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const LINE_HEIGHT_MM: f32 = 5.5;
const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
/// Rough character budget of a body line at `BODY_SIZE`.
const WRAP_COLUMNS: usize = 95;

/// Strips markup from user-entered text, dropping script and style bodies.
pub fn strip_markup(input: &str) -> String {
    let mut builder = ammonia::Builder::empty();
    builder.add_clean_content_tags(&["script", "style"]);
    let cleaned = builder.clean(input).to_string();
    cleaned
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[derive(Debug, Clone, PartialEq)]
enum Line {
    Title(String),
    Heading(String),
    Body(String),
    Gap,
}

fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > columns {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn body(lines: &mut Vec<Line>, text: &str) {
    lines.extend(
        wrap(&strip_markup(text), WRAP_COLUMNS)
            .into_iter()
            .map(Line::Body),
    );
}

fn layout(remito: &PrintableRemito) -> Vec<Line> {
    let view = &remito.view;
    let mut lines = Vec::new();

    let title = if view.numero.is_empty() {
        "Remito".to_string()
    } else {
        format!("Remito N° {}", view.numero)
    };
    lines.push(Line::Title(title));
    lines.push(Line::Gap);

    lines.push(Line::Heading("Cliente".to_string()));
    body(&mut lines, &format!("Nombre: {}", view.cliente.nombre));
    body(&mut lines, &format!("Dirección: {}", view.cliente.direccion));
    body(
        &mut lines,
        &format!(
            "Teléfono: {}   Email: {}   CUIT: {}",
            view.cliente.telefono, view.cliente.email, view.cliente.cuit
        ),
    );
    lines.push(Line::Gap);

    lines.push(Line::Heading("Equipo".to_string()));
    body(
        &mut lines,
        &format!(
            "{} - Modelo: {}   Serie: {}",
            view.equipo.tipo, view.equipo.modelo, view.equipo.serie
        ),
    );
    body(&mut lines, &format!("Ubicación: {}", view.equipo.ubicacion));
    body(
        &mut lines,
        &format!(
            "Fecha: {}   Técnico: {}   Próximo mantenimiento: {}",
            view.equipo.fecha, view.equipo.tecnico, view.equipo.proximo_mantenimiento
        ),
    );
    lines.push(Line::Gap);

    lines.push(Line::Heading("Parámetros de operación (As Found / As Left)".to_string()));
    for row in &remito.parametros {
        body(
            &mut lines,
            &format!(
                "{} ({}): {} / {}",
                row.label, row.unit, row.as_found, row.as_left
            ),
        );
    }
    lines.push(Line::Gap);

    lines.push(Line::Heading("Registro de componentes".to_string()));
    for row in &remito.componentes {
        body(
            &mut lines,
            &format!("{}: {} {}", row.titulo, row.accion, row.detalle),
        );
    }
    lines.push(Line::Gap);

    lines.push(Line::Heading("Repuestos".to_string()));
    match view.parts.empty_message {
        Some(message) => body(&mut lines, message),
        None => {
            for row in &view.parts.rows {
                body(
                    &mut lines,
                    &format!("[{}] {} x {}", row.codigo, row.descripcion, row.cantidad),
                );
            }
        }
    }
    lines.push(Line::Gap);

    lines.push(Line::Heading("Observaciones".to_string()));
    body(&mut lines, &view.observaciones);

    if !remito.fotos.is_empty() {
        lines.push(Line::Gap);
        lines.push(Line::Heading("Fotos".to_string()));
        for foto in &remito.fotos {
            body(&mut lines, &format!("{}. {}", foto.slot + 1, foto.caption));
        }
    }

    lines
}

struct PageCursor {
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl PageCursor {
    fn ensure_room(&mut self, doc: &PdfDocumentReference, needed: f32) {
        if self.y - needed >= MARGIN_MM {
            return;
        }
        self.pages += 1;
        let (page, layer) = doc.add_page(
            Mm(A4_WIDTH_MM),
            Mm(A4_HEIGHT_MM),
            format!("Página {}", self.pages),
        );
        self.layer = doc.get_page(page).get_layer(layer);
        self.y = A4_HEIGHT_MM - MARGIN_MM;
    }

    fn write(&mut self, doc: &PdfDocumentReference, text: &str, size: f32, font: &IndirectFontRef) {
        let height = LINE_HEIGHT_MM * size / BODY_SIZE;
        self.ensure_room(doc, height);
        self.y -= height;
        self.layer.use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
    }
}

/// Renders the remito as PDF bytes, returning them with the page count.
pub fn render_pdf(remito: &PrintableRemito) -> Result<(Vec<u8>, usize), RenderError> {
    let title = format!("Remito {}", remito.view.numero);
    let (doc, page, layer) = PdfDocument::new(
        title.trim(),
        Mm(A4_WIDTH_MM),
        Mm(A4_HEIGHT_MM),
        "Página 1",
    );

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(format!("font error: {e:?}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Pdf(format!("font error: {e:?}")))?;

    let mut cursor = PageCursor {
        layer: doc.get_page(page).get_layer(layer),
        y: A4_HEIGHT_MM - MARGIN_MM,
        pages: 1,
    };

    for line in layout(remito) {
        match line {
            Line::Title(text) => cursor.write(&doc, &text, TITLE_SIZE, &bold),
            Line::Heading(text) => cursor.write(&doc, &text, HEADING_SIZE, &bold),
            Line::Body(text) => cursor.write(&doc, &text, BODY_SIZE, &regular),
            Line::Gap => cursor.y -= LINE_HEIGHT_MM / 2.0,
        }
    }

    let pages = cursor.pages;
    drop(cursor);
    let bytes = doc
        .save_to_bytes()
        .map_err(|e| RenderError::Pdf(format!("save error: {e:?}")))?;

    Ok((bytes, pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::MaintenanceReport;

    fn printable(observaciones: &str) -> PrintableRemito {
        let mut report = MaintenanceReport::default();
        report.set_field("cliente", "ACME");
        PrintableRemito::build(&report, None, observaciones, &[])
    }

    #[test]
    fn strip_markup_removes_scripts_and_handlers() {
        let cleaned = strip_markup("Filtro <img src=x onerror=alert(1)> <script>alert(2)</script>A & B");

        assert!(!cleaned.contains("onerror"));
        assert!(!cleaned.contains("alert(2)"));
        assert!(!cleaned.contains('<'));
        assert!(cleaned.contains("A & B"));
    }

    #[test]
    fn wrap_splits_long_paragraphs() {
        let text = "palabra ".repeat(40);
        let lines = wrap(&text, 20);

        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| line.chars().count() <= 20));
    }

    #[test]
    fn short_remito_fits_one_page() {
        let (bytes, pages) = render_pdf(&printable("Sin novedades")).unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(pages, 1);
    }

    #[test]
    fn tall_content_continues_on_new_pages() {
        let observaciones = "Se revisó el equipo completo.\n".repeat(120);

        let (_bytes, pages) = render_pdf(&printable(&observaciones)).unwrap();

        assert!(pages > 1);
    }
}
