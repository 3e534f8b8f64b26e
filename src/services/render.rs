//! HTML rendering of the parts table and the printable remito.

use tera::{Context, Tera};
use thiserror::Error;

use crate::dto::remito::{PartsTable, PrintableRemito};

pub const PARTS_ROWS_TEMPLATE: &str = "remito/parts_rows.html";
pub const PRINT_TEMPLATE: &str = "remito/print.html";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("pdf error: {0}")]
    Pdf(String),
}

/// Renders the `<tr>` rows of the parts table.
pub fn render_parts_rows(tera: &Tera, parts: &PartsTable) -> Result<String, RenderError> {
    let mut context = Context::new();
    context.insert("parts", parts);
    Ok(tera.render(PARTS_ROWS_TEMPLATE, &context)?)
}

/// Renders the self-contained printable remito document.
pub fn render_printable_html(
    tera: &Tera,
    printable: &PrintableRemito,
) -> Result<String, RenderError> {
    let mut context = Context::new();
    context.insert("remito", printable);
    Ok(tera.render(PRINT_TEMPLATE, &context)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::MaintenanceReport;
    use crate::domain::repuesto::RepuestoItem;
    use crate::dto::remito::NO_PARTS_MESSAGE;

    fn tera() -> Tera {
        Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*.html"))
            .expect("templates should parse")
    }

    fn report(pairs: &[(&str, &str)]) -> MaintenanceReport {
        let mut report = MaintenanceReport::default();
        for (name, value) in pairs {
            report.set_field(*name, *value);
        }
        report
    }

    #[test]
    fn empty_parts_table_is_one_spanning_row() {
        let html = render_parts_rows(&tera(), &PartsTable::new(vec![])).unwrap();

        assert_eq!(html.matches("<tr").count(), 1);
        assert_eq!(html.matches("<td").count(), 1);
        assert!(html.contains("colspan=\"3\""));
        assert!(html.contains(NO_PARTS_MESSAGE));
    }

    #[test]
    fn parts_rows_keep_typed_quantities() {
        let parts = PartsTable::new(vec![RepuestoItem::new("NEW-123", "Cartucho 5 µm", "2.5")]);

        let html = render_parts_rows(&tera(), &parts).unwrap();

        assert_eq!(html.matches("<tr").count(), 1);
        assert!(html.contains("value=\"2.5\""));
        assert!(html.contains("NEW-123"));
    }

    #[test]
    fn printable_document_is_self_contained_and_escaped() {
        let report = report(&[
            ("cliente", "ACME"),
            ("etapa1_accion", "Cambiado"),
            ("etapa1_detalles", "PP-5 - <script>alert(1)</script>"),
        ]);
        let printable = PrintableRemito::build(&report, None, "<b>ok</b>", &[]);

        let html = render_printable_html(&tera(), &printable).unwrap();

        assert!(html.contains("<style>"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("<b>ok</b>"));
        assert!(html.contains("ACME"));
        assert!(html.contains("Presión de entrada"));
    }
}
