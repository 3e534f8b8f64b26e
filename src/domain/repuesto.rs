//! Parts (repuestos) listed on a remito.

use serde::{Deserialize, Serialize};

use crate::domain::stage::ComponentStage;
use crate::domain::types::normalize_quantity;

/// Quantity used for parts derived from replaced stages.
pub const DEFAULT_QUANTITY: &str = "1";

/// Separators tried, in order, when guessing a part code from stage details.
///
/// This is a compatibility heuristic, not a parser: `"A-1 - Filtro"` splits on
/// `" - "` before the bare `"-"` gets a chance.
pub const CODE_SEPARATORS: [&str; 4] = [" - ", "-", ":", "|"];

/// One row of the parts table.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepuestoItem {
    #[serde(default)]
    pub codigo: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub cantidad: String,
}

impl RepuestoItem {
    pub fn new(
        codigo: impl Into<String>,
        descripcion: impl Into<String>,
        cantidad: impl Into<String>,
    ) -> Self {
        Self {
            codigo: codigo.into(),
            descripcion: descripcion.into(),
            cantidad: cantidad.into(),
        }
    }

    /// True when code, description and quantity are all blank.
    pub fn is_blank(&self) -> bool {
        self.codigo.trim().is_empty()
            && self.descripcion.trim().is_empty()
            && self.cantidad.trim().is_empty()
    }

    /// Trims every field and canonicalizes the quantity.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            codigo: self.codigo.trim().to_string(),
            descripcion: self.descripcion.trim().to_string(),
            cantidad: normalize_quantity(&self.cantidad),
        }
    }
}

/// Entry of the component-replacement register captured with the report.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplacedComponent {
    pub etapa: String,
    pub titulo: String,
    #[serde(default)]
    pub detalle: String,
}

impl ReplacedComponent {
    pub fn new(stage: &ComponentStage, detalle: &str) -> Self {
        Self {
            etapa: stage.id.to_string(),
            titulo: stage.title.to_string(),
            detalle: detalle.trim().to_string(),
        }
    }
}

/// Splits a stage detail into `(codigo, descripcion)`.
///
/// The first separator that yields two non-empty halves wins; otherwise the
/// whole detail is the description and the code is empty.
pub fn split_code_description(detail: &str) -> (String, String) {
    let detail = detail.trim();

    for separator in CODE_SEPARATORS {
        if let Some((code, description)) = detail.split_once(separator) {
            let (code, description) = (code.trim(), description.trim());
            if !code.is_empty() && !description.is_empty() {
                return (code.to_string(), description.to_string());
            }
        }
    }

    (String::new(), detail.to_string())
}

/// Builds one parts row for a replaced stage.
pub fn repuesto_from_detail(detail: &str) -> RepuestoItem {
    let (codigo, descripcion) = split_code_description(detail);
    RepuestoItem::new(codigo, descripcion, DEFAULT_QUANTITY)
}

/// Normalizes edited rows and drops the blank ones.
pub fn collect_repuestos<I>(rows: I) -> Vec<RepuestoItem>
where
    I: IntoIterator<Item = RepuestoItem>,
{
    rows.into_iter()
        .filter(|row| !row.is_blank())
        .map(|row| row.normalized())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_spaced_dash_first() {
        assert_eq!(
            split_code_description("COD123 - Filtro X"),
            ("COD123".to_string(), "Filtro X".to_string())
        );
        assert_eq!(
            split_code_description("PP-5 - Cartucho 5 µm"),
            ("PP-5".to_string(), "Cartucho 5 µm".to_string())
        );
    }

    #[test]
    fn falls_back_through_separators_in_order() {
        assert_eq!(
            split_code_description("AB-Membrana"),
            ("AB".to_string(), "Membrana".to_string())
        );
        assert_eq!(
            split_code_description("X1: Carbón block"),
            ("X1".to_string(), "Carbón block".to_string())
        );
        assert_eq!(
            split_code_description("Z9 | Remineralizador"),
            ("Z9".to_string(), "Remineralizador".to_string())
        );
    }

    #[test]
    fn detail_without_usable_separator_is_description_only() {
        assert_eq!(
            split_code_description("Cartucho sedimentos"),
            (String::new(), "Cartucho sedimentos".to_string())
        );
        assert_eq!(
            split_code_description("- Sin código"),
            (String::new(), "- Sin código".to_string())
        );
    }

    #[test]
    fn description_never_repeats_the_code() {
        for detail in ["COD123 - Filtro X", "A-B", "K:V", "P|Q"] {
            let row = repuesto_from_detail(detail);
            assert!(!row.codigo.is_empty());
            assert!(!row.descripcion.contains(&row.codigo));
            assert_eq!(row.cantidad, "1");
        }
    }

    #[test]
    fn collect_drops_blank_rows_and_normalizes() {
        let rows = vec![
            RepuestoItem::new(" NEW-123 ", " Cartucho 5 µm ", "2.5"),
            RepuestoItem::new("  ", "", " "),
            RepuestoItem::new("", "Junta", "2.50"),
        ];

        let collected = collect_repuestos(rows);

        assert_eq!(
            collected,
            vec![
                RepuestoItem::new("NEW-123", "Cartucho 5 µm", "2.5"),
                RepuestoItem::new("", "Junta", "2.5"),
            ]
        );
    }
}
