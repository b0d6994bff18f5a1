//! Header normalization, schema detection, and the fixed rename table.

use std::collections::HashMap;

use crate::domain::{ColumnIndex, HeaderSchema};
use crate::error::CoreError;

pub const COL_YEAR: &str = "Numanio";
pub const COL_MONTH: &str = "Mes";
pub const COL_WEEK: &str = "Semana";
pub const COL_STORE: &str = "Tienda";
pub const COL_PRODUCT: &str = "Ptmcod";
pub const COL_UNIT_SALES: &str = "Venta Unidad";
pub const COL_REVENUE: &str = "Ventas con IVA (Q)";
/// Daily date column appended on export.
pub const COL_DATE: &str = "Fecha";

/// Long (original export) header → short header.
pub const RENAME_TABLE: [(&str, &str); 16] = [
    ("Numanio", "Numanio"),
    ("Mes", "Mes"),
    ("Semana", "Semana"),
    ("Formato", "Formato"),
    ("Código", "Tdacod"),
    ("Tienda", "Tienda"),
    ("Código.1", "Catcod"),
    ("Categoria", "Categoria"),
    ("Codbarbar", "Codbarbar"),
    ("Alterno", "Ptmcod"),
    ("Producto", "Producto"),
    ("Clasif Repedido", "Clasif Repedido"),
    ("Medida", "Desmed"),
    ("Venta Unidades", "Venta Unidad"),
    ("Venta Fardos", "Ventas Fardos"),
    ("Total de Ventas", "Ventas con IVA (Q)"),
];

const REQUIRED: [&str; 7] = [
    COL_YEAR,
    COL_MONTH,
    COL_WEEK,
    COL_STORE,
    COL_PRODUCT,
    COL_UNIT_SALES,
    COL_REVENUE,
];

pub fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').trim().to_string()
}

/// Suffix repeated header names with `.1`, `.2`, ... in order of appearance.
///
/// Report exports carry two `Código` columns (store code, then category code); the
/// second one becomes `Código.1`.
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(headers.len());
    for name in headers {
        let count = seen.entry(name.clone()).or_insert(0);
        let mut candidate = if *count == 0 { name.clone() } else { format!("{name}.{count}") };
        // A later header may already be taken by a suffix generated earlier.
        while out.contains(&candidate) {
            *count += 1;
            candidate = format!("{name}.{count}");
        }
        *count += 1;
        out.push(candidate);
    }
    out
}

/// `Long` only when every long header is present.
pub fn detect_schema(headers: &[String]) -> HeaderSchema {
    let all_long = RENAME_TABLE
        .iter()
        .all(|(long, _)| headers.iter().any(|h| h == *long));
    if all_long { HeaderSchema::Long } else { HeaderSchema::Short }
}

pub fn apply_schema(schema: HeaderSchema, headers: Vec<String>) -> Vec<String> {
    match schema {
        HeaderSchema::Short => headers,
        HeaderSchema::Long => headers
            .into_iter()
            .map(|h| {
                RENAME_TABLE
                    .iter()
                    .find(|(long, _)| *long == h)
                    .map(|(_, short)| short.to_string())
                    .unwrap_or(h)
            })
            .collect(),
    }
}

/// Locate the required columns, or name every one that is missing.
pub fn locate_columns(headers: &[String]) -> Result<ColumnIndex, CoreError> {
    let position = |name: &str| headers.iter().position(|h| h == name);

    let missing: Vec<String> = REQUIRED
        .into_iter()
        .filter(|name| position(*name).is_none())
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(CoreError::SchemaMismatch { missing });
    }

    let find = |name: &str| position(name).ok_or_else(|| CoreError::SchemaMismatch {
        missing: vec![name.to_string()],
    });

    Ok(ColumnIndex {
        year: find(COL_YEAR)?,
        month: find(COL_MONTH)?,
        week: find(COL_WEEK)?,
        store: find(COL_STORE)?,
        product: find(COL_PRODUCT)?,
        unit_sales: find(COL_UNIT_SALES)?,
        revenue: find(COL_REVENUE)?,
    })
}
