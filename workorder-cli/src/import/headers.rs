//! Header resolution: map spreadsheet column titles to canonical fields
//!
//! Column titles in exported work-order sheets vary between files ("N° OT",
//! "Nro OT", "Orden de Trabajo", ...). Each canonical field carries an ordered
//! alias list; titles and aliases are compared after normalization.

use std::collections::HashMap;

use crate::import::types::{CanonicalField, HeaderMap};
use crate::services::matching::strip_accents;

/// Built-in aliases per field, tried in order
const BUILTIN_ALIASES: &[(CanonicalField, &[&str])] = &[
    (
        CanonicalField::Identifier,
        &["ot", "n ot", "numero ot", "nro ot", "orden de trabajo", "folio"],
    ),
    (
        CanonicalField::StartDate,
        &["fecha ingreso", "fecha de ingreso", "fecha inicio"],
    ),
    (
        CanonicalField::Description,
        &["nombre del proyecto", "descripcion", "proyecto"],
    ),
    (CanonicalField::Client, &["cliente", "razon social"]),
    (CanonicalField::Salesperson, &["vendedor", "ejecutivo"]),
    (
        CanonicalField::Supervisors,
        &["superv", "supervisor", "supervisores", "encargado"],
    ),
    (CanonicalField::Technicians, &["tecnico", "tecnicos"]),
    (CanonicalField::Service, &["sistema", "servicio"]),
    (
        CanonicalField::Price,
        &["monto neto", "monto", "precio", "valor neto"],
    ),
    (CanonicalField::LegacyStatus, &["factproc", "estado"]),
    (CanonicalField::Invoiced, &["facturado"]),
    (
        CanonicalField::InvoiceNumber,
        &["fact.n", "factura", "n factura"],
    ),
    (
        CanonicalField::InvoiceDate,
        &["fecha fact", "fecha factura"],
    ),
    (
        CanonicalField::EndDate,
        &["fecha inicio compromiso", "fecha termino", "fecha de termino"],
    ),
];

/// Normalize a header title (or alias) for comparison.
///
/// Accents are stripped, text is lowercased, the ordinal signs `°`/`º` are
/// dropped and any other non-alphanumeric character becomes a space before
/// whitespace is collapsed. `"N° OT"`, `"n ot"` and `"N OT"` all become `"n ot"`.
pub fn normalize_header(text: &str) -> String {
    let folded: String = strip_accents(text)
        .to_lowercase()
        .chars()
        .filter(|c| *c != '°' && *c != 'º')
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Ordered alias lists for every canonical field
#[derive(Debug, Clone)]
pub struct HeaderAliases {
    aliases: HashMap<CanonicalField, Vec<String>>,
}

impl Default for HeaderAliases {
    fn default() -> Self {
        let aliases = BUILTIN_ALIASES
            .iter()
            .map(|(field, list)| (*field, list.iter().map(|a| a.to_string()).collect()))
            .collect();
        HeaderAliases { aliases }
    }
}

impl HeaderAliases {
    /// Built-in alias table
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in table extended with configured aliases keyed by field key
    /// (`identifier`, `start_date`, ...). Unknown keys are logged and ignored.
    pub fn with_extra(extra: &HashMap<String, Vec<String>>) -> Self {
        let mut aliases = Self::default();
        for (key, list) in extra {
            match CanonicalField::from_key(key) {
                Some(field) => {
                    for alias in list {
                        aliases.push(field, alias);
                    }
                }
                None => log::warn!("Ignoring aliases for unknown field '{}'", key),
            }
        }
        aliases
    }

    /// Append an alias after the existing ones for a field
    pub fn push(&mut self, field: CanonicalField, alias: impl Into<String>) {
        let alias = alias.into();
        if alias.trim().is_empty() {
            return;
        }
        let list = self.aliases.entry(field).or_default();
        if !list.contains(&alias) {
            list.push(alias);
        }
    }

    /// Aliases for a field, in resolution order
    pub fn for_field(&self, field: CanonicalField) -> &[String] {
        self.aliases
            .get(&field)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

/// Resolve the file's headers against the alias table.
///
/// For each field the aliases are tried in order and the first one equal to
/// any normalized header wins. Fields with no matching header stay unmapped.
pub fn resolve_headers(headers: &[String], aliases: &HeaderAliases) -> HeaderMap {
    let normalized: Vec<(String, &String)> = headers
        .iter()
        .filter(|h| !h.trim().is_empty())
        .map(|h| (normalize_header(h), h))
        .collect();

    let mut map = HeaderMap::new();

    for field in CanonicalField::all() {
        let found = aliases.for_field(*field).iter().find_map(|alias| {
            let alias = normalize_header(alias);
            normalized
                .iter()
                .find(|(norm, _)| *norm == alias)
                .map(|(_, original)| *original)
        });

        match found {
            Some(header) => {
                log::debug!("Mapped column '{}' to {}", header, field);
                map.insert(*field, header.clone());
            }
            None => log::debug!("No column found for {}", field),
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_header_variants() {
        assert_eq!(normalize_header("N° OT"), "n ot");
        assert_eq!(normalize_header("  n   ot "), "n ot");
        assert_eq!(normalize_header("N OT"), "n ot");
        assert_eq!(normalize_header("Fecha Término"), "fecha termino");
        assert_eq!(normalize_header("Fact.N"), "fact n");
        assert_eq!(normalize_header("Descripción"), "descripcion");
    }

    #[test]
    fn test_identifier_variants_resolve() {
        let aliases = HeaderAliases::default();
        for title in ["N° OT", "n ot", "N OT", "Nro. OT", "Orden de Trabajo"] {
            let map = resolve_headers(&headers(&[title]), &aliases);
            assert_eq!(
                map.header(CanonicalField::Identifier),
                Some(title),
                "title {:?} should map to identifier",
                title
            );
        }
    }

    #[test]
    fn test_alias_order_decides_between_columns() {
        // "monto neto" precedes "monto" in the price aliases
        let map = resolve_headers(
            &headers(&["Monto", "Monto Neto"]),
            &HeaderAliases::default(),
        );
        assert_eq!(map.header(CanonicalField::Price), Some("Monto Neto"));
    }

    #[test]
    fn test_invoice_number_dotted_alias() {
        let map = resolve_headers(&headers(&["FACT.N"]), &HeaderAliases::default());
        assert_eq!(map.header(CanonicalField::InvoiceNumber), Some("FACT.N"));
    }

    #[test]
    fn test_unmatched_fields_stay_unmapped() {
        let map = resolve_headers(
            &headers(&["OT", "Cliente", "Columna extra"]),
            &HeaderAliases::default(),
        );

        assert_eq!(map.len(), 2);
        assert!(!map.contains(CanonicalField::StartDate));
        assert!(map.unmapped().contains(&CanonicalField::EndDate));
    }

    #[test]
    fn test_configured_aliases_extend_builtins() {
        let mut extra = HashMap::new();
        extra.insert("price".to_string(), vec!["Total Neto".to_string()]);
        extra.insert("bogus".to_string(), vec!["whatever".to_string()]);

        let aliases = HeaderAliases::with_extra(&extra);
        assert_eq!(aliases.for_field(CanonicalField::Price).last().map(|s| s.as_str()), Some("Total Neto"));

        let map = resolve_headers(&headers(&["TOTAL NETO"]), &aliases);
        assert_eq!(map.header(CanonicalField::Price), Some("TOTAL NETO"));

        // built-ins still win when both are present
        let map = resolve_headers(&headers(&["TOTAL NETO", "Precio"]), &aliases);
        assert_eq!(map.header(CanonicalField::Price), Some("Precio"));
    }
}
