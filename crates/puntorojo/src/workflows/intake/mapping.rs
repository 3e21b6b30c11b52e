use super::normalizer::normalize_header;
use crate::workflows::losses::domain::CanonicalField;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Accepted column names per canonical field, highest priority first.
const FIELD_ALIASES: &[(CanonicalField, &[&str])] = &[
    (
        CanonicalField::AssetId,
        &["ID_Trafo", "Trafo_ID", "asset_id", "transformer_id"],
    ),
    (CanonicalField::Sector, &["Sector", "Zona", "zone"]),
    (CanonicalField::Latitude, &["Latitud", "Lat", "latitude"]),
    (
        CanonicalField::Longitude,
        &["Longitud", "Lon", "Long", "longitude", "lng"],
    ),
    (
        CanonicalField::CapacityKva,
        &["Capacidad_kVA", "kVA", "capacity_kva"],
    ),
    (
        CanonicalField::EnergyDeliveredKwh,
        &[
            "kWh_Entregado",
            "Entregado",
            "energy_delivered_kwh",
            "delivered_kwh",
        ],
    ),
    (
        CanonicalField::EnergyBilledKwh,
        &[
            "kWh_Facturado",
            "Facturado",
            "energy_billed_kwh",
            "billed_kwh",
        ],
    ),
];

static NORMALIZED_ALIASES: OnceLock<HashMap<CanonicalField, Vec<String>>> = OnceLock::new();

pub(crate) fn aliases_for(field: CanonicalField) -> &'static [&'static str] {
    FIELD_ALIASES
        .iter()
        .find(|(candidate, _)| *candidate == field)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

pub(crate) fn normalized_aliases_for(field: CanonicalField) -> &'static [String] {
    normalized_aliases()
        .get(&field)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn normalized_aliases() -> &'static HashMap<CanonicalField, Vec<String>> {
    NORMALIZED_ALIASES.get_or_init(|| {
        FIELD_ALIASES
            .iter()
            .map(|(field, aliases)| {
                let normalized = aliases.iter().map(|alias| normalize_header(alias)).collect();
                (*field, normalized)
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_canonical_field_has_aliases() {
        for field in CanonicalField::ordered() {
            assert!(!aliases_for(field).is_empty(), "{field} has no aliases");
            assert_eq!(
                aliases_for(field).len(),
                normalized_aliases_for(field).len()
            );
        }
    }

    #[test]
    fn normalized_aliases_are_lowercase() {
        assert_eq!(
            normalized_aliases_for(CanonicalField::CapacityKva),
            ["capacidad_kva", "kva", "capacity_kva"]
        );
    }
}
