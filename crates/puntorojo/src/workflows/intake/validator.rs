use super::mapping::{aliases_for, normalized_aliases_for};
use super::normalizer::normalize_header;
use super::parser::parse_number;
use super::RawTable;
use crate::workflows::losses::domain::{
    asset_label, AssetRecord, CanonicalField, LossError, SkippedRecord,
};
use tracing::debug;

const FIELD_COUNT: usize = CanonicalField::ordered().len();

/// A table whose columns have been resolved to the canonical field set.
///
/// Cells are still untyped text; numeric parsing happens in [`CanonicalTable::into_assets`].
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTable {
    source_columns: [String; FIELD_COUNT],
    rows: Vec<CanonicalRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRow {
    /// 1-based data row number in the source table.
    pub row: usize,
    cells: [String; FIELD_COUNT],
}

impl CanonicalRow {
    pub fn get(&self, field: CanonicalField) -> &str {
        &self.cells[field.index()]
    }

    fn asset_label(&self) -> String {
        asset_label(self.get(CanonicalField::AssetId), self.row)
    }

    fn number(&self, field: CanonicalField) -> Result<f64, LossError> {
        parse_number(self.get(field)).ok_or_else(|| LossError::MalformedValue {
            asset_id: self.asset_label(),
            field,
            value: self.get(field).to_string(),
        })
    }

    fn to_asset(&self) -> Result<AssetRecord, LossError> {
        let capacity_kva = self.number(CanonicalField::CapacityKva)?;
        if capacity_kva <= 0.0 {
            return Err(LossError::MalformedValue {
                asset_id: self.asset_label(),
                field: CanonicalField::CapacityKva,
                value: self.get(CanonicalField::CapacityKva).to_string(),
            });
        }

        Ok(AssetRecord {
            asset_id: self.get(CanonicalField::AssetId).trim().to_string(),
            sector: self.get(CanonicalField::Sector).trim().to_string(),
            latitude: self.number(CanonicalField::Latitude)?,
            longitude: self.number(CanonicalField::Longitude)?,
            capacity_kva,
            energy_delivered_kwh: self.number(CanonicalField::EnergyDeliveredKwh)?,
            energy_billed_kwh: self.number(CanonicalField::EnergyBilledKwh)?,
        })
    }
}

impl CanonicalTable {
    /// Source column name that was resolved for `field`.
    pub fn source_column(&self, field: CanonicalField) -> &str {
        &self.source_columns[field.index()]
    }

    pub fn rows(&self) -> &[CanonicalRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Types every row, setting aside rows with malformed numeric cells.
    pub fn into_assets(self) -> (Vec<(usize, AssetRecord)>, Vec<SkippedRecord>) {
        let mut assets = Vec::with_capacity(self.rows.len());
        let mut skipped = Vec::new();

        for row in &self.rows {
            match row.to_asset() {
                Ok(asset) => assets.push((row.row, asset)),
                Err(error) => skipped.push(SkippedRecord {
                    row: row.row,
                    asset_id: row.asset_label(),
                    error,
                }),
            }
        }

        (assets, skipped)
    }
}

/// Resolves canonical columns through the alias lists, failing on the first missing field.
pub fn validate_columns(table: &RawTable) -> Result<CanonicalTable, LossError> {
    let normalized_headers = table
        .headers
        .iter()
        .map(|header| normalize_header(header))
        .collect::<Vec<_>>();

    let mut positions = [0usize; FIELD_COUNT];
    for field in CanonicalField::ordered() {
        let position = normalized_aliases_for(field).iter().find_map(|alias| {
            normalized_headers
                .iter()
                .position(|header| header == alias)
        });

        match position {
            Some(position) => positions[field.index()] = position,
            None => {
                return Err(LossError::MissingColumn {
                    field,
                    searched: aliases_for(field).to_vec(),
                })
            }
        }
    }

    let source_columns = positions.map(|position| table.headers[position].clone());
    debug!(columns = ?source_columns, "resolved canonical columns");

    let rows = table
        .rows
        .iter()
        .enumerate()
        .map(|(index, cells)| CanonicalRow {
            row: index + 1,
            cells: positions.map(|position| cells.get(position).cloned().unwrap_or_default()),
        })
        .collect();

    Ok(CanonicalTable {
        source_columns,
        rows,
    })
}
