use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Fields every asset dataset must provide once column aliases are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    AssetId,
    Sector,
    Latitude,
    Longitude,
    CapacityKva,
    EnergyDeliveredKwh,
    EnergyBilledKwh,
}

impl CanonicalField {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::AssetId,
            Self::Sector,
            Self::Latitude,
            Self::Longitude,
            Self::CapacityKva,
            Self::EnergyDeliveredKwh,
            Self::EnergyBilledKwh,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::AssetId => "asset_id",
            Self::Sector => "sector",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::CapacityKva => "capacity_kva",
            Self::EnergyDeliveredKwh => "energy_delivered_kwh",
            Self::EnergyBilledKwh => "energy_billed_kwh",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::AssetId => 0,
            Self::Sector => 1,
            Self::Latitude => 2,
            Self::Longitude => 3,
            Self::CapacityKva => 4,
            Self::EnergyDeliveredKwh => 5,
            Self::EnergyBilledKwh => 6,
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One distribution transformer as supplied by the utility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub asset_id: String,
    pub sector: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity_kva: f64,
    pub energy_delivered_kwh: f64,
    pub energy_billed_kwh: f64,
}

/// Loss figures derived from a single [`AssetRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub loss_kwh: f64,
    pub loss_pct: f64,
    pub monetary_loss: f64,
    pub load_pct: f64,
}

/// Weighted contributions that add up to the priority score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub volume_score: f64,
    pub pct_score: f64,
    pub overload_score: f64,
}

impl ScoreComponents {
    pub fn total(&self) -> f64 {
        self.volume_score + self.pct_score + self.overload_score
    }
}

/// Intervention tier, most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityCategory {
    CriticalOperational,
    CriticalTransformer,
    High,
    Medium,
    Low,
}

impl PriorityCategory {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::CriticalOperational,
            Self::CriticalTransformer,
            Self::High,
            Self::Medium,
            Self::Low,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CriticalOperational => "Critical - Urgent Field Operation",
            Self::CriticalTransformer => "Critical - Transformer Replacement",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::CriticalOperational => "CRITICAL_OPERATIONAL",
            Self::CriticalTransformer => "CRITICAL_TRANSFORMER",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    pub const fn is_critical(self) -> bool {
        matches!(self, Self::CriticalOperational | Self::CriticalTransformer)
    }

    pub const fn action_label(self) -> &'static str {
        match self {
            Self::CriticalOperational | Self::CriticalTransformer => "Immediate action required",
            Self::High => "Priority intervention",
            Self::Medium | Self::Low => "Schedule review",
        }
    }

    /// Accepts either the code (`HIGH`) or a lowercase/kebab form (`critical-transformer`).
    pub fn from_code(value: &str) -> Option<Self> {
        let normalized = value.trim().replace('-', "_").to_ascii_uppercase();
        Self::ordered()
            .into_iter()
            .find(|category| category.code() == normalized)
    }
}

/// Map-marker severity band, independent of the priority tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossBand {
    Critical,
    Elevated,
    Normal,
}

impl LossBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Elevated => "Elevated",
            Self::Normal => "Normal",
        }
    }
}

/// Directive kinds emitted by the suggestion rules, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intervention {
    NetworkNormalization,
    TransformerReplacement { load_pct: f64 },
    TechnicalInspection,
    NetworkAudit,
    PreventiveMaintenance,
}

impl Intervention {
    pub fn directive(&self) -> String {
        match self {
            Intervention::NetworkNormalization => {
                "NETWORK NORMALIZATION OPERATIVE: shield the network and regularize direct connections"
                    .to_string()
            }
            Intervention::TransformerReplacement { load_pct } => format!(
                "TRANSFORMER REPLACEMENT: {load_pct:.0}% load - insufficient capacity"
            ),
            Intervention::TechnicalInspection => {
                "TECHNICAL INSPECTION: possible large-scale fraud or metering failure".to_string()
            }
            Intervention::NetworkAudit => {
                "NETWORK AUDIT: review unauthorized connections".to_string()
            }
            Intervention::PreventiveMaintenance => {
                "PREVENTIVE MAINTENANCE: check conductor and splice condition".to_string()
            }
        }
    }
}

/// Label shown wherever an asset triggered no intervention rule.
pub const ROUTINE_MONITORING: &str = "Routine monitoring";

/// Joins directives for single-cell display, falling back to [`ROUTINE_MONITORING`].
pub fn directive_line(interventions: &[Intervention]) -> String {
    if interventions.is_empty() {
        return ROUTINE_MONITORING.to_string();
    }

    interventions
        .iter()
        .map(Intervention::directive)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Typed failures raised while turning a table into a ranked batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LossError {
    #[error("missing required column {field}; searched aliases: {}", .searched.join(", "))]
    MissingColumn {
        field: CanonicalField,
        searched: Vec<&'static str>,
    },
    #[error("asset {asset_id} delivered zero energy; loss percentage is undefined")]
    DivisionByZero { asset_id: String },
    #[error("asset {asset_id} has malformed {field} value '{value}'")]
    MalformedValue {
        asset_id: String,
        field: CanonicalField,
        value: String,
    },
}

/// A record left out of the batch together with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// 1-based data row number in the source table.
    pub row: usize,
    pub asset_id: String,
    pub error: LossError,
}

/// The id reported for a row, `row-N` when the id cell is blank.
pub(crate) fn asset_label(asset_id: &str, row: usize) -> String {
    let asset_id = asset_id.trim();
    if asset_id.is_empty() {
        format!("row-{row}")
    } else {
        asset_id.to_string()
    }
}

impl SkippedRecord {
    pub fn to_view(&self) -> SkippedRecordView {
        SkippedRecordView {
            row: self.row,
            asset_id: self.asset_id.clone(),
            reason: self.error.to_string(),
        }
    }
}

impl Serialize for SkippedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_view().serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecordView {
    pub row: usize,
    pub asset_id: String,
    pub reason: String,
}
