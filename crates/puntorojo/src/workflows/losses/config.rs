use serde::{Deserialize, Serialize};

/// What to do with an asset whose delivered energy is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroDeliveryPolicy {
    /// Fail the whole run with `LossError::DivisionByZero`.
    #[default]
    AbortBatch,
    /// Leave the asset out and list it in the skip report.
    SkipRecord,
}

impl ZeroDeliveryPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "abort" | "abort_batch" | "fail" => Some(Self::AbortBatch),
            "skip" | "skip_record" | "exclude" => Some(Self::SkipRecord),
            _ => None,
        }
    }
}

/// Constants used when deriving loss metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffConfig {
    /// Currency units charged per kWh.
    pub tariff_rate: f64,
    /// Average hours in a billing period.
    pub hours_per_period: f64,
    pub load_factor: f64,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            tariff_rate: 12.5,
            hours_per_period: 730.0,
            load_factor: 0.8,
        }
    }
}

/// Weights of the three score components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub volume_weight: f64,
    pub pct_weight: f64,
    pub overload_weight: f64,
    /// Weight applied proportionally while load stays at or below the threshold.
    pub partial_overload_weight: f64,
    pub overload_threshold_pct: f64,
    pub clamp_pct_score: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            volume_weight: 40.0,
            pct_weight: 30.0,
            overload_weight: 30.0,
            partial_overload_weight: 15.0,
            overload_threshold_pct: 100.0,
            clamp_pct_score: false,
        }
    }
}

/// Thresholds shared by the categorizer and suggestion rule tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    pub priority_sectors: Vec<String>,
    pub operational_loss_pct: f64,
    pub overload_load_pct: f64,
    pub transformer_loss_pct: f64,
    pub high_score: f64,
    pub medium_score: f64,
    pub inspection_loss_pct: f64,
    pub audit_loss_pct: f64,
    pub maintenance_loss_pct: f64,
    pub maintenance_max_load_pct: f64,
    pub critical_band_loss_pct: f64,
    pub elevated_band_loss_pct: f64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            priority_sectors: vec!["Ensanche Luperón".to_string(), "San Isidro".to_string()],
            operational_loss_pct: 50.0,
            overload_load_pct: 100.0,
            transformer_loss_pct: 40.0,
            high_score: 70.0,
            medium_score: 40.0,
            inspection_loss_pct: 60.0,
            audit_loss_pct: 40.0,
            maintenance_loss_pct: 30.0,
            maintenance_max_load_pct: 70.0,
            critical_band_loss_pct: 50.0,
            elevated_band_loss_pct: 30.0,
        }
    }
}

impl RuleThresholds {
    pub fn is_priority_sector(&self, sector: &str) -> bool {
        self.priority_sectors.iter().any(|entry| entry == sector)
    }
}

/// Everything the engine needs, passed in explicitly at construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tariff: TariffConfig,
    pub scoring: ScoringConfig,
    pub rules: RuleThresholds,
    pub zero_delivery: ZeroDeliveryPolicy,
}

impl EngineConfig {
    /// Returns a description of the first invalid constant, if any.
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("tariff_rate", self.tariff.tariff_rate),
            ("hours_per_period", self.tariff.hours_per_period),
            ("load_factor", self.tariff.load_factor),
        ];

        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be a positive number (got {value})"));
            }
        }

        Ok(())
    }
}
