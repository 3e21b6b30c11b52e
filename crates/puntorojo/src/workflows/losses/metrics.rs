use super::config::TariffConfig;
use super::domain::{AssetRecord, DerivedMetrics, LossError};

/// Derives loss volume, loss share, monetary impact and load for one asset.
///
/// Fails with [`LossError::DivisionByZero`] when the asset delivered no energy; callers
/// decide whether that aborts the batch.
pub fn derive_metrics(
    record: &AssetRecord,
    tariff: &TariffConfig,
) -> Result<DerivedMetrics, LossError> {
    if record.energy_delivered_kwh == 0.0 {
        return Err(LossError::DivisionByZero {
            asset_id: record.asset_id.clone(),
        });
    }

    let loss_kwh = record.energy_delivered_kwh - record.energy_billed_kwh;
    let loss_pct = (loss_kwh / record.energy_delivered_kwh) * 100.0;
    let monetary_loss = loss_kwh * tariff.tariff_rate;
    let load_pct = (record.energy_delivered_kwh
        / (record.capacity_kva * tariff.hours_per_period * tariff.load_factor))
        * 100.0;

    Ok(DerivedMetrics {
        loss_kwh,
        loss_pct,
        monetary_loss,
        load_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(delivered: f64, billed: f64, capacity: f64) -> AssetRecord {
        AssetRecord {
            asset_id: "T1".to_string(),
            sector: "San Isidro".to_string(),
            latitude: 18.45,
            longitude: -69.71,
            capacity_kva: capacity,
            energy_delivered_kwh: delivered,
            energy_billed_kwh: billed,
        }
    }

    #[test]
    fn derives_reference_example() {
        let metrics =
            derive_metrics(&asset(100_000.0, 40_000.0, 150.0), &TariffConfig::default())
                .expect("metrics derive");

        assert_eq!(metrics.loss_kwh, 60_000.0);
        assert_eq!(metrics.loss_pct, 60.0);
        assert_eq!(metrics.monetary_loss, 750_000.0);
        assert!((metrics.load_pct - 114.155_251_141_552_5).abs() < 1e-9);
    }

    #[test]
    fn billed_above_delivered_yields_negative_loss() {
        let metrics = derive_metrics(&asset(1_000.0, 1_250.0, 50.0), &TariffConfig::default())
            .expect("metrics derive");

        assert_eq!(metrics.loss_kwh, -250.0);
        assert_eq!(metrics.loss_pct, -25.0);
        assert_eq!(metrics.monetary_loss, -3_125.0);
    }

    #[test]
    fn zero_delivery_is_a_typed_error() {
        let error = derive_metrics(&asset(0.0, 0.0, 150.0), &TariffConfig::default())
            .expect_err("zero delivery rejected");

        assert_eq!(
            error,
            LossError::DivisionByZero {
                asset_id: "T1".to_string()
            }
        );
    }

    #[test]
    fn tariff_overrides_change_monetary_and_load() {
        let tariff = TariffConfig {
            tariff_rate: 10.0,
            hours_per_period: 720.0,
            load_factor: 1.0,
        };
        let metrics = derive_metrics(&asset(72_000.0, 70_000.0, 100.0), &tariff)
            .expect("metrics derive");

        assert_eq!(metrics.monetary_loss, 20_000.0);
        assert_eq!(metrics.load_pct, 100.0);
    }
}
