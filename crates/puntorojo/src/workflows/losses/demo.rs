//! Built-in demonstration dataset: twenty transformers along the eastern distribution
//! corridor (Distrito Nacional, Santo Domingo Este, San Pedro de Macorís).

use super::domain::AssetRecord;

// asset_id, sector, latitude, longitude, capacity_kva, delivered_kwh, billed_kwh
const DEMO_ASSETS: &[(&str, &str, f64, f64, f64, f64, f64)] = &[
    ("TF-GAZ-001", "Gazcue", 18.4709, -69.9312, 150.0, 125_000.0, 52_500.0),
    ("TF-GAZ-002", "Gazcue", 18.4735, -69.9289, 225.0, 180_000.0, 81_000.0),
    ("TF-LUP-001", "Ensanche Luperón", 18.4921, -69.9123, 300.0, 245_000.0, 98_000.0),
    ("TF-LUP-002", "Ensanche Luperón", 18.4978, -69.9089, 150.0, 98_000.0, 44_100.0),
    ("TF-LUP-003", "Ensanche Luperón", 18.5012, -69.9056, 225.0, 165_000.0, 66_000.0),
    ("TF-SIS-001", "San Isidro", 18.4532, -69.7123, 300.0, 278_000.0, 97_240.0),
    ("TF-SIS-002", "San Isidro", 18.4598, -69.7089, 150.0, 112_000.0, 50_400.0),
    ("TF-ISL-001", "San Isidro Labrador", 18.4423, -69.7234, 225.0, 189_000.0, 85_140.0),
    ("TF-ISL-002", "San Isidro Labrador", 18.4389, -69.7298, 150.0, 95_000.0, 42_750.0),
    ("TF-BCH-001", "Boca Chica", 18.4512, -69.6123, 300.0, 265_000.0, 111_300.0),
    ("TF-BCH-002", "Boca Chica", 18.4478, -69.6089, 225.0, 198_000.0, 89_100.0),
    ("TF-SPM-001", "San Pedro de Macorís", 18.4531, -69.2978, 300.0, 312_000.0, 124_800.0),
    ("TF-SPM-002", "San Pedro de Macorís", 18.4598, -69.2912, 150.0, 145_000.0, 63_250.0),
    ("TF-SPM-003", "San Pedro de Macorís", 18.4478, -69.3012, 225.0, 203_000.0, 91_350.0),
    ("TF-SDE-001", "Santo Domingo Este", 18.4856, -69.8456, 300.0, 289_000.0, 130_950.0),
    ("TF-SDE-002", "Santo Domingo Este", 18.4923, -69.8389, 150.0, 134_000.0, 60_300.0),
    ("TF-SDE-003", "Santo Domingo Este", 18.4789, -69.8523, 225.0, 176_000.0, 79_200.0),
    ("TF-GAZ-003", "Gazcue", 18.4698, -69.9267, 150.0, 108_000.0, 48_600.0),
    ("TF-LUP-004", "Ensanche Luperón", 18.4956, -69.9112, 300.0, 256_000.0, 102_400.0),
    ("TF-SPM-004", "San Pedro de Macorís", 18.4612, -69.2889, 225.0, 198_000.0, 89_100.0),
];

pub fn demo_assets() -> Vec<AssetRecord> {
    DEMO_ASSETS
        .iter()
        .map(
            |&(asset_id, sector, latitude, longitude, capacity_kva, delivered, billed)| {
                AssetRecord {
                    asset_id: asset_id.to_string(),
                    sector: sector.to_string(),
                    latitude,
                    longitude,
                    capacity_kva,
                    energy_delivered_kwh: delivered,
                    energy_billed_kwh: billed,
                }
            },
        )
        .collect()
}
