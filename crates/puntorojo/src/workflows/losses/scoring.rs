use super::config::ScoringConfig;
use super::domain::{AssetRecord, DerivedMetrics, ScoreComponents};

/// Asset with its derived metrics, ready for batch scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredAsset {
    pub record: AssetRecord,
    pub metrics: DerivedMetrics,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAsset {
    pub record: AssetRecord,
    pub metrics: DerivedMetrics,
    pub scores: ScoreComponents,
    pub priority_score: f64,
}

/// Scores a whole batch and returns it ranked by descending priority score.
///
/// Volume is relative to the largest loss in the batch, so the maximum is taken in a
/// first pass before any record is scored. Ties keep their input order.
pub fn score_batch(batch: Vec<MeasuredAsset>, config: &ScoringConfig) -> Vec<ScoredAsset> {
    let max_loss = batch
        .iter()
        .map(|asset| asset.metrics.loss_kwh)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut scored: Vec<ScoredAsset> = batch
        .into_iter()
        .map(|asset| {
            let scores = ScoreComponents {
                volume_score: volume_score(asset.metrics.loss_kwh, max_loss, config),
                pct_score: pct_score(asset.metrics.loss_pct, config),
                overload_score: overload_score(asset.metrics.load_pct, config),
            };
            ScoredAsset {
                priority_score: scores.total(),
                record: asset.record,
                metrics: asset.metrics,
                scores,
            }
        })
        .collect();

    scored.sort_by(|left, right| right.priority_score.total_cmp(&left.priority_score));
    scored
}

pub(crate) fn volume_score(loss_kwh: f64, max_loss: f64, config: &ScoringConfig) -> f64 {
    // Empty batches leave max_loss at -inf; non-positive maxima have no scale.
    if max_loss <= 0.0 {
        return 0.0;
    }

    ((loss_kwh / max_loss) * config.volume_weight).max(0.0)
}

pub(crate) fn pct_score(loss_pct: f64, config: &ScoringConfig) -> f64 {
    let score = (loss_pct / 100.0) * config.pct_weight;
    if config.clamp_pct_score {
        score.clamp(0.0, config.pct_weight)
    } else {
        score
    }
}

pub(crate) fn overload_score(load_pct: f64, config: &ScoringConfig) -> f64 {
    if load_pct > config.overload_threshold_pct {
        config.overload_weight
    } else {
        (load_pct / 100.0) * config.partial_overload_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured(asset_id: &str, loss_kwh: f64, loss_pct: f64, load_pct: f64) -> MeasuredAsset {
        MeasuredAsset {
            record: AssetRecord {
                asset_id: asset_id.to_string(),
                sector: "Gazcue".to_string(),
                latitude: 18.47,
                longitude: -69.93,
                capacity_kva: 150.0,
                energy_delivered_kwh: 100_000.0,
                energy_billed_kwh: 100_000.0 - loss_kwh,
            },
            metrics: DerivedMetrics {
                loss_kwh,
                loss_pct,
                monetary_loss: loss_kwh * 12.5,
                load_pct,
            },
        }
    }

    #[test]
    fn overload_has_a_discontinuity_above_threshold() {
        let config = ScoringConfig::default();
        assert_eq!(overload_score(100.0, &config), 15.0);
        assert_eq!(overload_score(100.0001, &config), 30.0);
        assert_eq!(overload_score(50.0, &config), 7.5);
    }

    #[test]
    fn pct_score_is_unclamped_by_default() {
        let config = ScoringConfig::default();
        assert_eq!(pct_score(60.0, &config), 18.0);
        assert_eq!(pct_score(150.0, &config), 45.0);

        let clamped = ScoringConfig {
            clamp_pct_score: true,
            ..ScoringConfig::default()
        };
        assert_eq!(pct_score(150.0, &clamped), 30.0);
        assert_eq!(pct_score(-20.0, &clamped), 0.0);
    }

    #[test]
    fn volume_is_relative_to_batch_maximum() {
        let scored = score_batch(
            vec![
                measured("A", 30_000.0, 30.0, 50.0),
                measured("B", 60_000.0, 60.0, 50.0),
                measured("C", -5_000.0, -5.0, 50.0),
            ],
            &ScoringConfig::default(),
        );

        let by_id = |id: &str| {
            scored
                .iter()
                .find(|asset| asset.record.asset_id == id)
                .expect("asset scored")
        };
        assert_eq!(by_id("B").scores.volume_score, 40.0);
        assert_eq!(by_id("A").scores.volume_score, 20.0);
        assert_eq!(by_id("C").scores.volume_score, 0.0);
        assert!(scored
            .iter()
            .all(|asset| (0.0..=40.0).contains(&asset.scores.volume_score)));
    }

    #[test]
    fn non_positive_maximum_zeroes_volume() {
        let scored = score_batch(
            vec![
                measured("A", 0.0, 0.0, 10.0),
                measured("B", -10.0, -1.0, 10.0),
            ],
            &ScoringConfig::default(),
        );

        assert!(scored.iter().all(|asset| asset.scores.volume_score == 0.0));
        assert!(score_batch(Vec::new(), &ScoringConfig::default()).is_empty());
    }

    #[test]
    fn ranking_is_descending_and_stable_for_ties() {
        let scored = score_batch(
            vec![
                measured("first", 10_000.0, 20.0, 40.0),
                measured("top", 40_000.0, 40.0, 120.0),
                measured("second", 10_000.0, 20.0, 40.0),
            ],
            &ScoringConfig::default(),
        );

        let order: Vec<&str> = scored
            .iter()
            .map(|asset| asset.record.asset_id.as_str())
            .collect();
        assert_eq!(order, vec!["top", "first", "second"]);
        assert_eq!(
            scored[0].priority_score,
            scored[0].scores.volume_score + scored[0].scores.pct_score + 30.0
        );
    }
}
