use super::super::config::RuleThresholds;
use super::super::domain::PriorityCategory;
use super::RuleInput;

pub struct CategoryRule {
    pub name: &'static str,
    pub applies: fn(&RuleInput<'_>, &RuleThresholds) -> bool,
    pub category: PriorityCategory,
}

/// Evaluated top to bottom; the first rule that applies decides the tier.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        name: "priority_sector_with_severe_loss",
        applies: priority_sector_with_severe_loss,
        category: PriorityCategory::CriticalOperational,
    },
    CategoryRule {
        name: "overloaded_with_high_loss",
        applies: overloaded_with_high_loss,
        category: PriorityCategory::CriticalTransformer,
    },
    CategoryRule {
        name: "high_score",
        applies: high_score,
        category: PriorityCategory::High,
    },
    CategoryRule {
        name: "medium_score",
        applies: medium_score,
        category: PriorityCategory::Medium,
    },
    CategoryRule {
        name: "fallback",
        applies: always,
        category: PriorityCategory::Low,
    },
];

fn priority_sector_with_severe_loss(input: &RuleInput<'_>, thresholds: &RuleThresholds) -> bool {
    thresholds.is_priority_sector(input.sector) && input.loss_pct > thresholds.operational_loss_pct
}

fn overloaded_with_high_loss(input: &RuleInput<'_>, thresholds: &RuleThresholds) -> bool {
    input.load_pct > thresholds.overload_load_pct
        && input.loss_pct > thresholds.transformer_loss_pct
}

fn high_score(input: &RuleInput<'_>, thresholds: &RuleThresholds) -> bool {
    input.priority_score > thresholds.high_score
}

fn medium_score(input: &RuleInput<'_>, thresholds: &RuleThresholds) -> bool {
    input.priority_score > thresholds.medium_score
}

fn always(_: &RuleInput<'_>, _: &RuleThresholds) -> bool {
    true
}

pub fn categorize(input: &RuleInput<'_>, thresholds: &RuleThresholds) -> PriorityCategory {
    CATEGORY_RULES
        .iter()
        .find(|rule| (rule.applies)(input, thresholds))
        .map(|rule| rule.category)
        .unwrap_or(PriorityCategory::Low)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(sector: &str, loss_pct: f64, load_pct: f64, priority_score: f64) -> RuleInput<'_> {
        RuleInput {
            sector,
            loss_pct,
            load_pct,
            priority_score,
        }
    }

    #[test]
    fn sector_rule_wins_over_score_rule() {
        let thresholds = RuleThresholds::default();
        let category = categorize(&input("San Isidro", 55.0, 80.0, 95.0), &thresholds);
        assert_eq!(category, PriorityCategory::CriticalOperational);
    }

    #[test]
    fn overload_rule_requires_both_conditions() {
        let thresholds = RuleThresholds::default();
        assert_eq!(
            categorize(&input("Gazcue", 41.0, 101.0, 20.0), &thresholds),
            PriorityCategory::CriticalTransformer
        );
        assert_eq!(
            categorize(&input("Gazcue", 41.0, 100.0, 20.0), &thresholds),
            PriorityCategory::Low
        );
        assert_eq!(
            categorize(&input("Gazcue", 40.0, 130.0, 20.0), &thresholds),
            PriorityCategory::Low
        );
    }

    #[test]
    fn score_thresholds_are_strict() {
        let thresholds = RuleThresholds::default();
        assert_eq!(
            categorize(&input("Gazcue", 10.0, 50.0, 70.0), &thresholds),
            PriorityCategory::Medium
        );
        assert_eq!(
            categorize(&input("Gazcue", 10.0, 50.0, 70.01), &thresholds),
            PriorityCategory::High
        );
        assert_eq!(
            categorize(&input("Gazcue", 10.0, 50.0, 40.0), &thresholds),
            PriorityCategory::Low
        );
    }

    #[test]
    fn priority_sectors_come_from_configuration() {
        let thresholds = RuleThresholds {
            priority_sectors: vec!["Boca Chica".to_string()],
            ..RuleThresholds::default()
        };
        assert_eq!(
            categorize(&input("Boca Chica", 51.0, 60.0, 30.0), &thresholds),
            PriorityCategory::CriticalOperational
        );
        assert_eq!(
            categorize(&input("San Isidro", 51.0, 60.0, 30.0), &thresholds),
            PriorityCategory::Low
        );
    }

    #[test]
    fn rule_table_ends_with_fallback() {
        let last = CATEGORY_RULES.last().expect("rules present");
        assert_eq!(last.category, PriorityCategory::Low);
        assert_eq!(CATEGORY_RULES.len(), 5);
    }
}
