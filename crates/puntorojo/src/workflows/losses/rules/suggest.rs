use super::super::config::RuleThresholds;
use super::super::domain::Intervention;
use super::RuleInput;

pub struct SuggestionRule {
    pub name: &'static str,
    pub suggest: fn(&RuleInput<'_>, &RuleThresholds) -> Option<Intervention>,
}

/// Every rule runs; directives accumulate in table order.
pub const SUGGESTION_RULES: &[SuggestionRule] = &[
    SuggestionRule {
        name: "network_normalization",
        suggest: network_normalization,
    },
    SuggestionRule {
        name: "transformer_replacement",
        suggest: transformer_replacement,
    },
    SuggestionRule {
        name: "technical_inspection",
        suggest: technical_inspection,
    },
    SuggestionRule {
        name: "network_audit",
        suggest: network_audit,
    },
    SuggestionRule {
        name: "preventive_maintenance",
        suggest: preventive_maintenance,
    },
];

fn network_normalization(
    input: &RuleInput<'_>,
    thresholds: &RuleThresholds,
) -> Option<Intervention> {
    (thresholds.is_priority_sector(input.sector)
        && input.loss_pct > thresholds.operational_loss_pct)
        .then_some(Intervention::NetworkNormalization)
}

fn transformer_replacement(
    input: &RuleInput<'_>,
    thresholds: &RuleThresholds,
) -> Option<Intervention> {
    (input.load_pct > thresholds.overload_load_pct).then_some(
        Intervention::TransformerReplacement {
            load_pct: input.load_pct,
        },
    )
}

fn technical_inspection(
    input: &RuleInput<'_>,
    thresholds: &RuleThresholds,
) -> Option<Intervention> {
    (input.loss_pct > thresholds.inspection_loss_pct).then_some(Intervention::TechnicalInspection)
}

// Inspection and audit are exclusive: the audit only fires below the inspection bar.
fn network_audit(input: &RuleInput<'_>, thresholds: &RuleThresholds) -> Option<Intervention> {
    (input.loss_pct <= thresholds.inspection_loss_pct
        && input.loss_pct > thresholds.audit_loss_pct)
        .then_some(Intervention::NetworkAudit)
}

fn preventive_maintenance(
    input: &RuleInput<'_>,
    thresholds: &RuleThresholds,
) -> Option<Intervention> {
    (input.loss_pct > thresholds.maintenance_loss_pct
        && input.load_pct < thresholds.maintenance_max_load_pct)
        .then_some(Intervention::PreventiveMaintenance)
}

pub fn suggest(input: &RuleInput<'_>, thresholds: &RuleThresholds) -> Vec<Intervention> {
    SUGGESTION_RULES
        .iter()
        .filter_map(|rule| (rule.suggest)(input, thresholds))
        .collect()
}
