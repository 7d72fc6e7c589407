use super::measurement::ClinicalMeasurement;
use super::policy::ThresholdPolicy;
use super::{Classification, Recommendation, RuleId};

pub(crate) struct Rule {
    pub id: RuleId,
    pub classification: Classification,
    /// Fallback rules fire only when nothing else did and are left out of the rationale.
    pub fallback: bool,
    pub applies: fn(&ClinicalMeasurement, &ThresholdPolicy) -> bool,
}

impl Rule {
    pub fn severity(&self) -> u8 {
        self.classification.risk_level()
    }
}

fn myopathy_with_symptoms(measurement: &ClinicalMeasurement, policy: &ThresholdPolicy) -> bool {
    measurement.muscle_symptoms() && measurement.ck_value() > policy.ck_critical
}

fn elevated_ck(measurement: &ClinicalMeasurement, policy: &ThresholdPolicy) -> bool {
    measurement.ck_value() > policy.ck_high && !myopathy_with_symptoms(measurement, policy)
}

fn hepatic_stress(measurement: &ClinicalMeasurement, policy: &ThresholdPolicy) -> bool {
    measurement.transaminase() > policy.transaminase_limit
        || measurement.bilirubin() > policy.bilirubin_limit
}

fn no_findings(_: &ClinicalMeasurement, _: &ThresholdPolicy) -> bool {
    true
}

/// Declaration order is evaluation order and breaks severity ties.
pub(crate) const RULES: [Rule; 4] = [
    Rule {
        id: RuleId::R1,
        classification: Classification::Discontinue,
        fallback: false,
        applies: myopathy_with_symptoms,
    },
    Rule {
        id: RuleId::R2,
        classification: Classification::ReduceDose,
        fallback: false,
        applies: elevated_ck,
    },
    Rule {
        id: RuleId::R3,
        classification: Classification::Monitor,
        fallback: false,
        applies: hepatic_stress,
    },
    Rule {
        id: RuleId::R4,
        classification: Classification::Continue,
        fallback: true,
        applies: no_findings,
    },
];

/// The rule table produced no single classification for a measurement.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("rule table did not resolve to exactly one classification: {reason}")]
pub struct InternalEvaluationError {
    pub reason: String,
}

/// Classify a measurement against a threshold snapshot.
///
/// Every rule is checked so the rationale is complete; the most severe fired rule decides the
/// classification, the earliest one winning a tie.
pub fn evaluate(
    measurement: &ClinicalMeasurement,
    policy: &ThresholdPolicy,
) -> Result<Recommendation, InternalEvaluationError> {
    evaluate_with(&RULES, measurement, policy)
}

pub(crate) fn evaluate_with(
    rules: &[Rule],
    measurement: &ClinicalMeasurement,
    policy: &ThresholdPolicy,
) -> Result<Recommendation, InternalEvaluationError> {
    let mut rationale = Vec::new();
    let mut decisive: Option<&Rule> = None;

    for rule in rules.iter().filter(|rule| !rule.fallback) {
        if !(rule.applies)(measurement, policy) {
            continue;
        }
        rationale.push(rule.id);
        if decisive.map_or(true, |current| rule.severity() > current.severity()) {
            decisive = Some(rule);
        }
    }

    let decisive = match decisive {
        Some(rule) => rule,
        None => {
            let mut fallbacks = rules
                .iter()
                .filter(|rule| rule.fallback && (rule.applies)(measurement, policy));
            match (fallbacks.next(), fallbacks.next()) {
                (Some(rule), None) => rule,
                (None, _) => {
                    return Err(InternalEvaluationError {
                        reason: "no rule fired and no fallback applies".to_string(),
                    })
                }
                (Some(first), Some(second)) => {
                    return Err(InternalEvaluationError {
                        reason: format!(
                            "fallback rules {} and {} both apply",
                            first.id, second.id
                        ),
                    })
                }
            }
        }
    };

    Ok(Recommendation {
        classification: decisive.classification,
        risk_level: decisive.severity(),
        rationale,
    })
}
