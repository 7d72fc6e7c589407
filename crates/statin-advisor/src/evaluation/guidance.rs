use super::{Classification, RuleId};

/// Clinician-facing follow-up advice for a fired rule.
pub fn rule_guidance(rule: RuleId) -> &'static str {
    match rule {
        RuleId::R1 => {
            "CK above the critical limit with muscle symptoms: withdraw statin, hydrate, and monitor renal function."
        }
        RuleId::R2 => {
            "CK above the high limit: reduce the dose or switch statin, consider nonstatin-related causes, and recheck CK in 2-4 weeks."
        }
        RuleId::R3 => {
            "Transaminase or bilirubin above limit: reassess liver function and bilirubin in 2-4 weeks; consult hepatology if it persists."
        }
        RuleId::R4 => {
            "No markers above limits: continue statin with a follow-up liver function test in 12 weeks."
        }
    }
}

pub fn classification_summary(classification: Classification) -> &'static str {
    match classification {
        Classification::Continue => "Continue statin therapy",
        Classification::Monitor => "Continue statin therapy with closer monitoring",
        Classification::ReduceDose => "Reduce statin dose",
        Classification::Discontinue => "Discontinue statin therapy",
    }
}
