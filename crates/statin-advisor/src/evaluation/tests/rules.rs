use super::common::*;
use crate::evaluation::rules::{evaluate_with, Rule, RULES};
use crate::evaluation::{evaluate, Classification, RuleId};

#[test]
fn unremarkable_labs_continue_therapy() {
    let recommendation = evaluate(&baseline(), &policy()).expect("evaluates");

    assert_eq!(recommendation.classification, Classification::Continue);
    assert_eq!(recommendation.risk_level, 0);
    assert!(recommendation.rationale.is_empty());
}

#[test]
fn symptomatic_critical_ck_discontinues() {
    let recommendation =
        evaluate(&measurement(1200.0, 35.0, 1.2, true), &policy()).expect("evaluates");

    assert_eq!(recommendation.classification, Classification::Discontinue);
    assert_eq!(recommendation.risk_level, 3);
    assert_eq!(recommendation.rationale, vec![RuleId::R1]);
}

#[test]
fn asymptomatic_critical_ck_only_reduces_dose() {
    let recommendation =
        evaluate(&measurement(1200.0, 35.0, 1.2, false), &policy()).expect("evaluates");

    assert_eq!(recommendation.classification, Classification::ReduceDose);
    assert_eq!(recommendation.rationale, vec![RuleId::R2]);
}

#[test]
fn high_ck_reduces_dose() {
    let recommendation =
        evaluate(&measurement(600.0, 35.0, 1.2, false), &policy()).expect("evaluates");

    assert_eq!(recommendation.classification, Classification::ReduceDose);
    assert_eq!(recommendation.risk_level, 2);
    assert_eq!(recommendation.rationale, vec![RuleId::R2]);
}

#[test]
fn liver_markers_trigger_monitoring() {
    let transaminase = evaluate(&measurement(100.0, 80.0, 1.2, false), &policy()).expect("ok");
    let bilirubin = evaluate(&measurement(100.0, 35.0, 2.4, false), &policy()).expect("ok");

    for recommendation in [transaminase, bilirubin] {
        assert_eq!(recommendation.classification, Classification::Monitor);
        assert_eq!(recommendation.risk_level, 1);
        assert_eq!(recommendation.rationale, vec![RuleId::R3]);
    }
}

#[test]
fn rationale_keeps_lower_severity_findings() {
    let recommendation =
        evaluate(&measurement(1500.0, 90.0, 3.0, true), &policy()).expect("evaluates");

    assert_eq!(recommendation.classification, Classification::Discontinue);
    assert_eq!(recommendation.rationale, vec![RuleId::R1, RuleId::R3]);

    let recommendation =
        evaluate(&measurement(700.0, 90.0, 1.0, false), &policy()).expect("evaluates");
    assert_eq!(recommendation.classification, Classification::ReduceDose);
    assert_eq!(recommendation.rationale, vec![RuleId::R2, RuleId::R3]);
}

#[test]
fn thresholds_are_exclusive() {
    let policy = policy();
    let at_limits = measurement(
        policy.ck_high,
        policy.transaminase_limit,
        policy.bilirubin_limit,
        false,
    );
    let recommendation = evaluate(&at_limits, &policy).expect("evaluates");
    assert_eq!(recommendation.classification, Classification::Continue);

    let at_critical = measurement(policy.ck_critical, 35.0, 1.2, true);
    let recommendation = evaluate(&at_critical, &policy).expect("evaluates");
    assert_eq!(recommendation.classification, Classification::ReduceDose);

    let above_critical = measurement(policy.ck_critical + 1.0, 35.0, 1.2, true);
    let recommendation = evaluate(&above_critical, &policy).expect("evaluates");
    assert_eq!(recommendation.classification, Classification::Discontinue);

    let above_high = measurement(policy.ck_high + 1.0, 35.0, 1.2, false);
    let recommendation = evaluate(&above_high, &policy).expect("evaluates");
    assert_eq!(recommendation.classification, Classification::ReduceDose);

    let above_transaminase = measurement(100.0, policy.transaminase_limit + 1.0, 1.2, false);
    let recommendation = evaluate(&above_transaminase, &policy).expect("evaluates");
    assert_eq!(recommendation.classification, Classification::Monitor);
}

#[test]
fn risk_never_drops_as_ck_rises() {
    let policy = policy();
    for symptoms in [false, true] {
        for (transaminase, bilirubin) in [(35.0, 1.2), (80.0, 1.2), (35.0, 2.0)] {
            let mut previous = 0;
            for step in 0..=60 {
                let ck = f64::from(step) * 50.0;
                let recommendation =
                    evaluate(&measurement(ck, transaminase, bilirubin, symptoms), &policy)
                        .expect("evaluates");
                assert!(
                    recommendation.risk_level >= previous,
                    "risk dropped at ck {ck} (symptoms {symptoms})"
                );
                previous = recommendation.risk_level;
            }
        }
    }
}

#[test]
fn risk_level_tracks_classification() {
    for ck in [0.0, 400.0, 800.0, 1600.0] {
        for symptoms in [false, true] {
            let recommendation =
                evaluate(&measurement(ck, 90.0, 1.0, symptoms), &policy()).expect("evaluates");
            assert_eq!(
                recommendation.risk_level,
                recommendation.classification.risk_level()
            );
        }
    }
}

#[test]
fn repeated_evaluation_is_deterministic() {
    let input = measurement(750.0, 70.0, 1.9, true);
    let first = serde_json::to_vec(&evaluate(&input, &policy()).expect("ok")).expect("json");
    for _ in 0..10 {
        let again = serde_json::to_vec(&evaluate(&input, &policy()).expect("ok")).expect("json");
        assert_eq!(first, again);
    }
}

#[test]
fn equal_severity_ties_go_to_the_earliest_rule() {
    fn always(_: &crate::evaluation::ClinicalMeasurement, _: &crate::evaluation::ThresholdPolicy) -> bool {
        true
    }
    let table = [
        Rule {
            id: RuleId::R2,
            classification: Classification::Monitor,
            fallback: false,
            applies: always,
        },
        Rule {
            id: RuleId::R3,
            classification: Classification::Monitor,
            fallback: false,
            applies: always,
        },
    ];

    let recommendation = evaluate_with(&table, &baseline(), &policy()).expect("resolves");
    assert_eq!(recommendation.classification, Classification::Monitor);
    assert_eq!(recommendation.rationale, vec![RuleId::R2, RuleId::R3]);
}

#[test]
fn table_without_fallback_is_an_internal_error() {
    let table: Vec<Rule> = RULES.into_iter().filter(|rule| !rule.fallback).collect();

    let err = evaluate_with(&table, &baseline(), &policy()).expect_err("no fallback");
    assert!(err.to_string().contains("no fallback"));
}

#[test]
fn declared_table_has_exactly_one_fallback() {
    assert_eq!(RULES.iter().filter(|rule| rule.fallback).count(), 1);
    assert_eq!(RULES.last().map(|rule| rule.id), Some(RuleId::R4));
}
