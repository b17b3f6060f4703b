use super::common::*;
use crate::forecast::{ForecastPolicy, VaccineSeries};

#[test]
fn hep_a_conditional_becomes_age_recommendation_for_minors() {
    for age in [2, 18] {
        assert_eq!(
            override_one(&patient(age), &VaccineSeries::HepA, "CONDITIONAL - HIGH_RISK", &[]),
            "RECOMMENDED - AGE"
        );
    }
}

#[test]
fn hep_a_conditional_stays_conditional_for_adults() {
    assert_eq!(
        override_one(&patient(19), &VaccineSeries::HepA, "CONDITIONAL - HIGH_RISK", &[]),
        "CONDITIONAL - IF_HIGH_RISK"
    );
}

#[test]
fn hep_a_leaves_other_baselines_alone() {
    assert_eq!(
        override_one(&patient(4), &VaccineSeries::HepA, "RECOMMENDED - DUE_NOW", &[]),
        "RECOMMENDED - DUE_NOW"
    );
}

#[test]
fn hib_conditional_resolves_by_risk() {
    assert_eq!(
        override_one(&high_risk_patient(30), &VaccineSeries::Hib, "CONDITIONAL - HIGH_RISK", &[]),
        "RECOMMENDED_CMC - HIGH_RISK"
    );
    assert_eq!(
        override_one(&patient(30), &VaccineSeries::Hib, "CONDITIONAL - HIGH_RISK", &[]),
        "NOT_RECOMMENDED - NOT_HIGH_RISK"
    );
    assert_eq!(
        override_one(&high_risk_patient(30), &VaccineSeries::Hib, "NOT_RECOMMENDED - COMPLETE", &[]),
        "NOT_RECOMMENDED - COMPLETE"
    );
}

#[test]
fn meningococcal_high_risk_overrides_any_baseline() {
    assert_eq!(
        override_one(
            &high_risk_patient(10),
            &VaccineSeries::Meningococcal,
            "NOT_RECOMMENDED - COMPLETE",
            &[]
        ),
        "RECOMMENDED_CMC - HIGH_RISK"
    );
    assert_eq!(
        override_one(
            &high_risk_patient(11),
            &VaccineSeries::Meningococcal,
            "RECOMMENDED - DUE_NOW",
            &[]
        ),
        "RECOMMENDED_CMC_AGE - HIGH_RISK"
    );
}

#[test]
fn meningococcal_without_risk_only_touches_conditional_baseline() {
    assert_eq!(
        override_one(&patient(14), &VaccineSeries::Meningococcal, "CONDITIONAL - HIGH_RISK", &[]),
        "CONDITIONAL - NOT_HIGH_RISK"
    );
    assert_eq!(
        override_one(&patient(14), &VaccineSeries::Meningococcal, "RECOMMENDED - DUE_NOW", &[]),
        "RECOMMENDED - DUE_NOW"
    );
}

#[test]
fn pcv13_conditional_resolves_by_risk() {
    assert_eq!(
        override_one(&high_risk_patient(40), &VaccineSeries::Pcv, "CONDITIONAL - HIGH_RISK", &[]),
        "RECOMMENDED_CMC - HIGH_RISK"
    );
    assert_eq!(
        override_one(&patient(40), &VaccineSeries::Pcv, "CONDITIONAL - HIGH_RISK", &[]),
        "NOT_RECOMMENDED - NOT_HIGH_RISK"
    );
}

#[test]
fn pcv13_label_variant_is_recognised() {
    let baseline = vec![crate::forecast::ForecastEntry::new(
        "Pneumococcal Conjugate 13 valent (PCV 13",
        "Conditional",
        decision("CONDITIONAL - HIGH_RISK"),
    )];

    let outcome = run(&engine(), &high_risk_patient(40), &baseline, &[]);

    assert_eq!(outcome.forecasts[0].decision.wire(), "RECOMMENDED_CMC - HIGH_RISK");
}

#[test]
fn hpv_needs_three_doses_from_age_nine_when_high_risk() {
    let hiv = |age| patient(age).with_icd10([HIV_ICD10]);

    assert_eq!(
        override_one(&hiv(9), &VaccineSeries::Hpv, "RECOMMENDED - DUE_NOW", &[]),
        "NEEDS_THREE_DOSES - CMC"
    );
    assert_eq!(
        override_one(&hiv(8), &VaccineSeries::Hpv, "NOT_RECOMMENDED - AGE", &[]),
        "NOT_RECOMMENDED - AGE"
    );
    assert_eq!(
        override_one(&patient(12), &VaccineSeries::Hpv, "RECOMMENDED - DUE_NOW", &[]),
        "RECOMMENDED - DUE_NOW"
    );
}

#[test]
fn recent_immunoglobulin_defers_live_vaccines() {
    let history = vec![shot("ig-1", 86, date(2023, 9, 1), &[])];

    for series in [
        VaccineSeries::Mmr,
        VaccineSeries::Varicella,
        VaccineSeries::Rotavirus,
    ] {
        assert_eq!(
            override_one(&patient(1), &series, "RECOMMENDED - DUE_NOW", &history),
            "NOT_RECOMMENDED - IG_INTERVAL"
        );
    }
    assert_eq!(
        override_one(&patient(1), &VaccineSeries::Hib, "RECOMMENDED - DUE_NOW", &history),
        "RECOMMENDED - DUE_NOW"
    );
}

#[test]
fn older_immunoglobulin_is_ignored() {
    let history = vec![shot("ig-1", 86, date(2023, 7, 31), &[])];

    assert_eq!(
        override_one(&patient(1), &VaccineSeries::Mmr, "RECOMMENDED - DUE_NOW", &history),
        "RECOMMENDED - DUE_NOW"
    );
}

#[test]
fn immunoglobulin_rule_can_be_disabled() {
    let policy = ForecastPolicy {
        immunoglobulin_interval_rule: false,
        ..ForecastPolicy::default()
    };
    let history = vec![shot("ig-1", 86, date(2023, 10, 1), &[])];
    let baseline = vec![entry(&VaccineSeries::Mmr, "RECOMMENDED - DUE_NOW")];

    let outcome = run(&engine_with(policy), &patient(1), &baseline, &history);

    assert_eq!(wire_for(&outcome, &VaccineSeries::Mmr), "RECOMMENDED - DUE_NOW");
}

#[test]
fn ppsv_passes_through_when_not_high_risk() {
    for age in [1, 5, 30, 70] {
        for wire in ["RECOMMENDED - DUE_NOW", "CONDITIONAL - HIGH_RISK", "NOT_RECOMMENDED - AGE"] {
            let baseline = vec![
                entry(&VaccineSeries::Pcv, "NOT_RECOMMENDED - COMPLETE"),
                entry(&VaccineSeries::Ppsv, wire),
            ];
            let outcome = run(&engine(), &patient(age), &baseline, &[]);
            assert_eq!(wire_for(&outcome, &VaccineSeries::Ppsv), wire);
        }
    }
}

#[test]
fn ppsv_high_risk_by_age_band() {
    let baseline = "RECOMMENDED - DUE_NOW";

    assert_eq!(
        override_one(&high_risk_patient(1), &VaccineSeries::Ppsv, baseline, &[]),
        "NOT_RECOMMENDED - AGE"
    );
    assert_eq!(
        override_one(&high_risk_patient(19), &VaccineSeries::Ppsv, baseline, &[]),
        "CONDITIONAL - IF_HIGH_RISK"
    );
    assert_eq!(
        override_one(&high_risk_patient(64), &VaccineSeries::Ppsv, baseline, &[]),
        "CONDITIONAL - IF_HIGH_RISK"
    );
    assert_eq!(
        override_one(&high_risk_patient(65), &VaccineSeries::Ppsv, baseline, &[]),
        baseline
    );
}

fn ppsv_after(pcv_wire: &str, age: i32, history: &[crate::forecast::ShotRecord]) -> String {
    let baseline = vec![
        entry(&VaccineSeries::Pcv, pcv_wire),
        entry(&VaccineSeries::Ppsv, "NOT_RECOMMENDED - AGE"),
    ];
    let outcome = run(&engine(), &high_risk_patient(age), &baseline, history);
    wire_for(&outcome, &VaccineSeries::Ppsv)
}

#[test]
fn ppsv_children_follow_pcv13_progress() {
    assert_eq!(
        ppsv_after("FUTURE_RECOMMENDED - DUE_IN_FUTURE", 6, &[]),
        "FUTURE_RECOMMENDED_CMC - PCV13_DUE_FUTURE"
    );
    assert_eq!(
        ppsv_after("RECOMMENDED - DUE_NOW", 2, &[]),
        "FUTURE_RECOMMENDED_CMC - AFTER_PCV13"
    );
    assert_eq!(
        ppsv_after("NOT_RECOMMENDED - COMPLETE", 18, &[]),
        "RECOMMENDED_CMC - PCV_COMPLETE"
    );
}

#[test]
fn ppsv_reads_pcv13_after_its_own_override() {
    // PCV13 "CONDITIONAL - HIGH_RISK" is first rewritten to RECOMMENDED_CMC for this patient.
    assert_eq!(
        ppsv_after("CONDITIONAL - HIGH_RISK", 8, &[]),
        "FUTURE_RECOMMENDED_CMC - AFTER_PCV13"
    );
}

#[test]
fn ppsv_waits_eight_weeks_after_last_pneumococcal_dose() {
    let recent = vec![shot("pn-1", 133, date(2023, 9, 15), &[])];
    let settled = vec![shot("pn-1", 133, date(2023, 9, 6), &[])];

    assert_eq!(
        ppsv_after("NOT_RECOMMENDED - COMPLETE", 6, &recent),
        "RECOMMENDED_CMC - GIVE_AFTER_MINIMUM_INTERVAL"
    );
    assert_eq!(
        ppsv_after("NOT_RECOMMENDED - COMPLETE", 6, &settled),
        "RECOMMENDED_CMC - PCV_COMPLETE"
    );
}

#[test]
fn ppsv_uses_latest_valid_pneumococcal_dose() {
    let history = vec![
        shot("pn-1", 100, date(2022, 1, 10), &[]),
        invalid(shot("pn-2", 152, date(2023, 10, 20), &[])),
        shot("other", 21, date(2023, 10, 25), &[]),
    ];

    assert_eq!(
        ppsv_after("NOT_RECOMMENDED - COMPLETE", 6, &history),
        "RECOMMENDED_CMC - PCV_COMPLETE"
    );

    let mut history = history;
    history.push(shot("pn-3", 109, date(2023, 10, 1), &[]));
    assert_eq!(
        ppsv_after("NOT_RECOMMENDED - COMPLETE", 6, &history),
        "RECOMMENDED_CMC - GIVE_AFTER_MINIMUM_INTERVAL"
    );
}

#[test]
fn ppsv_children_without_pcv13_entry_keep_baseline() {
    assert_eq!(
        override_one(&high_risk_patient(6), &VaccineSeries::Ppsv, "RECOMMENDED - DUE_NOW", &[]),
        "RECOMMENDED - DUE_NOW"
    );
}

#[test]
fn reapplying_rules_to_their_output_changes_nothing() {
    let profile = high_risk_patient(12).with_icd10([HIV_ICD10]);
    let history = vec![
        flu_shot("flu-1", date(2023, 9, 15)),
        shot("ig-1", 86, date(2023, 10, 1), &[]),
    ];
    let baseline = vec![
        entry(&VaccineSeries::HepA, "CONDITIONAL - HIGH_RISK"),
        entry(&VaccineSeries::Hib, "CONDITIONAL - HIGH_RISK"),
        entry(&VaccineSeries::Meningococcal, "CONDITIONAL - HIGH_RISK"),
        entry(&VaccineSeries::Hpv, "RECOMMENDED - DUE_NOW"),
        entry(&VaccineSeries::Mmr, "RECOMMENDED - DUE_NOW"),
        entry(&VaccineSeries::Pcv, "CONDITIONAL - HIGH_RISK"),
        entry(&VaccineSeries::Ppsv, "RECOMMENDED - DUE_NOW"),
        entry(&VaccineSeries::Influenza, "RECOMMENDED - DUE_NOW"),
    ];

    let first = run(&engine(), &profile, &baseline, &history);
    let rerun_baseline: Vec<_> = first
        .forecasts
        .iter()
        .filter(|entry| entry.series_id() != VaccineSeries::MenB)
        .cloned()
        .collect();
    let second = run(&engine(), &profile, &rerun_baseline, &history);

    assert_eq!(second.forecasts, first.forecasts);
    assert!(second
        .overrides
        .iter()
        .all(|applied| applied.series == VaccineSeries::MenB.label() && applied.before.is_none()));
}
