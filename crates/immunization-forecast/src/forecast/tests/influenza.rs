use super::common::*;
use crate::forecast::{
    forecast_influenza, FluSeasonWindow, FluStatus, ForecastEntry, Gender, InfluenzaForecast,
    RiskProfile, ShotRecord, VaccineSeries,
};

fn flu(dob: chrono::NaiveDate, history: &[ShotRecord]) -> InfluenzaForecast {
    let profile = RiskProfile::new(dob, Gender::Male, audit_date()).expect("valid profile");
    let window = FluSeasonWindow::containing(audit_date());
    forecast_influenza(history, &profile, &window).expect("influenza forecast")
}

#[test]
fn two_current_season_doses_complete_a_young_child() {
    let history = vec![
        flu_shot("flu-1", date(2023, 9, 15)),
        flu_shot("flu-2", date(2023, 10, 20)),
    ];

    let result = flu(date(2018, 6, 1), &history);

    assert_eq!(result.status, FluStatus::Complete);
    assert_eq!(result.current_season_doses, 2);
    assert_eq!(result.prior_season_doses, 0);
    assert_eq!(result.decision().wire(), "NOT_RECOMMENDED - COMPLETE");
    assert_eq!(result.due_date, None);
}

#[test]
fn infants_are_due_at_six_months() {
    let result = flu(date(2023, 7, 1), &[]);

    assert_eq!(result.status, FluStatus::NotEligible);
    assert_eq!(result.decision().wire(), "FUTURE_RECOMMENDED - DUE_IN_FUTURE");
    assert_eq!(result.due_date, Some(date(2024, 1, 1)));
    assert_eq!(result.status.status_text(), "Future Recommendation");
}

#[test]
fn exactly_six_months_follows_dose_requirements() {
    let result = flu(date(2023, 5, 1), &[]);

    assert_eq!(result.status, FluStatus::Due);
    assert_eq!(result.decision().wire(), "RECOMMENDED - DUE_NOW");
    assert_eq!(result.status.status_text(), "Recommended");
}

#[test]
fn two_prior_season_doses_need_one_more() {
    let prior = vec![
        flu_shot("flu-1", date(2022, 9, 1)),
        flu_shot("flu-2", date(2022, 10, 15)),
    ];
    assert_eq!(flu(date(2018, 6, 1), &prior).status, FluStatus::Due);

    let mut history = prior;
    history.push(flu_shot("flu-3", date(2023, 9, 1)));
    let result = flu(date(2018, 6, 1), &history);
    assert_eq!(result.prior_season_doses, 2);
    assert_eq!(result.current_season_doses, 1);
    assert_eq!(result.status, FluStatus::Complete);
}

#[test]
fn one_prior_season_dose_still_needs_two() {
    let history = vec![
        flu_shot("flu-1", date(2022, 9, 1)),
        flu_shot("flu-2", date(2023, 9, 1)),
    ];

    assert_eq!(flu(date(2018, 6, 1), &history).status, FluStatus::Due);
}

#[test]
fn nine_and_older_need_one_current_dose() {
    let current = vec![flu_shot("flu-1", date(2023, 9, 1))];
    let prior_only = vec![flu_shot("flu-1", date(2022, 9, 1))];

    assert_eq!(flu(date(2014, 6, 1), &current).status, FluStatus::Complete);
    assert_eq!(flu(date(2014, 6, 1), &prior_only).status, FluStatus::Due);
    assert_eq!(flu(date(1980, 6, 1), &[]).status, FluStatus::Due);
}

#[test]
fn recent_dose_pushes_next_one_into_future() {
    let history = vec![flu_shot("flu-1", date(2023, 10, 20))];

    let result = flu(date(2018, 6, 1), &history);

    assert_eq!(result.status, FluStatus::NotYetDue);
    assert_eq!(result.due_date, Some(date(2023, 11, 17)));
    assert_eq!(result.decision().wire(), "FUTURE_RECOMMENDED - DUE_IN_FUTURE");
}

#[test]
fn doses_closer_than_twenty_four_days_count_once() {
    let history = vec![
        flu_shot("flu-1", date(2023, 9, 1)),
        flu_shot("flu-2", date(2023, 9, 10)),
    ];

    let result = flu(date(2018, 6, 1), &history);

    assert_eq!(result.current_season_doses, 1);
    assert_eq!(result.status, FluStatus::Due);
}

#[test]
fn dose_on_cutoff_date_counts_for_neither_season() {
    let history = vec![flu_shot("flu-1", date(2023, 8, 1))];

    let result = flu(date(2000, 6, 1), &history);

    assert_eq!(result.prior_season_doses, 0);
    assert_eq!(result.current_season_doses, 0);
    assert_eq!(result.status, FluStatus::Due);
}

#[test]
fn only_influenza_series_doses_are_counted() {
    let history = vec![
        shot("mmr-1", 3, date(2023, 9, 1), &["MMR Vaccine Group"]),
        shot(
            "flu-1",
            150,
            date(2023, 9, 5),
            &["Immunization Evaluation Focus (Influenza Vaccine Group)"],
        ),
        invalid(flu_shot("flu-2", date(2023, 10, 5))),
    ];

    let result = flu(date(2000, 6, 1), &history);

    assert_eq!(result.current_season_doses, 2);
}

#[test]
fn engine_overwrites_influenza_entry() {
    let mut baseline_entry = entry(&VaccineSeries::Influenza, "RECOMMENDED - DUE_NOW");
    baseline_entry.date_criteria.push(date(2023, 9, 1));
    let profile = RiskProfile::new(date(2023, 7, 1), Gender::Female, audit_date())
        .expect("valid profile");

    let outcome = run(&engine(), &profile, &[baseline_entry], &[]);
    let influenza = outcome
        .entry(&VaccineSeries::Influenza)
        .expect("influenza entry");

    assert_eq!(influenza.decision.wire(), "FUTURE_RECOMMENDED - DUE_IN_FUTURE");
    assert_eq!(influenza.forecast_status, "Future Recommendation");
    assert_eq!(influenza.date_criteria, vec![date(2024, 1, 1)]);
}

#[test]
fn engine_does_not_invent_an_influenza_entry() {
    let baseline: Vec<ForecastEntry> = vec![entry(&VaccineSeries::Hib, "NOT_RECOMMENDED - COMPLETE")];

    let outcome = run(&engine(), &patient(5), &baseline, &[flu_shot("flu-1", date(2023, 9, 1))]);

    assert!(outcome.entry(&VaccineSeries::Influenza).is_none());
}
