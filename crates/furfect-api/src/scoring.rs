//! Adoption qualification scoring.
//!
//! Contributions are additive and independent, evaluated in a fixed order
//! with no early exit. Within the two banded questions the higher band is
//! checked first.

use furfect_types::models::{Application, Recommendation};

const EXPERIENCE_POINTS: u8 = 25;
const TIME_OVER_5_POINTS: u8 = 25;
const TIME_2_TO_5_POINTS: u8 = 15;
const LIVING_SPACE_POINTS: u8 = 20;
const BUDGET_OVER_5000_POINTS: u8 = 20;
const BUDGET_2000_TO_5000_POINTS: u8 = 10;
const REASON_POINTS: u8 = 10;

/// Reasons at least this many characters long earn a bonus.
pub const MIN_REASON_CHARS: usize = 30;

pub fn score(app: &Application) -> (u8, Recommendation) {
    let mut score = 0;

    if app.experience == "yes" {
        score += EXPERIENCE_POINTS;
    }

    if app.time_with_pet == ">5" {
        score += TIME_OVER_5_POINTS;
    } else if app.time_with_pet == "2-5" {
        score += TIME_2_TO_5_POINTS;
    }

    if app.living_space == "yes" {
        score += LIVING_SPACE_POINTS;
    }

    if app.budget == ">5000" {
        score += BUDGET_OVER_5000_POINTS;
    } else if app.budget == "2000-5000" {
        score += BUDGET_2000_TO_5000_POINTS;
    }

    if app.reason.chars().count() >= MIN_REASON_CHARS {
        score += REASON_POINTS;
    }

    (score, recommend(score))
}

/// Map a score to its tier, highest threshold first.
pub fn recommend(score: u8) -> Recommendation {
    if score >= 80 {
        Recommendation::HighlyQualified
    } else if score >= 60 {
        Recommendation::Qualified
    } else if score >= 40 {
        Recommendation::MayNeedAssistance
    } else {
        Recommendation::NotQualified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(experience: &str, time: &str, space: &str, budget: &str, reason_len: usize) -> Application {
        Application {
            experience: experience.into(),
            time_with_pet: time.into(),
            living_space: space.into(),
            budget: budget.into(),
            reason: "r".repeat(reason_len),
        }
    }

    #[test]
    fn nothing_scores_zero() {
        let (score, label) = score(&app("no", "1-2", "no", "<2000", 29));
        assert_eq!(score, 0);
        assert_eq!(label, Recommendation::NotQualified);
    }

    #[test]
    fn everything_scores_hundred() {
        let (score, label) = score(&app("yes", ">5", "yes", ">5000", 30));
        assert_eq!(score, 100);
        assert_eq!(label, Recommendation::HighlyQualified);
    }

    #[test]
    fn forty_is_may_need_assistance() {
        let (score, label) = score(&app("yes", "2-5", "no", "<2000", 10));
        assert_eq!(score, 40);
        assert_eq!(label, Recommendation::MayNeedAssistance);
    }

    #[test]
    fn lower_bands() {
        // 15 + 10 + 10
        let (score, label) = score(&app("no", "2-5", "no", "2000-5000", 31));
        assert_eq!(score, 35);
        assert_eq!(label, Recommendation::NotQualified);
    }

    #[test]
    fn unknown_band_values_earn_nothing() {
        let (score, _) = score(&app("YES", "5+", "Yes", "5000+", 0));
        assert_eq!(score, 0);
    }

    #[test]
    fn reason_length_counts_characters() {
        let mut a = app("no", "", "no", "", 0);
        a.reason = "é".repeat(30);
        assert_eq!(score(&a).0, 10);
    }

    #[test]
    fn thresholds() {
        assert_eq!(recommend(100), Recommendation::HighlyQualified);
        assert_eq!(recommend(80), Recommendation::HighlyQualified);
        assert_eq!(recommend(79), Recommendation::Qualified);
        assert_eq!(recommend(60), Recommendation::Qualified);
        assert_eq!(recommend(59), Recommendation::MayNeedAssistance);
        assert_eq!(recommend(40), Recommendation::MayNeedAssistance);
        assert_eq!(recommend(39), Recommendation::NotQualified);
        assert_eq!(recommend(0), Recommendation::NotQualified);
    }

    #[test]
    fn deterministic_over_all_band_combinations() {
        let experiences = ["yes", "no"];
        let times = [">5", "2-5", "1-2"];
        let spaces = ["yes", "no"];
        let budgets = [">5000", "2000-5000", "<2000"];
        let reasons = [0, 29, 30, 200];

        for e in experiences {
            for t in times {
                for s in spaces {
                    for b in budgets {
                        for r in reasons {
                            let a = app(e, t, s, b, r);
                            let first = score(&a);
                            assert!(first.0 <= 100);
                            assert_eq!(first, score(&a));
                            assert_eq!(first.1, recommend(first.0));
                        }
                    }
                }
            }
        }
    }
}
