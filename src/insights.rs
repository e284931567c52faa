use crate::models::{Insights, StudentRecord, SubjectStats};

/// Averages strictly below this mark flag a student as at risk.
pub const AT_RISK_THRESHOLD: f64 = 50.0;

pub fn generate_insights(stats: &[SubjectStats], students: &[StudentRecord]) -> Insights {
    Insights {
        hardest_subject: extreme_by(stats, |s| s.mean, false),
        easiest_subject: extreme_by(stats, |s| s.mean, true),
        most_consistent_subject: extreme_by(stats, |s| s.std, false),
        at_risk_count: students
            .iter()
            .filter(|s| s.average < AT_RISK_THRESHOLD)
            .count(),
    }
}

/// Subject with the extreme value of `key`; the first subject in column
/// order wins ties.
fn extreme_by<F>(stats: &[SubjectStats], key: F, want_max: bool) -> Option<String>
where
    F: Fn(&SubjectStats) -> f64,
{
    let mut best: Option<(&str, f64)> = None;
    for s in stats {
        let value = key(s);
        let replace = match best {
            None => true,
            Some((_, current)) => {
                if want_max {
                    value > current
                } else {
                    value < current
                }
            }
        };
        if replace {
            best = Some((s.subject.as_str(), value));
        }
    }
    best.map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Grade;

    fn stat(subject: &str, mean: f64, std: f64) -> SubjectStats {
        SubjectStats {
            subject: subject.to_string(),
            mean,
            std,
            min: 0.0,
            max: 100.0,
            skew: 0.0,
        }
    }

    fn student(average: f64) -> StudentRecord {
        StudentRecord {
            student_id: "S1".to_string(),
            name: "Avery Lee".to_string(),
            class: "10".to_string(),
            section: "A".to_string(),
            marks: vec![average],
            total: average,
            average,
            rank: 1,
            grade: Grade::from_average(average),
            consistency: 0.0,
            strongest_subject: None,
            weakest_subject: None,
        }
    }

    #[test]
    fn picks_extremes_from_subject_stats() {
        let stats = vec![
            stat("Math", 70.0, 12.0),
            stat("Science", 55.0, 8.0),
            stat("English", 82.0, 20.0),
        ];
        let insights = generate_insights(&stats, &[]);
        assert_eq!(insights.hardest_subject.as_deref(), Some("Science"));
        assert_eq!(insights.easiest_subject.as_deref(), Some("English"));
        assert_eq!(insights.most_consistent_subject.as_deref(), Some("Science"));
    }

    #[test]
    fn ties_go_to_the_earlier_subject() {
        let stats = vec![stat("Math", 60.0, 10.0), stat("Science", 60.0, 10.0)];
        let insights = generate_insights(&stats, &[]);
        assert_eq!(insights.hardest_subject.as_deref(), Some("Math"));
        assert_eq!(insights.easiest_subject.as_deref(), Some("Math"));
        assert_eq!(insights.most_consistent_subject.as_deref(), Some("Math"));
    }

    #[test]
    fn at_risk_requires_a_strictly_lower_average() {
        let students = vec![student(49.99), student(50.0), student(50.01)];
        let insights = generate_insights(&[], &students);
        assert_eq!(insights.at_risk_count, 1);
    }

    #[test]
    fn zero_subject_fallback_average_counts_as_at_risk() {
        let mut record = student(0.0);
        record.marks = Vec::new();
        record.total = 0.0;
        let insights = generate_insights(&[], &[record]);
        assert_eq!(insights.at_risk_count, 1);
    }

    #[test]
    fn empty_subject_stats_yield_no_subject_insights() {
        let insights = generate_insights(&[], &[student(70.0)]);
        assert_eq!(insights.hardest_subject, None);
        assert_eq!(insights.easiest_subject, None);
        assert_eq!(insights.most_consistent_subject, None);
        assert_eq!(insights.at_risk_count, 0);
    }
}
