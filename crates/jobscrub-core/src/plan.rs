//! Deletion planning: which evaluated jobs exceed the staleness threshold.

use crate::staleness::EvaluatedJob;

/// Select the jobs to delete.
///
/// The boundary is exclusive: a job last built exactly `max_days` ago is
/// kept. With `sort_by_staleness` the plan is ordered ascending by days
/// since last build (stable, ties keep their input order); sorting is a
/// presentation concern and never changes which jobs are selected.
pub fn plan(evaluated: Vec<EvaluatedJob>, max_days: u32, sort_by_staleness: bool) -> Vec<EvaluatedJob> {
    let mut stale: Vec<EvaluatedJob> = evaluated
        .into_iter()
        .filter(|job| job.days_since_last_build > u64::from(max_days))
        .collect();
    if sort_by_staleness {
        stale.sort_by_key(|job| job.days_since_last_build);
    }
    stale
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn job(name: &str, days: u64) -> EvaluatedJob {
        EvaluatedJob {
            name: name.to_string(),
            last_build_number: 1,
            last_build_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            days_since_last_build: days,
        }
    }

    fn names(jobs: &[EvaluatedJob]) -> Vec<&str> {
        jobs.iter().map(|job| job.name.as_str()).collect()
    }

    #[test]
    fn test_boundary_is_exclusive() {
        let selected = plan(vec![job("exact", 30)], 30, false);
        assert!(selected.is_empty());
    }

    #[test]
    fn test_one_past_boundary_is_selected() {
        let selected = plan(vec![job("stale", 31)], 30, false);
        assert_eq!(names(&selected), vec!["stale"]);
    }

    #[test]
    fn test_unsorted_preserves_input_order() {
        let selected = plan(vec![job("a", 40), job("b", 50), job("c", 35)], 30, false);
        assert_eq!(names(&selected), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_is_stable_and_ascending() {
        let selected = plan(vec![job("a", 40), job("b", 10), job("c", 10)], 5, true);
        assert_eq!(names(&selected), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_does_not_change_membership() {
        let input = vec![job("a", 40), job("b", 10), job("c", 35)];
        let unsorted = plan(input.clone(), 30, false);
        let sorted = plan(input, 30, true);

        let mut unsorted_names = names(&unsorted);
        let mut sorted_names = names(&sorted);
        unsorted_names.sort_unstable();
        sorted_names.sort_unstable();
        assert_eq!(unsorted_names, sorted_names);
    }
}
