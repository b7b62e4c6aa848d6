//! Sequential Phragmén: an iterative load-balancing rule. Each round picks
//! the project that imposes the least load on its approvers, tie-broken by
//! the supplied comparator, until the budget can no longer fund the
//! current round's tied minimum.

use crate::comparator::ProjectComparator;
use crate::numeric;
use crate::project::{Election, Project};
use alloc::vec;
use alloc::vec::Vec;

fn max_load(project: &Project, load: &[f64]) -> f64 {
    if project.approvers().is_empty() {
        return f64::INFINITY;
    }
    let carried: f64 = project.approvers().iter().map(|&v| load[v]).sum();
    (project.cost() as f64 + carried) / project.approvers().len() as f64
}

fn tied_minimum<'a>(
    remaining: &[usize],
    projects: &'a [Project],
    load: &[f64],
) -> (f64, Vec<&'a Project>) {
    let max_loads: Vec<f64> = remaining.iter().map(|&i| max_load(&projects[i], load)).collect();
    let min_load = max_loads
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let tied = remaining
        .iter()
        .zip(max_loads.iter())
        .filter(|(_, &ml)| {
            (ml.is_infinite() && min_load.is_infinite()) || numeric::equal(ml, min_load)
        })
        .map(|(&i, _)| &projects[i])
        .collect();
    (min_load, tied)
}

/// Run the sequential Phragmén rule.
pub fn phragmen(election: &Election, tie_break: &ProjectComparator) -> Vec<Project> {
    let projects = election.projects();
    let mut load = vec![0.0f64; election.num_voters()];
    let mut budget_remaining = election.budget() as i64;
    let mut remaining: Vec<usize> = (0..projects.len()).collect();
    let mut winners = Vec::new();

    while !remaining.is_empty() {
        let (min_load, tied) = tied_minimum(&remaining, projects, &load);
        if tied.iter().any(|p| p.cost() as i64 > budget_remaining) {
            break;
        }
        let winner = tie_break.min(&tied);
        for &v in winner.approvers() {
            load[v] = min_load;
        }
        budget_remaining -= winner.cost() as i64;
        let winner_id = winner.id();
        winners.push(winner.clone());
        remaining.retain(|&i| projects[i].id() != winner_id);
    }

    winners
}

/// Greedy's `cost_reduction` walk (see `rules::greedy`), restricted to a
/// caller-supplied slice of projects and budget. Used by
/// [`cost_reduction_for_phragmen`] to handle the degenerate round where
/// every remaining project (including `p`) has zero approvers, so every
/// `maxLoad` is `+infinity` and the ordinary load comparison carries no
/// information.
fn greedy_fallback(
    candidates: &[&Project],
    pp: &Project,
    tie_break: &ProjectComparator,
    budget: i64,
) -> Option<i64> {
    let mut order: Vec<&Project> = candidates.to_vec();
    order.sort_by(|a, b| tie_break.compare(a, b));

    let mut remaining = budget;
    let mut best: Option<i64> = None;
    for project in order {
        if project.cost() as i64 <= remaining {
            if project.id() == pp.id() {
                return Some(pp.cost() as i64);
            }
            let hypothetical = pp.with_cost(project.cost().saturating_sub(1));
            if tie_break.precedes(&hypothetical, project) {
                best = numeric::optional_max(best, project.cost() as i64 - 1);
            }
            remaining -= project.cost() as i64;
        } else if project.id() == pp.id() {
            best = numeric::optional_max(best, remaining);
        }
    }
    best
}

/// The maximum price at which project `p` would have been selected by
/// [`phragmen`], or `None` if no price would suffice.
pub fn cost_reduction_for_phragmen(
    election: &Election,
    p: usize,
    tie_break: &ProjectComparator,
) -> Option<u64> {
    let projects = election.projects();
    let pp = &projects[p];

    let mut load = vec![0.0f64; election.num_voters()];
    let mut budget_remaining = election.budget() as i64;
    let mut remaining: Vec<usize> = (0..projects.len()).collect();
    let mut best: Option<i64> = None;

    while !remaining.is_empty() {
        let (min_load, tied) = tied_minimum(&remaining, projects, &load);
        if tied.iter().any(|p| p.cost() as i64 > budget_remaining) {
            break;
        }
        let winner = tie_break.min(&tied);

        if winner.id() == pp.id() {
            return Some(pp.cost());
        }

        if pp.approvers().is_empty() {
            if min_load.is_infinite() {
                let fallback = greedy_fallback(&tied, pp, tie_break, budget_remaining);
                if let Some(v) = fallback {
                    best = numeric::optional_max(best, v);
                }
            }
        } else {
            let carried: f64 = pp.approvers().iter().map(|&v| load[v]).sum();
            let raw = min_load * pp.approvers().len() as f64 - carried;
            let floored = numeric::floor(raw);
            let mut price = floored as i64;
            if numeric::equal(floored, raw) {
                let hypothetical = pp.with_cost(price.max(0) as u64);
                if tie_break.precedes(winner, &hypothetical) {
                    price -= 1;
                }
            }
            let upper = (pp.cost() as i64).min(budget_remaining);
            best = numeric::optional_max(best, price.max(0).min(upper));
        }

        for &v in winner.approvers() {
            load[v] = min_load;
        }
        budget_remaining -= winner.cost() as i64;
        let winner_id = winner.id();
        remaining.retain(|&i| projects[i].id() != winner_id);
    }

    best.map(|v| v.max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Election;
    use alloc::vec;

    /// S3.
    #[test]
    fn s3_two_round_selection() {
        let e = Election::new(
            6,
            2,
            vec![
                Project::new(0, 3, "a", vec![0]),
                Project::new(1, 3, "b", vec![1]),
                Project::new(2, 3, "c", vec![0, 1]),
            ],
        )
        .unwrap();
        let winners = phragmen(&e, &ProjectComparator::BY_COST_ASC_THEN_VOTES_DESC);
        let ids: Vec<usize> = winners.iter().map(Project::id).collect();
        assert_eq!(ids, vec![2, 0]);
    }

    #[test]
    fn winner_round_trips_cost_reduction() {
        let e = Election::new(
            6,
            2,
            vec![
                Project::new(0, 3, "a", vec![0]),
                Project::new(1, 3, "b", vec![1]),
                Project::new(2, 3, "c", vec![0, 1]),
            ],
        )
        .unwrap();
        let tb = ProjectComparator::BY_COST_ASC_THEN_VOTES_DESC;
        assert_eq!(cost_reduction_for_phragmen(&e, 2, &tb), Some(3));
    }

    #[test]
    fn infeasible_target_is_absent() {
        let e = Election::new(1, 1, vec![Project::new(0, 10, "a", vec![0])]).unwrap();
        let tb = ProjectComparator::BY_COST_ASC;
        // Budget can't even fund the cheapest tied project, so the rule
        // terminates on round one without ever selecting anything.
        assert_eq!(cost_reduction_for_phragmen(&e, 0, &tb), None);
    }

    #[test]
    fn all_zero_approver_round_does_not_panic() {
        let e = Election::new(10, 3, vec![Project::new(0, 5, "a", vec![])]).unwrap();
        let tb = ProjectComparator::BY_COST_ASC_THEN_VOTES_DESC;
        let winners = phragmen(&e, &tb);
        assert_eq!(winners.iter().map(Project::id).collect::<Vec<_>>(), vec![0]);
        assert_eq!(cost_reduction_for_phragmen(&e, 0, &tb), Some(5));
    }
}
