#![allow(dead_code)]

use pb_core::{Election, Project};
use proptest::prelude::*;

/// A small random election: a handful of projects, a handful of voters,
/// random costs and approval sets. Large enough to exercise ties and
/// multi-round rules, small enough that `proptest` shrinking stays fast.
pub fn elections() -> impl Strategy<Value = Election> {
    (1usize..=6, 1u64..=40).prop_flat_map(|(num_voters, budget)| {
        prop::collection::vec(project(num_voters), 0..=6)
            .prop_map(move |projects| {
                let projects = projects
                    .into_iter()
                    .enumerate()
                    .map(|(id, (cost, approvers))| Project::new(id, cost, name(id), approvers))
                    .collect();
                Election::new(budget, num_voters, projects)
                    .expect("approvers are drawn from 0..num_voters by construction")
            })
    })
}

fn project(num_voters: usize) -> impl Strategy<Value = (u64, Vec<usize>)> {
    (0u64..=20, prop::collection::vec(0..num_voters, 0..=num_voters)).prop_map(
        |(cost, mut approvers)| {
            approvers.sort_unstable();
            approvers.dedup();
            (cost, approvers)
        },
    )
}

fn name(id: usize) -> String {
    format!("p{id}")
}
