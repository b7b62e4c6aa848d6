//! Immutable value types describing a participatory-budgeting election.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

/// A single project up for election: an integer cost, a display name, and
/// the set of voters who approve it.
///
/// Two projects are equal iff their `id`s match — never by comparing cost,
/// name, or approvers. Rule engines routinely build a *hypothetical*
/// `Project` that shares a real project's `id`, name, and approvers but
/// carries a different cost, to ask a [`ProjectComparator`](crate::ProjectComparator)
/// "would this project have won instead, priced here?". Identity-by-id is
/// what keeps that hypothetical comparable to its real counterpart without
/// accidentally comparing equal (or unequal) by the wrong field.
#[derive(Debug, Clone)]
pub struct Project {
    id: usize,
    cost: u64,
    name: Arc<str>,
    approvers: Arc<[usize]>,
}

impl Project {
    /// Build a new project. `approvers` need not be sorted or deduplicated
    /// by the caller of this constructor; rule engines that need a sorted
    /// copy sort their own working copy.
    pub fn new(
        id: usize,
        cost: u64,
        name: impl Into<Arc<str>>,
        approvers: impl Into<Arc<[usize]>>,
    ) -> Self {
        Self {
            id,
            cost,
            name: name.into(),
            approvers: approvers.into(),
        }
    }

    /// The project's identity. Equality and hashing for `Project` are
    /// entirely determined by this field.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The project's cost.
    pub fn cost(&self) -> u64 {
        self.cost
    }

    /// The project's display name, used only for stable lexicographic
    /// tie-breaks.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The voter indices that approve this project.
    pub fn approvers(&self) -> &[usize] {
        &self.approvers
    }

    /// A project sharing this one's `id`, `name`, and `approvers`, but
    /// priced at `cost`. Used by every rule engine's counterfactual
    /// measures to ask "what if this project cost less?" without
    /// fabricating a new identity.
    pub fn with_cost(&self, cost: u64) -> Self {
        Self {
            id: self.id,
            cost,
            name: self.name.clone(),
            approvers: self.approvers.clone(),
        }
    }

    /// A project sharing this one's `id`, `name`, and `cost`, but approved
    /// by `approvers`. Used by counterfactual measures that ask "what if
    /// this project had different approvers?".
    pub fn with_approvers(&self, approvers: impl Into<Arc<[usize]>>) -> Self {
        Self {
            id: self.id,
            cost: self.cost,
            name: self.name.clone(),
            approvers: approvers.into(),
        }
    }
}

impl PartialEq for Project {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Project {}

/// A budget, a voter count, and the projects competing for funding.
///
/// Constructing an `Election` checks that every approver index referenced
/// by a project is a valid voter index; see [`ElectionError`].
#[derive(Debug, Clone)]
pub struct Election {
    budget: u64,
    num_voters: usize,
    projects: Vec<Project>,
}

impl Election {
    /// Build an election, checking that every project's approvers are
    /// valid voter indices.
    pub fn new(
        budget: u64,
        num_voters: usize,
        projects: Vec<Project>,
    ) -> Result<Self, ElectionError> {
        for project in &projects {
            for &voter in project.approvers() {
                if voter >= num_voters {
                    return Err(ElectionError::ApproverOutOfRange {
                        project_id: project.id(),
                        voter,
                        num_voters,
                    });
                }
            }
        }
        Ok(Self {
            budget,
            num_voters,
            projects,
        })
    }

    /// The total budget available to fund winning projects.
    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// The number of voters, each identified by an index in `[0, num_voters)`.
    pub fn num_voters(&self) -> usize {
        self.num_voters
    }

    /// The projects competing for funding.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }
}

/// A malformed [`Election`] could not be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElectionError {
    /// A project's approver list referenced a voter index outside
    /// `[0, num_voters)`.
    ApproverOutOfRange {
        /// The project whose approver list is malformed.
        project_id: usize,
        /// The offending voter index.
        voter: usize,
        /// The election's declared voter count.
        num_voters: usize,
    },
}

impl fmt::Display for ElectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElectionError::ApproverOutOfRange {
                project_id,
                voter,
                num_voters,
            } => write!(
                f,
                "project {} approver {} is out of range for {} voters",
                project_id, voter, num_voters
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ElectionError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn identity_is_by_id_only() {
        let a = Project::new(0, 5, "a", vec![0, 1]);
        let b = a.with_cost(1);
        assert_eq!(a, b);
        assert_ne!(a.cost(), b.cost());
    }

    #[test]
    fn construction_rejects_out_of_range_approver() {
        let p = Project::new(0, 1, "a", vec![0, 2]);
        let err = Election::new(10, 2, vec![p]).unwrap_err();
        assert_eq!(
            err,
            ElectionError::ApproverOutOfRange {
                project_id: 0,
                voter: 2,
                num_voters: 2,
            }
        );
    }

    #[test]
    fn construction_accepts_valid_approvers() {
        let p = Project::new(0, 1, "a", vec![0, 1]);
        assert!(Election::new(10, 2, vec![p]).is_ok());
    }
}
