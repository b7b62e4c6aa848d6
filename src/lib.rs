#![doc = include_str!("../README.md")]
#![no_std]
#![warn(missing_docs)]
#![deny(unsafe_code)]

#[allow(unused_imports)]
#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
#[macro_use]
extern crate std;

pub mod numeric;
pub mod project;
pub mod comparator;
pub mod rules;

pub use comparator::{Criterion, Order, ProjectComparator};
pub use project::{Election, ElectionError, Project};

pub use rules::greedy::{
    cost_reduction_for_greedy, greedy, optimist_add_for_greedy, pessimist_add_for_greedy,
    singleton_add_for_greedy,
};
pub use rules::greedy_cost::{
    cost_reduction_for_greedy_over_cost, greedy_over_cost, optimist_add_for_greedy_over_cost,
    pessimist_add_for_greedy_over_cost, singleton_add_for_greedy_over_cost,
};
pub use rules::mes_approval::{
    cost_reduction_for_mes_apr, mes_apr, optimist_add_for_mes_apr, pessimist_add_for_mes_apr,
    singleton_add_for_mes_apr,
};
pub use rules::mes_cost::{cost_reduction_for_mes_cost, mes_cost};
pub use rules::phragmen::{cost_reduction_for_phragmen, phragmen};
