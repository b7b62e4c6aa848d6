//! Aggregation rule engines and their counterfactual robustness measures.

pub mod greedy;
pub mod greedy_cost;
pub mod mes_approval;
pub mod mes_cost;
pub mod phragmen;
