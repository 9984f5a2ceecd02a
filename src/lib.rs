//! noggin - naive-Bayes-style latent-variable imputation over a directed
//! probability graph.
//!
//! A [`BayesianNetwork`] stores one conditional probability table per
//! `hidden -> visible` edge of a directed [`Graph`]. The [`sampler`] draws
//! synthetic observations from those tables, the [`Estimator`] turns
//! observation sequences back into tables, and the [`Brain`] closes the
//! loop: it repeatedly imputes the hidden factor's per-sample state from
//! the current estimates and re-estimates from the imputations.

pub mod brain;
pub mod estimator;
pub mod graph;
pub mod init;
pub mod network;
pub mod sampler;
pub mod util;

pub use brain::{Brain, Learning};
pub use estimator::{normalize_columns, Estimator};
pub use graph::Graph;
pub use init::Initialization;
pub use network::{BayesianNetwork, Table};
pub use util::{NogginError, Result};
