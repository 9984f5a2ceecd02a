//! Definition of the estimator module
//!
//! Converts sample sequences into probability estimates: a marginal
//! histogram for the hidden factor, and per-visible-factor joint histograms
//! normalized into conditional probability tables.

use crate::network::{BayesianNetwork, Table};
use crate::util::{NogginError, Result};

use itertools::Itertools;
use ndarray::{Array1, Axis};

use std::collections::BTreeMap;

/// Estimates distribution parameters from observed sample sequences.
#[derive(Clone, Debug)]
pub struct Estimator {

    /// Number of states per factor; fixes the size of every estimate
    num_states: usize

}

impl Estimator {

    pub fn new(num_states: usize) -> Self {
        Estimator { num_states }
    }


    pub fn num_states(&self) -> usize {
        self.num_states
    }


    /// Estimate the marginal distribution of the hidden factor as a
    /// normalized histogram of length `num_states`.
    ///
    /// Values outside `0..num_states` are ignored. If no value is usable
    /// the histogram is all zeros; the degenerate case is resolved
    /// locally, never reported as an error.
    pub fn theta_hidden(&self, hidden_data: &[usize]) -> Array1<f64> {
        let counts = hidden_data.iter().filter(|&&state| state < self.num_states).counts();
        let total: usize = counts.values().sum();

        let mut theta = Array1::zeros(self.num_states);

        if total > 0 {
            for (&state, count) in counts {
                theta[state] = count as f64 / total as f64;
            }
        }

        theta
    }


    /// Estimate the conditional probability table of every visible factor
    /// given the hidden one.
    ///
    /// For each visible key a `(num_states x num_states)` joint count table
    /// indexed `[visible value][hidden value]` is accumulated over matched
    /// positions, then normalized per hidden-state column. Positions
    /// where either value is out of range contribute nothing.
    ///
    /// # Errors
    /// `NogginError::LengthMismatch` if any visible sequence differs in
    /// length from `hidden_data`; positional correspondence is the whole
    /// contract
    pub fn theta_visible(
        &self,
        hidden_data: &[usize],
        visible_data: &BTreeMap<String, Vec<usize>>,
    ) -> Result<BTreeMap<String, Table>> {
        let mut tables = BTreeMap::new();

        for (name, samples) in visible_data {
            if samples.len() != hidden_data.len() {
                return Err(NogginError::LengthMismatch);
            }

            let mut joint = Table::zeros((self.num_states, self.num_states));

            for (&v, &h) in samples.iter().zip(hidden_data) {
                if v < self.num_states && h < self.num_states {
                    joint[[v, h]] += 1.0;
                }
            }

            tables.insert(name.clone(), normalize_columns(&joint));
        }

        Ok(tables)
    }


    /// The store-backed variant of [`theta_visible`](Self::theta_visible):
    /// re-normalize the tables already accumulated on the edges of
    /// `hidden`, e.g. through count-mode
    /// [`tally`](crate::BayesianNetwork::tally) calls.
    pub fn theta_visible_from(
        &self,
        network: &BayesianNetwork,
        hidden: &str,
    ) -> BTreeMap<String, Table> {
        network.tables(hidden)
               .into_iter()
               .map(|(name, table)| (String::from(name), normalize_columns(table)))
               .collect()
    }

}


/// Normalize each column of a table by its column sum, defaulting a
/// zero-sum column to all zeros instead of letting `0/0` poison the result
/// with NaN. This is the single divide-or-default primitive used everywhere
/// a column may carry no mass.
pub fn normalize_columns(table: &Table) -> Table {
    let sums = table.sum_axis(Axis(0));
    let mut normalized = table.clone();

    for (mut column, &sum) in normalized.axis_iter_mut(Axis(1)).zip(sums.iter()) {
        if sum > 0.0 {
            column.mapv_inplace(|value| value / sum);
        } else {
            column.fill(0.0);
        }
    }

    normalized
}


// Unit tests for the estimator module.
#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn theta_hidden() {
        let estimator = Estimator::new(2);
        let theta = estimator.theta_hidden(&[0, 1, 1, 1]);

        assert_eq!(theta.len(), 2);
        assert_abs_diff_eq!(theta[0], 0.25);
        assert_abs_diff_eq!(theta[1], 0.75);
        assert_abs_diff_eq!(theta.sum(), 1.0);
    }

    #[test]
    fn theta_hidden_ignores_out_of_range() {
        let estimator = Estimator::new(2);
        let theta = estimator.theta_hidden(&[0, 1, 5, 5, 5]);

        assert_abs_diff_eq!(theta[0], 0.5);
        assert_abs_diff_eq!(theta[1], 0.5);
        assert_abs_diff_eq!(theta.sum(), 1.0);
    }

    #[test]
    fn theta_hidden_empty() {
        let estimator = Estimator::new(3);
        let theta = estimator.theta_hidden(&[]);

        assert_eq!(theta.len(), 3);
        assert_abs_diff_eq!(theta.sum(), 0.0);
    }

    #[test]
    fn theta_visible() {
        let estimator = Estimator::new(2);

        let hidden_data = vec![0, 0, 0, 0, 1, 1];
        let visible_data: BTreeMap<String, Vec<usize>> =
            [(String::from("E0"), vec![0, 0, 0, 1, 1, 1])].into_iter().collect();

        let tables = estimator.theta_visible(&hidden_data, &visible_data).unwrap();
        let table = &tables["E0"];

        // hidden 0: three visible 0s and one visible 1; hidden 1: two 1s
        assert_abs_diff_eq!(table[[0, 0]], 0.75);
        assert_abs_diff_eq!(table[[1, 0]], 0.25);
        assert_abs_diff_eq!(table[[0, 1]], 0.0);
        assert_abs_diff_eq!(table[[1, 1]], 1.0);
    }

    #[test]
    fn theta_visible_zero_count_column() {
        let estimator = Estimator::new(2);

        // hidden state 1 never occurs
        let hidden_data = vec![0, 0, 0];
        let visible_data: BTreeMap<String, Vec<usize>> =
            [(String::from("E0"), vec![0, 1, 0])].into_iter().collect();

        let tables = estimator.theta_visible(&hidden_data, &visible_data).unwrap();
        let table = &tables["E0"];

        assert!(table.iter().all(|value| value.is_finite()));
        assert_abs_diff_eq!(table[[0, 1]], 0.0);
        assert_abs_diff_eq!(table[[1, 1]], 0.0);
    }

    #[test]
    fn theta_visible_length_mismatch() {
        let estimator = Estimator::new(2);

        let visible_data: BTreeMap<String, Vec<usize>> =
            [(String::from("E0"), vec![0, 1])].into_iter().collect();

        assert_eq!(
            estimator.theta_visible(&[0], &visible_data),
            Err(NogginError::LengthMismatch)
        );
    }

    #[test]
    fn theta_visible_from_store() {
        let mut network = BayesianNetwork::new(2);
        network.add("T");
        network.add("E0");

        // accumulate a joint histogram in the store: 3 of (h=0, v=0),
        // 1 of (h=0, v=1), 2 of (h=1, v=1)
        for _ in 0..3 {
            network.tally("T", "E0", 0, 0);
        }
        network.tally("T", "E0", 0, 1);
        network.tally("T", "E0", 1, 1);
        network.tally("T", "E0", 1, 1);

        let estimator = Estimator::new(2);
        let tables = estimator.theta_visible_from(&network, "T");
        let table = &tables["E0"];

        assert_abs_diff_eq!(table[[0, 0]], 0.75);
        assert_abs_diff_eq!(table[[1, 0]], 0.25);
        assert_abs_diff_eq!(table[[0, 1]], 0.0);
        assert_abs_diff_eq!(table[[1, 1]], 1.0);
    }

    #[test]
    fn normalize_columns_mixed() {
        let table = array![[2.0, 0.0], [6.0, 0.0]];
        let normalized = normalize_columns(&table);

        assert_abs_diff_eq!(normalized[[0, 0]], 0.25);
        assert_abs_diff_eq!(normalized[[1, 0]], 0.75);
        assert_abs_diff_eq!(normalized[[0, 1]], 0.0);
        assert_abs_diff_eq!(normalized[[1, 1]], 0.0);
    }

}
