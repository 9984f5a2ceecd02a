//! Definition of the network module
//!
//! A `BayesianNetwork` is a conditional-probability store built on a
//! `Graph`: every factor is a named node, and the weight of the edge
//! `hidden -> visible` is the conditional probability table of the visible
//! factor given the hidden one.

use crate::graph::Graph;

use ndarray::Array2;
use tracing::debug;

use std::collections::BTreeMap;

/// A conditional probability table. Rows index the states of the visible
/// (target) factor, columns the states of the hidden (source) factor:
/// `table[[v, h]] = P(visible = v | hidden = h)`.
pub type Table = Array2<f64>;

/// A directed network of named factors whose edges carry conditional
/// probability tables.
///
/// The store itself never normalizes: cells hold whatever the caller
/// records, whether probabilities in `[0, 1]` via [`record`](Self::record)
/// or raw observation counts via [`tally`](Self::tally). Normalization is
/// the estimator's job.
///
/// A network is a single-owner structure; `record`/`tally`/`erase` perform
/// read-modify-write sequences on the edge payloads and must not be shared
/// mutably across threads.
#[derive(Clone, Debug)]
pub struct BayesianNetwork {

    /// The underlying topology and table storage
    graph: Graph<String, Table>,

    /// Number of states each factor takes by default. Tables are allocated
    /// at least this large on each axis.
    num_states: usize

}

impl BayesianNetwork {

    /// Construct an empty network whose factors each have `num_states`
    /// states
    pub fn new(num_states: usize) -> Self {
        BayesianNetwork { graph: Graph::new(), num_states }
    }


    /// The configured number of states per factor
    pub fn num_states(&self) -> usize {
        self.num_states
    }


    /// The underlying graph, for topology queries such as
    /// `topological_sort`
    pub fn graph(&self) -> &Graph<String, Table> {
        &self.graph
    }


    /// Add a factor to the network.
    ///
    /// # Returns
    /// `true` if the factor was added; `false` if the name was already
    /// present
    pub fn add(&mut self, name: &str) -> bool {
        self.graph.add(String::from(name))
    }


    /// Connect `hidden -> visible` with a complete conditional probability
    /// table, overwriting any table already on the edge.
    ///
    /// # Returns
    /// `true` on success; `false` if either factor is absent
    pub fn attach(&mut self, hidden: &str, visible: &str, table: Table) -> bool {
        self.graph.connect(hidden, visible, table)
    }


    /// Set a single cell of the table on the edge `hidden -> visible`:
    /// `P(visible = visible_state | hidden = hidden_state) = probability`.
    ///
    /// If the edge does not exist yet, a zero-filled table is allocated
    /// lazily, sized to the larger of `num_states` and the state indices
    /// seen. An existing table is never grown; indices outside it fail.
    ///
    /// # Returns
    /// `true` on success; `false` if either factor is absent or an index
    /// falls outside an existing table. A failed call mutates nothing.
    pub fn record(
        &mut self,
        hidden: &str,
        visible: &str,
        hidden_state: usize,
        visible_state: usize,
        probability: f64,
    ) -> bool {
        self.store(hidden, visible, hidden_state, visible_state, |_| probability)
    }


    /// The count-mode companion of [`record`](Self::record): increment the
    /// cell `[visible_state][hidden_state]` by one instead of overwriting
    /// it. Used to accumulate joint observation histograms directly in the
    /// store.
    pub fn tally(
        &mut self,
        hidden: &str,
        visible: &str,
        hidden_state: usize,
        visible_state: usize,
    ) -> bool {
        self.store(hidden, visible, hidden_state, visible_state, |count| count + 1.0)
    }


    /// Remove one observation from the cell `[visible_state][hidden_state]`.
    ///
    /// # Returns
    /// `true` if the cell was decremented; `false` if the edge does not
    /// exist, the index is out of range, or the cell is already zero. A
    /// failed call mutates nothing.
    pub fn erase(
        &mut self,
        hidden: &str,
        visible: &str,
        hidden_state: usize,
        visible_state: usize,
    ) -> bool {
        let mut table = match self.graph.weight(hidden, visible) {
            Some(table) => table.clone(),
            None => return false
        };

        if visible_state >= table.nrows() || hidden_state >= table.ncols() {
            return false;
        }

        if table[[visible_state, hidden_state]] == 0.0 {
            return false;
        }

        table[[visible_state, hidden_state]] -= 1.0;
        self.graph.connect(hidden, visible, table)
    }


    /// Collect the evidence matrix for a set of observations of factors
    /// attached to `hidden`.
    ///
    /// For each observed visible factor, in ascending key order, the row of
    /// its conditional table selected by the observed state is extracted;
    /// the rows are stacked in that order. The result has one row per piece
    /// of usable evidence and one column per hidden state.
    ///
    /// An observation whose edge is missing, or whose state falls outside
    /// the table, contributes no row; supplying it was the caller's
    /// precondition violation, not a failure of the store.
    pub fn evidence(&self, hidden: &str, observations: &BTreeMap<String, usize>) -> Table {
        let mut rows = Vec::with_capacity(observations.len());

        for (name, &state) in observations {
            let table = match self.graph.weight(hidden, name.as_str()) {
                Some(table) => table,
                None => continue
            };

            if state >= table.nrows() {
                continue;
            }

            rows.push(table.row(state));
        }

        let columns = rows.iter().map(|row| row.len()).max().unwrap_or(self.num_states);
        let mut stacked = Table::zeros((rows.len(), columns));

        for (i, row) in rows.into_iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                stacked[[i, j]] = value;
            }
        }

        stacked
    }


    /// Every conditional table attached to `hidden`, keyed by the visible
    /// factor's name in ascending order
    pub fn tables(&self, hidden: &str) -> BTreeMap<&str, &Table> {
        self.graph.weights(hidden).map(|(name, table)| (name.as_str(), table)).collect()
    }


    /// Shared read-modify-write path for `record` and `tally`
    fn store(
        &mut self,
        hidden: &str,
        visible: &str,
        hidden_state: usize,
        visible_state: usize,
        apply: impl FnOnce(f64) -> f64,
    ) -> bool {
        let mut table = match self.graph.weight(hidden, visible) {
            Some(table) => table.clone(),
            None => {
                let rows = self.num_states.max(visible_state + 1);
                let columns = self.num_states.max(hidden_state + 1);

                debug!(hidden, visible, rows, columns, "allocating conditional table");
                Table::zeros((rows, columns))
            }
        };

        if visible_state >= table.nrows() || hidden_state >= table.ncols() {
            return false;
        }

        table[[visible_state, hidden_state]] = apply(table[[visible_state, hidden_state]]);
        self.graph.connect(hidden, visible, table)
    }

}


impl Default for BayesianNetwork {

    /// A network of binary factors
    fn default() -> Self {
        BayesianNetwork::new(2)
    }

}


// Unit tests for the BayesianNetwork struct.
#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;

    fn evidence_network() -> BayesianNetwork {
        let mut network = BayesianNetwork::new(2);

        network.add("T");
        network.add("E0");
        network.add("E1");

        assert!(network.record("T", "E0", 0, 0, 0.33));
        assert!(network.record("T", "E0", 1, 0, 0.40));
        assert!(network.record("T", "E0", 0, 1, 0.33));
        assert!(network.record("T", "E0", 1, 1, 0.25));

        assert!(network.record("T", "E1", 0, 0, 0.25));
        assert!(network.record("T", "E1", 1, 0, 0.05));
        assert!(network.record("T", "E1", 0, 1, 0.75));
        assert!(network.record("T", "E1", 1, 1, 0.95));

        network
    }

    #[test]
    fn add() {
        let mut network = BayesianNetwork::default();

        assert!(network.add("T"));
        assert!(! network.add("T"));
        assert!(network.add("E0"));
    }

    #[test]
    fn record_requires_factors() {
        let mut network = BayesianNetwork::default();
        network.add("T");

        assert!(! network.record("T", "E0", 0, 0, 0.5));
        assert!(! network.record("E0", "T", 0, 0, 0.5));
        assert_eq!(network.tables("T").len(), 0);
    }

    #[test]
    fn evidence() {
        let network = evidence_network();

        let observations: BTreeMap<String, usize> =
            [(String::from("E0"), 0), (String::from("E1"), 1)].into_iter().collect();

        let matrix = network.evidence("T", &observations);
        assert_eq!(matrix.dim(), (2, 2));

        let expected = [[0.33, 0.40], [0.75, 0.95]];
        for i in 0..2 {
            for j in 0..2 {
                assert_abs_diff_eq!(matrix[[i, j]], expected[i][j]);
            }
        }
    }

    #[test]
    fn evidence_skips_unusable_observations() {
        let network = evidence_network();

        let observations: BTreeMap<String, usize> = [
            (String::from("E0"), 1),
            (String::from("E1"), 9),       // out of range
            (String::from("E9"), 0),       // no such edge
        ].into_iter().collect();

        let matrix = network.evidence("T", &observations);
        assert_eq!(matrix.dim(), (1, 2));
        assert_abs_diff_eq!(matrix[[0, 0]], 0.33);
        assert_abs_diff_eq!(matrix[[0, 1]], 0.25);
    }

    #[test]
    fn tally_and_erase() {
        let mut network = BayesianNetwork::default();
        network.add("T");
        network.add("E0");

        // nothing recorded yet
        assert!(! network.erase("T", "E0", 0, 1));

        assert!(network.tally("T", "E0", 0, 1));
        assert!(network.tally("T", "E0", 0, 1));
        assert_eq!(network.tables("T")["E0"][[1, 0]], 2.0);

        assert!(network.erase("T", "E0", 0, 1));
        assert!(network.erase("T", "E0", 0, 1));

        // cell is back to zero; a third erase fails
        assert!(! network.erase("T", "E0", 0, 1));
        assert_eq!(network.tables("T")["E0"][[1, 0]], 0.0);

        // a different, never-touched cell of the same table
        assert!(! network.erase("T", "E0", 1, 1));
    }

    #[test]
    fn lazy_allocation_grows_to_state_seen() {
        let mut network = BayesianNetwork::new(2);
        network.add("T");
        network.add("E0");

        // first write sizes the table to the largest index seen
        assert!(network.record("T", "E0", 4, 0, 0.5));
        assert_eq!(network.tables("T")["E0"].dim(), (2, 5));

        // the existing table is never grown afterwards
        assert!(! network.record("T", "E0", 5, 0, 0.5));
        assert!(network.record("T", "E0", 4, 1, 0.5));
        assert_eq!(network.tables("T")["E0"].dim(), (2, 5));
    }

    #[test]
    fn tables_in_key_order() {
        let mut network = BayesianNetwork::default();
        network.add("T");
        network.add("E1");
        network.add("E0");

        network.record("T", "E1", 0, 0, 0.1);
        network.record("T", "E0", 0, 0, 0.2);

        let keys: Vec<&str> = network.tables("T").into_keys().collect();
        assert_eq!(keys, vec!["E0", "E1"]);
    }

    #[test]
    fn sorts_topologically() {
        let mut network = BayesianNetwork::default();
        network.add("T");
        network.add("E0");
        network.add("E1");

        network.record("T", "E0", 0, 0, 0.5);
        network.record("T", "E1", 0, 0, 0.5);

        let order = network.graph().topological_sort().unwrap();
        assert_eq!(order, vec!["T", "E0", "E1"]);
    }

}
