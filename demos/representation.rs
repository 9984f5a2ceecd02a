//! Provides an example of how to build a conditional-probability store and
//! read an evidence matrix back out of it.

use noggin::BayesianNetwork;
use ndarray::array;

use std::collections::BTreeMap;

fn main() {
    /////////////////////////////////////////////////////
    // Step 1: Declare the factors
    let mut network = BayesianNetwork::new(2);

    network.add("T");
    for name in ["E0", "E1", "E2", "E3", "E4"] {
        network.add(name);
    }

    /////////////////////////////////////////////////////
    // Step 2: Attach conditional tables to the edges.
    // Rows are the visible factor's states, columns the hidden factor's;
    // each column gives the visible distribution for one hidden state.
    network.attach("T", "E1", array![[0.25, 0.60], [0.75, 0.40]]);
    network.attach("T", "E2", array![[0.25, 0.24], [0.75, 0.76]]);
    network.attach("T", "E3", array![[0.25, 0.13], [0.75, 0.87]]);
    network.attach("T", "E4", array![[0.25, 0.62], [0.75, 0.38]]);

    // E0 cell by cell instead, through the single-cell surface
    network.record("T", "E0", 0, 0, 0.33);
    network.record("T", "E0", 1, 0, 0.40);
    network.record("T", "E0", 0, 1, 0.67);
    network.record("T", "E0", 1, 1, 0.60);

    /////////////////////////////////////////////////////
    // Step 3: Observe some visible states and collect the evidence rows
    let observations: BTreeMap<String, usize> = [
        (String::from("E0"), 0),
        (String::from("E1"), 1),
        (String::from("E3"), 1),
    ].into_iter().collect();

    let evidence = network.evidence("T", &observations);

    println!("evidence rows (one per observation, one column per hidden state):");
    for (row, (name, state)) in evidence.rows().into_iter().zip(&observations) {
        println!("  P({} = {} | T = 0..2) = {:.2?}", name, state, row.to_vec());
    }

    let order = network.graph().topological_sort().expect("network is a DAG");
    println!("topological order: {:?}", order);
}
