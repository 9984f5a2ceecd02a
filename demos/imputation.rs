//! Provides an example of the full imputation loop: simulate data from a
//! known model, start the hidden assignments from pure noise, and let the
//! learning loop recover the hidden structure from the visible evidence
//! alone.

use noggin::{sampler, Brain, Estimator};
use noggin::network::Table;
use ndarray::array;
use rand::rngs::StdRng;
use rand::SeedableRng;

use std::collections::BTreeMap;

fn main() -> noggin::Result<()> {
    let mut rng = StdRng::seed_from_u64(3);

    /////////////////////////////////////////////////////
    // Step 1: Ground truth; a 25/75 hidden split observed through four
    // informative binary factors
    let truth: BTreeMap<String, Table> = [
        (String::from("E0"), array![[0.90, 0.15], [0.10, 0.85]]),
        (String::from("E1"), array![[0.80, 0.20], [0.20, 0.80]]),
        (String::from("E2"), array![[0.85, 0.10], [0.15, 0.90]]),
        (String::from("E3"), array![[0.70, 0.25], [0.30, 0.75]]),
    ].into_iter().collect();

    let hidden_truth = sampler::simulate_hidden(&mut rng, &[0.25, 0.75], 1_000)?;
    let visible_data = sampler::simulate_visible_from(&mut rng, &truth, &hidden_truth)?;

    /////////////////////////////////////////////////////
    // Step 2: Forget the hidden data; seed the loop with a uniform guess
    let initial = sampler::simulate_hidden(&mut rng, &[0.5, 0.5], 1_000)?;

    /////////////////////////////////////////////////////
    // Step 3: Learn
    let estimator = Estimator::new(2);
    let brain = Brain::default();
    let learning = brain.learn(&mut rng, &estimator, &initial, &visible_data)?;

    let truth_theta = estimator.theta_hidden(&hidden_truth);

    // the hidden labels are only identified up to a swap, so report both
    println!("true theta_hidden:      {:.3?}", truth_theta.to_vec());
    println!("recovered theta_hidden: {:.3?} (labels may be swapped)", learning.theta_hidden.to_vec());

    let agreement = learning.assignments
                            .iter()
                            .zip(&hidden_truth)
                            .filter(|(a, b)| a == b)
                            .count() as f64 / 1_000.0;
    println!("assignment agreement with truth: {:.1}% (or {:.1}% under swap)",
             100.0 * agreement, 100.0 * (1.0 - agreement));

    Ok(())
}
