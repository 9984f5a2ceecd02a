//! Provides an example of how to simulate observations from a known model
//! and estimate its parameters back from the synthetic data.

use noggin::{sampler, Estimator, Initialization};
use noggin::network::Table;
use rand::rngs::StdRng;
use rand::SeedableRng;

use std::collections::BTreeMap;

fn main() -> noggin::Result<()> {
    let mut rng = StdRng::seed_from_u64(1);

    /////////////////////////////////////////////////////
    // Step 1: Draw a random ground-truth model
    let mut truth: BTreeMap<String, Table> = BTreeMap::new();
    for name in ["E0", "E1", "E2"] {
        truth.insert(String::from(name), Initialization::Random.build_table(&mut rng, 2, 2)?);
    }

    /////////////////////////////////////////////////////
    // Step 2: Simulate hidden data, then visible data conditioned on it
    let hidden_data = sampler::simulate_hidden(&mut rng, &[0.35, 0.65], 5_000)?;
    let visible_data = sampler::simulate_visible_from(&mut rng, &truth, &hidden_data)?;

    /////////////////////////////////////////////////////
    // Step 3: Estimate the parameters back from the samples
    let estimator = Estimator::new(2);
    let theta_hidden = estimator.theta_hidden(&hidden_data);
    let theta_visible = estimator.theta_visible(&hidden_data, &visible_data)?;

    println!("theta_hidden ~ [0.35, 0.65]: {:.3?}", theta_hidden.to_vec());

    for (name, table) in &theta_visible {
        println!("{}:", name);
        println!("  truth:    {:.3?}", truth[name].rows().into_iter().map(|r| r.to_vec()).collect::<Vec<_>>());
        println!("  estimate: {:.3?}", table.rows().into_iter().map(|r| r.to_vec()).collect::<Vec<_>>());
    }

    Ok(())
}
