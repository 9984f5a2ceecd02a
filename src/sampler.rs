//! Definition of the sampler module
//!
//! Draws synthetic observations from a network: hidden-factor samples from
//! an explicit categorical distribution, and visible-factor samples
//! conditioned on a hidden sample sequence.
//!
//! Every draw goes through a caller-supplied random generator, so seeding
//! the generator makes a whole simulation reproducible.

use crate::network::{BayesianNetwork, Table};
use crate::util::{NogginError, Result};

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use std::collections::BTreeMap;

/// Draw `samples` independent categorical samples with selection
/// probability proportional to `weights`.
///
/// The weights need not be normalized; each draw yields the 0-based index
/// of the chosen category.
///
/// # Errors
/// `NogginError::DegenerateDistribution` if the weights carry no usable
/// mass (all zero, or any weight negative/non-finite)
pub fn simulate_hidden<R>(rng: &mut R, weights: &[f64], samples: usize) -> Result<Vec<usize>>
    where R: Rng + ?Sized
{
    let dist = WeightedIndex::new(weights).map_err(|_| NogginError::DegenerateDistribution)?;

    Ok((0..samples).map(|_| dist.sample(rng)).collect())
}


/// Draw one visible sample per hidden sample, for every visible factor
/// attached to `hidden` in the store.
///
/// For position `i`, the draw for a visible factor comes from the column of
/// its conditional table selected by `hidden_data[i]`, so the output
/// sequences correspond position by position with `hidden_data`. A hidden
/// factor with no outgoing edges yields an empty map.
///
/// # Errors
/// `NogginError::DegenerateDistribution` if a hidden sample selects a
/// column that does not exist or has zero total mass
pub fn simulate_visible<R>(
    rng: &mut R,
    network: &BayesianNetwork,
    hidden: &str,
    hidden_data: &[usize],
) -> Result<BTreeMap<String, Vec<usize>>>
    where R: Rng + ?Sized
{
    simulate_tables(rng, network.tables(hidden), hidden_data)
}


/// The externally-supplied-table variant of [`simulate_visible`]: draw from
/// the given conditional tables instead of the store, for generating data
/// under a known ground-truth model without touching a network.
pub fn simulate_visible_from<R>(
    rng: &mut R,
    tables: &BTreeMap<String, Table>,
    hidden_data: &[usize],
) -> Result<BTreeMap<String, Vec<usize>>>
    where R: Rng + ?Sized
{
    simulate_tables(
        rng,
        tables.iter().map(|(name, table)| (name.as_str(), table)),
        hidden_data,
    )
}


fn simulate_tables<'a, R, I>(
    rng: &mut R,
    tables: I,
    hidden_data: &[usize],
) -> Result<BTreeMap<String, Vec<usize>>>
    where R: Rng + ?Sized,
          I: IntoIterator<Item = (&'a str, &'a Table)>
{
    let mut visible_data = BTreeMap::new();

    for (name, table) in tables {
        // one distribution per hidden state, built once and reused across
        // positions; a zero-mass column only fails if a draw lands on it
        let columns: Vec<Option<WeightedIndex<f64>>> =
            (0..table.ncols())
                .map(|h| WeightedIndex::new(table.column(h).iter().cloned()).ok())
                .collect();

        let mut samples = Vec::with_capacity(hidden_data.len());

        for &h in hidden_data {
            let dist = columns.get(h)
                              .and_then(|dist| dist.as_ref())
                              .ok_or(NogginError::DegenerateDistribution)?;

            samples.push(dist.sample(rng));
        }

        visible_data.insert(String::from(name), samples);
    }

    Ok(visible_data)
}
