//! Definition of the brain module
//!
//! The `Brain` infers the latent values of a single hidden factor from
//! observed evidence: given a prior over the hidden states and current
//! conditional tables, it computes a per-sample posterior, resamples a hard
//! hidden-state assignment from it, and re-estimates the prior and tables
//! from the new assignments. Repeating this for a fixed budget of cycles
//! drives the estimates toward a fixed point.

use crate::estimator::Estimator;
use crate::network::Table;
use crate::util::{NogginError, Result};

use ndarray::{Array1, Array2};
use rand::Rng;
use tracing::trace;

use std::collections::BTreeMap;

/// The result of a completed learning run.
#[derive(Clone, Debug)]
pub struct Learning {

    /// Final marginal distribution over the hidden states
    pub theta_hidden: Array1<f64>,

    /// Final conditional table per visible factor
    pub theta_visible: BTreeMap<String, Table>,

    /// Posterior over the hidden states for each sample, one row per
    /// sample, from the last refinement pass
    pub posteriors: Array2<f64>,

    /// Final hard hidden-state assignment per sample
    pub assignments: Vec<usize>

}


/// Iterative latent-state imputation over a fixed cycle budget.
///
/// There is no convergence check; the loop always runs the full budget,
/// and choosing a sufficient one is the caller's responsibility.
#[derive(Clone, Debug)]
pub struct Brain {

    /// Number of impute/re-estimate cycles a learning run performs
    iterations: usize

}

impl Brain {

    pub fn new(iterations: usize) -> Self {
        Brain { iterations }
    }


    pub fn iterations(&self) -> usize {
        self.iterations
    }


    /// Posterior probability of each hidden state given one sample's
    /// stacked evidence rows.
    ///
    /// Each evidence row holds, per hidden state, the probability of one
    /// observed visible value under that state (the shape produced by
    /// [`BayesianNetwork::evidence`](crate::BayesianNetwork::evidence)). The
    /// unnormalized mass of state `h` is `prior[h]` times the product of
    /// column `h` over all rows; the masses are then normalized to sum
    /// to 1. If every state has zero mass the posterior is all zeros
    /// rather than NaN.
    pub fn posterior(prior: &[f64], evidence: &Table) -> Array1<f64> {
        let mut likelihood = Array1::zeros(prior.len());

        for (h, &weight) in prior.iter().enumerate() {
            let mut mass = weight;

            for row in evidence.rows() {
                mass *= if h < row.len() { row[h] } else { 0.0 };
            }

            likelihood[h] = mass;
        }

        let total = likelihood.sum();
        if total > 0.0 {
            likelihood.mapv_inplace(|mass| mass / total);
        }

        likelihood
    }


    /// Impute one sample: compute its posterior and resample a hard hidden
    /// state from it.
    ///
    /// With two states the resample is a Bernoulli comparison: state 1
    /// iff `posterior[1]` exceeds a single uniform draw. With more states
    /// the draw walks the posterior's cumulative distribution. An all-zero
    /// posterior imputes state 0.
    pub fn impute<R>(rng: &mut R, prior: &[f64], evidence: &Table) -> (Array1<f64>, usize)
        where R: Rng + ?Sized
    {
        let posterior = Self::posterior(prior, evidence);
        let state = resample(rng, &posterior);

        (posterior, state)
    }


    /// Run the full learning loop.
    ///
    /// `hidden_data` seeds the hard assignments; `visible_data` is the
    /// fixed evidence and is never resampled. Each cycle imputes every
    /// sample independently against the current estimates, then
    /// re-estimates `theta_hidden` and `theta_visible` from the fresh
    /// assignments.
    ///
    /// # Errors
    /// `NogginError::LengthMismatch` if any visible sequence differs in
    /// length from `hidden_data`
    pub fn learn<R>(
        &self,
        rng: &mut R,
        estimator: &Estimator,
        hidden_data: &[usize],
        visible_data: &BTreeMap<String, Vec<usize>>,
    ) -> Result<Learning>
        where R: Rng + ?Sized
    {
        if visible_data.values().any(|samples| samples.len() != hidden_data.len()) {
            return Err(NogginError::LengthMismatch);
        }

        let states = estimator.num_states();
        let count = hidden_data.len();

        let mut assignments = hidden_data.to_vec();
        let mut theta_hidden = estimator.theta_hidden(&assignments);
        let mut theta_visible = estimator.theta_visible(&assignments, visible_data)?;
        let mut posteriors = Array2::zeros((count, states));

        for iteration in 0..self.iterations {
            let prior = theta_hidden.to_vec();

            for i in 0..count {
                let evidence = stack_evidence(&theta_visible, visible_data, i, states);
                let (posterior, state) = Self::impute(rng, &prior, &evidence);

                posteriors.row_mut(i).assign(&posterior);
                assignments[i] = state;
            }

            theta_hidden = estimator.theta_hidden(&assignments);
            theta_visible = estimator.theta_visible(&assignments, visible_data)?;

            trace!(iteration, ?theta_hidden, "refined hidden estimate");
        }

        Ok(Learning { theta_hidden, theta_visible, posteriors, assignments })
    }

}


impl Default for Brain {

    /// The historical budget: enough cycles that every practical run has
    /// settled long before the loop ends
    fn default() -> Self {
        Brain::new(800)
    }

}


/// Draw a hard state from an unnormalized posterior. Zero total mass maps
/// to state 0.
fn resample<R>(rng: &mut R, posterior: &Array1<f64>) -> usize
    where R: Rng + ?Sized
{
    let total = posterior.sum();
    if total <= 0.0 {
        return 0;
    }

    if posterior.len() == 2 {
        return if posterior[1] > rng.gen::<f64>() { 1 } else { 0 };
    }

    let draw = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;

    for (state, &mass) in posterior.iter().enumerate() {
        cumulative += mass;
        if draw < cumulative {
            return state;
        }
    }

    posterior.len() - 1
}


/// Stack the evidence rows for sample `position`: for each visible factor
/// in key order, the row of its conditional table selected by the observed
/// value. Factors without a table, or observations outside it, contribute
/// no row.
fn stack_evidence(
    tables: &BTreeMap<String, Table>,
    visible_data: &BTreeMap<String, Vec<usize>>,
    position: usize,
    states: usize,
) -> Table {
    let mut rows = Vec::with_capacity(visible_data.len());

    for (name, samples) in visible_data {
        if let Some(table) = tables.get(name) {
            let observed = samples[position];

            if observed < table.nrows() {
                rows.push(table.row(observed));
            }
        }
    }

    let mut stacked = Table::zeros((rows.len(), states));

    for (r, row) in rows.into_iter().enumerate() {
        for (c, &value) in row.iter().enumerate().take(states) {
            stacked[[r, c]] = value;
        }
    }

    stacked
}
