//! Module containing initialization routines for conditional probability
//! tables.

use crate::estimator::normalize_columns;
use crate::network::Table;
use crate::util::{NogginError, Result};

use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

/// Defines possible ways to initialize the conditional probability table of
/// a `hidden -> visible` edge.
pub enum Initialization {

    /// A uniform distribution over the visible states in every column
    Uniform,

    /// Random column-stochastic weights
    Random,

    /// User-defined table, validated for shape and column sums
    Table(Table)

}

impl Initialization {

    /// Construct a conditional probability table with `visible_states` rows
    /// and `hidden_states` columns, initialized based on `self`. Each
    /// column of the result sums to 1.
    ///
    /// # Errors
    /// `NogginError::InvalidTable` if either dimension is zero, or if a
    /// user-supplied table has the wrong shape, negative entries, or
    /// columns that do not sum to 1
    pub fn build_table<R>(
        self,
        rng: &mut R,
        visible_states: usize,
        hidden_states: usize,
    ) -> Result<Table>
        where R: Rng + ?Sized
    {
        if visible_states == 0 || hidden_states == 0 {
            return Err(NogginError::InvalidTable(String::from("table dimensions may not be zero")));
        }

        // a user-defined table just needs to be verified and returned
        if let Initialization::Table(table) = self {
            if table.dim() != (visible_states, hidden_states) {
                return Err(NogginError::InvalidTable(String::from("dimensions do not match")));
            }

            if table.iter().any(|&value| value < 0.0) {
                return Err(NogginError::InvalidTable(String::from("negative probability")));
            }

            for column in table.columns() {
                if (column.sum() - 1.0).abs() > 0.01 {
                    return Err(NogginError::InvalidTable(String::from("columns must each sum to 1")));
                }
            }

            return Ok(table);
        }

        let table = match self {
            Initialization::Uniform => {
                let value = 1.0 / visible_states as f64;
                Table::from_elem((visible_states, hidden_states), value)
            },
            Initialization::Random => {
                let raw = Table::random_using(
                    (visible_states, hidden_states),
                    Uniform::new(1.0, 100.0),
                    rng,
                );
                normalize_columns(&raw)
            },
            Initialization::Table(_) => unreachable!()
        };

        Ok(table)
    }

}


// Unit tests for the Initialization enum.
#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;
    use itertools::iproduct;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn uniform_init() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = Initialization::Uniform.build_table(&mut rng, 4, 2).unwrap();

        assert_eq!(table.dim(), (4, 2));
        for (v, h) in iproduct!(0..4, 0..2) {
            assert_abs_diff_eq!(table[[v, h]], 0.25);
        }
    }

    #[test]
    fn random_init() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = Initialization::Random.build_table(&mut rng, 3, 3).unwrap();

        assert_eq!(table.dim(), (3, 3));
        assert!(table.iter().all(|&value| value > 0.0));
        for column in table.columns() {
            assert_abs_diff_eq!(column.sum(), 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn table_init() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = array![[0.25, 0.6], [0.75, 0.4]];

        let built = Initialization::Table(table.clone()).build_table(&mut rng, 2, 2).unwrap();
        assert_eq!(built, table);
    }

    #[test]
    fn table_init_errs() {
        let mut rng = StdRng::seed_from_u64(7);

        // wrong shape
        let table = array![[0.25, 0.6], [0.75, 0.4]];
        assert!(Initialization::Table(table).build_table(&mut rng, 3, 2).is_err());

        // columns do not sum to 1
        let table = array![[0.25, 0.6], [0.25, 0.4]];
        assert!(Initialization::Table(table).build_table(&mut rng, 2, 2).is_err());

        // negative entry
        let table = array![[1.5, 0.6], [-0.5, 0.4]];
        assert!(Initialization::Table(table).build_table(&mut rng, 2, 2).is_err());

        // degenerate dimensions
        assert!(Initialization::Uniform.build_table(&mut rng, 0, 2).is_err());
    }

}
