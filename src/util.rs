//! Defines the `Error` type for the noggin library

use std::error::Error;
use std::fmt;
use std::result;

pub type Result<T> = result::Result<T, NogginError>;

#[derive(Clone, Debug, PartialEq)]
pub enum NogginError {

    /// The graph contains a cycle, so no complete topological order exists
    CyclicGraph,

    /// A categorical draw was requested from a distribution with no usable
    /// mass (all weights zero, negative or non-finite)
    DegenerateDistribution,

    /// Paired sample sequences disagree in length and therefore cannot be
    /// matched position by position
    LengthMismatch,

    /// A table was supplied whose shape or column sums do not describe a
    /// conditional probability table
    InvalidTable(String),

    /// A general error with the given description
    General(String)

}

impl fmt::Display for NogginError {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NogginError::CyclicGraph => {
                write!(f, "Graph contains a cycle; topological order is undefined")
            },
            NogginError::DegenerateDistribution => {
                write!(f, "Distribution has no usable probability mass")
            },
            NogginError::LengthMismatch => {
                write!(f, "Paired sample sequences have different lengths")
            },
            NogginError::InvalidTable(ref why) => {
                write!(f, "Not a conditional probability table: {}", why)
            },
            NogginError::General(ref err) => write!(f, "{}", err)
        }
    }

}

impl Error for NogginError {}
