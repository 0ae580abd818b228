//! Binning generator (C8): the parameterized loop that batches C2 through
//! C7 and fills bins (§4.7).

pub mod bins;
pub mod generate;

pub use bins::{bucket_of, BinKey};
pub use generate::{generate_dataset, DatasetReport, GenerateOptions, SolverChoice};
