//! Command execution functions for packager operations.

mod distribution;

pub use distribution::{DistributionReport, run_distribution};
