//! vf-circuit: circuit model and electrical solver for voltflow.
//!
//! Provides:
//! - Branch / Circuit data structures (immutable snapshots)
//! - Incremental circuit builder with validation
//! - Electrical model: series and parallel Ohm's-law solutions with
//!   KVL/KCL conservation checks
//!
//! # Example
//!
//! ```
//! use vf_circuit::{CircuitBuilder, Topology};
//! use vf_core::units::{ohms, volts};
//!
//! let mut builder = CircuitBuilder::new(Topology::Series);
//! builder.set_source(volts(12.0));
//! builder.add_branch("R1", ohms(10.0));
//! builder.add_branch("R2", ohms(20.0));
//! builder.add_branch("R3", ohms(30.0));
//! let circuit = builder.build().unwrap();
//!
//! let solution = circuit.solve();
//! assert!((solution.total_current.value - 0.2).abs() < 1e-12);
//! assert!(solution.conservation.satisfied);
//! ```

pub mod builder;
pub mod circuit;
pub mod error;
pub mod model;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::CircuitBuilder;
pub use circuit::{Branch, Circuit, Topology};
pub use error::{CircuitError, CircuitResult};
pub use model::{
    BranchSolution, CircuitSolution, ConservationCheck, ConservationLaw, DEFAULT_CLAMP_OHM,
    ParallelSolution, ResistanceClamp, SeriesSolution, compute_parallel, compute_series, solve,
};
