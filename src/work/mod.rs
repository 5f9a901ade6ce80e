//! Proof of Work generation and validation.
//!
//! Nano uses a proof of work system to prevent spam. Work must be computed
//! for each block before it can be processed by the network.

mod client;
mod cpu;
mod failure;
mod validate;

pub use client::{SharedWorkClient, WorkClient, WorkClientConfig};
pub use cpu::CpuWorkGenerator;
pub use failure::WorkFailureFlag;
pub use validate::{WorkThreshold, WorkValidator};
