//! Postal address verification client: DPV match codes mapped onto a
//! normalized, never-failing verification result.

mod client;
mod error;
mod types;

pub use client::AddressVerifier;
pub use error::VerifyError;
pub use types::{
    AddressCandidate, AddressComponents, DeliverabilityAnalysis, VerificationResult,
    VerificationStatus,
};
