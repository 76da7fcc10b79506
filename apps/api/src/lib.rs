//! Alignment API: aligns a profile of factual claims to job descriptions.
//!
//! The engine entry points are [`alignment::extractor::extract`] (job texts to
//! weighted signals) and [`alignment::aligner::align_claims`] /
//! [`alignment::aligner::align`] (claims plus signals to an `AlignmentResult`).
//! Everything else in the crate is the HTTP service wrapped around them.

pub mod alignment;
pub mod config;
pub mod errors;
pub mod models;
pub mod routes;
pub mod state;
pub mod vocabulary;
