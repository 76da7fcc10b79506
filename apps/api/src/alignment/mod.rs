// Profile alignment engine.
// Implements: signal extraction, claim alignment, grounding guard, positioning, coverage scoring.
// Core functions are synchronous and I/O free; loader and handlers sit at the edges.

pub mod aligner;
pub mod coverage;
pub mod extractor;
pub mod grounding;
pub mod handlers;
pub mod loader;
pub mod positioning;
