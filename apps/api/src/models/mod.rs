pub mod aligned;
pub mod profile;
pub mod signal;
