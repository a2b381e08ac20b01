//! Utility library for PathBot Software

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod logger;
pub mod params;
pub mod session;
pub mod time;
