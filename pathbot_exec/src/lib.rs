//! # PathBot library.
//!
//! This library exposes the path-to-motion-program compiler so that other
//! crates (and the unit tests) can access the items defined inside the
//! compiler executable.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Waypoint capture interface - the compiler's view of the external capture collaborator
pub mod capture;

/// Unit conversion module - stud/mm/pixel scales and the pixel-to-shaft-degrees ratio
pub mod convert;

/// Program emission module - deterministic rendering of the target motion program
pub mod emit;

/// Executable parameters - typed configuration loaded once and passed into each component
pub mod params;

/// Path compilation module - turns ordered waypoints into ordered motion segments
pub mod path_compile;

/// PID control primitives - the single-step compute and its execution strategies
pub mod pid;

/// Port bindings - the motor/sensor port map built once from configuration
pub mod ports;
