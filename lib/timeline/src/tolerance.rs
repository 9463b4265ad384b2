//! Boundary tolerances shared by the resolver and the mutation engine.
//!
//! Both sides must agree on what "at the boundary" means, so the
//! epsilons live here instead of as local literals at every call site.

/// Slack used when scanning cumulative clip bounds, in seconds.
pub const SCAN_EPS_S: f64 = 1e-7;

/// Snap distance for treating a time as sitting exactly on a clip edge,
/// in seconds. Splits and inserts refuse to create slivers thinner than
/// this.
pub const EDGE_EPS_S: f64 = 1e-6;
