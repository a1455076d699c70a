//! Model builders
//!
//! Two interchangeable formulations of the same flow LP:
//! - Dense: every (well, refinery) pair, disallowed pairs bounded to zero
//! - Sparse: allowed routes only
//!
//! Both yield the same optimal objective for the same input.

pub mod dense;
pub mod sparse;

pub use dense::*;
pub use sparse::*;
