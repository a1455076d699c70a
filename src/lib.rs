//! Minimum-cost flow planning from wells through refineries to aggregate
//! customer demand, formulated as a linear program.

pub mod config;
pub mod domain;
pub mod optimizer;
pub mod report;
pub mod telemetry;
