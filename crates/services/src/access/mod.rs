//! Role-based dashboard access: capability resolution, the per-request
//! gate and tab routing.

pub mod gate;
pub mod resolver;
pub mod tables;
pub mod tabs;

pub use gate::{AccessGate, GateDecision, GateRequest};
pub use resolver::{CapabilityResolver, Identity};
pub use tables::{AccessTables, CapabilitySet, MenuItem};
pub use tabs::{TabAction, TabRoute, TabRouter};
