//! Domain entities and value objects of the maintenance/remito workflow.

pub mod client;
pub mod dates;
pub mod remito;
pub mod report;
pub mod repuesto;
pub mod schedule;
pub mod stage;
pub mod types;
pub mod workflow;
