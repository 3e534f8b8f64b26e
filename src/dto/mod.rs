//! DTO modules that bridge services with templates and APIs.

pub mod remito;
pub mod report;
pub mod schedule;
