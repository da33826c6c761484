//! Core Kernel - Foundational types and utilities for the claims validation system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Pattern-constrained identifiers for claims, results and demo sessions
//! - Port infrastructure for the hexagonal architecture
//! - Audit trail wrappers and timestamp helpers

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod audit;

pub use money::{Money, MoneyError};
pub use temporal::TemporalError;
pub use identifiers::{ClaimId, ResultId, SessionId, IdentifierError};
pub use ports::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, OperationMetadata, PortError,
};
pub use audit::{audited, AuditTrail};
