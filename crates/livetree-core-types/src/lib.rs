//! Core types shared across LiveTree facilities
//!
//! This crate provides foundational types used by both the error facility
//! and the logging facility of `livetree-core`:
//!
//! - **Correlation types**: RequestId, TraceId, RequestContext
//! - **Sensitive data**: Sensitive<T> marker so document text never lands in logs
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{RequestContext, RequestId, TraceId};
pub use sensitive::Sensitive;
