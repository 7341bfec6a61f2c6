//! Retell AI integration
//!
//! Wraps the Retell call-registration API used to hand an unanswered call
//! to the configured voice agent.

pub mod client;

pub use client::RetellClient;
