pub mod handoff_error;

pub use handoff_error::HandoffError;
