//! Health-support domain - stateless chat vocabulary and the keyword-scan
//! context heuristic.

mod context;

pub use context::{analyze_history, ChatTurn, PatientContext};

/// Topic label used whenever topic extraction fails.
pub const DEFAULT_TOPIC: &str = "Kesehatan Umum";
