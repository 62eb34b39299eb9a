//! Completion provider adapters.

mod groq_client;
mod mock_client;
mod resilient;

pub use groq_client::{GroqClient, GroqConfig};
pub use mock_client::MockCompletionClient;
pub use resilient::{
    ResilientCompletionClient, AUTH_FALLBACK, CONNECTION_FALLBACK, GENERIC_FALLBACK,
    TIMEOUT_FALLBACK,
};
