//! External service integrations.

pub mod llm_client {
    pub use crate::llm_client::*;
}

pub mod insights {
    pub use crate::insights::*;
}

pub mod circuit_breaker {
    pub use crate::circuit_breaker::*;
}
