// Domain-layer modules and shared errors/models
pub mod analyzer {
    pub use crate::analyzer::*;
}

pub mod scoring {
    pub use crate::scoring::*;
}

pub mod dispute {
    pub use crate::dispute::*;
}

pub mod timeline {
    pub use crate::timeline::*;
}

pub mod action_plan {
    pub use crate::action_plan::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
