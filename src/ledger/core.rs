pub mod chain;
pub mod queries;
pub mod validation;

pub use chain::*;
pub use queries::*;
pub use validation::*;
