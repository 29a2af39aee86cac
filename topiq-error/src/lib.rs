pub mod ext;
pub mod response;
pub mod status_code;
pub mod types;

// Publicly re-export all error types and functions from the submodules to
// simplify access from external code.
pub use ext::*;
pub use response::*;
pub use status_code::*;
pub use types::*;

pub type BrokerResult<T> = Result<T, BrokerError>;
