pub mod clock;
pub mod errors;
pub mod shutdown;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{db_err, DomainError, DomainResult};
