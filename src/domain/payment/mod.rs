pub mod model;
pub mod repository;

pub use model::{outstanding_balance, NewPayment, Payment, PaymentMethod, PaymentStatus};
pub use repository::PaymentRepository;
