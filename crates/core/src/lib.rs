pub mod money;
pub mod transaction;

pub use money::Money;
pub use transaction::{TransactionKind, TransactionRecord};
