pub mod clock;
pub mod metrics;
pub mod receipt;

pub use clock::{Clock, FixedClock, SystemClock};
pub use self::metrics::{get_metrics, init_metrics, record_transaction, Outcome};
pub use receipt::{ReceiptBuilder, Receipts};
