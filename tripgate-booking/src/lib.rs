pub mod cutoff;
pub mod finish;
pub mod models;
pub mod order_id;
pub mod poll;

pub use cutoff::{validate_booking_cutoff, CutoffCheck};
pub use finish::{classify_finish, FinishOutcome};
pub use models::{Booking, BookingError, BookingStatus, Guest};
pub use order_id::generate_partner_order_id;
pub use poll::{classify_poll, poll_booking, PollOutcome, PollResult, PollSchedule};
