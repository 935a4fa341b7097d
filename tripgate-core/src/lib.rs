pub mod payment;
pub mod repository;
pub mod search;
pub mod supplier;

pub use payment::{PaymentGateway, PaymentOrder, PaymentStatus};
pub use repository::{BookingRepository, PaymentRepository, SearchHistoryRepository};
pub use supplier::{HotelSupplier, SupplierResponse};
