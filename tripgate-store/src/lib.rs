pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod payment_repo;
pub mod redis_repo;
pub mod search_history_repo;

pub use booking_repo::PgBookingRepository;
pub use database::DbClient;
pub use payment_repo::PgPaymentRepository;
pub use redis_repo::RedisClient;
pub use search_history_repo::PgSearchHistoryRepository;
