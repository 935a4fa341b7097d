use std::sync::Arc;

use tripgate_core::{
    BookingRepository, HotelSupplier, PaymentGateway, PaymentRepository, SearchHistoryRepository,
};
use tripgate_rates::PricingConfig;
use tripgate_store::RedisClient;
use tripgate_suppliers::{MailerClient, MapsClient};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub supplier: Arc<dyn HotelSupplier>,
    pub maps: Arc<MapsClient>,
    pub mailer: Arc<MailerClient>,
    pub gateways: Arc<Vec<Arc<dyn PaymentGateway>>>,
    pub bookings: Arc<dyn BookingRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub search_history: Arc<dyn SearchHistoryRepository>,
    pub redis: Arc<RedisClient>,
    pub pricing: PricingConfig,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn gateway(&self, name: &str) -> Option<Arc<dyn PaymentGateway>> {
        self.gateways.iter().find(|g| g.name() == name).cloned()
    }
}
