use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tripgate_api::{app, state::{AppState, AuthConfig}};
use tripgate_core::PaymentGateway;
use tripgate_rates::{ConversionTable, PricingConfig};
use tripgate_store::{
    DbClient, PgBookingRepository, PgPaymentRepository, PgSearchHistoryRepository, RedisClient,
};
use tripgate_suppliers::{
    EtgClient, EtgConfig, MailerClient, MapsClient, PaypalGateway, RazorpayGateway,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tripgate_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = tripgate_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting TripGate API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let redis = RedisClient::new(&config.redis.url)
        .await
        .expect("Failed to connect to Redis");

    let supplier = EtgClient::new(EtgConfig {
        base_url: config.supplier.base_url.clone(),
        key_id: config.supplier.key_id.clone(),
        key_secret: config.supplier.key_secret.clone(),
        proxy_url: config.supplier.proxy_url.clone(),
        corporate_email: config.supplier.corporate_email.clone(),
    })
    .expect("Failed to build supplier client");

    let maps = MapsClient::new(config.maps.api_key.clone());

    let mut gateways: Vec<Arc<dyn PaymentGateway>> = Vec::new();
    if !config.payments.razorpay.key_id.is_empty() {
        gateways.push(Arc::new(RazorpayGateway::new(
            config.payments.razorpay.key_id.clone(),
            config.payments.razorpay.key_secret.clone(),
        )));
        tracing::info!("Razorpay payment gateway initialized");
    } else {
        tracing::warn!("Razorpay credentials not configured");
    }
    if !config.payments.paypal.client_id.is_empty() {
        gateways.push(Arc::new(PaypalGateway::new(
            config.payments.paypal.client_id.clone(),
            config.payments.paypal.client_secret.clone(),
            &config.payments.paypal.mode,
        )));
        tracing::info!("PayPal payment gateway initialized ({} mode)", config.payments.paypal.mode);
    } else {
        tracing::warn!("PayPal credentials not configured");
    }

    let mailer = MailerClient::new(tripgate_suppliers::MailerConfig {
        api_url: config.mail.api_url.clone(),
        api_key: config.mail.api_key.clone(),
        sender_name: config.mail.sender_name.clone(),
        sender_email: config.mail.sender_email.clone(),
    });

    let pricing = PricingConfig {
        commission_rate: config.pricing.commission_rate,
        original_price_multiplier: config.pricing.original_price_multiplier,
        discount_percent: config.pricing.discount_percent,
        conversion: ConversionTable {
            usd_to_inr: config.pricing.usd_to_inr,
            eur_to_inr: config.pricing.eur_to_inr,
            gbp_to_inr: config.pricing.gbp_to_inr,
        },
    };

    let app_state = AppState {
        supplier: Arc::new(supplier),
        maps: Arc::new(maps),
        mailer: Arc::new(mailer),
        gateways: Arc::new(gateways),
        bookings: Arc::new(PgBookingRepository::new(db.pool.clone())),
        payments: Arc::new(PgPaymentRepository::new(db.pool.clone())),
        search_history: Arc::new(PgSearchHistoryRepository::new(db.pool.clone())),
        redis: Arc::new(redis),
        pricing,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
