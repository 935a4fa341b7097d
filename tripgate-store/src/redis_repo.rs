use redis::{AsyncCommands, RedisResult};
use serde_json::Value;
use tracing::debug;

/// Hotel static content barely changes; cache it for a day.
const HOTEL_STATIC_TTL_SECONDS: u64 = 24 * 60 * 60;

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    pub async fn cache_hotel_static(&self, hotel_id: &str, data: &Value) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("hotel:static:{}", hotel_id);
        conn.set_ex::<_, _, ()>(key, data.to_string(), HOTEL_STATIC_TTL_SECONDS)
            .await?;
        debug!(hotel_id, "hotel static data cached");
        Ok(())
    }

    pub async fn get_cached_hotel_static(&self, hotel_id: &str) -> RedisResult<Option<Value>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("hotel:static:{}", hotel_id);
        let raw: Option<String> = conn.get(key).await?;
        Ok(raw.and_then(|s| serde_json::from_str(&s).ok()))
    }

    pub async fn check_rate_limit(&self, key: &str, limit: i64, window_seconds: i64) -> RedisResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let (count,): (i64,) = redis::pipe()
            .atomic()
            .incr(key, 1)
            .expire(key, window_seconds)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(count <= limit)
    }
}
