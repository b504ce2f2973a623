//! Redis 缓存管理模块
//!
//! 提供 Redis 连接管理和常用缓存操作封装。

use crate::config::RedisConfig;
use crate::error::{PlatformError, Result};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Redis 缓存客户端
#[derive(Clone)]
pub struct Cache {
    client: Client,
}

impl Cache {
    /// 创建 Redis 客户端
    pub fn new(config: &RedisConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str())?;
        info!("Redis client created");
        Ok(Self { client })
    }

    async fn get_conn(&self) -> Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(PlatformError::from)
    }

    /// 健康检查
    pub async fn health_check(&self) -> Result<()> {
        let mut conn = self.get_conn().await?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(PlatformError::from)
    }

    /// 获取值
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(v) => Ok(Some(serde_json::from_str(&v)?)),
            None => Ok(None),
        }
    }

    /// 设置值
    #[instrument(skip(self, value))]
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let mut conn = self.get_conn().await?;
        let serialized = serde_json::to_string(value)?;

        let _: () = conn.set_ex(key, serialized, ttl.as_secs()).await?;
        Ok(())
    }

    /// 删除值
    #[instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.get_conn().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

/// 缓存键生成器
///
/// 所有键都带租户前缀，避免跨商家串读
pub struct CacheKey;

impl CacheKey {
    /// 顾客已加入的卡片列表
    pub fn customer_cards(business_id: Uuid, customer_id: Uuid) -> String {
        format!("biz:{}:customer:{}:cards", business_id, customer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_generation() {
        let business_id = Uuid::nil();
        let customer_id = Uuid::from_u128(1);
        assert_eq!(
            CacheKey::customer_cards(business_id, customer_id),
            format!("biz:{}:customer:{}:cards", business_id, customer_id)
        );
    }

    #[tokio::test]
    #[ignore] // 需要 Redis 连接
    async fn test_set_get_delete() {
        let config = RedisConfig {
            url: std::env::var("REDIS_URL").unwrap_or_else(|_| RedisConfig::default().url),
            pool_size: 1,
        };
        let cache = Cache::new(&config).unwrap();
        cache
            .set("carimbo:test", &42_i32, Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(cache.get::<i32>("carimbo:test").await.unwrap(), Some(42));
        cache.delete("carimbo:test").await.unwrap();
        assert_eq!(cache.get::<i32>("carimbo:test").await.unwrap(), None);
    }
}
