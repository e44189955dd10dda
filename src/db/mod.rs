pub mod gateway;
pub mod redis_store;

pub use gateway::PersistenceGateway;
pub use redis_store::{create_redis_client, RedisGateway};
