//! Cache domain - keys and the cache abstraction

mod key;
mod repository;

pub use key::{CacheKey, CacheKeyParams, CacheOperation, CacheTier};
pub use repository::{Cache, CacheExt};

#[cfg(test)]
pub use repository::mock::MockCache;
