//! Persistent run-state cache for telemetry integrations.
//!
//! Integrations run as short-lived processes spawned on an interval by the
//! host agent. Anything that must survive between runs (most importantly
//! the previous sample of every RATE/DELTA metric) lives here.
//!
//! # Example
//!
//! ```no_run
//! use ti_cache::{Cache, CachedSample, FileCache};
//!
//! let mut cache = FileCache::for_integration("redis");
//! cache.status().unwrap();
//! cache.set("RedisSample::net.bytesIn", CachedSample::new(1024.0, 1_700_000_000_000));
//! cache.save().unwrap();
//! ```

pub mod error;
pub mod store;

pub use error::{CacheError, Result};
pub use store::{
    decode, default_cache_dir, Cache, CacheFile, CachedSample, FileCache, MemoryCache,
    CACHE_DIR_ENV, CACHE_FORMAT_VERSION,
};
