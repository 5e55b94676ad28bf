//! Cache implementations.
//!
//! # Storage Layout
//!
//! ```text
//! ~/.cache/telemetry_integrations/
//! └── <integration name>.json
//! ```
//!
//! The file is rewritten as a whole on every dirty save. Writes go to a
//! sibling temp file first and are renamed into place, so a crash mid-save
//! leaves the previous generation readable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CacheError, Result};

/// Current on-disk format version.
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// Environment variable overriding the cache directory.
pub const CACHE_DIR_ENV: &str = "TI_CACHE_DIR";

/// Directory name under the platform cache dir.
const CACHE_DIR_NAME: &str = "telemetry_integrations";

/// A value remembered from a previous run, with the time it was observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedSample {
    pub value: f64,
    pub timestamp_ms: i64,
}

impl CachedSample {
    pub fn new(value: f64, timestamp_ms: i64) -> Self {
        Self {
            value,
            timestamp_ms,
        }
    }
}

/// Run-state store shared across successive runs of an integration.
pub trait Cache {
    /// Fails if the store is uninitialized or its persisted state is unusable.
    fn status(&self) -> Result<()>;

    /// Durably persist pending changes.
    fn save(&mut self) -> Result<()>;

    /// Toggle debug tracing of lookups and writes.
    fn set_debug(&mut self, debug: bool);

    fn get(&self, key: &str) -> Option<CachedSample>;

    fn set(&mut self, key: &str, sample: CachedSample);
}

/// Serialized form of the cache file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheFile {
    pub version: u32,
    #[serde(default)]
    pub samples: BTreeMap<String, CachedSample>,
}

/// Decode a cache file, rejecting formats this build cannot read.
pub fn decode(bytes: &[u8]) -> Result<CacheFile> {
    let file: CacheFile = serde_json::from_slice(bytes)?;
    if file.version != CACHE_FORMAT_VERSION {
        return Err(CacheError::UnsupportedVersion {
            version: file.version,
            supported: CACHE_FORMAT_VERSION,
        });
    }
    Ok(file)
}

/// Resolve the directory holding cache files.
///
/// `TI_CACHE_DIR` wins over the platform cache directory.
pub fn default_cache_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CACHE_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::cache_dir()
        .map(|d| d.join(CACHE_DIR_NAME))
        .ok_or(CacheError::NoCacheDir)
}

fn file_name_for(integration: &str) -> String {
    let safe: String = integration
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    format!("{}.json", safe)
}

/// Why a cache file could not be used when it was opened.
#[derive(Debug, Clone, PartialEq)]
enum LoadFailure {
    Corrupted(String),
    Unsupported(u32),
    NoCacheDir,
}

/// JSON-file backed cache.
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    samples: BTreeMap<String, CachedSample>,
    failure: Option<LoadFailure>,
    dirty: bool,
    debug: bool,
}

impl FileCache {
    /// Open the cache stored at `path`.
    ///
    /// Never fails: a missing file is an empty cache, anything unreadable is
    /// remembered and reported by [`Cache::status`].
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut cache = Self {
            path,
            samples: BTreeMap::new(),
            failure: None,
            dirty: false,
            debug: false,
        };

        match fs::read(&cache.path) {
            Ok(bytes) => match decode(&bytes) {
                Ok(file) => cache.samples = file.samples,
                Err(CacheError::UnsupportedVersion { version, .. }) => {
                    cache.failure = Some(LoadFailure::Unsupported(version));
                }
                Err(e) => cache.failure = Some(LoadFailure::Corrupted(e.to_string())),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => cache.failure = Some(LoadFailure::Corrupted(e.to_string())),
        }

        if let Some(failure) = &cache.failure {
            tracing::warn!(path = %cache.path.display(), failure = ?failure, "cache unusable");
        }
        cache
    }

    /// Open the default cache file for an integration.
    pub fn for_integration(name: &str) -> Self {
        match default_cache_dir() {
            Ok(dir) => Self::open(dir.join(file_name_for(name))),
            Err(_) => Self {
                path: PathBuf::from(file_name_for(name)),
                samples: BTreeMap::new(),
                failure: Some(LoadFailure::NoCacheDir),
                dirty: false,
                debug: false,
            },
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn write_atomic(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = CacheFile {
            version: CACHE_FORMAT_VERSION,
            samples: self.samples.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        let mut temp_path = self.path.clone().into_os_string();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        fs::write(&temp_path, json)?;
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

impl Cache for FileCache {
    fn status(&self) -> Result<()> {
        match &self.failure {
            None => Ok(()),
            Some(LoadFailure::Corrupted(reason)) => Err(CacheError::Corrupted {
                path: self.path.clone(),
                reason: reason.clone(),
            }),
            Some(LoadFailure::Unsupported(version)) => Err(CacheError::UnsupportedVersion {
                version: *version,
                supported: CACHE_FORMAT_VERSION,
            }),
            Some(LoadFailure::NoCacheDir) => Err(CacheError::NoCacheDir),
        }
    }

    fn save(&mut self) -> Result<()> {
        // Never overwrite a file we could not read.
        self.status()?;
        if !self.dirty {
            return Ok(());
        }

        self.write_atomic()?;
        self.dirty = false;
        if self.debug {
            tracing::debug!(path = %self.path.display(), samples = self.len(), "cache saved");
        }
        Ok(())
    }

    fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    fn get(&self, key: &str) -> Option<CachedSample> {
        let sample = self.samples.get(key).copied();
        if self.debug {
            tracing::debug!(key, hit = sample.is_some(), "cache lookup");
        }
        sample
    }

    fn set(&mut self, key: &str, sample: CachedSample) {
        if self.debug {
            tracing::debug!(key, value = sample.value, "cache store");
        }
        self.samples.insert(key.to_string(), sample);
        self.dirty = true;
    }
}

/// Cache that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryCache {
    samples: BTreeMap<String, CachedSample>,
    saves: usize,
    debug: bool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Cache for MemoryCache {
    fn status(&self) -> Result<()> {
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.saves += 1;
        Ok(())
    }

    fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    fn get(&self, key: &str) -> Option<CachedSample> {
        self.samples.get(key).copied()
    }

    fn set(&mut self, key: &str, sample: CachedSample) {
        if self.debug {
            tracing::debug!(key, value = sample.value, "cache store");
        }
        self.samples.insert(key.to_string(), sample);
    }
}
