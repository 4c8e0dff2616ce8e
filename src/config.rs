//! Configuration for the process-wide client.
//!
//! The configuration is a YAML mapping; every key is optional:
//!
//! ```yaml
//! host: statsd.internal
//! port: 8125
//! factor: 10
//! deactivated: false
//! ```
//!
//! It is looked up in `~/.statsd-client.yml` first, then in
//! `/etc/statsd-client.yml`.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::debug;
use serde::Deserialize;

use crate::client::{DEFAULT_HOST, DEFAULT_PORT};
use crate::error::{Error, Result};

pub const USER_CONFIG_FILE: &str = ".statsd-client.yml";
pub const SYSTEM_CONFIG_PATH: &str = "/etc/statsd-client.yml";
pub const DEFAULT_FACTOR: f64 = 10.0;


/// Snapshot of one configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Multiplier applied to counter deltas before sending
    pub factor: f64,
    /// Turns every process-wide operation into a no-op
    pub deactivated: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            factor: DEFAULT_FACTOR,
            deactivated: false,
        }
    }
}


/// Ordered list of places a configuration file may live.
///
/// Nothing is cached: every `load` (and every property helper) reads
/// the file again, so edits apply on the next call at the cost of one
/// file read per access. Use [`CachedConfig`] to control freshness
/// explicitly.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    candidates: Vec<PathBuf>,
}

impl Default for ConfigSource {
    fn default() -> Self {
        let mut candidates = Vec::with_capacity(2);
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(USER_CONFIG_FILE));
        }
        candidates.push(PathBuf::from(SYSTEM_CONFIG_PATH));
        ConfigSource { candidates }
    }
}

impl ConfigSource {
    pub fn new<I, P>(candidates: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        ConfigSource { candidates: candidates.into_iter().map(Into::into).collect() }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Read and parse the first candidate that exists.
    pub fn load(&self) -> Result<Config> {
        for path in &self.candidates {
            let content = match fs::read_to_string(path) {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(source) => return Err(Error::ConfigRead { path: path.clone(), source }),
            };
            debug!("loading statsd configuration from {}", path.display());

            // An empty file is a mapping with every key left to its default.
            if content.trim().is_empty() {
                return Ok(Config::default());
            }
            return serde_yaml::from_str(&content)
                .map_err(|source| Error::ConfigParse { path: path.clone(), source });
        }

        Err(Error::ConfigNotFound { searched: self.candidates.clone() })
    }

    pub fn host(&self) -> Result<String> {
        self.load().map(|config| config.host)
    }

    pub fn port(&self) -> Result<u16> {
        self.load().map(|config| config.port)
    }

    pub fn factor(&self) -> Result<f64> {
        self.load().map(|config| config.factor)
    }

    pub fn deactivated(&self) -> Result<bool> {
        self.load().map(|config| config.deactivated)
    }
}


/// A configuration snapshot that only changes on `reload`.
#[derive(Debug, Clone)]
pub struct CachedConfig {
    source: ConfigSource,
    snapshot: Config,
}

impl CachedConfig {
    pub fn load(source: ConfigSource) -> Result<Self> {
        let snapshot = source.load()?;
        Ok(CachedConfig { source, snapshot })
    }

    pub fn get(&self) -> &Config {
        &self.snapshot
    }

    /// Re-read the source. On error the previous snapshot is kept.
    pub fn reload(&mut self) -> Result<&Config> {
        self.snapshot = self.source.load()?;
        Ok(&self.snapshot)
    }
}


#[cfg(test)]
mod test {
    use std::fs;

    use tempfile::TempDir;

    use super::{CachedConfig, Config, ConfigSource};
    use crate::error::Error;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!("localhost", config.host);
        assert_eq!(8125, config.port);
        assert_eq!(10.0, config.factor);
        assert!(!config.deactivated);
    }

    #[test]
    fn test_default_source_ends_with_system_path() {
        let source = ConfigSource::default();
        let last = source.candidates().last().unwrap();
        assert_eq!("/etc/statsd-client.yml", last.to_str().unwrap());
    }

    #[test]
    fn test_load_full_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("statsd.yml");
        fs::write(&path, "host: statsd.internal\nport: 9125\nfactor: 2.5\ndeactivated: true\n").unwrap();

        let config = ConfigSource::new(vec![&path]).load().unwrap();
        assert_eq!(
            Config { host: "statsd.internal".to_string(), port: 9125, factor: 2.5, deactivated: true },
            config
        );
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("statsd.yml");
        fs::write(&path, "port: 9999\n").unwrap();

        let config = ConfigSource::new(vec![&path]).load().unwrap();
        assert_eq!(Config { port: 9999, ..Config::default() }, config);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("statsd.yml");
        fs::write(&path, "").unwrap();

        assert_eq!(Config::default(), ConfigSource::new(vec![&path]).load().unwrap());
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.yml");
        let user = dir.path().join("user.yml");
        let system = dir.path().join("system.yml");
        fs::write(&user, "host: user\n").unwrap();
        fs::write(&system, "host: system\n").unwrap();

        let source = ConfigSource::new(vec![&missing, &user, &system]);
        assert_eq!("user", source.host().unwrap());

        fs::remove_file(&user).unwrap();
        assert_eq!("system", source.host().unwrap());
    }

    #[test]
    fn test_not_found_lists_candidates() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.yml");
        let b = dir.path().join("b.yml");

        match ConfigSource::new(vec![&a, &b]).load() {
            Err(Error::ConfigNotFound { searched }) => assert_eq!(vec![a, b], searched),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("statsd.yml");
        fs::write(&path, "port: [not, a, port]\n").unwrap();

        match ConfigSource::new(vec![&path]).load() {
            Err(Error::ConfigParse { path: failed, .. }) => assert_eq!(path, failed),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_properties_reread_every_access() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("statsd.yml");
        let source = ConfigSource::new(vec![&path]);

        fs::write(&path, "deactivated: false\n").unwrap();
        assert!(!source.deactivated().unwrap());

        fs::write(&path, "deactivated: true\nfactor: 3\n").unwrap();
        assert!(source.deactivated().unwrap());
        assert_eq!(3.0, source.factor().unwrap());
        assert_eq!(8125, source.port().unwrap());
    }

    #[test]
    fn test_cached_config_only_changes_on_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("statsd.yml");
        fs::write(&path, "port: 1000\n").unwrap();

        let mut cached = CachedConfig::load(ConfigSource::new(vec![&path])).unwrap();
        fs::write(&path, "port: 2000\n").unwrap();
        assert_eq!(1000, cached.get().port);

        assert_eq!(2000, cached.reload().unwrap().port);

        fs::remove_file(&path).unwrap();
        assert!(cached.reload().is_err());
        assert_eq!(2000, cached.get().port);
    }
}
