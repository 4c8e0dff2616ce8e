//! Configuration driven access to one shared client.
//!
//! [`ProcessWideClient`] can be built by application start-up code and
//! passed around, or reached through the free functions of this module,
//! which use a lazily created process-wide instance reading
//! [`ConfigSource::default`].
//!
//! Configuration is resolved on every call: `deactivated` and `factor`
//! always reflect the file as it is now. Only the underlying client is
//! memoized, from the host and port seen by the first active call.

use log::trace;
use once_cell::sync::{Lazy, OnceCell};

use crate::client::Client;
use crate::config::{Config, ConfigSource};
use crate::error::Result;
use crate::metric::Value;
use crate::transport::{RandomSource, ThreadRandom, Transport, UdpTransport};


/// Options for counter updates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountOptions {
    /// Magnitude before the configured factor is applied
    pub by: f64,
    pub sample_rate: f64,
}

impl Default for CountOptions {
    fn default() -> Self {
        CountOptions { by: 1.0, sample_rate: 1.0 }
    }
}

impl CountOptions {
    pub fn by(mut self, by: f64) -> Self {
        self.by = by;
        self
    }

    pub fn sample_rate(mut self, rate: f64) -> Self {
        self.sample_rate = rate;
        self
    }
}

impl From<f64> for CountOptions {
    fn from(by: f64) -> Self {
        CountOptions::default().by(by)
    }
}

impl From<i32> for CountOptions {
    fn from(by: i32) -> Self {
        CountOptions::default().by(f64::from(by))
    }
}

impl From<u32> for CountOptions {
    fn from(by: u32) -> Self {
        CountOptions::default().by(f64::from(by))
    }
}


pub struct ProcessWideClient<T = UdpTransport, R = ThreadRandom> {
    source: ConfigSource,
    transport: T,
    random: R,
    client: OnceCell<Client<T, R>>,
}

impl ProcessWideClient {
    pub fn new(source: ConfigSource) -> Self {
        ProcessWideClient::with_parts(source, UdpTransport, ThreadRandom)
    }
}

impl<T, R> ProcessWideClient<T, R>
where
    T: Transport + Clone,
    R: RandomSource + Clone,
{
    pub fn with_parts(source: ConfigSource, transport: T, random: R) -> Self {
        ProcessWideClient { source, transport, random, client: OnceCell::new() }
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Increment `metric` by `by * factor`.
    ///
    /// ```ignore
    /// metrics.increment("jobs.done", CountOptions::default())?;
    /// metrics.increment("jobs.done", 3)?;
    /// metrics.increment("jobs.done", CountOptions::default().by(3.0).sample_rate(0.1))?;
    /// ```
    pub fn increment<O: Into<CountOptions>>(&self, metric: &str, options: O) -> Result<()> {
        self.count(metric, options.into(), 1.0)
    }

    /// Decrement `metric` by `by * factor`.
    pub fn decrement<O: Into<CountOptions>>(&self, metric: &str, options: O) -> Result<()> {
        self.count(metric, options.into(), -1.0)
    }

    /// Send a timing value, in ms, unsampled and unscaled.
    pub fn timing<V: Into<Value>>(&self, metric: &str, value_ms: V) -> Result<()> {
        if let Some((client, _)) = self.active()? {
            client.timing(metric, value_ms);
        }
        Ok(())
    }

    fn count(&self, metric: &str, options: CountOptions, sign: f64) -> Result<()> {
        if let Some((client, config)) = self.active()? {
            let delta = options.by * config.factor * sign;
            client.sampled_update_stats(metric, delta, options.sample_rate);
        }
        Ok(())
    }

    /// Resolves the configuration, returning `None` when deactivated.
    fn active(&self) -> Result<Option<(&Client<T, R>, Config)>> {
        let config = self.source.load()?;
        if config.deactivated {
            trace!("statsd client deactivated, dropping update");
            return Ok(None);
        }
        let client = self.client.get_or_init(|| {
            Client::with_parts(&config.host, config.port, self.transport.clone(), self.random.clone())
        });
        Ok(Some((client, config)))
    }
}


static GLOBAL: Lazy<ProcessWideClient> = Lazy::new(|| ProcessWideClient::new(ConfigSource::default()));

/// Increment `metric` through the process-wide client.
pub fn increment<O: Into<CountOptions>>(metric: &str, options: O) -> Result<()> {
    GLOBAL.increment(metric, options)
}

/// Decrement `metric` through the process-wide client.
pub fn decrement<O: Into<CountOptions>>(metric: &str, options: O) -> Result<()> {
    GLOBAL.decrement(metric, options)
}

/// Send a timing value through the process-wide client.
pub fn timing<V: Into<Value>>(metric: &str, value_ms: V) -> Result<()> {
    GLOBAL.timing(metric, value_ms)
}
