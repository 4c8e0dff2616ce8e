use std::convert::TryFrom;
use std::time::{Duration, Instant};

use log::{trace, warn};

use crate::metric::{Metric, MetricKind, Names, Value};
use crate::transport::{Endpoint, RandomSource, ThreadRandom, Transport, UdpTransport};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8125;


/// Client for statsd servers.
///
/// The client only remembers where to send metrics. Every call opens
/// its own endpoint, writes one datagram per metric name and drops the
/// endpoint before returning, so a `Client` can be shared between
/// threads freely.
///
/// Delivery is best effort: nothing a client does on the network can
/// fail the caller.
///
/// # Example
///
/// ```ignore
/// use statsd_client::Client;
///
/// let client = Client::new("127.0.0.1", 8125);
/// client.increment("some.metric.completed");
/// client.timing(["db.query", "db.all"], 12.0);
/// ```
#[derive(Debug, Clone)]
pub struct Client<T = UdpTransport, R = ThreadRandom> {
    host: String,
    port: u16,
    transport: T,
    random: R,
}

impl Default for Client {
    fn default() -> Self {
        Client::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl Client {
    /// Construct a new statsd client given a host & port.
    ///
    /// Nothing is resolved or validated until the first send.
    pub fn new(host: &str, port: u16) -> Client {
        Client::with_parts(host, port, UdpTransport, ThreadRandom)
    }
}

impl<T: Transport, R: RandomSource> Client<T, R> {
    /// Construct a client with a custom transport and sampling source.
    pub fn with_parts(host: &str, port: u16, transport: T, random: R) -> Client<T, R> {
        Client { host: host.to_string(), port, transport, random }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Send a timing value, in ms.
    ///
    /// Any integer or float type is accepted and written as given.
    ///
    /// ```ignore
    /// client.timing("response.duration", 350);
    /// ```
    pub fn timing<N: Into<Names>, V: Into<Value>>(&self, names: N, duration_ms: V) {
        self.sampled_timing(names, duration_ms, 1.0);
    }

    /// Send a timing value only a `rate` fraction of the time.
    pub fn sampled_timing<N: Into<Names>, V: Into<Value>>(&self, names: N, duration_ms: V, rate: f64) {
        self.send(&names.into(), MetricKind::Timing(duration_ms.into()), rate);
    }

    /// Send a `Duration` as a timing value, truncated to whole ms.
    pub fn timing_duration<N: Into<Names>>(&self, names: N, duration: Duration) {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.timing(names, millis);
    }

    /// Time a block of code.
    ///
    /// The passed closure will be timed and executed. The block's
    /// duration will be sent as a metric and its result handed back.
    ///
    /// ```ignore
    /// let rows = client.time("db.query", || {
    ///     run_query()
    /// });
    /// ```
    pub fn time<N, F, O>(&self, names: N, callable: F) -> O
    where
        N: Into<Names>,
        F: FnOnce() -> O,
    {
        let start = Instant::now();
        let output = callable();
        self.timing_duration(names, start.elapsed());
        output
    }

    /// Increment a counter by 1.
    ///
    /// ```ignore
    /// client.increment("metric.completed");
    /// ```
    pub fn increment<N: Into<Names>>(&self, names: N) {
        self.update_stats(names, 1i64);
    }

    /// Increment a counter by 1 only a `rate` fraction of the time.
    pub fn sampled_increment<N: Into<Names>>(&self, names: N, rate: f64) {
        self.sampled_update_stats(names, 1i64, rate);
    }

    /// Decrement a counter by 1.
    pub fn decrement<N: Into<Names>>(&self, names: N) {
        self.update_stats(names, -1i64);
    }

    /// Decrement a counter by 1 only a `rate` fraction of the time.
    pub fn sampled_decrement<N: Into<Names>>(&self, names: N, rate: f64) {
        self.sampled_update_stats(names, -1i64, rate);
    }

    /// Modify one or more counters by `delta`.
    ///
    /// ```ignore
    /// client.update_stats(["jobs.done", "jobs.total"], 12);
    /// ```
    pub fn update_stats<N: Into<Names>, V: Into<Value>>(&self, names: N, delta: V) {
        self.sampled_update_stats(names, delta, 1.0);
    }

    /// Modify one or more counters by `delta` only a `rate` fraction of
    /// the time.
    ///
    /// A single draw decides for the whole batch: either every name is
    /// sent, or none is.
    pub fn sampled_update_stats<N: Into<Names>, V: Into<Value>>(&self, names: N, delta: V, rate: f64) {
        self.send(&names.into(), MetricKind::Counter(delta.into()), rate);
    }

    fn send(&self, names: &Names, kind: MetricKind, rate: f64) {
        if names.is_empty() {
            return;
        }

        let sample_rate = if rate < 1.0 {
            let draw = self.random.next_f64();
            if draw > rate {
                trace!("sampled out {} metric(s) at rate {}", names.len(), rate);
                return;
            }
            Some(rate)
        } else {
            None
        };

        let mut endpoint = match self.transport.open(&self.host, self.port) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                warn!("unable to open statsd endpoint for {}:{}: {}", self.host, self.port, e);
                return;
            }
        };

        for name in names.iter() {
            let metric = Metric { name: name.to_string(), kind, sample_rate };
            let data = metric.to_string();
            if let Err(e) = endpoint.send(data.as_bytes()) {
                warn!("unable to send {:?} to {}:{}: {}", data, self.host, self.port, e);
            }
        }
    }
}
