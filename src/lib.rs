/*!
A small statsd client.

The statsd protocol consists of plain-text single-packet messages sent
over UDP, containing not much more than a key and (possibly sampled) value:

```text
<name>:<value>|c[|@<rate>]
<name>:<value>|ms[|@<rate>]
```

Due to the inherent design of the protocol, there is no guarantee that
metrics will be received by the server, and there is no indication of
this. Transport errors are logged through the `log` facade and never
returned to the caller.

[`Client`] talks to one server. [`global`] offers a configuration driven,
process-wide alternative that applies a scale factor to counters and can
be switched off from its configuration file.
*/
pub mod client;
pub mod config;
pub mod global;
pub mod metric;
pub mod transport;
mod error;

pub use client::{Client, DEFAULT_HOST, DEFAULT_PORT};
pub use config::{CachedConfig, Config, ConfigSource};
pub use error::{Error, Result};
pub use global::{CountOptions, ProcessWideClient};
pub use metric::{Metric, MetricKind, Names, Value};
