//! Metric value objects and their wire encoding.

use std::fmt;
use std::iter::FromIterator;

use itertools::Itertools;


/// A numeric metric value, kept in the type it was given in.
///
/// Integers are written exactly, floats with their shortest
/// round-trip form (`1.0` is written as `1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Signed(v) => write!(f, "{}", v),
            Value::Unsigned(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
        }
    }
}

macro_rules! value_from {
    ($variant:ident, $target:ty, $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(v: $source) -> Self {
                    Value::$variant(<$target>::from(v))
                }
            }
        )+
    };
}

value_from!(Signed, i64, i8, i16, i32, i64);
value_from!(Unsigned, u64, u8, u16, u32, u64);
value_from!(Float, f64, f32, f64);


/// Enum of metric types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricKind {
    Counter(Value), // delta
    Timing(Value),  // duration in ms
}

impl MetricKind {
    fn suffix(&self) -> &'static str {
        match *self {
            MetricKind::Counter(_) => "c",
            MetricKind::Timing(_) => "ms",
        }
    }

    fn value(&self) -> Value {
        match *self {
            MetricKind::Counter(v) | MetricKind::Timing(v) => v,
        }
    }
}


/// A single metric update, ready to be written on the wire.
///
/// Formats as:
///
/// - `<name>:<value>|c` / `<name>:<value>|ms`
/// - `<name>:<value>|c|@<sample_rate>` / `<name>:<value>|ms|@<sample_rate>`
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: String,
    pub kind: MetricKind,
    pub sample_rate: Option<f64>,
}

impl Metric {
    pub fn new(name: &str, kind: MetricKind) -> Metric {
        Metric { name: name.to_string(), kind, sample_rate: None }
    }

    pub fn sampled(mut self, rate: f64) -> Metric {
        self.sample_rate = Some(rate);
        self
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}|{}", self.name, self.kind.value(), self.kind.suffix())?;
        if let Some(rate) = self.sample_rate {
            write!(f, "|@{}", rate)?;
        }
        Ok(())
    }
}


/// One or more metric names targeted by a single call.
///
/// Repeated names collapse into one entry at the position they first
/// appeared.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Names(Vec<String>);

impl Names {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Names {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Names(iter.into_iter().map(|name| -> String { name.into() }).unique().collect())
    }
}

impl From<&str> for Names {
    fn from(name: &str) -> Self {
        Names(vec![name.to_string()])
    }
}

impl From<String> for Names {
    fn from(name: String) -> Self {
        Names(vec![name])
    }
}

impl From<&String> for Names {
    fn from(name: &String) -> Self {
        Names(vec![name.clone()])
    }
}

impl From<&[&str]> for Names {
    fn from(names: &[&str]) -> Self {
        names.iter().copied().collect()
    }
}

impl<const N: usize> From<[&str; N]> for Names {
    fn from(names: [&str; N]) -> Self {
        names.iter().copied().collect()
    }
}

impl From<Vec<&str>> for Names {
    fn from(names: Vec<&str>) -> Self {
        names.into_iter().collect()
    }
}

impl From<Vec<String>> for Names {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}



//
// Tests
//
#[cfg(test)]
mod test {
    use super::{Metric, MetricKind, Names, Value};

    #[test]
    fn test_counter_fmt() {
        assert_eq!("test:1|c", Metric::new("test", MetricKind::Counter(Value::from(1.0))).to_string());
        assert_eq!("test:-1|c", Metric::new("test", MetricKind::Counter(Value::from(-1.0))).to_string());
        assert_eq!("test:30|c", Metric::new("test", MetricKind::Counter(Value::from(30.0))).to_string());
        assert_eq!("test:2.5|c", Metric::new("test", MetricKind::Counter(Value::from(2.5))).to_string());
    }

    #[test]
    fn test_timing_fmt() {
        assert_eq!("test:350|ms", Metric::new("test", MetricKind::Timing(Value::from(350.0))).to_string());
        assert_eq!("a.b:12.3|ms", Metric::new("a.b", MetricKind::Timing(Value::from(12.3))).to_string());
    }

    #[test]
    fn test_sampled_fmt() {
        assert_eq!(
            "test:350|ms|@0.5",
            Metric::new("test", MetricKind::Timing(Value::from(350.0))).sampled(0.5).to_string()
        );
        assert_eq!(
            "test:1|c|@0.25",
            Metric::new("test", MetricKind::Counter(Value::from(1.0))).sampled(0.25).to_string()
        );
    }

    #[test]
    fn test_large_integers_are_exact() {
        let metric = Metric::new("bytes", MetricKind::Counter(Value::from(u64::MAX)));
        assert_eq!("bytes:18446744073709551615|c", metric.to_string());

        let metric = Metric::new("bytes", MetricKind::Counter(Value::from(9_007_199_254_740_993i64)));
        assert_eq!("bytes:9007199254740993|c", metric.to_string());
    }

    // A counter delta can never pick up a timing suffix, whatever its name.
    #[test]
    fn test_counter_named_like_timing() {
        let metric = Metric::new("latency|ms", MetricKind::Counter(Value::from(1.0)));
        assert_eq!("latency|ms:1|c", metric.to_string());
    }

    #[test]
    fn test_names_from_single() {
        let names = Names::from("test");
        assert_eq!(vec!["test"], names.iter().collect::<Vec<_>>());

        let names = Names::from(String::from("other"));
        assert_eq!(1, names.len());
    }

    #[test]
    fn test_names_keep_order_and_collapse_duplicates() {
        let names = Names::from(["b", "a", "b", "c"]);
        assert_eq!(vec!["b", "a", "c"], names.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_names_empty() {
        let names = Names::from(Vec::<String>::new());
        assert!(names.is_empty());
    }
}
