//! Minimal metrics registry for the dispatch stack.
//!
//! Counters with dynamic labels backed by `DashMap`, plus a fixed-bucket
//! duration histogram. Labels are flattened into sorted key vectors for
//! deterministic ordering; buckets are integer microseconds to avoid floating
//! point math. Rendered in Prometheus text exposition format.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;

type LabelKey = Vec<(String, String)>;

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn render_labels(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| {
            let escaped = v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n");
            format!("{k}=\"{escaped}\"")
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Labelled monotonic counter.
#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Current value for a label set (0 if never incremented).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} counter");
        for entry in self.map.iter() {
            let labels = render_labels(entry.key());
            let value = entry.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}{{{labels}}} {value}");
        }
    }
}

// 100us, 1ms, 10ms, 100ms, 1s
const BUCKETS_MICROS: [u64; 5] = [100, 1_000, 10_000, 100_000, 1_000_000];

struct Histogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; BUCKETS_MICROS.len()],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

/// Labelled duration histogram (microsecond scale, cumulative buckets).
#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, Histogram>,
}

impl HistogramVec {
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(Histogram::default);
        let micros = duration.as_micros() as u64;

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(micros, Ordering::Relaxed);
        for (i, &bound) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= bound {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {name} histogram");
        for entry in self.map.iter() {
            let labels = render_labels(entry.key());
            let prefix = if labels.is_empty() {
                String::new()
            } else {
                format!("{labels},")
            };
            let hist = entry.value();
            for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{name}_bucket{{{prefix}le=\"{le}\"}} {count}");
            }
            let count = hist.count.load(Ordering::Relaxed);
            let sum = hist.sum.load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}_bucket{{{prefix}le=\"+Inf\"}} {count}");
            let _ = writeln!(out, "{name}_sum{{{labels}}} {sum}");
            let _ = writeln!(out, "{name}_count{{{labels}}} {count}");
        }
    }
}

/// Metrics for the per-call dispatch stack.
#[derive(Default)]
pub struct DispatchMetrics {
    /// Dispatched calls by (service, action, outcome).
    pub calls: CounterVec,
    /// Authorization denials by (service, action).
    pub auth_denials: CounterVec,
    /// Lookups of actions absent from the service definition.
    pub unimplemented: CounterVec,
    /// Handler failures propagated to the transport.
    pub handler_errors: CounterVec,
    /// End-to-end dispatch duration (microseconds).
    pub dispatch_duration: HistogramVec,
}

impl DispatchMetrics {
    /// Render all metrics in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.calls.render("rpcgate_calls_total", &mut out);
        self.auth_denials.render("rpcgate_auth_denials_total", &mut out);
        self.unimplemented.render("rpcgate_unimplemented_total", &mut out);
        self.handler_errors.render("rpcgate_handler_errors_total", &mut out);
        self.dispatch_duration
            .render("rpcgate_dispatch_duration_micros", &mut out);
        out
    }
}
