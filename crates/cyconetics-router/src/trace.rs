//! Trace id source for requests that arrive without one.

use std::sync::atomic::{AtomicU64, Ordering};

pub trait TraceIdSource: Send + Sync {
    fn next_trace_id(&self) -> String;
}

/// Process-local monotonic ids: `trace-0000000000000001`, ...
#[derive(Debug)]
pub struct SequentialTraceIds {
    seq: AtomicU64,
}

impl SequentialTraceIds {
    pub fn new() -> Self {
        Self {
            seq: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialTraceIds {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceIdSource for SequentialTraceIds {
    fn next_trace_id(&self) -> String {
        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("trace-{n:016x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_and_prefixed() {
        let ids = SequentialTraceIds::new();
        let a = ids.next_trace_id();
        let b = ids.next_trace_id();
        assert_eq!(a, "trace-0000000000000001");
        assert_ne!(a, b);
    }
}
