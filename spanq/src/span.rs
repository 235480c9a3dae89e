//! Sample payload: a fixed-size trace span record.

use serde::{Deserialize, Serialize};

/// A single trace span.
///
/// Seven fields, 52 bytes of data, aligned to the destructive-interference
/// size so that no two spans share a cache line when stored contiguously.
/// Trivially copyable, so it travels through the queues as a plain bitwise
/// copy.
#[repr(C)]
#[cfg_attr(
    any(target_arch = "aarch64", target_arch = "powerpc64"),
    repr(align(128))
)]
#[cfg_attr(
    not(any(target_arch = "aarch64", target_arch = "powerpc64")),
    repr(align(64))
)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceSpan {
    /// High half of the 128-bit trace id
    pub trace_id_high: u64,
    /// Low half of the 128-bit trace id
    pub trace_id_low: u64,
    /// Id of this span
    pub span_id: u64,
    /// Id of the parent span, zero for a root span
    pub parent_id: u64,
    /// Start time, nanoseconds since the unix epoch
    pub start_ns: u64,
    /// Duration in nanoseconds
    pub duration_ns: u64,
    /// Sampling and debug flags
    pub flags: u32,
}

impl TraceSpan {
    /// Span carrying only an id, all other fields zeroed. Handy for
    /// drivers that tag spans to track them through a queue.
    pub fn with_span_id(span_id: u64) -> Self {
        Self {
            span_id,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CACHE_LINE_SIZE;

    #[test]
    fn span_occupies_exactly_one_cache_line() {
        assert_eq!(std::mem::align_of::<TraceSpan>(), CACHE_LINE_SIZE);
        assert_eq!(std::mem::size_of::<TraceSpan>(), CACHE_LINE_SIZE);
    }

    #[test]
    fn default_span_is_zeroed() {
        let span = TraceSpan::default();
        assert_eq!(span.trace_id_high, 0);
        assert_eq!(span.trace_id_low, 0);
        assert_eq!(span.span_id, 0);
        assert_eq!(span.parent_id, 0);
        assert_eq!(span.start_ns, 0);
        assert_eq!(span.duration_ns, 0);
        assert_eq!(span.flags, 0);
    }

    #[test]
    fn with_span_id_tags_only_the_id() {
        let span = TraceSpan::with_span_id(77);
        assert_eq!(span.span_id, 77);
        assert_eq!(TraceSpan { span_id: 0, ..span }, TraceSpan::default());
    }
}
