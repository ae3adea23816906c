//! Control word threaded through every stage of the filter pipeline.
//!
//! A [`Status`] is reset by the driver before each filter invocation and
//! inspected afterward. It carries three independent bits rather than an
//! error code: a filter can legitimately end the stream, skip emitting a
//! value for this call, and/or mark the value it did emit as the end of a
//! run, all without allocating.

/// Per-step control word passed alongside a sample through a filter chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status {
    /// The upstream source has no more samples; the driver should stop.
    pub ended: bool,
    /// This call produced a usable output. `false` means "absorbed": the
    /// caller must not forward the returned value and should fetch the
    /// next input instead of advancing downstream.
    pub has_out: bool,
    /// The emitted value is the last of a run; downstream buffering
    /// filters may flush.
    pub flush: bool,
}

impl Status {
    /// The status a driver hands to a filter at the start of every call:
    /// not ended, output expected, no flush yet.
    pub fn reset() -> Self {
        Status { ended: false, has_out: true, flush: false }
    }

    /// Mark this call as having absorbed its input (no output produced).
    pub fn absorb(&mut self) {
        self.has_out = false;
    }

    /// Mark the end of the upstream stream.
    pub fn end_stream(&mut self) {
        self.ended = true;
        self.has_out = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_expects_output_by_default() {
        let status = Status::reset();
        assert!(!status.ended);
        assert!(status.has_out);
        assert!(!status.flush);
    }

    #[test]
    fn absorb_clears_has_out_without_ending() {
        let mut status = Status::reset();
        status.absorb();
        assert!(!status.has_out);
        assert!(!status.ended);
    }

    #[test]
    fn end_stream_clears_has_out_too() {
        let mut status = Status::reset();
        status.end_stream();
        assert!(status.ended);
        assert!(!status.has_out);
    }
}
