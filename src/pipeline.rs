//! Wires the primitive filters into the canonical receive pipeline and
//! drives it, one input sample at a time, into the multi-protocol runner.

use crate::filters::{Background, Diff, Filter, Maximal, RunLength, Stabilize};
use crate::key::Key;
use crate::runner::Runner;
use crate::status::Status;

/// Anything that can hand the pipeline its next raw sample. `None` means
/// end of stream.
pub trait Source {
    fn next_sample(&mut self) -> Option<i32>;
}

impl Source for crate::au::AuSource {
    fn next_sample(&mut self) -> Option<i32> {
        crate::au::AuSource::next_sample(self)
    }
}

impl<R: std::io::Read> Source for crate::au::AsciiSource<R> {
    fn next_sample(&mut self) -> Option<i32> {
        crate::au::AsciiSource::next_sample(self)
    }
}

/// The canonical `log -> diff -> maximal(11) -> stabilize -> background ->
/// runlength` chain. `log` itself is a side-effecting tap the caller
/// applies before handing samples to [`Pipeline::push`] (see `remote.rs`),
/// since it needs a sink rather than another filter stage.
pub struct Pipeline {
    diff: Diff,
    maximal: Maximal,
    stabilize: Stabilize,
    background: Background,
    runlength: RunLength,
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline {
            diff: Diff::new(),
            maximal: Maximal::new(11),
            stabilize: Stabilize::new(),
            background: Background::new(),
            runlength: RunLength::new(),
        }
    }

    /// Push one raw sample through the whole chain. Returns every
    /// run-length value the chain emits for this input (ordinarily 0 or
    /// 1, since only `runlength`/`background` ever absorb, but `end`
    /// calls can surface a final flush).
    pub fn push(&mut self, value: i32) -> Vec<i32> {
        let mut out = Vec::new();
        let mut status = Status::reset();
        let v = self.diff.step(value, &mut status);
        if !status.has_out {
            return out;
        }

        let mut status = Status::reset();
        let v = self.maximal.step(v, &mut status);
        if !status.has_out {
            return out;
        }

        let mut status = Status::reset();
        let v = self.stabilize.step(v, &mut status);
        if !status.has_out {
            return out;
        }

        let mut status = Status::reset();
        let v = self.background.step(v, &mut status);
        if !status.has_out {
            return out;
        }

        let mut status = Status::reset();
        let v = self.runlength.step(v, &mut status);
        if status.has_out {
            out.push(v);
        }
        out
    }

    /// Flush every stage's tail value at end of stream, in order.
    pub fn end(&mut self) -> Vec<i32> {
        let mut out = Vec::new();
        let mut status = Status::reset();
        let v = self.runlength.end(&mut status);
        if status.has_out {
            out.push(v);
        }
        out
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::new()
    }
}

/// Runs a whole source through the canonical pipeline and the
/// multi-protocol runner, returning every decoded key in arrival order.
pub fn decode_all<S: Source>(source: &mut S) -> Vec<Key> {
    let mut pipeline = Pipeline::new();
    let mut runner = Runner::new();
    let mut keys = Vec::new();

    while let Some(sample) = source.next_sample() {
        for value in pipeline.push(sample) {
            if let Some(key) = runner.feed(value) {
                keys.push(key);
            }
        }
    }
    for value in pipeline.end() {
        if let Some(key) = runner.feed(value) {
            keys.push(key);
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    struct VecSource {
        values: std::vec::IntoIter<i32>,
    }

    impl VecSource {
        fn new(values: Vec<i32>) -> Self {
            VecSource { values: values.into_iter() }
        }
    }

    impl Source for VecSource {
        fn next_sample(&mut self) -> Option<i32> {
            self.values.next()
        }
    }

    #[test]
    fn empty_source_decodes_nothing() {
        let mut source = VecSource::new(vec![]);
        assert!(decode_all(&mut source).is_empty());
    }

    #[test]
    fn silence_decodes_nothing() {
        let mut source = VecSource::new(vec![0; 2000]);
        assert!(decode_all(&mut source).is_empty());
    }
}
