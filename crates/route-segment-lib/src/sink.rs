//! Output sinks for segments and their scoped release

use crate::{Result, Segment, SegmentError};
use std::ops::{Deref, DerefMut};

/// Errors raised by a sink while accepting or releasing geometries
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Geometry rejected: {0}")]
    Rejected(String),

    #[error("Sink is already closed")]
    Closed,

    #[error("An earlier release failed, output is incomplete")]
    ReleaseFailed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GPX write error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
}

/// A collection that persists two-point line geometries in insertion order
pub trait SegmentSink {
    /// Insert one segment after all previously inserted ones
    fn insert(&mut self, segment: &Segment) -> std::result::Result<(), SinkError>;

    /// Release the sink, committing what was inserted. Must be idempotent.
    fn close(&mut self) -> std::result::Result<(), SinkError> {
        Ok(())
    }
}

impl<S: SegmentSink + ?Sized> SegmentSink for &mut S {
    fn insert(&mut self, segment: &Segment) -> std::result::Result<(), SinkError> {
        (**self).insert(segment)
    }

    fn close(&mut self) -> std::result::Result<(), SinkError> {
        (**self).close()
    }
}

/// Write segments in order, stopping at the first rejection
///
/// Returns the number of segments written, always `segments.len()` on success.
/// On failure the error names the zero-based index of the rejected segment; every
/// segment before that index has been inserted and stays in the sink (no rollback),
/// and nothing after it is attempted.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn write_segments<S: SegmentSink + ?Sized>(segments: &[Segment], sink: &mut S) -> Result<usize> {
    for (segment_index, segment) in segments.iter().enumerate() {
        sink.insert(segment)
            .map_err(|source| SegmentError::Write {
                segment_index,
                source,
            })?;
    }
    Ok(segments.len())
}

/// Scoped ownership of an open sink
///
/// The sink is released exactly once: through [`SinkGuard::close`], which reports
/// release failures, or on drop, which logs them.
pub struct SinkGuard<S: SegmentSink> {
    sink: S,
    released: bool,
}

impl<S: SegmentSink> SinkGuard<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            released: false,
        }
    }

    /// Release the sink and surface any release error
    pub fn close(mut self) -> Result<()> {
        self.released = true;
        self.sink.close().map_err(SegmentError::Release)
    }
}

impl<S: SegmentSink> Deref for SinkGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.sink
    }
}

impl<S: SegmentSink> DerefMut for SinkGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: SegmentSink> Drop for SinkGuard<S> {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            if let Err(e) = self.sink.close() {
                tracing::warn!("Failed to release segment sink: {}", e);
            }
        }
    }
}

/// In-memory sink keeping segments in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    segments: Vec<Segment>,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }
}

impl SegmentSink for MemorySink {
    fn insert(&mut self, segment: &Segment) -> std::result::Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        self.segments.push(*segment);
        Ok(())
    }

    fn close(&mut self) -> std::result::Result<(), SinkError> {
        self.closed = true;
        Ok(())
    }
}
