//! Route Segment Library - Part-Aware Polyline Segmentation
//!
//! This library decomposes polylines into the ordered sequence of two-point segments
//! between their consecutive vertices, and persists those segments into a geometry sink.
//! Multi-part structure is honored: no segment ever joins the last vertex of one part
//! to the first vertex of the next, nor one feature to the next.
//!
//! # Architecture
//!
//! - **[`Polyline`]**: A feature made of one or more parts (`LineString`s)
//! - **[`extract_vertices`] / [`segment`]**: The pure vertex-to-segment transform
//! - **[`SegmentSink`]**: Destination for segments, released through a [`SinkGuard`]
//! - **[`Segmenter`]**: High-level pipeline over many features, producing a
//!   [`SegmentationSummary`]
//!
//! # Write Semantics
//!
//! Writing stops at the first segment the sink rejects. Every segment before it
//! stays committed and the error carries the zero-based index of the rejected one.

mod geometry;
pub mod gpx_io;
mod pipeline;
mod segment;
mod sink;
pub mod utils;

// Public API exports
pub use geometry::{Polyline, Segment, Vertex};
pub use gpx_io::{GpxSink, read_polylines};
pub use pipeline::{Config, Segmentation, SegmentationSummary, Segmenter, segment_file};
pub use segment::{extract_vertices, segment};
pub use sink::{MemorySink, SegmentSink, SinkError, SinkGuard, write_segments};

/// Error types for the segmentation pipeline
#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    #[error("Polyline {polyline_index} has no vertices")]
    EmptyGeometry { polyline_index: usize },

    #[error("Non-finite coordinate at vertex {vertex_index} of part {part_index}")]
    MalformedPart {
        part_index: usize,
        vertex_index: usize,
    },

    #[error("Polyline {polyline_index}: {source}")]
    InPolyline {
        polyline_index: usize,
        #[source]
        source: Box<SegmentError>,
    },

    #[error("Sink rejected segment {segment_index}: {source}")]
    Write {
        segment_index: usize,
        #[source]
        source: SinkError,
    },

    #[error("Failed to release output: {0}")]
    Release(#[source] SinkError),

    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(std::path::PathBuf),

    #[error("GPX parsing error: {0}")]
    GpxParse(#[from] gpx::errors::GpxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SegmentError>;
