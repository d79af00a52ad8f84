//! Segmenter - Top-level pipeline from geometry source to geometry sink
//!
//! Every feature is segmented before anything is written, so invalid input never
//! leaves a half-written destination behind. Writing then happens through a
//! [`SinkGuard`], which releases the sink on every exit path.

use crate::{
    GpxSink, Polyline, Result, Segment, SegmentError, SegmentSink, SinkGuard, extract_vertices,
    gpx_io, segment, utils, write_segments,
};

use geo::{Coord, Rect};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a segmentation run
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Fail with [`SegmentError::EmptyGeometry`] on a feature without vertices
    /// instead of counting it and moving on. Default: false
    pub reject_empty: bool,
    /// Also read GPX routes as features, after the tracks. Default: true
    pub include_routes: bool,
    /// Replace an existing destination. Default: true
    pub overwrite: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reject_empty: false,
            include_routes: true,
            overwrite: true,
        }
    }
}

/// Information about a segmentation run
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SegmentationSummary {
    /// Number of features read from the source
    pub polyline_count: usize,
    /// Features that had no vertices at all
    pub empty_polylines: usize,
    /// Total number of parts across all features
    pub part_count: usize,
    /// Total number of vertices across all features
    pub vertex_count: usize,
    /// Segments produced by the transform
    pub segment_count: usize,
    /// Segments persisted into the sink (zero until written)
    pub segments_written: usize,
    /// Sum of planar segment lengths, in coordinate units
    pub total_length: f64,
    /// Sum of haversine segment lengths in meters, for (lon, lat) input
    pub total_distance_meters: f64,
    /// Bounding box of all vertices (None if there are none)
    pub bounding_box: Option<Rect<f64>>,
}

impl SegmentationSummary {
    fn expand_bounding_box(&mut self, coord: Coord<f64>) {
        self.bounding_box = Some(match self.bounding_box {
            Some(bbox) => Rect::new(
                Coord {
                    x: bbox.min().x.min(coord.x),
                    y: bbox.min().y.min(coord.y),
                },
                Coord {
                    x: bbox.max().x.max(coord.x),
                    y: bbox.max().y.max(coord.y),
                },
            ),
            None => Rect::new(coord, coord),
        });
    }
}

/// Segments of a whole source, ready to be written
#[derive(Debug, Clone)]
pub struct Segmentation {
    segments: Vec<Segment>,
    summary: SegmentationSummary,
}

impl Segmentation {
    /// All segments in feature order, then part order, then emission order
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn summary(&self) -> &SegmentationSummary {
        &self.summary
    }

    /// Write every segment into `sink` and release it
    ///
    /// The sink is released whether writing succeeds or not. A write error wins
    /// over a release error; the latter is only logged in that case.
    pub fn write_to<S: SegmentSink>(self, sink: S) -> Result<SegmentationSummary> {
        let Segmentation {
            segments,
            mut summary,
        } = self;

        let mut guard = SinkGuard::new(sink);
        match write_segments(&segments, &mut *guard) {
            Ok(written) => {
                guard.close()?;
                summary.segments_written = written;
                Ok(summary)
            }
            Err(e) => {
                if let Err(release_error) = guard.close() {
                    tracing::warn!("{}", release_error);
                }
                Err(e)
            }
        }
    }
}

/// Runs the segmentation pipeline with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: Config,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Segmenter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Segment every feature independently
    ///
    /// Segments never join two parts nor two features. Empty features contribute
    /// nothing unless `reject_empty` is set. A non-finite vertex anywhere fails
    /// the whole call with [`SegmentError::InPolyline`] naming the feature.
    pub fn segment_all(&self, polylines: &[Polyline]) -> Result<Segmentation> {
        let mut summary = SegmentationSummary {
            polyline_count: polylines.len(),
            ..Default::default()
        };
        let mut segments = Vec::new();

        for (polyline_index, polyline) in polylines.iter().enumerate() {
            summary.part_count += polyline.part_count();

            if polyline.is_empty() {
                if self.config.reject_empty {
                    return Err(SegmentError::EmptyGeometry { polyline_index });
                }
                tracing::warn!(
                    "Polyline {} ({}) has no vertices, skipping",
                    polyline_index,
                    polyline.name().unwrap_or("unnamed")
                );
                summary.empty_polylines += 1;
                continue;
            }

            let vertices = extract_vertices(polyline);
            let polyline_segments =
                segment(&vertices).map_err(|source| SegmentError::InPolyline {
                    polyline_index,
                    source: Box::new(source),
                })?;

            summary.vertex_count += vertices.len();
            for vertex in &vertices {
                summary.expand_bounding_box(vertex.coord);
            }
            for s in &polyline_segments {
                summary.total_length += s.length();
                summary.total_distance_meters += utils::haversine_distance(s.start, s.end);
            }

            tracing::debug!(
                "Polyline {}: {} parts, {} vertices, {} segments",
                polyline_index,
                polyline.part_count(),
                vertices.len(),
                polyline_segments.len()
            );
            segments.extend(polyline_segments);
        }

        summary.segment_count = segments.len();
        Ok(Segmentation { segments, summary })
    }

    /// Read `source`, segment it and write the result to `destination`
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        source: P,
        destination: Q,
    ) -> Result<SegmentationSummary> {
        let polylines = gpx_io::read_polylines(source.as_ref(), &self.config)?;
        let segmentation = self.segment_all(&polylines)?;

        let sink = GpxSink::create(destination.as_ref(), self.config.overwrite)?;
        let summary = segmentation.write_to(sink)?;

        tracing::info!(
            "Wrote {} segments from {} polylines ({} parts, {} vertices) to {}",
            summary.segments_written,
            summary.polyline_count,
            summary.part_count,
            summary.vertex_count,
            destination.as_ref().display()
        );
        Ok(summary)
    }
}

/// Segment a GPX file into another GPX file
pub fn segment_file<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
    config: &Config,
) -> Result<SegmentationSummary> {
    Segmenter::new(config.clone()).run(source, destination)
}
