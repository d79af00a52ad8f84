//! GPX geometry source and sink
//!
//! Tracks and routes of a GPX document are read as polylines (x = longitude,
//! y = latitude). Segments are written back as one single-segment track each.

use crate::{Config, Polyline, Result, Segment, SegmentError, SegmentSink, SinkError, utils};
use gpx::{Gpx, GpxVersion, Track, TrackSegment, Waypoint};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Value of the `creator` attribute of written documents
pub const CREATOR: &str = concat!("route-segmentation ", env!("CARGO_PKG_VERSION"));

/// Read every feature of a GPX file as a polyline
///
/// Tracks come first, in document order, followed by routes when
/// `config.include_routes` is set.
pub fn read_polylines<P: AsRef<Path>>(path: P, config: &Config) -> Result<Vec<Polyline>> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let gpx = gpx::read(reader)?;
    Ok(polylines_from_gpx(&gpx, config.include_routes))
}

/// Convert an already parsed GPX document into polylines
pub fn polylines_from_gpx(gpx: &Gpx, include_routes: bool) -> Vec<Polyline> {
    let mut polylines: Vec<Polyline> = gpx.tracks.iter().map(Polyline::from_track).collect();
    if include_routes {
        polylines.extend(gpx.routes.iter().map(Polyline::from_route));
    }
    polylines
}

/// Sink writing segments into a GPX 1.1 file
///
/// The destination is opened on creation and the document is written when the
/// sink is closed, or dropped without being closed, so whatever was accepted
/// before a failure is committed. Once writing the document has failed, every
/// later `close` reports [`SinkError::ReleaseFailed`].
pub struct GpxSink {
    path: PathBuf,
    /// `None` once the sink has been released
    writer: Option<BufWriter<File>>,
    document: Gpx,
    release_failed: bool,
}

impl GpxSink {
    /// Open the destination file
    ///
    /// With `overwrite` unset an existing destination is refused with
    /// [`SegmentError::DestinationExists`].
    pub fn create<P: AsRef<Path>>(path: P, overwrite: bool) -> Result<Self> {
        let path = path.as_ref();
        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        let file = options.open(path).map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => SegmentError::DestinationExists(path.to_path_buf()),
            _ => SegmentError::Io(e),
        })?;

        let mut document = Gpx::default();
        document.version = GpxVersion::Gpx11;
        document.creator = Some(CREATOR.to_string());

        Ok(Self {
            path: path.to_path_buf(),
            writer: Some(BufWriter::new(file)),
            document,
            release_failed: false,
        })
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of segments accepted so far
    #[inline]
    pub fn len(&self) -> usize {
        self.document.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.document.tracks.is_empty()
    }
}

impl SegmentSink for GpxSink {
    fn insert(&mut self, segment: &Segment) -> std::result::Result<(), SinkError> {
        if self.writer.is_none() {
            return Err(SinkError::Closed);
        }
        for coord in [segment.start, segment.end] {
            if !utils::is_valid_wgs84(&coord) {
                return Err(SinkError::Rejected(format!(
                    "({}, {}) is outside WGS84 longitude/latitude bounds",
                    coord.x, coord.y
                )));
            }
        }

        let mut track_segment = TrackSegment::default();
        track_segment
            .points
            .push(Waypoint::new(geo::Point::from(segment.start)));
        track_segment
            .points
            .push(Waypoint::new(geo::Point::from(segment.end)));

        let mut track = Track::default();
        track.segments.push(track_segment);
        self.document.tracks.push(track);
        Ok(())
    }

    fn close(&mut self) -> std::result::Result<(), SinkError> {
        if self.release_failed {
            return Err(SinkError::ReleaseFailed);
        }
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        if let Err(e) = write_document(&self.document, writer) {
            self.release_failed = true;
            return Err(e);
        }
        tracing::debug!(
            "Wrote {} segments to {}",
            self.document.tracks.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl Drop for GpxSink {
    fn drop(&mut self) {
        if self.writer.is_some() {
            if let Err(e) = self.close() {
                tracing::warn!("Failed to write {}: {}", self.path.display(), e);
            }
        }
    }
}

fn write_document(document: &Gpx, mut writer: BufWriter<File>) -> std::result::Result<(), SinkError> {
    gpx::write(document, &mut writer)?;
    writer.flush()?;
    Ok(())
}
