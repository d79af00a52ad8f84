//! Geometry model: polylines, tagged vertices and segments
//!
//! A [`Polyline`] is one feature of the geometry source. It owns its parts as
//! `LineString`s; vertex order inside a part is the traversal direction.

use geo::{Coord, Euclidean, Length, Line, LineString, MultiLineString};

/// A feature made of one or more parts (sub-paths)
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polyline {
    /// Optional feature name carried over from the source
    name: Option<String>,
    /// Parts in source order
    parts: Vec<LineString<f64>>,
}

/// A vertex of a polyline, tagged with the part it belongs to
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    /// Index of the owning part in the polyline
    pub part_index: usize,
    /// Position of the vertex inside its part
    pub vertex_index: usize,
    /// Planar coordinates (x, y)
    pub coord: Coord<f64>,
}

/// The two-point line between consecutive vertices of a single part
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// Index of the part both endpoints belong to
    pub part_index: usize,
    pub start: Coord<f64>,
    pub end: Coord<f64>,
}

impl Polyline {
    /// Create a polyline from its parts
    pub fn new(parts: Vec<LineString<f64>>) -> Self {
        Self { name: None, parts }
    }

    /// Create a polyline from plain `(x, y)` tuples, one iterator per part
    pub fn from_coords<I, P>(parts: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = (f64, f64)>,
    {
        Self::new(
            parts
                .into_iter()
                .map(|part| part.into_iter().map(Coord::from).collect())
                .collect(),
        )
    }

    /// Attach a feature name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Build a polyline from a GPX track; every track segment becomes one part
    pub fn from_track(track: &gpx::Track) -> Self {
        let parts = track
            .segments
            .iter()
            .map(|segment| waypoints_to_line_string(&segment.points))
            .collect();
        Self {
            name: track.name.clone(),
            parts,
        }
    }

    /// Build a single-part polyline from a GPX route
    pub fn from_route(route: &gpx::Route) -> Self {
        Self {
            name: route.name.clone(),
            parts: vec![waypoints_to_line_string(&route.points)],
        }
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn parts(&self) -> &[LineString<f64>] {
        &self.parts
    }

    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Total number of vertices across all parts
    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(|part| part.0.len()).sum()
    }

    /// True when there are no parts or every part is empty
    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|part| part.0.is_empty())
    }
}

impl From<MultiLineString<f64>> for Polyline {
    fn from(value: MultiLineString<f64>) -> Self {
        Self::new(value.0)
    }
}

impl From<LineString<f64>> for Polyline {
    fn from(value: LineString<f64>) -> Self {
        Self::new(vec![value])
    }
}

impl Segment {
    pub fn new(part_index: usize, start: Coord<f64>, end: Coord<f64>) -> Self {
        Self {
            part_index,
            start,
            end,
        }
    }

    /// View this segment as a `geo::Line`
    #[inline]
    pub fn line(&self) -> Line<f64> {
        Line::new(self.start, self.end)
    }

    /// Planar length in coordinate units
    #[inline]
    pub fn length(&self) -> f64 {
        Euclidean.length(&self.line())
    }
}

/// GPX stores (lon, lat) in `geo::Point`, which maps directly to (x, y)
fn waypoints_to_line_string(points: &[gpx::Waypoint]) -> LineString<f64> {
    points.iter().map(|waypoint| waypoint.point().0).collect()
}
