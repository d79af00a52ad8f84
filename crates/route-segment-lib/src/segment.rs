//! Vertex extraction and the vertex-to-segment transform
//!
//! Both operations are pure: identical input always yields identical output.

use crate::{Polyline, Result, Segment, SegmentError, Vertex, utils};

/// Flatten a polyline into its vertices, tagged with their part
///
/// Part order and within-part order are preserved. Polylines with no parts, and
/// empty parts, simply contribute no vertices.
pub fn extract_vertices(polyline: &Polyline) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(polyline.vertex_count());
    for (part_index, part) in polyline.parts().iter().enumerate() {
        vertices.extend(
            part.0
                .iter()
                .enumerate()
                .map(|(vertex_index, &coord)| Vertex {
                    part_index,
                    vertex_index,
                    coord,
                }),
        );
    }
    vertices
}

/// Build the segments between consecutive vertices of the same part
///
/// A part with N vertices yields N-1 segments; parts with fewer than two vertices
/// yield none. Consecutive vertices from different parts are never joined.
///
/// Every vertex is checked before any segment is produced: a NaN or infinite
/// coordinate fails the whole call with [`SegmentError::MalformedPart`].
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn segment(vertices: &[Vertex]) -> Result<Vec<Segment>> {
    if let Some(bad) = vertices.iter().find(|v| !utils::is_finite_coord(&v.coord)) {
        return Err(SegmentError::MalformedPart {
            part_index: bad.part_index,
            vertex_index: bad.vertex_index,
        });
    }

    Ok(vertices
        .windows(2)
        .filter(|pair| pair[0].part_index == pair[1].part_index)
        .map(|pair| Segment::new(pair[0].part_index, pair[0].coord, pair[1].coord))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    fn segments_of(polyline: &Polyline) -> Vec<Segment> {
        segment(&extract_vertices(polyline)).unwrap()
    }

    #[test]
    fn test_extract_vertices_tags_parts() {
        let polyline = Polyline::from_coords([
            vec![(0.0, 0.0), (1.0, 1.0)],
            vec![],
            vec![(5.0, 5.0)],
        ]);
        let vertices = extract_vertices(&polyline);

        assert_eq!(vertices.len(), 3);
        assert_eq!(
            vertices
                .iter()
                .map(|v| (v.part_index, v.vertex_index))
                .collect::<Vec<_>>(),
            vec![(0, 0), (0, 1), (2, 0)]
        );
        assert_eq!(vertices[2].coord, c(5.0, 5.0));
    }

    #[test]
    fn test_extract_vertices_empty_polyline() {
        assert!(extract_vertices(&Polyline::default()).is_empty());
    }

    #[test]
    fn test_single_part_scenario() {
        let polyline = Polyline::from_coords([vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]]);
        assert_eq!(
            segments_of(&polyline),
            vec![
                Segment::new(0, c(0.0, 0.0), c(1.0, 0.0)),
                Segment::new(0, c(1.0, 0.0), c(1.0, 1.0)),
            ]
        );
    }

    #[test]
    fn test_single_vertex_part_contributes_nothing() {
        let polyline = Polyline::from_coords([vec![(0.0, 0.0), (1.0, 1.0)], vec![(5.0, 5.0)]]);
        assert_eq!(
            segments_of(&polyline),
            vec![Segment::new(0, c(0.0, 0.0), c(1.0, 1.0))]
        );
    }

    #[test]
    fn test_empty_polyline_yields_no_segments() {
        assert!(segments_of(&Polyline::default()).is_empty());
        assert!(segment(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_segment_count_and_chaining() {
        for n in 2..20 {
            let part: Vec<(f64, f64)> = (0..n)
                .map(|i| (i as f64, (i as f64 * 0.7).sin()))
                .collect();
            let segments = segments_of(&Polyline::from_coords([part]));

            assert_eq!(segments.len(), n - 1);
            for pair in segments.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
        }
    }

    #[test]
    fn test_parts_are_never_bridged() {
        let polyline = Polyline::from_coords([
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)],
            vec![(10.0, 10.0), (11.0, 10.0)],
            vec![(20.0, 20.0)],
            vec![(30.0, 30.0), (31.0, 30.0), (32.0, 31.0)],
        ]);
        let segments = segments_of(&polyline);
        assert_eq!(segments.len(), 2 + 1 + 0 + 2);

        for s in &segments {
            let part = &polyline.parts()[s.part_index].0;
            assert!(part.contains(&s.start));
            assert!(part.contains(&s.end));
        }
        // No segment from (2,0) to (10,10)
        assert!(
            !segments
                .iter()
                .any(|s| s.start == c(2.0, 0.0) && s.end == c(10.0, 10.0))
        );
    }

    #[test]
    fn test_segments_reconstruct_each_part() {
        let polyline = Polyline::from_coords([
            vec![(0.0, 0.0), (3.0, 1.0), (4.0, 4.0), (2.0, 6.0)],
            vec![(-1.0, -1.0), (-2.0, -3.0)],
        ]);
        let segments = segments_of(&polyline);

        for (part_index, part) in polyline.parts().iter().enumerate() {
            let mut rebuilt = Vec::new();
            for s in segments.iter().filter(|s| s.part_index == part_index) {
                if rebuilt.is_empty() {
                    rebuilt.push(s.start);
                }
                rebuilt.push(s.end);
            }
            assert_eq!(rebuilt, part.0);
        }
    }

    #[test]
    fn test_segment_is_idempotent() {
        let polyline = Polyline::from_coords([
            vec![(0.1, 0.2), (0.3, 0.4), (0.5, 0.6)],
            vec![(7.0, 8.0), (9.0, 10.0)],
        ]);
        let vertices = extract_vertices(&polyline);
        let first = segment(&vertices).unwrap();
        let second = segment(&vertices).unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.part_index, b.part_index);
            assert_eq!(a.start.x.to_bits(), b.start.x.to_bits());
            assert_eq!(a.start.y.to_bits(), b.start.y.to_bits());
            assert_eq!(a.end.x.to_bits(), b.end.x.to_bits());
            assert_eq!(a.end.y.to_bits(), b.end.y.to_bits());
        }
    }

    #[test]
    fn test_non_finite_vertex_halts() {
        let polyline = Polyline::from_coords([
            vec![(0.0, 0.0), (1.0, 1.0)],
            vec![(2.0, 2.0), (f64::NAN, 3.0), (4.0, 4.0)],
        ]);
        match segment(&extract_vertices(&polyline)) {
            Err(SegmentError::MalformedPart {
                part_index,
                vertex_index,
            }) => {
                assert_eq!(part_index, 1);
                assert_eq!(vertex_index, 1);
            }
            other => panic!("expected MalformedPart, got {:?}", other),
        }

        let infinite = Polyline::from_coords([vec![(f64::INFINITY, 0.0)]]);
        assert!(matches!(
            segment(&extract_vertices(&infinite)),
            Err(SegmentError::MalformedPart {
                part_index: 0,
                vertex_index: 0
            })
        ));
    }
}
