//! Re-noding of blocking geometry.
//!
//! Chains gathered from independent rings may cross or overlap. Before
//! the sweep every segment is split wherever another segment crosses
//! it or ends on it, so the resulting walls only meet at shared
//! endpoints.

use std::collections::HashSet;

use crate::geometry::{point_on_segment, proper_intersection};
use crate::types::Point2D;

pub type Segment = (Point2D, Point2D);

/// Break polylines into their individual non-degenerate segments.
pub fn chains_to_segments<'a>(chains: impl IntoIterator<Item = &'a [Point2D]>) -> Vec<Segment> {
    let mut segments = Vec::new();
    for chain in chains {
        for pair in chain.windows(2) {
            if pair[0] != pair[1] {
                segments.push((pair[0], pair[1]));
            }
        }
    }
    segments
}

/// Split segments at all mutual intersections and drop repeats.
///
/// Every pair is tested, which is fine for the few hundred segments a
/// single observer gathers. Output order follows input order.
pub fn node_segments(segments: &[Segment]) -> Vec<Segment> {
    let n = segments.len();
    let mut splits: Vec<Vec<Point2D>> = segments.iter().map(|&(a, b)| vec![a, b]).collect();

    for i in 0..n {
        let (a, b) = segments[i];
        for j in (i + 1)..n {
            let (c, d) = segments[j];
            if !boxes_overlap(&a, &b, &c, &d) {
                continue;
            }
            if let Some(x) = proper_intersection(&a, &b, &c, &d) {
                // One constructed point shared by both pieces keeps them joined.
                splits[i].push(x);
                splits[j].push(x);
                continue;
            }
            for q in [c, d] {
                if q != a && q != b && point_on_segment(&q, &a, &b) {
                    splits[i].push(q);
                }
            }
            for q in [a, b] {
                if q != c && q != d && point_on_segment(&q, &c, &d) {
                    splits[j].push(q);
                }
            }
        }
    }

    let mut seen: HashSet<((u64, u64), (u64, u64))> = HashSet::new();
    let mut noded = Vec::with_capacity(n);
    for (i, points) in splits.iter_mut().enumerate() {
        let (a, b) = segments[i];
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        points.sort_by(|p, q| {
            let tp = (p.x - a.x) * dx + (p.y - a.y) * dy;
            let tq = (q.x - a.x) * dx + (q.y - a.y) * dy;
            tp.total_cmp(&tq)
        });
        points.dedup();
        for pair in points.windows(2) {
            let (p, q) = (pair[0], pair[1]);
            let key = if p.key() <= q.key() {
                (p.key(), q.key())
            } else {
                (q.key(), p.key())
            };
            if seen.insert(key) {
                noded.push((p, q));
            }
        }
    }
    noded
}

fn boxes_overlap(a: &Point2D, b: &Point2D, c: &Point2D, d: &Point2D) -> bool {
    a.x.min(b.x) <= c.x.max(d.x)
        && c.x.min(d.x) <= a.x.max(b.x)
        && a.y.min(b.y) <= c.y.max(d.y)
        && c.y.min(d.y) <= a.y.max(b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn chains_flatten() {
        let chain = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)];
        let segments = chains_to_segments([chain.as_slice()]);
        assert_eq!(segments, vec![(p(0.0, 0.0), p(1.0, 0.0)), (p(1.0, 0.0), p(1.0, 1.0))]);
    }

    #[test]
    fn crossing_segments_split_in_four() {
        let noded = node_segments(&[(p(0.0, 0.0), p(10.0, 10.0)), (p(0.0, 10.0), p(10.0, 0.0))]);
        assert_eq!(noded.len(), 4);
        let centre = p(5.0, 5.0);
        let touching = noded.iter().filter(|(a, b)| *a == centre || *b == centre).count();
        assert_eq!(touching, 4);
    }

    #[test]
    fn t_junction_splits_the_stem_host() {
        let noded = node_segments(&[(p(0.0, 0.0), p(10.0, 0.0)), (p(4.0, 0.0), p(4.0, 6.0))]);
        assert_eq!(
            noded,
            vec![
                (p(0.0, 0.0), p(4.0, 0.0)),
                (p(4.0, 0.0), p(10.0, 0.0)),
                (p(4.0, 0.0), p(4.0, 6.0)),
            ]
        );
    }

    #[test]
    fn collinear_overlap_is_emitted_once() {
        let noded = node_segments(&[(p(0.0, 0.0), p(6.0, 0.0)), (p(8.0, 0.0), p(2.0, 0.0))]);
        assert_eq!(
            noded,
            vec![
                (p(0.0, 0.0), p(2.0, 0.0)),
                (p(2.0, 0.0), p(6.0, 0.0)),
                (p(6.0, 0.0), p(8.0, 0.0)),
            ]
        );
    }

    #[test]
    fn shared_endpoints_untouched() {
        let input = [(p(0.0, 0.0), p(5.0, 0.0)), (p(5.0, 0.0), p(5.0, 5.0))];
        assert_eq!(node_segments(&input), input.to_vec());
    }

    #[test]
    fn identical_segments_deduplicated() {
        let noded = node_segments(&[(p(0.0, 0.0), p(5.0, 0.0)), (p(5.0, 0.0), p(0.0, 0.0))]);
        assert_eq!(noded.len(), 1);
    }
}
