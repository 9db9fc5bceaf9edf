//! Orthogonal ("elbow") connector routing.
//!
//! [`route`] produces a path of horizontal and vertical segments between two
//! endpoints. Each endpoint has a heading: the outward direction the path
//! leaves the start along, and the outward side of the end it enters from.
//! Bound endpoints get a clearance stub so the path visibly leaves and
//! enters the shape instead of hugging its corner.
//!
//! The router builds a small fixed set of candidate middles (straight, two
//! L-shapes, two Z-shapes, U-shapes and clearance detours), discards the
//! ones that violate the headings or double back on themselves, and keeps
//! the one with the fewest bends. Output is deterministic, so re-routing the
//! same inputs is idempotent.

#[cfg(test)]
#[path = "elbow_test.rs"]
mod elbow_test;

use serde::{Deserialize, Serialize};

use crate::consts::ELBOW_CLEARANCE;
use crate::geom::Point;

/// One of the four axis directions in y-down scene space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    /// Unit vector for this heading.
    #[must_use]
    pub fn vector(self) -> Point {
        match self {
            Self::Up => Point::new(0.0, -1.0),
            Self::Down => Point::new(0.0, 1.0),
            Self::Left => Point::new(-1.0, 0.0),
            Self::Right => Point::new(1.0, 0.0),
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Heading from `from` toward `to` along the dominant axis. Equal axes
    /// resolve horizontally.
    #[must_use]
    pub fn toward(from: Point, to: Point) -> Self {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx.abs() >= dy.abs() {
            if dx >= 0.0 { Self::Right } else { Self::Left }
        } else if dy >= 0.0 {
            Self::Down
        } else {
            Self::Up
        }
    }

    /// Direction of an axis-aligned, non-degenerate segment.
    #[must_use]
    pub fn of_segment(from: Point, to: Point) -> Option<Self> {
        if from.x == to.x && from.y != to.y {
            Some(if to.y > from.y { Self::Down } else { Self::Up })
        } else if from.y == to.y && from.x != to.x {
            Some(if to.x > from.x { Self::Right } else { Self::Left })
        } else {
            None
        }
    }
}

/// Clearance stubs at each end; zero for unbound endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteOptions {
    pub start_clearance: f64,
    pub end_clearance: f64,
}

impl RouteOptions {
    /// Standard clearance on the bound ends only.
    #[must_use]
    pub fn for_bindings(start_bound: bool, end_bound: bool) -> Self {
        Self {
            start_clearance: if start_bound { ELBOW_CLEARANCE } else { 0.0 },
            end_clearance: if end_bound { ELBOW_CLEARANCE } else { 0.0 },
        }
    }
}

/// Route an orthogonal path from `start` to `end`.
///
/// `start_heading` is the direction the path leaves `start`;
/// `end_heading` is the outward side of `end` the path enters through, so the
/// final segment travels along its opposite. Missing headings point at the
/// other endpoint along the dominant axis.
///
/// Every consecutive pair of output points differs in exactly one
/// coordinate. Coincident endpoints produce a single point.
#[must_use]
pub fn route(
    start: Point,
    end: Point,
    start_heading: Option<Heading>,
    end_heading: Option<Heading>,
    opts: RouteOptions,
) -> Vec<Point> {
    if start == end {
        return vec![start];
    }
    let exit = start_heading.unwrap_or_else(|| Heading::toward(start, end));
    let entry = end_heading.unwrap_or_else(|| Heading::toward(end, start));

    let a = start + exit.vector() * opts.start_clearance.max(0.0);
    let b = end + entry.vector() * opts.end_clearance.max(0.0);
    let detour = opts.start_clearance.max(opts.end_clearance).max(ELBOW_CLEARANCE);

    let mut best: Option<(usize, Vec<Point>)> = None;
    let mut fallback: Option<(usize, Vec<Point>)> = None;
    for middle in candidates(a, b, detour) {
        let mut path = Vec::with_capacity(middle.len() + 2);
        path.push(start);
        path.extend(middle);
        path.push(end);
        let path = dedup(path);
        let Some(dirs) = directions(&path) else {
            continue;
        };
        let bends = bend_count(&dirs);
        if respects_headings(&dirs, exit, entry) {
            if best.as_ref().is_none_or(|(b, _)| bends < *b) {
                best = Some((bends, path));
            }
        } else if fallback.as_ref().is_none_or(|(b, _)| bends < *b) {
            fallback = Some((bends, path));
        }
    }

    let path = best.or(fallback).map_or_else(|| vec![start, Point::new(end.x, start.y), end], |(_, p)| p);
    simplify(path)
}

/// Collapse duplicate points and runs of collinear segments.
#[must_use]
pub fn simplify(points: Vec<Point>) -> Vec<Point> {
    let mut pts = dedup(points);
    loop {
        let before = pts.len();
        let mut out: Vec<Point> = Vec::with_capacity(pts.len());
        for p in pts {
            if out.len() >= 2 {
                let q = out[out.len() - 1];
                let o = out[out.len() - 2];
                if (o.x == q.x && q.x == p.x) || (o.y == q.y && q.y == p.y) {
                    out.pop();
                }
            }
            if out.last() != Some(&p) {
                out.push(p);
            }
        }
        pts = out;
        if pts.len() == before {
            return pts;
        }
    }
}

/// Whether every consecutive pair differs in exactly one coordinate.
#[must_use]
pub fn is_orthogonal(points: &[Point]) -> bool {
    points.windows(2).all(|w| (w[0].x == w[1].x) != (w[0].y == w[1].y))
}

/// Candidate middles from `a` to `b`, fewest bends first.
fn candidates(a: Point, b: Point, detour: f64) -> Vec<Vec<Point>> {
    let mid_x = (a.x + b.x) / 2.0;
    let mid_y = (a.y + b.y) / 2.0;
    let hi_x = a.x.max(b.x);
    let lo_x = a.x.min(b.x);
    let hi_y = a.y.max(b.y);
    let lo_y = a.y.min(b.y);

    let via_x = |x: f64| vec![a, Point::new(x, a.y), Point::new(x, b.y), b];
    let via_y = |y: f64| vec![a, Point::new(a.x, y), Point::new(b.x, y), b];

    vec![
        vec![a, b],
        vec![a, Point::new(b.x, a.y), b],
        vec![a, Point::new(a.x, b.y), b],
        via_x(mid_x),
        via_y(mid_y),
        via_x(hi_x),
        via_x(lo_x),
        via_y(hi_y),
        via_y(lo_y),
        via_x(hi_x + detour),
        via_x(lo_x - detour),
        via_y(hi_y + detour),
        via_y(lo_y - detour),
    ]
}

fn dedup(mut points: Vec<Point>) -> Vec<Point> {
    points.dedup();
    points
}

/// Segment headings, or `None` if any segment is diagonal.
fn directions(path: &[Point]) -> Option<Vec<Heading>> {
    path.windows(2).map(|w| Heading::of_segment(w[0], w[1])).collect()
}

fn bend_count(dirs: &[Heading]) -> usize {
    dirs.windows(2).filter(|w| w[0] != w[1]).count()
}

fn respects_headings(dirs: &[Heading], exit: Heading, entry: Heading) -> bool {
    let (Some(&first), Some(&last)) = (dirs.first(), dirs.last()) else {
        return false;
    };
    first == exit && last == entry.opposite() && dirs.windows(2).all(|w| w[1] != w[0].opposite())
}
