// MIT/Apache2 License

use euclid::default::{Box2D, Point2D, Transform2D};
use lyon_path::{iterator::PathIterator, FillRule, Path, PathEvent};

/// How precisely a quick-reject probe treats region edges.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeType {
    /// Treat edges as landing on exact pixel boundaries.
    Aliased,
    /// Treat edges as antialiased: round them outward, so the probe stays
    /// conservative for regions whose edges bleed into neighboring pixels.
    AntiAliased,
}

/// Point-in-rectangle test used across the crate: closed on the top-left
/// edges, open on the bottom-right ones, matching pixel coverage.
#[inline]
pub(crate) fn rect_contains(rect: &Box2D<f32>, p: Point2D<f32>) -> bool {
    p.x >= rect.min.x && p.x < rect.max.x && p.y >= rect.min.y && p.y < rect.max.y
}

#[inline]
fn boxes_overlap(a: &Box2D<f32>, b: &Box2D<f32>) -> bool {
    a.min.x < b.max.x && b.min.x < a.max.x && a.min.y < b.max.y && b.min.y < a.max.y
}

#[inline]
fn round_box(b: &Box2D<f32>, edge: EdgeType) -> Box2D<f32> {
    match edge {
        EdgeType::Aliased => Box2D::new(
            Point2D::new(b.min.x.round(), b.min.y.round()),
            Point2D::new(b.max.x.round(), b.max.y.round()),
        ),
        EdgeType::AntiAliased => Box2D::new(
            Point2D::new(b.min.x.floor(), b.min.y.floor()),
            Point2D::new(b.max.x.ceil(), b.max.y.ceil()),
        ),
    }
}

/// One or more closed contours flattened into straight edges.
///
/// Curved contours are approximated within the flattening tolerance, which
/// is plenty for clip membership tests; containment is answered with a
/// winding number resolved through the polygon's fill rule.
#[derive(Debug, Clone)]
pub struct Polygon {
    edges: Vec<[Point2D<f32>; 2]>,
    rule: FillRule,
    bounds: Box2D<f32>,
}

impl Polygon {
    /// Flatten a path into a polygon with the given tolerance.
    pub fn from_path(path: &Path, rule: FillRule, tolerance: f32) -> Self {
        let mut edges = Vec::new();
        for event in path.iter().flattened(tolerance) {
            match event {
                PathEvent::Begin { .. } => {}
                PathEvent::Line { from, to } => edges.push([from, to]),
                PathEvent::End { last, first, .. } => edges.push([last, first]),
                ev => unreachable!("flattened iterator should never yield {:?}", ev),
            }
        }
        Self::from_edges(edges, rule)
    }

    /// Build a single closed polygon from a point loop.
    pub fn from_points<I: IntoIterator<Item = Point2D<f32>>>(points: I, rule: FillRule) -> Self {
        let points: Vec<Point2D<f32>> = points.into_iter().collect();
        let mut edges = Vec::with_capacity(points.len());
        for i in 0..points.len() {
            let next = (i + 1) % points.len();
            edges.push([points[i], points[next]]);
        }
        Self::from_edges(edges, rule)
    }

    fn from_edges(edges: Vec<[Point2D<f32>; 2]>, rule: FillRule) -> Self {
        let mut bounds = Box2D::zero();
        let mut first = true;
        for &[from, to] in edges.iter() {
            for &p in [from, to].iter() {
                if first {
                    bounds = Box2D::new(p, p);
                    first = false;
                } else {
                    bounds.min.x = bounds.min.x.min(p.x);
                    bounds.min.y = bounds.min.y.min(p.y);
                    bounds.max.x = bounds.max.x.max(p.x);
                    bounds.max.y = bounds.max.y.max(p.y);
                }
            }
        }
        Self {
            edges,
            rule,
            bounds,
        }
    }

    /// Map every edge through a transform.
    #[must_use]
    pub fn transformed(self, transform: &Transform2D<f32>) -> Self {
        let edges: Vec<[Point2D<f32>; 2]> = self
            .edges
            .into_iter()
            .map(|[from, to]| {
                [
                    transform.transform_point(from),
                    transform.transform_point(to),
                ]
            })
            .collect();
        Self::from_edges(edges, self.rule)
    }

    /// The winding number of the polygon around a point.
    pub fn winding_at(&self, p: Point2D<f32>) -> i32 {
        let mut winding = 0;
        for &[from, to] in self.edges.iter() {
            // only edges crossing the horizontal through p matter; this also
            // skips perfectly horizontal edges
            if (from.y <= p.y) != (to.y <= p.y) {
                let t = (p.y - from.y) / (to.y - from.y);
                let x = from.x + t * (to.x - from.x);
                if x > p.x {
                    winding += if to.y > from.y { 1 } else { -1 };
                }
            }
        }
        winding
    }

    /// Whether a point is inside the polygon under its fill rule.
    pub fn contains(&self, p: Point2D<f32>) -> bool {
        let winding = self.winding_at(p);
        match self.rule {
            FillRule::EvenOdd => winding % 2 != 0,
            FillRule::NonZero => winding != 0,
        }
    }

    /// The bounding box of all edges.
    #[inline]
    pub fn bounds(&self) -> Box2D<f32> {
        self.bounds
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum StepOp {
    Intersect,
    Subtract,
}

#[derive(Debug, Clone)]
enum Area {
    Rect(Box2D<f32>),
    Poly(Polygon),
}

impl Area {
    #[inline]
    fn contains(&self, p: Point2D<f32>) -> bool {
        match self {
            Area::Rect(rect) => rect_contains(rect, p),
            Area::Poly(poly) => poly.contains(p),
        }
    }

    #[inline]
    fn bounds(&self) -> Box2D<f32> {
        match self {
            Area::Rect(rect) => *rect,
            Area::Poly(poly) => poly.bounds(),
        }
    }
}

#[derive(Debug, Clone)]
struct Step {
    op: StepOp,
    area: Area,
}

/// An evaluated clip region in device space.
///
/// The region starts as the full device rectangle and is narrowed by
/// intersect steps or carved by subtract steps, in order. Containment is
/// answered by folding the step list; the bounding box is maintained
/// conservatively (subtractions never shrink it), which is exactly the
/// guarantee a quick-reject probe needs.
#[derive(Debug, Clone)]
pub struct Region {
    base: Box2D<f32>,
    steps: Vec<Step>,
    bounds: Box2D<f32>,
}

impl Region {
    /// A region covering the whole device rectangle.
    pub fn new(device: Box2D<f32>) -> Self {
        Self {
            base: device,
            steps: Vec::new(),
            bounds: device,
        }
    }

    fn push(&mut self, step: Step) {
        if step.op == StepOp::Intersect {
            let area = step.area.bounds();
            self.bounds.min.x = self.bounds.min.x.max(area.min.x);
            self.bounds.min.y = self.bounds.min.y.max(area.min.y);
            self.bounds.max.x = self.bounds.max.x.min(area.max.x);
            self.bounds.max.y = self.bounds.max.y.min(area.max.y);
        }
        self.steps.push(step);
    }

    /// Narrow the region to its overlap with a rectangle.
    pub fn intersect_rect(&mut self, rect: Box2D<f32>) {
        self.push(Step {
            op: StepOp::Intersect,
            area: Area::Rect(rect),
        });
    }

    /// Carve a rectangle out of the region.
    pub fn subtract_rect(&mut self, rect: Box2D<f32>) {
        self.push(Step {
            op: StepOp::Subtract,
            area: Area::Rect(rect),
        });
    }

    /// Narrow the region to its overlap with a polygon.
    pub fn intersect_polygon(&mut self, poly: Polygon) {
        self.push(Step {
            op: StepOp::Intersect,
            area: Area::Poly(poly),
        });
    }

    /// Carve a polygon out of the region.
    pub fn subtract_polygon(&mut self, poly: Polygon) {
        self.push(Step {
            op: StepOp::Subtract,
            area: Area::Poly(poly),
        });
    }

    /// Whether a device-space point is inside the visible region.
    pub fn contains(&self, p: Point2D<f32>) -> bool {
        if !rect_contains(&self.base, p) {
            return false;
        }
        for step in self.steps.iter() {
            let inside = step.area.contains(p);
            match step.op {
                StepOp::Intersect if !inside => return false,
                StepOp::Subtract if inside => return false,
                _ => {}
            }
        }
        true
    }

    /// A conservative bounding box: every visible point lies inside it.
    #[inline]
    pub fn bounds(&self) -> Box2D<f32> {
        self.bounds
    }

    /// Whether a candidate rectangle is certainly outside the visible region.
    ///
    /// A `true` answer is a guarantee; a `false` answer only means the
    /// candidate *may* be visible, and the caller still has to do its own
    /// containment checks for anything this probe does not exclude.
    pub fn quick_reject(&self, candidate: &Box2D<f32>, edge: EdgeType) -> bool {
        let bounds = round_box(&self.bounds, edge);
        let candidate = round_box(candidate, edge);
        !boxes_overlap(&bounds, &candidate)
    }
}
