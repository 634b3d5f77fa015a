//! Transition curve engine.
//!
//! Every transition is drawn as one cubic Bezier curve between two state
//! nodes, plus a two-stroke arrowhead at its end and a floating label near
//! its middle. This module derives all of that from a small amount of
//! stored state:
//!
//! - the centers of the two nodes ([`Endpoints`]),
//! - two control points, stored as offsets from their owning node centers
//!   ([`ControlOffsets`]),
//! - the drawing constants ([`CurveStyle`]).
//!
//! The anchors (where the curve touches the node circles) are never stored.
//! They sit on the node boundary, in the direction of the owning control
//! point:
//!
//! ```text
//!             control1                     control2
//!               ╱ ●─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ● ╲
//!      ╭───╮   ╱                                 ╲   ╭───╮
//!      │ S ●──╯ start                        end ╰──►● T │
//!      ╰───╯                                         ╰───╯
//! ```
//!
//! [`edge_geometry`] is a pure function: dragging a node or a control point
//! only changes its inputs, and the whole geometry is recomputed from
//! scratch each time.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6, PI};

use crate::geometry::Point;

/// Drawing constants shared by every transition curve.
///
/// The defaults reproduce the classic look of the editor: 25px state
/// circles, a gentle bow of a quarter of the free distance between two
/// states, self-loops leaving at 45° from the vertical, and 30° arrowheads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveStyle {
    node_radius: f32,
    bow_ratio: f32,
    loop_angle: f32,
    loop_distance_ratio: f32,
    arrow_size: f32,
    arrow_angle: f32,
    label_margin: f32,
}

impl Default for CurveStyle {
    fn default() -> Self {
        Self {
            node_radius: 25.0,
            bow_ratio: 0.25,
            loop_angle: FRAC_PI_4,
            loop_distance_ratio: 8.0,
            arrow_size: 25.0,
            arrow_angle: FRAC_PI_6,
            label_margin: 20.0,
        }
    }
}

impl CurveStyle {
    /// Radius of a state circle.
    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    /// Fraction of the free distance between two distinct nodes used to
    /// push the default control points away from their anchors.
    pub fn bow_ratio(&self) -> f32 {
        self.bow_ratio
    }

    /// Angle between the vertical and each self-loop anchor, in radians.
    pub fn loop_angle(&self) -> f32 {
        self.loop_angle
    }

    /// Distance of a self-loop control point from its anchor, in node radii.
    pub fn loop_distance_ratio(&self) -> f32 {
        self.loop_distance_ratio
    }

    /// Length of each arrowhead stroke.
    pub fn arrow_size(&self) -> f32 {
        self.arrow_size
    }

    /// Angle between each arrowhead stroke and the curve, in radians.
    pub fn arrow_angle(&self) -> f32 {
        self.arrow_angle
    }

    /// Distance between the curve midpoint and its label.
    pub fn label_margin(&self) -> f32 {
        self.label_margin
    }

    pub fn with_node_radius(mut self, node_radius: f32) -> Self {
        self.node_radius = node_radius;
        self
    }

    pub fn with_bow_ratio(mut self, bow_ratio: f32) -> Self {
        self.bow_ratio = bow_ratio;
        self
    }

    pub fn with_loop_angle(mut self, loop_angle: f32) -> Self {
        self.loop_angle = loop_angle;
        self
    }

    pub fn with_loop_distance_ratio(mut self, loop_distance_ratio: f32) -> Self {
        self.loop_distance_ratio = loop_distance_ratio;
        self
    }

    pub fn with_arrow_size(mut self, arrow_size: f32) -> Self {
        self.arrow_size = arrow_size;
        self
    }

    pub fn with_arrow_angle(mut self, arrow_angle: f32) -> Self {
        self.arrow_angle = arrow_angle;
        self
    }

    pub fn with_label_margin(mut self, label_margin: f32) -> Self {
        self.label_margin = label_margin;
        self
    }

    /// Unit directions of the two self-loop anchors, seen from the node
    /// center: up-left for the start, up-right for the end.
    fn loop_directions(&self) -> (Point, Point) {
        (
            Point::up().rotate(-self.loop_angle),
            Point::up().rotate(self.loop_angle),
        )
    }
}

/// The node centers a curve connects.
///
/// Whether an edge is a self-loop is a matter of identity (same state on
/// both ends), not of position, so it is carried explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoints {
    Between { source: Point, target: Point },
    Loop { center: Point },
}

impl Endpoints {
    pub fn between(source: Point, target: Point) -> Self {
        Self::Between { source, target }
    }

    pub fn looping(center: Point) -> Self {
        Self::Loop { center }
    }

    /// Center of the node the curve leaves from.
    pub fn source(&self) -> Point {
        match *self {
            Self::Between { source, .. } => source,
            Self::Loop { center } => center,
        }
    }

    /// Center of the node the curve points to.
    pub fn target(&self) -> Point {
        match *self {
            Self::Between { target, .. } => target,
            Self::Loop { center } => center,
        }
    }

    pub fn is_loop(&self) -> bool {
        matches!(self, Self::Loop { .. })
    }
}

/// The two control points of a curve, relative to the node they belong to.
///
/// `control1` is measured from the source center and `control2` from the
/// target center, so moving a node drags its control point along.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlOffsets {
    control1: Point,
    control2: Point,
}

impl ControlOffsets {
    pub fn new(control1: Point, control2: Point) -> Self {
        Self { control1, control2 }
    }

    /// Builds offsets from control points given in diagram coordinates.
    pub fn from_absolute(endpoints: Endpoints, control1: Point, control2: Point) -> Self {
        Self {
            control1: control1.sub_point(endpoints.source()),
            control2: control2.sub_point(endpoints.target()),
        }
    }

    pub fn control1(&self) -> Point {
        self.control1
    }

    pub fn control2(&self) -> Point {
        self.control2
    }

    /// Returns both control points in diagram coordinates.
    pub fn to_absolute(self, endpoints: Endpoints) -> (Point, Point) {
        (
            endpoints.source().add_point(self.control1),
            endpoints.target().add_point(self.control2),
        )
    }

    /// Moves the first control point to an absolute position.
    pub fn with_control1_at(mut self, endpoints: Endpoints, control1: Point) -> Self {
        self.control1 = control1.sub_point(endpoints.source());
        self
    }

    /// Moves the second control point to an absolute position.
    pub fn with_control2_at(mut self, endpoints: Endpoints, control2: Point) -> Self {
        self.control2 = control2.sub_point(endpoints.target());
        self
    }
}

/// Computes the control points a new transition gets when the user did not
/// drag any.
///
/// Between two distinct nodes the anchors face each other along the line
/// joining the centers, and each control point is pushed further along that
/// line by `bow_ratio` times the gap between the two circles. Self-loops and
/// nodes sharing the same center use the loop template instead, so no
/// direction is ever derived from a zero-length vector.
///
/// # Examples
///
/// ```
/// # use tapeloom_core::{curve::{default_controls, CurveStyle, Endpoints}, geometry::Point};
/// let endpoints = Endpoints::between(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
/// let offsets = default_controls(endpoints, &CurveStyle::default());
///
/// let (control1, control2) = offsets.to_absolute(endpoints);
/// assert_eq!(control1, Point::new(37.5, 0.0));
/// assert_eq!(control2, Point::new(62.5, 0.0));
/// ```
pub fn default_controls(endpoints: Endpoints, style: &CurveStyle) -> ControlOffsets {
    let radius = style.node_radius;

    if let Endpoints::Between { source, target } = endpoints {
        if let Some(direction) = target.sub_point(source).normalized() {
            let gap = source.distance(target) - 2.0 * radius;
            let reach = radius + gap * style.bow_ratio;
            return ControlOffsets::new(direction.scale(reach), direction.scale(-reach));
        }
    }

    let (start_dir, end_dir) = style.loop_directions();
    let reach = radius * (1.0 + style.loop_distance_ratio);
    ControlOffsets::new(start_dir.scale(reach), end_dir.scale(reach))
}

/// A cubic Bezier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    start: Point,
    control1: Point,
    control2: Point,
    end: Point,
}

impl CubicBezier {
    pub fn new(start: Point, control1: Point, control2: Point, end: Point) -> Self {
        Self {
            start,
            control1,
            control2,
            end,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn control1(&self) -> Point {
        self.control1
    }

    pub fn control2(&self) -> Point {
        self.control2
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Runs de Casteljau's construction down to its last two points.
    ///
    /// Their interpolation at `t` is the point on the curve, and their
    /// difference times three is the derivative there.
    fn casteljau(&self, t: f32) -> (Point, Point) {
        let a = self.start.lerp(self.control1, t);
        let b = self.control1.lerp(self.control2, t);
        let c = self.control2.lerp(self.end, t);

        let ab = a.lerp(b, t);
        let bc = b.lerp(c, t);
        (ab, bc)
    }

    /// Point of the curve at parameter `t`, clamped to `[0, 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tapeloom_core::{curve::CubicBezier, geometry::Point};
    /// let curve = CubicBezier::new(
    ///     Point::new(0.0, 0.0),
    ///     Point::new(0.0, 100.0),
    ///     Point::new(100.0, 100.0),
    ///     Point::new(100.0, 0.0),
    /// );
    /// assert_eq!(curve.point_at(0.5), Point::new(50.0, 75.0));
    /// ```
    pub fn point_at(&self, t: f32) -> Point {
        let t = t.clamp(0.0, 1.0);
        let (ab, bc) = self.casteljau(t);
        ab.lerp(bc, t)
    }

    /// First derivative of the curve at parameter `t`, clamped to `[0, 1]`.
    pub fn tangent_at(&self, t: f32) -> Point {
        let t = t.clamp(0.0, 1.0);
        let (ab, bc) = self.casteljau(t);
        bc.sub_point(ab).scale(3.0)
    }

    /// SVG path data for the curve.
    pub fn path_data(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x(),
            self.start.y(),
            self.control1.x(),
            self.control1.y(),
            self.control2.x(),
            self.control2.y(),
            self.end.x(),
            self.end.y()
        )
    }
}

/// The two strokes of an arrowhead, both ending on the tip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    tip: Point,
    left: Point,
    right: Point,
}

impl ArrowHead {
    pub fn tip(&self) -> Point {
        self.tip
    }

    /// The two strokes as `(from, to)` pairs.
    pub fn segments(&self) -> [(Point, Point); 2] {
        [(self.left, self.tip), (self.right, self.tip)]
    }
}

/// Where the transition label goes and how it is rotated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    position: Point,
    angle: f32,
}

impl LabelPlacement {
    /// Center of the label.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Rotation of the label in radians, always within `[-π/2, π/2]` so
    /// text never renders upside down.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn angle_degrees(&self) -> f32 {
        self.angle.to_degrees()
    }
}

/// Everything needed to draw one transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGeometry {
    curve: CubicBezier,
    arrow: ArrowHead,
    label: LabelPlacement,
}

impl EdgeGeometry {
    pub fn curve(&self) -> &CubicBezier {
        &self.curve
    }

    pub fn arrow(&self) -> &ArrowHead {
        &self.arrow
    }

    pub fn label(&self) -> &LabelPlacement {
        &self.label
    }
}

/// Derives anchors, arrowhead and label placement for a transition.
///
/// Each anchor lies on its node circle, in the direction of the node's
/// control point. A control point sitting exactly on its node center has no
/// direction, so the anchor then faces the other node, or follows the loop
/// template when there is no other node to face.
pub fn edge_geometry(
    endpoints: Endpoints,
    offsets: ControlOffsets,
    style: &CurveStyle,
) -> EdgeGeometry {
    let source = endpoints.source();
    let target = endpoints.target();
    let (control1, control2) = offsets.to_absolute(endpoints);
    let (loop_start, loop_end) = style.loop_directions();

    let start_dir = offsets
        .control1()
        .normalized()
        .or_else(|| direction_between(endpoints, source, target))
        .unwrap_or(loop_start);
    let end_dir = offsets
        .control2()
        .normalized()
        .or_else(|| direction_between(endpoints, target, source))
        .unwrap_or(loop_end);

    let start = source.add_point(start_dir.scale(style.node_radius));
    let end = target.add_point(end_dir.scale(style.node_radius));
    let curve = CubicBezier::new(start, control1, control2, end);

    EdgeGeometry {
        curve,
        arrow: arrow_head(&curve, end_dir, style),
        label: label_placement(&curve, style),
    }
}

fn direction_between(endpoints: Endpoints, from: Point, to: Point) -> Option<Point> {
    if endpoints.is_loop() {
        return None;
    }
    to.sub_point(from).normalized()
}

/// Both strokes start from the end anchor, pointing back along the curve
/// (approximated by the `control2 -> end` chord) and rotated by
/// `±arrow_angle`.
fn arrow_head(curve: &CubicBezier, outward: Point, style: &CurveStyle) -> ArrowHead {
    let end = curve.end();
    let back = curve
        .control2()
        .sub_point(end)
        .normalized()
        .or_else(|| curve.start().sub_point(end).normalized())
        .unwrap_or(outward)
        .scale(style.arrow_size);

    ArrowHead {
        tip: end,
        left: end.add_point(back.rotate(style.arrow_angle)),
        right: end.add_point(back.rotate(-style.arrow_angle)),
    }
}

/// The label sits `label_margin` away from the curve midpoint, on the left
/// of the direction of travel, and is rotated to follow the local tangent.
fn label_placement(curve: &CubicBezier, style: &CurveStyle) -> LabelPlacement {
    let midpoint = curve.point_at(0.5);
    let tangent = curve
        .tangent_at(0.5)
        .normalized()
        .or_else(|| curve.end().sub_point(curve.start()).normalized())
        .unwrap_or(Point::new(1.0, 0.0));

    let normal = tangent.rotate(-FRAC_PI_2).scale(style.label_margin);

    let mut angle = tangent.angle();
    if angle > FRAC_PI_2 {
        angle -= PI;
    } else if angle < -FRAC_PI_2 {
        angle += PI;
    }

    LabelPlacement {
        position: midpoint.add_point(normal),
        angle,
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn endpoints_strategy() -> impl Strategy<Value = Endpoints> {
        prop_oneof![
            (point_strategy(), point_strategy()).prop_map(|(s, t)| Endpoints::between(s, t)),
            point_strategy().prop_map(Endpoints::looping),
        ]
    }

    fn offsets_strategy() -> impl Strategy<Value = ControlOffsets> {
        (point_strategy(), point_strategy()).prop_map(|(c1, c2)| ControlOffsets::new(c1, c2))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Recomputing from the same inputs always gives the same geometry.
    fn check_geometry_is_pure(
        endpoints: Endpoints,
        offsets: ControlOffsets,
    ) -> Result<(), TestCaseError> {
        let style = CurveStyle::default();
        let first = edge_geometry(endpoints, offsets, &style);
        let second = edge_geometry(endpoints, offsets, &style);
        prop_assert_eq!(first, second);
        Ok(())
    }

    /// Anchors always sit on their node circle.
    fn check_anchors_on_node_boundary(
        endpoints: Endpoints,
        offsets: ControlOffsets,
    ) -> Result<(), TestCaseError> {
        let style = CurveStyle::default();
        let geometry = edge_geometry(endpoints, offsets, &style);
        let curve = geometry.curve();

        prop_assert!(approx_eq!(
            f32,
            curve.start().distance(endpoints.source()),
            style.node_radius(),
            epsilon = 0.01
        ));
        prop_assert!(approx_eq!(
            f32,
            curve.end().distance(endpoints.target()),
            style.node_radius(),
            epsilon = 0.01
        ));
        Ok(())
    }

    /// Default controls never produce a degenerate loop or a non-finite
    /// point, whatever the node positions.
    fn check_default_controls_are_well_formed(
        endpoints: Endpoints,
    ) -> Result<(), TestCaseError> {
        let style = CurveStyle::default();
        let geometry = edge_geometry(endpoints, default_controls(endpoints, &style), &style);
        let curve = geometry.curve();

        for p in [curve.start(), curve.control1(), curve.control2(), curve.end()] {
            prop_assert!(p.x().is_finite() && p.y().is_finite());
        }
        if endpoints.is_loop() {
            prop_assert!(curve.start().distance(curve.end()) > 1.0);
        }
        Ok(())
    }

    /// Arrow strokes have the configured length and the label is upright
    /// and offset by the margin.
    fn check_arrow_and_label(
        endpoints: Endpoints,
        offsets: ControlOffsets,
    ) -> Result<(), TestCaseError> {
        let style = CurveStyle::default();
        let geometry = edge_geometry(endpoints, offsets, &style);

        for (from, to) in geometry.arrow().segments() {
            prop_assert!(approx_eq!(f32, from.distance(to), style.arrow_size(), epsilon = 0.01));
        }

        let label = geometry.label();
        prop_assert!(label.angle().abs() <= FRAC_PI_2 + 1e-5);
        let midpoint = geometry.curve().point_at(0.5);
        prop_assert!(approx_eq!(
            f32,
            label.position().distance(midpoint),
            style.label_margin(),
            epsilon = 0.01
        ));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn geometry_is_pure(endpoints in endpoints_strategy(), offsets in offsets_strategy()) {
            check_geometry_is_pure(endpoints, offsets)?;
        }

        #[test]
        fn anchors_on_node_boundary(endpoints in endpoints_strategy(), offsets in offsets_strategy()) {
            check_anchors_on_node_boundary(endpoints, offsets)?;
        }

        #[test]
        fn default_controls_are_well_formed(endpoints in endpoints_strategy()) {
            check_default_controls_are_well_formed(endpoints)?;
        }

        #[test]
        fn arrow_and_label(endpoints in endpoints_strategy(), offsets in offsets_strategy()) {
            check_arrow_and_label(endpoints, offsets)?;
        }
    }
}
