// Curve smoothing - ordered points to a cubic Bezier path
use super::geometry::Point;
use std::fmt;

/// Fraction of the neighbour-to-neighbour vector used for control points
pub const SMOOTHING: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCommand::MoveTo(p) => write!(f, "M {p}"),
            PathCommand::CubicTo { c1, c2, to } => write!(f, "C {c1} {c2} {to}"),
        }
    }
}

/// A move-to followed by one cubic segment per subsequent point
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmoothPath {
    commands: Vec<PathCommand>,
}

impl SmoothPath {
    /// Where the path finishes, which is the last input point
    pub fn end(&self) -> Option<Point> {
        match self.commands.last() {
            Some(PathCommand::MoveTo(p)) => Some(*p),
            Some(PathCommand::CubicTo { to, .. }) => Some(*to),
            None => None,
        }
    }
}

/// SVG path data (`d` attribute)
impl fmt::Display for SmoothPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{command}")?;
        }
        Ok(())
    }
}

/// Control point for `current`, pulled along the line from `previous` to `next`.
/// `reverse` gives the incoming control point instead of the outgoing one.
fn control_point(current: Point, previous: Point, next: Point, reverse: bool) -> Point {
    let dx = (next.x - previous.x) * SMOOTHING;
    let dy = (next.y - previous.y) * SMOOTHING;

    if reverse {
        Point::new(current.x - dx, current.y - dy)
    } else {
        Point::new(current.x + dx, current.y + dy)
    }
}

/// Smooth path through every point (Catmull-Rom style, emitted as cubic
/// Beziers). Endpoints stand in for their own missing neighbours.
pub fn smooth(points: &[Point]) -> SmoothPath {
    let Some(&first) = points.first() else {
        return SmoothPath::default();
    };

    let mut commands = Vec::with_capacity(points.len());
    commands.push(PathCommand::MoveTo(first));

    for i in 1..points.len() {
        let from = points[i - 1];
        let to = points[i];
        let before = points[i.saturating_sub(2)];
        let after = points.get(i + 1).copied().unwrap_or(to);

        commands.push(PathCommand::CubicTo {
            c1: control_point(from, before, to, false),
            c2: control_point(to, from, after, true),
            to,
        });
    }

    SmoothPath { commands }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl SmoothPath {
        fn commands(&self) -> &[PathCommand] {
            &self.commands
        }

        fn segment_count(&self) -> usize {
            self.commands
                .iter()
                .filter(|c| matches!(c, PathCommand::CubicTo { .. }))
                .count()
        }

        fn start(&self) -> Option<Point> {
            match self.commands.first() {
                Some(PathCommand::MoveTo(p)) => Some(*p),
                _ => None,
            }
        }
    }

    fn zigzag(n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| Point::new(i as f64 * 10.0, if i % 2 == 0 { 0.0 } else { 7.3 }))
            .collect()
    }

    #[test]
    fn test_single_point_has_no_segments() {
        let path = smooth(&[Point::new(3.0, 4.0)]);
        assert_eq!(path.commands(), &[PathCommand::MoveTo(Point::new(3.0, 4.0))]);
        assert_eq!(path.segment_count(), 0);
        assert_eq!(path.to_string(), "M 3,4");
    }

    #[test]
    fn test_empty_input() {
        let path = smooth(&[]);
        assert!(path.commands().is_empty());
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_segments_and_endpoints() {
        for n in 2..12 {
            let points = zigzag(n);
            let path = smooth(&points);
            assert_eq!(path.segment_count(), n - 1);
            assert_eq!(path.start(), Some(points[0]));
            assert_eq!(path.end(), Some(points[n - 1]));
        }
    }

    #[test]
    fn test_passes_through_every_point() {
        let points = zigzag(6);
        let path = smooth(&points);
        for (command, point) in path.commands().iter().skip(1).zip(points.iter().skip(1)) {
            match command {
                PathCommand::CubicTo { to, .. } => assert_eq!(to, point),
                PathCommand::MoveTo(_) => panic!("unexpected move-to"),
            }
        }
    }

    #[test]
    fn test_slope_continuous_at_interior_points() {
        let points = zigzag(5);
        let commands = smooth(&points).commands().to_vec();
        for i in 1..points.len() - 1 {
            let (PathCommand::CubicTo { c2: incoming, .. }, PathCommand::CubicTo { c1: outgoing, .. }) =
                (commands[i], commands[i + 1])
            else {
                panic!("expected cubic segments");
            };
            let joint = points[i];
            // Control points mirror each other through the joint
            assert!((joint.x - incoming.x - (outgoing.x - joint.x)).abs() < 1e-9);
            assert!((joint.y - incoming.y - (outgoing.y - joint.y)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_endpoint_control_points_do_not_extrapolate() {
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        let path = smooth(&points);
        assert_eq!(
            path.commands()[1],
            PathCommand::CubicTo {
                c1: Point::new(2.0, 2.0),
                c2: Point::new(8.0, 8.0),
                to: Point::new(10.0, 10.0),
            }
        );
        assert_eq!(path.to_string(), "M 0,0 C 2,2 8,8 10,10");
    }
}
