use super::Shape;
use crate::error::{Result, ShapeError};
use crate::geometry::axis;
use crate::geometry::joint::{AxisPoint, ShapeEnd};
use crate::math::distance_2d::point_on_segment;
use crate::math::{planar_eq, Point3, TOLERANCE};

/// A centerline sub-range selected by [`Shape::get_shape_cut`].
///
/// `first` precedes `second` when walking the centerline from the tail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeCut {
    pub first: AxisPoint,
    pub second: AxisPoint,
}

fn off_shape(point: &Point3) -> ShapeError {
    ShapeError::PointNotOnShape {
        x: point.x,
        z: point.z,
    }
}

impl Shape {
    fn set_direction(&mut self, end: ShapeEnd, direction: Option<Point3>) {
        match end {
            ShapeEnd::Tail => self.tail_direction = direction,
            ShapeEnd::Head => self.head_direction = direction,
        }
    }

    fn square_off(&mut self, end: ShapeEnd) {
        self.set_direction(end, None);
        let axis = self.axis_points();
        self.rebuild(&axis);
    }

    fn non_empty_axis(&self) -> Result<Vec<Point3>> {
        if self.is_empty() {
            return Err(ShapeError::Empty.into());
        }
        Ok(self.axis_points())
    }

    /// Splits the shape at `at`.
    ///
    /// A non-circular shape keeps the part from its tail to `at` and returns
    /// the part from `at` to its head. Both parts get direction points toward
    /// each other, so their joints at `at` match the original. Splitting at an
    /// open end changes nothing and returns `None`.
    ///
    /// A circular shape is re-anchored so that it starts and ends at `at`; no
    /// second shape is produced.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::PointNotOnShape` if `at` is not on the centerline.
    pub fn split(&mut self, at: &AxisPoint) -> Result<Option<Shape>> {
        let mut axis = self.non_empty_axis()?;
        let point = at.point();
        let idx = axis::insert(&mut axis, &point).ok_or_else(|| off_shape(&point))?;
        let n = axis.len();

        if idx == 0 || idx == n - 1 {
            return Ok(None);
        }

        if self.is_circular() {
            let mut rotated = axis[idx..n - 1].to_vec();
            rotated.extend_from_slice(&axis[..=idx]);
            self.rebuild(&rotated);
            return Ok(None);
        }

        let other = Shape::new(
            &axis[idx..],
            self.width,
            Some(axis[idx - 1]),
            self.head_direction,
        );
        self.head_direction = Some(axis[idx + 1]);
        self.rebuild(&axis[..=idx]);
        Ok(Some(other))
    }

    /// Finds where the head re-touches the shape's own interior.
    #[must_use]
    pub fn find_knot(&self) -> Option<AxisPoint> {
        self.knot_segment().map(|(_, _, p)| AxisPoint::new(p))
    }

    fn knot_segment(&self) -> Option<(usize, f64, Point3)> {
        let axis = self.axis_points();
        let n = axis.len();
        let head = *axis.last()?;
        (0..n.saturating_sub(2)).find_map(|i| {
            let t = point_on_segment(&head, &axis[i], &axis[i + 1])?;
            // Touching the tail makes a loop, not a knot.
            if i == 0 && t < TOLERANCE {
                return None;
            }
            Some((i, t, head))
        })
    }

    /// Removes the knot formed where the head re-touches the interior.
    ///
    /// The shape is split at the knot point into an open part and a closed
    /// loop. The longer of the two is kept; the shorter is returned.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::KnotNotFound` if the head does not touch the interior.
    pub fn cut_knot(&mut self) -> Result<Shape> {
        let (i, _, knot) = self.knot_segment().ok_or(ShapeError::KnotNotFound)?;
        let axis = self.axis_points();

        let mut open_axis = axis[..=i].to_vec();
        open_axis.push(knot);
        let mut loop_axis = vec![knot];
        loop_axis.extend_from_slice(&axis[i + 1..]);

        let open = Shape::new(&open_axis, self.width, self.tail_direction, Some(axis[i + 1]));
        let closed = Shape::new(&loop_axis, self.width, None, None);

        if open.length() >= closed.length() {
            *self = open;
            Ok(closed)
        } else {
            *self = closed;
            Ok(open)
        }
    }

    /// Trims `size` of centerline length from `end`, returning the trimmed
    /// piece. The ends created by the trim are cut square.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::ShortenOverrun` if `size` exceeds the shape length.
    pub fn shorten(&mut self, end: ShapeEnd, size: f64) -> Result<Shape> {
        let mut walk = self.non_empty_axis()?;
        if end == ShapeEnd::Head {
            walk.reverse();
        }
        let available = axis::total_length(&walk);
        if size > available + TOLERANCE {
            return Err(ShapeError::ShortenOverrun {
                requested: size,
                available,
            }
            .into());
        }

        let (cut_point, seg, _) =
            axis::point_at_length(&walk, size.min(available)).ok_or(ShapeError::Empty)?;
        let mut trimmed = walk[..=seg].to_vec();
        trimmed.push(cut_point);
        let mut kept = vec![cut_point];
        if walk.len() > 1 {
            kept.extend_from_slice(&walk[seg + 1..]);
        }

        let end_direction = match end {
            ShapeEnd::Tail => self.tail_direction,
            ShapeEnd::Head => self.head_direction,
        };
        self.set_direction(end, None);

        let remainder = match end {
            ShapeEnd::Tail => Shape::new(&trimmed, self.width, end_direction, None),
            ShapeEnd::Head => {
                trimmed.reverse();
                kept.reverse();
                Shape::new(&trimmed, self.width, None, end_direction)
            }
        };
        self.rebuild(&kept);
        Ok(remainder)
    }

    /// Appends `point` to the centerline past `end`. The end loses its
    /// direction point.
    pub fn extend(&mut self, end: ShapeEnd, point: Point3) {
        let mut axis = self.axis_points();
        match end {
            ShapeEnd::Tail => axis.insert(0, point),
            ShapeEnd::Head => axis.push(point),
        }
        self.set_direction(end, None);
        self.rebuild(&axis);
    }

    /// Joins `other` onto this shape at a shared endpoint.
    ///
    /// `other` is reversed if needed so the shared point lines up with the
    /// matching end of this shape. The outer ends keep their direction points.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::NoSharedEndpoint` if the shapes share no endpoint.
    pub fn merge_with(&mut self, other: &Shape) -> Result<()> {
        let mine = self.non_empty_axis()?;
        let mut theirs = other.non_empty_axis()?;
        let (my_tail, my_head) = (mine[0], mine[mine.len() - 1]);
        let (their_tail, their_head) = (theirs[0], theirs[theirs.len() - 1]);

        let (merged, tail_direction, head_direction) = if planar_eq(&my_head, &their_tail) {
            (join(&mine, &theirs), self.tail_direction, other.head_direction)
        } else if planar_eq(&my_head, &their_head) {
            theirs.reverse();
            (join(&mine, &theirs), self.tail_direction, other.tail_direction)
        } else if planar_eq(&my_tail, &their_head) {
            (join(&theirs, &mine), other.tail_direction, self.head_direction)
        } else if planar_eq(&my_tail, &their_tail) {
            theirs.reverse();
            (join(&theirs, &mine), other.head_direction, self.head_direction)
        } else {
            return Err(ShapeError::NoSharedEndpoint.into());
        };

        self.tail_direction = tail_direction;
        self.head_direction = head_direction;
        self.rebuild(&merged);
        Ok(())
    }

    /// Selects a centerline range of length `radius` centred on `at`.
    ///
    /// On an open shape, whatever would overrun one end is added to the other
    /// side. On a circular shape the range wraps around the loop.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::PointNotOnShape` if `at` is not on the centerline
    /// and `ShapeError::Degenerate` if `radius` is not positive.
    pub fn get_shape_cut(&self, at: &AxisPoint, radius: f64) -> Result<ShapeCut> {
        if radius <= 0.0 {
            let reason = format!("cut radius {radius} is not positive");
            return Err(ShapeError::Degenerate(reason).into());
        }
        let axis = self.non_empty_axis()?;
        let s = axis::length_at(&axis, &at.point()).ok_or_else(|| off_shape(&at.point()))?;
        let total = axis::total_length(&axis);
        let half = radius * 0.5;

        let (lo, hi) = if self.is_circular() {
            let half = half.min(total * 0.5 - TOLERANCE).max(0.0);
            ((s - half).rem_euclid(total), (s + half).rem_euclid(total))
        } else {
            let (mut lo, mut hi) = (s - half, s + half);
            if lo < 0.0 {
                hi -= lo;
                lo = 0.0;
            }
            if hi > total {
                lo -= hi - total;
                hi = total;
            }
            (lo.max(0.0), hi)
        };

        let first = axis::point_at_length(&axis, lo).ok_or(ShapeError::Empty)?.0;
        let second = axis::point_at_length(&axis, hi).ok_or(ShapeError::Empty)?.0;
        Ok(ShapeCut {
            first: AxisPoint::new(first),
            second: AxisPoint::new(second),
        })
    }

    /// Removes the range selected by `cut`, returning the far remainder when
    /// the range lies strictly inside an open shape.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::PointNotOnShape` if either cut point is off the centerline.
    pub fn cut(&mut self, cut: &ShapeCut) -> Result<Option<Shape>> {
        self.cut_keeping_middle(cut).map(|(remainder, _)| remainder)
    }

    /// Like [`Shape::cut`], additionally returning the removed piece.
    ///
    /// An open shape behaves as two splits, or a single trim when the range
    /// touches an end; a range covering the whole shape empties it. A circular
    /// shape is opened at `cut.first` and erased forward up to `cut.second`.
    /// A range of zero length removes nothing and leaves the shape as it is.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::PointNotOnShape` if either cut point is off the centerline.
    pub fn cut_keeping_middle(&mut self, cut: &ShapeCut) -> Result<(Option<Shape>, Shape)> {
        let first = cut.first.point();
        let second = cut.second.point();

        if planar_eq(&first, &second) {
            if self.length_at(&first).is_none() {
                return Err(off_shape(&first).into());
            }
            return Ok((None, Shape::new(&[first], self.width, None, None)));
        }

        if self.is_circular() {
            let mut work = self.clone();
            work.split(&cut.first)?;
            let mut axis = work.axis_points();
            let idx = axis::insert(&mut axis, &second).ok_or_else(|| off_shape(&second))?;

            let removed = Shape::new(&axis[..=idx], self.width, None, None);
            if idx == axis.len() - 1 {
                self.clear();
            } else {
                self.tail_direction = None;
                self.head_direction = None;
                self.rebuild(&axis[idx..]);
            }
            return Ok((None, removed));
        }

        let s1 = self.length_at(&first).ok_or_else(|| off_shape(&first))?;
        let s2 = self.length_at(&second).ok_or_else(|| off_shape(&second))?;
        let ((lo, lo_point), (hi, hi_point)) = if s1 <= s2 {
            ((s1, cut.first), (s2, cut.second))
        } else {
            ((s2, cut.second), (s1, cut.first))
        };
        let total = self.length();
        let touches_tail = lo < TOLERANCE;
        let touches_head = hi > total - TOLERANCE;

        match (touches_tail, touches_head) {
            (true, true) => {
                let removed = self.clone();
                self.clear();
                Ok((None, removed))
            }
            (true, false) => Ok((None, self.shorten(ShapeEnd::Tail, hi)?)),
            (false, true) => Ok((None, self.shorten(ShapeEnd::Head, total - lo)?)),
            (false, false) => {
                let mut work = self.clone();
                let mut far = work
                    .split(&hi_point)?
                    .ok_or_else(|| off_shape(&hi_point.point()))?;
                let mut middle = work
                    .split(&lo_point)?
                    .ok_or_else(|| off_shape(&lo_point.point()))?;

                work.square_off(ShapeEnd::Head);
                far.square_off(ShapeEnd::Tail);
                middle.square_off(ShapeEnd::Tail);
                middle.square_off(ShapeEnd::Head);

                *self = work;
                Ok((Some(far), middle))
            }
        }
    }
}

/// Concatenates two centerlines sharing `a`'s last point and `b`'s first.
fn join(a: &[Point3], b: &[Point3]) -> Vec<Point3> {
    let mut joined = a.to_vec();
    joined.extend_from_slice(&b[1..]);
    joined
}
