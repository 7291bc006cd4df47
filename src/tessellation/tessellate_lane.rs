use crate::error::{Result, RouteError};
use crate::graph::Lane;
use crate::math::planar_eq;

use super::Polyline;

/// Converts a lane into the polyline a renderer draws for it.
#[derive(Debug)]
pub struct TessellateLane<'a> {
    lane: &'a Lane,
}

impl<'a> TessellateLane<'a> {
    #[must_use]
    pub fn new(lane: &'a Lane) -> Self {
        Self { lane }
    }

    /// Executes the conversion, dropping coincident consecutive points.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 2 distinct points remain.
    pub fn execute(&self) -> Result<Polyline> {
        let mut points = self.lane.points.clone();
        points.dedup_by(|a, b| planar_eq(a, b));
        if points.len() < 2 {
            return Err(RouteError::DegenerateLane.into());
        }
        Ok(Polyline { points })
    }
}
