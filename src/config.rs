use crate::error::{BuildError, Result};

/// Parameters shared by every node of a road network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkConfig {
    road_width: f64,
    lanes_per_side: usize,
    grid_unit: f64,
    intersection_radius: f64,
    elevation: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            road_width: 4.0,
            lanes_per_side: 1,
            grid_unit: 10.0,
            intersection_radius: 6.0,
            elevation: 0.0,
        }
    }
}

impl NetworkConfig {
    /// Creates a configuration with the default intersection radius and zero elevation.
    ///
    /// # Errors
    ///
    /// Returns an error if `road_width` or `grid_unit` is not positive, or if
    /// `lanes_per_side` is zero.
    pub fn new(road_width: f64, lanes_per_side: usize, grid_unit: f64) -> Result<Self> {
        if road_width <= 0.0 {
            return Err(BuildError::InvalidInput("road width must be positive".to_owned()).into());
        }
        if lanes_per_side == 0 {
            return Err(
                BuildError::InvalidInput("at least one lane per side is required".to_owned())
                    .into(),
            );
        }
        if grid_unit <= 0.0 {
            return Err(BuildError::InvalidInput("grid unit must be positive".to_owned()).into());
        }
        Ok(Self {
            road_width,
            lanes_per_side,
            grid_unit,
            ..Self::default()
        })
    }

    /// Sets the centerline length an intersection claims from each road it joins.
    ///
    /// # Errors
    ///
    /// Returns an error if `radius` is not positive.
    pub fn with_intersection_radius(mut self, radius: f64) -> Result<Self> {
        if radius <= 0.0 {
            return Err(
                BuildError::InvalidInput("intersection radius must be positive".to_owned()).into(),
            );
        }
        self.intersection_radius = radius;
        Ok(self)
    }

    /// Sets the fixed elevation of grid-placed tiles.
    #[must_use]
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }

    #[must_use]
    pub fn road_width(&self) -> f64 {
        self.road_width
    }

    #[must_use]
    pub fn lanes_per_side(&self) -> usize {
        self.lanes_per_side
    }

    #[must_use]
    pub fn grid_unit(&self) -> f64 {
        self.grid_unit
    }

    #[must_use]
    pub fn intersection_radius(&self) -> f64 {
        self.intersection_radius
    }

    #[must_use]
    pub fn elevation(&self) -> f64 {
        self.elevation
    }
}
