//! Actuator disk geometry.

use ndarray::prelude::*;

use crate::{config::ConfigError, ArrayBase1F, ArrayBase2F, DataF, Float, Vector};

/// Circular region of a patch on which the actuator force acts.
///
/// Membership is decided with the full 3D distance to `center`, the patch
/// plane is never projected onto. If the center does not lie on the patch the
/// affected faces are the intersection of the patch with a sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct ActuatorDisk {
    center: Vector,
    radius: Float,
}

impl ActuatorDisk {
    pub fn new(center: Vector, radius: Float) -> Result<Self, ConfigError> {
        Ok(Self {
            center: check_center(center)?,
            radius: check_radius(radius)?,
        })
    }

    /// Disk center (m).
    pub fn center(&self) -> Vector {
        self.center
    }

    /// Disk radius (m).
    pub fn radius(&self) -> Float {
        self.radius
    }

    /// Moves the disk. Only meant to be used between runs.
    pub fn set_center(&mut self, center: Vector) -> Result<(), ConfigError> {
        self.center = check_center(center)?;
        Ok(())
    }

    pub fn set_radius(&mut self, radius: Float) -> Result<(), ConfigError> {
        self.radius = check_radius(radius)?;
        Ok(())
    }

    /// Returns true if the point x lies within the disk radius of the center.
    pub fn contains<S: DataF>(&self, x: &ArrayBase1F<S>) -> bool {
        let d2: Float = x
            .iter()
            .zip(self.center.iter())
            .map(|(xi, ci)| (xi - ci).powi(2))
            .sum();
        d2.sqrt() <= self.radius
    }

    /// Evaluates [ActuatorDisk::contains] for each row of an (n, 3) array of
    /// face centers.
    pub fn mask<S: DataF>(&self, centers: &ArrayBase2F<S>) -> Array1<bool> {
        centers
            .rows()
            .into_iter()
            .map(|x| self.contains(&x))
            .collect()
    }
}

fn check_radius(radius: Float) -> Result<Float, ConfigError> {
    if radius > 0.0 && radius.is_finite() {
        Ok(radius)
    } else {
        Err(ConfigError::RadiusInvalid(radius))
    }
}

fn check_center(center: Vector) -> Result<Vector, ConfigError> {
    if center.iter().all(|c| c.is_finite()) {
        Ok(center)
    } else {
        Err(ConfigError::CenterInvalid(center))
    }
}
