//! Boundary conditions.

use std::fmt::Debug;

use ndarray::{prelude::*, Zip};
use thiserror::Error;

use crate::{
    config::ConfigError,
    geometry::ActuatorDisk,
    mapping::{self, FaceMapping, MappingError},
    profile::{ForceProfile, TemporalProfile},
    table::ProfileError,
    Array2F,
    ArrayBase1F,
    DataF,
    Float,
    Vector,
};

/// Trait representing a gradient boundary condition on a patch.
///
/// Face geometry is owned by the host and only borrowed for the duration of a
/// call. Arrays of face centers and normals have shape (n_faces, 3).
pub trait BoundaryCondition: Debug {
    /// Recomputes the per-face gradient at the given time and returns it.
    fn refresh(
        &mut self,
        time: Float,
        centers: &ArrayView2<Float>,
        normals: &ArrayView2<Float>,
    ) -> Result<ArrayView2<'_, Float>, BoundaryError>;
    /// The current per-face gradient, shape (n_faces, 3).
    fn gradient(&self) -> ArrayView2<'_, Float>;
    /// Resizes the gradient after faces were added, removed or reordered.
    fn auto_map(&mut self, mapping: &FaceMapping);
    /// Copies face i of other's gradient into face addressing\[i\] of this one.
    fn reverse_map(&mut self, other: &dyn BoundaryCondition, addressing: &[usize]) -> Result<(), MappingError>;
    /// Name for the boundary condition.
    fn name(&self) -> &'static str;
}

/// Error type for [BoundaryCondition]s.
#[derive(Error, Debug)]
pub enum BoundaryError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Actuator disk [BoundaryCondition].
///
/// Faces whose centers lie within the disk get the gradient p(t) * n, where n
/// is the face normal and p(t) the temporal profile. All other faces get a
/// zero gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct ActuatorBC {
    disk: ActuatorDisk,
    profile: TemporalProfile,
    gradient: Array2F,
    value: Vector,
    updated: bool,
}

impl ActuatorBC {
    /// Creates a boundary with a zero gradient on n_faces faces.
    ///
    /// See also [crate::ActuatorBuilder], which validates the fallback value.
    pub fn new(disk: ActuatorDisk, profile: impl Into<TemporalProfile>, value: Vector, n_faces: usize) -> Self {
        Self {
            disk,
            profile: profile.into(),
            gradient: Array2::zeros([n_faces, 3]),
            value,
            updated: false,
        }
    }

    /// Creates a copy of this boundary mapped onto a new patch.
    pub fn mapped(&self, mapping: &FaceMapping) -> Self {
        let mut bc = self.clone();
        bc.auto_map(mapping);
        bc
    }

    pub fn disk(&self) -> &ActuatorDisk {
        &self.disk
    }

    pub fn profile(&self) -> &TemporalProfile {
        &self.profile
    }

    /// Number of faces of the gradient field.
    pub fn n_faces(&self) -> usize {
        self.gradient.nrows()
    }

    /// Fallback boundary value.
    pub fn value(&self) -> Vector {
        self.value
    }

    pub fn set_value(&mut self, value: Vector) -> Result<(), ConfigError> {
        if !value.iter().all(|v| v.is_finite()) {
            return Err(ConfigError::ValueInvalid(value));
        }
        self.value = value;
        Ok(())
    }

    /// True once the gradient has been computed in the current step.
    pub fn updated(&self) -> bool {
        self.updated
    }

    /// Marks the gradient as stale, to be called at the start of a step.
    pub fn reset_updated(&mut self) {
        self.updated = false;
    }

    /// Disk radius ra (m).
    pub fn radius(&self) -> Float {
        self.disk.radius()
    }

    pub fn set_radius(&mut self, radius: Float) -> Result<(), ConfigError> {
        self.disk.set_radius(radius)
    }

    /// Disk center xa (m).
    pub fn center(&self) -> Vector {
        self.disk.center()
    }

    pub fn set_center(&mut self, center: Vector) -> Result<(), ConfigError> {
        self.disk.set_center(center)
    }

    /// Sine burst frequency f0 (Hz), None for a table profile.
    pub fn frequency(&self) -> Option<Float> {
        match &self.profile {
            TemporalProfile::SineBurst(p) => Some(p.frequency()),
            TemporalProfile::Table(_) => None,
        }
    }

    pub fn set_frequency(&mut self, frequency: Float) -> Result<(), ConfigError> {
        match &mut self.profile {
            TemporalProfile::SineBurst(p) => p.set_frequency(frequency),
            TemporalProfile::Table(_) => Err(ConfigError::NotSineBurst("f0")),
        }
    }

    /// Sine burst cycle count nc, None for a table profile.
    pub fn cycles(&self) -> Option<Float> {
        match &self.profile {
            TemporalProfile::SineBurst(p) => Some(p.cycles()),
            TemporalProfile::Table(_) => None,
        }
    }

    pub fn set_cycles(&mut self, cycles: Float) -> Result<(), ConfigError> {
        match &mut self.profile {
            TemporalProfile::SineBurst(p) => p.set_cycles(cycles),
            TemporalProfile::Table(_) => Err(ConfigError::NotSineBurst("nc")),
        }
    }

    /// Peak amplitude, fn_tot or fn_max depending on the profile.
    pub fn amplitude(&self) -> Option<Float> {
        self.profile.amplitude()
    }

    pub fn set_amplitude(&mut self, amplitude: Float) -> Result<(), ConfigError> {
        self.profile.set_amplitude(amplitude)
    }

    /// Total force on the patch, the sum of gradient * area over all faces.
    ///
    /// # Panics
    ///
    /// If areas does not have one entry per face.
    pub fn force<S: DataF>(&self, areas: &ArrayBase1F<S>) -> Vector {
        let f = self.gradient.t().dot(areas);
        [f[0], f[1], f[2]]
    }
}

impl BoundaryCondition for ActuatorBC {
    /// Evaluates the profile once at time and applies it to the faces inside
    /// the disk.
    ///
    /// # Panics
    ///
    /// If centers and normals differ in shape or are not (n_faces, 3).
    fn refresh(
        &mut self,
        time: Float,
        centers: &ArrayView2<Float>,
        normals: &ArrayView2<Float>,
    ) -> Result<ArrayView2<'_, Float>, BoundaryError> {
        assert_eq!(
            centers.dim(),
            normals.dim(),
            "face centers and normals differ in shape"
        );
        assert_eq!(centers.ncols(), 3, "face geometry must have 3 components");

        let p = self.profile.evaluate(time)?;
        let inside = self.disk.mask(centers);

        let n_faces = centers.nrows();
        if self.gradient.nrows() != n_faces {
            self.gradient = Array2::zeros([n_faces, 3]);
        }

        Zip::from(self.gradient.rows_mut())
            .and(normals.rows())
            .and(&inside)
            .for_each(|mut g, n, &inside| {
                if inside {
                    g.assign(&n);
                    g *= p;
                } else {
                    g.fill(0.0);
                }
            });

        log::debug!(
            "{}: t = {time}, p = {p}, {}/{n_faces} faces inside the disk",
            self.name(),
            inside.iter().filter(|&&x| x).count()
        );

        self.updated = true;
        Ok(self.gradient.view())
    }

    fn gradient(&self) -> ArrayView2<'_, Float> {
        self.gradient.view()
    }

    fn auto_map(&mut self, mapping: &FaceMapping) {
        self.gradient = mapping.apply(&self.gradient);
    }

    fn reverse_map(&mut self, other: &dyn BoundaryCondition, addressing: &[usize]) -> Result<(), MappingError> {
        mapping::reverse_map(&mut self.gradient, &other.gradient(), addressing)
    }

    fn name(&self) -> &'static str {
        self.profile.name()
    }
}
