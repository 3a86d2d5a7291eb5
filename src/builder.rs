//! Builder for [ActuatorBC].

use crate::{
    bc::ActuatorBC,
    config::ConfigError,
    geometry::ActuatorDisk,
    profile::{ForceProfile, SineBurst, TemporalProfile},
    Float,
    Vector,
};

/// Builder struct for [ActuatorBC].
///
/// Radius, center and a temporal profile are required. Parameters are
/// validated when [ActuatorBuilder::build] is called.
pub struct ActuatorBuilder {
    radius: Result<Float, ConfigError>,
    center: Result<Vector, ConfigError>,
    profile: Result<TemporalProfile, ConfigError>,
    value: Vector,
    n_faces: usize,
}

impl Default for ActuatorBuilder {
    fn default() -> Self {
        Self {
            radius: Err(ConfigError::RadiusNotSet),
            center: Err(ConfigError::CenterNotSet),
            profile: Err(ConfigError::ProfileNotSet),
            value: [0.0; 3],
            n_faces: 0,
        }
    }
}

impl ActuatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the disk radius ra (m).
    pub fn radius(mut self, radius: Float) -> Self {
        self.radius = Ok(radius);
        self
    }

    /// Sets the disk center xa (m).
    pub fn center(mut self, center: Vector) -> Self {
        self.center = Ok(center);
        self
    }

    /// Sets the temporal profile.
    pub fn profile(mut self, profile: impl Into<TemporalProfile>) -> Self {
        self.profile = Ok(profile.into());
        self
    }

    /// Shorthand for a [SineBurst] profile.
    pub fn sine_burst(mut self, f0: Float, nc: Float, fn_tot: Float) -> Self {
        self.profile = SineBurst::new(f0, nc, fn_tot).map(TemporalProfile::from);
        self
    }

    /// Sets the fallback boundary value, zero by default.
    pub fn value(mut self, value: Vector) -> Self {
        self.value = value;
        self
    }

    /// Sets the number of patch faces the gradient field starts out with.
    ///
    /// Not required, the field is resized on the first refresh.
    pub fn faces(mut self, n_faces: usize) -> Self {
        self.n_faces = n_faces;
        self
    }

    /// Builds [ActuatorBC].
    pub fn build(self) -> Result<ActuatorBC, ConfigError> {
        let disk = ActuatorDisk::new(self.center?, self.radius?)?;
        let profile = self.profile?;
        if !self.value.iter().all(|v| v.is_finite()) {
            return Err(ConfigError::ValueInvalid(self.value));
        }

        log::info!(
            "Created {} boundary: ra = {}, xa = {:?}",
            profile.name(),
            disk.radius(),
            disk.center()
        );

        Ok(ActuatorBC::new(disk, profile, self.value, self.n_faces))
    }
}
