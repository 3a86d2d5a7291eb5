//! Temporal force profiles.

use std::{f64::consts::PI, path::Path};

use crate::{
    bc::BoundaryError,
    config::ConfigError,
    table::{ProfileError, Table, TableSource},
    Float,
};

/// Trait representing the time dependence of the actuator pressure.
///
/// Given the simulation time, returns the scalar pressure (or force) acting
/// along the outward face normal.
pub trait ForceProfile {
    /// Evaluates the profile at time t.
    fn evaluate(&self, t: Float) -> Result<Float, ProfileError>;
    /// Name for the profile, matching the boundary type it is read from.
    fn name(&self) -> &'static str;
}

/// [ForceProfile] of `nc` full periods of a sine at `f0`, zero otherwise.
///
/// p(t) = fn_tot * sin(2 pi f0 t) for 0 <= t <= nc / f0. Both ends of the
/// window are included, so a fractional nc ends on a nonzero value.
#[derive(Debug, Clone, PartialEq)]
pub struct SineBurst {
    frequency: Float,
    cycles: Float,
    amplitude: Float,
}

impl SineBurst {
    pub fn new(frequency: Float, cycles: Float, amplitude: Float) -> Result<Self, ConfigError> {
        Ok(Self {
            frequency: check_frequency(frequency)?,
            cycles: check_cycles(cycles)?,
            amplitude: check_amplitude(amplitude)?,
        })
    }

    /// Burst frequency f0 (Hz).
    pub fn frequency(&self) -> Float {
        self.frequency
    }

    /// Number of cycles nc.
    pub fn cycles(&self) -> Float {
        self.cycles
    }

    /// Peak amplitude fn_tot.
    pub fn amplitude(&self) -> Float {
        self.amplitude
    }

    /// Length of the burst, nc / f0 (s).
    pub fn duration(&self) -> Float {
        self.cycles / self.frequency
    }

    pub fn set_frequency(&mut self, frequency: Float) -> Result<(), ConfigError> {
        self.frequency = check_frequency(frequency)?;
        Ok(())
    }

    pub fn set_cycles(&mut self, cycles: Float) -> Result<(), ConfigError> {
        self.cycles = check_cycles(cycles)?;
        Ok(())
    }

    pub fn set_amplitude(&mut self, amplitude: Float) -> Result<(), ConfigError> {
        self.amplitude = check_amplitude(amplitude)?;
        Ok(())
    }

    fn value(&self, t: Float) -> Float {
        if (0.0..=self.duration()).contains(&t) {
            self.amplitude * (2.0 * PI * self.frequency * t).sin()
        } else {
            0.0
        }
    }
}

impl ForceProfile for SineBurst {
    fn evaluate(&self, t: Float) -> Result<Float, ProfileError> {
        Ok(self.value(t))
    }

    fn name(&self) -> &'static str {
        "sineBurst"
    }
}

/// [ForceProfile] interpolated from a table file.
///
/// If a maximum amplitude is set the interpolated value is clamped to
/// [-|fn_max|, |fn_max|].
#[derive(Debug, Clone, PartialEq)]
pub struct TableProfile {
    source: TableSource,
    table: Table,
    max_amplitude: Option<Float>,
}

impl TableProfile {
    /// Builds the profile from an already loaded table.
    pub fn new(source: TableSource, table: Table, max_amplitude: Option<Float>) -> Result<Self, ConfigError> {
        let max_amplitude = max_amplitude.map(check_amplitude).transpose()?;
        Ok(Self {
            source,
            table,
            max_amplitude,
        })
    }

    /// Reads the table described by source, relative to case_dir.
    pub fn load(
        source: TableSource,
        case_dir: &Path,
        max_amplitude: Option<Float>,
    ) -> Result<Self, BoundaryError> {
        let table = Table::load(&source, case_dir)?;
        Ok(Self::new(source, table, max_amplitude)?)
    }

    pub fn source(&self) -> &TableSource {
        &self.source
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Amplitude clamp fn_max, if any.
    pub fn max_amplitude(&self) -> Option<Float> {
        self.max_amplitude
    }

    pub fn set_max_amplitude(&mut self, max_amplitude: Option<Float>) -> Result<(), ConfigError> {
        self.max_amplitude = max_amplitude.map(check_amplitude).transpose()?;
        Ok(())
    }
}

impl ForceProfile for TableProfile {
    fn evaluate(&self, t: Float) -> Result<Float, ProfileError> {
        let p = self.table.evaluate(t)?;
        Ok(match self.max_amplitude {
            Some(max) => p.clamp(-max.abs(), max.abs()),
            None => p,
        })
    }

    fn name(&self) -> &'static str {
        "actuator"
    }
}

/// The temporal profiles an actuator can be driven with.
#[derive(Debug, Clone, PartialEq)]
pub enum TemporalProfile {
    Table(TableProfile),
    SineBurst(SineBurst),
}

impl TemporalProfile {
    /// Peak amplitude: fn_tot for a sine burst, fn_max for a table.
    pub fn amplitude(&self) -> Option<Float> {
        match self {
            Self::Table(p) => p.max_amplitude(),
            Self::SineBurst(p) => Some(p.amplitude()),
        }
    }

    /// Sets the peak amplitude. A table profile becomes clamped at it.
    pub fn set_amplitude(&mut self, amplitude: Float) -> Result<(), ConfigError> {
        match self {
            Self::Table(p) => p.set_max_amplitude(Some(amplitude)),
            Self::SineBurst(p) => p.set_amplitude(amplitude),
        }
    }
}

impl ForceProfile for TemporalProfile {
    fn evaluate(&self, t: Float) -> Result<Float, ProfileError> {
        match self {
            Self::Table(p) => p.evaluate(t),
            Self::SineBurst(p) => p.evaluate(t),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Table(p) => p.name(),
            Self::SineBurst(p) => p.name(),
        }
    }
}

impl From<SineBurst> for TemporalProfile {
    fn from(p: SineBurst) -> Self {
        Self::SineBurst(p)
    }
}

impl From<TableProfile> for TemporalProfile {
    fn from(p: TableProfile) -> Self {
        Self::Table(p)
    }
}

fn check_frequency(f0: Float) -> Result<Float, ConfigError> {
    if f0 > 0.0 && f0.is_finite() {
        Ok(f0)
    } else {
        Err(ConfigError::FrequencyInvalid(f0))
    }
}

fn check_cycles(nc: Float) -> Result<Float, ConfigError> {
    if nc > 0.0 && nc.is_finite() {
        Ok(nc)
    } else {
        Err(ConfigError::CyclesInvalid(nc))
    }
}

fn check_amplitude(amplitude: Float) -> Result<Float, ConfigError> {
    if amplitude.is_finite() {
        Ok(amplitude)
    } else {
        Err(ConfigError::AmplitudeInvalid(amplitude))
    }
}

#[cfg(test)]
mod tests {
    use approx::*;
    use ndarray::prelude::*;

    use super::*;
    use crate::table::OutOfBounds;

    #[test]
    fn test_sine_burst_window() {
        let burst = SineBurst::new(20000.0, 4.0, -1.0).unwrap();
        let end = 4.0 / 20000.0;

        assert_relative_eq!(burst.duration(), end);
        assert_eq!(burst.evaluate(0.0).unwrap(), 0.0);
        assert_eq!(burst.evaluate(-1e-6).unwrap(), 0.0);
        assert_eq!(burst.evaluate(-1.0).unwrap(), 0.0);
        // sin(2 pi nc) at the inclusive end is zero up to round-off.
        assert_abs_diff_eq!(burst.evaluate(end).unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(burst.evaluate(end * (1.0 + 1e-9)).unwrap(), 0.0);
        assert_eq!(burst.evaluate(1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_sine_burst_values() {
        let burst = SineBurst::new(20000.0, 4.0, -1.0).unwrap();

        // First peak and trough.
        assert_relative_eq!(burst.evaluate(1.0 / 80000.0).unwrap(), -1.0);
        assert_relative_eq!(burst.evaluate(3.0 / 80000.0).unwrap(), 1.0);
        // Last peak lies inside the window.
        assert_relative_eq!(burst.evaluate(13.0 / 80000.0).unwrap(), -1.0, epsilon = 1e-12);
        // Half period crossing.
        assert_abs_diff_eq!(burst.evaluate(1.0 / 40000.0).unwrap(), 0.0, epsilon = 1e-12);

        // Pure function of t.
        let t = 7.3e-5;
        assert_eq!(
            burst.evaluate(t).unwrap().to_bits(),
            burst.evaluate(t).unwrap().to_bits()
        );
    }

    #[test]
    fn test_sine_burst_partial_cycles() {
        // 1.5 cycles ends on a zero crossing with the sine heading down.
        let burst = SineBurst::new(1.0, 1.5, 2.0).unwrap();
        assert_relative_eq!(burst.evaluate(1.25).unwrap(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(burst.evaluate(1.5).unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(burst.evaluate(1.5 + 1e-9).unwrap(), 0.0);

        // 1.25 cycles ends on a peak, which is still part of the burst.
        let burst = SineBurst::new(1.0, 1.25, 2.0).unwrap();
        assert_relative_eq!(burst.evaluate(1.25).unwrap(), 2.0, epsilon = 1e-12);
        assert_eq!(burst.evaluate(1.25 + 1e-9).unwrap(), 0.0);

        let burst = SineBurst::new(20000.0, 2.75, 3.0).unwrap();
        let end = 2.75 / 20000.0;
        assert_relative_eq!(burst.evaluate(end).unwrap(), -3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sine_burst_invalid() {
        assert!(matches!(
            SineBurst::new(0.0, 4.0, 1.0),
            Err(ConfigError::FrequencyInvalid(_))
        ));
        assert!(matches!(
            SineBurst::new(1.0, -4.0, 1.0),
            Err(ConfigError::CyclesInvalid(_))
        ));
        assert!(matches!(
            SineBurst::new(1.0, 4.0, Float::NAN),
            Err(ConfigError::AmplitudeInvalid(_))
        ));

        let mut burst = SineBurst::new(1.0, 1.0, 1.0).unwrap();
        assert!(burst.set_frequency(-2.0).is_err());
        assert!(burst.set_cycles(0.0).is_err());
        assert_eq!(burst, SineBurst::new(1.0, 1.0, 1.0).unwrap());
    }

    #[test]
    fn test_table_profile_clamp() {
        let table = Table::new(array![0.0, 1.0], array![-4.0, 4.0], OutOfBounds::Clamp).unwrap();
        let source = TableSource::new("force.txt");

        let mut profile = TableProfile::new(source, table, None).unwrap();
        assert_relative_eq!(profile.evaluate(1.0).unwrap(), 4.0);

        profile.set_max_amplitude(Some(-3.0)).unwrap();
        assert_relative_eq!(profile.evaluate(1.0).unwrap(), 3.0);
        assert_relative_eq!(profile.evaluate(0.0).unwrap(), -3.0);
        assert_relative_eq!(profile.evaluate(0.5).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_temporal_profile_dispatch() {
        let burst: TemporalProfile = SineBurst::new(1.0, 1.0, 5.0).unwrap().into();
        assert_eq!(burst.name(), "sineBurst");
        assert_relative_eq!(burst.evaluate(0.25).unwrap(), 5.0);
        assert_eq!(burst.amplitude(), Some(5.0));

        let table = Table::new(array![0.0, 1.0], array![0.0, 1.0], OutOfBounds::Clamp).unwrap();
        let mut table: TemporalProfile = TableProfile::new(TableSource::new("p.csv"), table, None)
            .unwrap()
            .into();
        assert_eq!(table.name(), "actuator");
        assert_eq!(table.amplitude(), None);
        table.set_amplitude(0.5).unwrap();
        assert_relative_eq!(table.evaluate(1.0).unwrap(), 0.5);
    }
}
