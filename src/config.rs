//! Reading and writing boundary configuration records.
//!
//! A record looks like
//!
//! ```json
//! {
//!     "type": "sineBurst",
//!     "f0": 20000,
//!     "nc": 4,
//!     "fn_tot": -1,
//!     "ra": 0.019478,
//!     "xa": [0, 0.0031, 0.0015],
//!     "value": [0, 0, 0]
//! }
//! ```
//!
//! or, for a pressure read from a file,
//!
//! ```json
//! {
//!     "type": "actuator",
//!     "ra": 0.019478,
//!     "xa": [0, 0.0031, 0.0015],
//!     "pressureValue": {
//!         "type": "csvFile",
//!         "nHeaderLine": 0,
//!         "refColumn": 0,
//!         "componentColumns": [1],
//!         "separator": " ",
//!         "mergeSeparators": true,
//!         "file": "<constant>/force.txt"
//!     },
//!     "value": [0, 0, 0]
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{
    bc::{ActuatorBC, BoundaryError},
    builder::ActuatorBuilder,
    profile::{SineBurst, TableProfile, TemporalProfile},
    table::TableSource,
    Float,
    Vector,
};

/// Error type for invalid actuator parameters.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("radius has not been set.")]
    RadiusNotSet,
    #[error("radius must be > 0, got {0}")]
    RadiusInvalid(Float),
    #[error("center has not been set.")]
    CenterNotSet,
    #[error("center must be finite, got {0:?}")]
    CenterInvalid(Vector),
    #[error("temporal profile has not been set.")]
    ProfileNotSet,
    #[error("f0 must be > 0, got {0}")]
    FrequencyInvalid(Float),
    #[error("nc must be > 0, got {0}")]
    CyclesInvalid(Float),
    #[error("amplitude must be finite, got {0}")]
    AmplitudeInvalid(Float),
    #[error("value must be finite, got {0:?}")]
    ValueInvalid(Vector),
    #[error("{0} is only defined for a sine burst")]
    NotSineBurst(&'static str),
    #[error("invalid boundary record: {0}")]
    Record(#[from] serde_json::Error),
}

/// Profile specific part of a [BoundaryConfig], selected by its `type` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProfileConfig {
    #[serde(rename = "actuator")]
    Table {
        #[serde(rename = "pressureValue")]
        pressure_value: TableSource,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fn_max: Option<Float>,
    },
    #[serde(rename = "sineBurst")]
    SineBurst { f0: Float, nc: Float, fn_tot: Float },
}

/// Serialized form of an [ActuatorBC].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    #[serde(flatten)]
    pub profile: ProfileConfig,
    /// Disk radius (m).
    pub ra: Float,
    /// Disk center (m).
    pub xa: Vector,
    /// Fallback boundary value.
    #[serde(default)]
    pub value: Vector,
}

impl BoundaryConfig {
    /// Parses a record, failing on missing keys or wrong types.
    pub fn from_value(record: &Value) -> Result<Self, ConfigError> {
        Ok(Self::deserialize(record)?)
    }

    pub fn to_value(&self) -> Result<Value, ConfigError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Builds the boundary described by this record.
    ///
    /// Table files are resolved relative to case_dir.
    pub fn build(&self, case_dir: &Path) -> Result<ActuatorBC, BoundaryError> {
        let profile: TemporalProfile = match &self.profile {
            ProfileConfig::Table {
                pressure_value,
                fn_max,
            } => TableProfile::load(pressure_value.clone(), case_dir, *fn_max)?.into(),
            ProfileConfig::SineBurst { f0, nc, fn_tot } => SineBurst::new(*f0, *nc, *fn_tot)?.into(),
        };

        Ok(ActuatorBuilder::new()
            .radius(self.ra)
            .center(self.xa)
            .profile(profile)
            .value(self.value)
            .build()?)
    }
}

impl From<&ActuatorBC> for BoundaryConfig {
    fn from(bc: &ActuatorBC) -> Self {
        let profile = match bc.profile() {
            TemporalProfile::Table(p) => ProfileConfig::Table {
                pressure_value: p.source().clone(),
                fn_max: p.max_amplitude(),
            },
            TemporalProfile::SineBurst(p) => ProfileConfig::SineBurst {
                f0: p.frequency(),
                nc: p.cycles(),
                fn_tot: p.amplitude(),
            },
        };
        Self {
            profile,
            ra: bc.radius(),
            xa: bc.center(),
            value: bc.value(),
        }
    }
}

impl ActuatorBC {
    /// Constructs a boundary from a configuration record.
    pub fn read(record: &Value, case_dir: &Path) -> Result<Self, BoundaryError> {
        BoundaryConfig::from_value(record)?.build(case_dir)
    }

    /// Writes the configuration record of this boundary.
    pub fn write(&self) -> Result<Value, ConfigError> {
        BoundaryConfig::from(self).to_value()
    }

    /// Reads a record from a JSON file. Table files are resolved relative to
    /// the directory containing it.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let record: Value = serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;
        let case_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::read(&record, case_dir)
            .with_context(|| format!("invalid boundary in {}", path.display()))
    }
}
