//! Scalar time series read from a delimited text file.
//!
//! The file layout is described by a [TableSource], which is also what gets
//! written back out when the boundary is saved. Values between rows are
//! linearly interpolated.

use std::path::{Path, PathBuf};

use ndarray::prelude::*;
use ndarray_interp::{
    interp1d::{Interp1DBuilder, Linear},
    BuilderError,
    InterpolateError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Array1F, Float};

/// Kind of table file. Only delimited text is supported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    #[default]
    #[serde(rename = "csvFile")]
    CsvFile,
}

/// What to do when a time outside the table is requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfBounds {
    /// Use the first or last value.
    #[default]
    Clamp,
    /// Like [OutOfBounds::Clamp], but logs a warning.
    Warn,
    /// Fail the lookup.
    Error,
    /// Treat the table as one period of a periodic signal.
    Repeat,
}

/// Description of a table file, kept verbatim for writing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSource {
    #[serde(rename = "type", default)]
    pub kind: TableKind,
    /// Path to the file. May start with `<case>`, `<constant>` or `<system>`.
    pub file: String,
    /// Number of lines skipped at the top of the file.
    pub n_header_line: usize,
    /// Column holding the time.
    pub ref_column: usize,
    /// Column holding the value. Must contain exactly one entry.
    pub component_columns: Vec<usize>,
    #[serde(default = "default_separator")]
    pub separator: char,
    /// Treat runs of separators as one.
    #[serde(default)]
    pub merge_separators: bool,
    #[serde(default)]
    pub out_of_bounds: OutOfBounds,
}

fn default_separator() -> char {
    ','
}

impl TableSource {
    /// Creates a source for a two column "time value" file.
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            kind: TableKind::CsvFile,
            file: file.into(),
            n_header_line: 0,
            ref_column: 0,
            component_columns: vec![1],
            separator: default_separator(),
            merge_separators: false,
            out_of_bounds: OutOfBounds::Clamp,
        }
    }

    /// Resolves the file path against a case directory.
    ///
    /// `<case>` maps to the case directory itself, `<constant>` and `<system>`
    /// to the subdirectories of the same name. Other relative paths are taken
    /// relative to the case directory.
    pub fn resolve(&self, case_dir: &Path) -> PathBuf {
        let tags = [
            ("<case>", None),
            ("<constant>", Some("constant")),
            ("<system>", Some("system")),
        ];
        for (tag, sub) in tags {
            if let Some(rest) = self.file.strip_prefix(tag) {
                let rest = rest.trim_start_matches(['/', '\\']);
                let base = match sub {
                    Some(sub) => case_dir.join(sub),
                    None => case_dir.to_path_buf(),
                };
                return base.join(rest);
            }
        }
        let path = Path::new(&self.file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            case_dir.join(path)
        }
    }

    fn value_column(&self) -> Result<usize, ProfileError> {
        match self.component_columns.as_slice() {
            [column] => Ok(*column),
            columns => Err(ProfileError::Components(columns.len())),
        }
    }

    fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        let fields = line.split(self.separator).map(str::trim);
        if self.merge_separators {
            fields.filter(|s| !s.is_empty()).collect()
        } else {
            fields.collect()
        }
    }
}

/// Error type for reading and evaluating a [Table].
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("failed to read table file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("a scalar table needs exactly one component column, got {0}")]
    Components(usize),
    #[error("line {line}: column {column} is missing")]
    MissingColumn { line: usize, column: usize },
    #[error("line {line}: cannot parse {text:?} as a number")]
    Parse { line: usize, text: String },
    #[error("table contains no data rows")]
    Empty,
    #[error("table has {times} times but {values} values")]
    Shape { times: usize, values: usize },
    #[error("table row {row} is not finite")]
    NonFinite { row: usize },
    #[error("table times must be strictly increasing (row {row})")]
    NotMonotonic { row: usize },
    #[error("time {t} is outside the table range [{lo}, {hi}]")]
    OutOfBounds { t: Float, lo: Float, hi: Float },
    #[error(transparent)]
    Builder(#[from] BuilderError),
    #[error(transparent)]
    Interpolate(#[from] InterpolateError),
}

/// A scalar time series with linear interpolation between rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    times: Array1F,
    values: Array1F,
    out_of_bounds: OutOfBounds,
}

impl Table {
    /// Builds a table from its columns.
    ///
    /// Times have to be finite and strictly increasing.
    pub fn new(times: Array1F, values: Array1F, out_of_bounds: OutOfBounds) -> Result<Self, ProfileError> {
        if times.len() != values.len() {
            return Err(ProfileError::Shape {
                times: times.len(),
                values: values.len(),
            });
        }
        if times.is_empty() {
            return Err(ProfileError::Empty);
        }
        for (row, (t, v)) in times.iter().zip(values.iter()).enumerate() {
            if !t.is_finite() || !v.is_finite() {
                return Err(ProfileError::NonFinite { row });
            }
            if row > 0 && *t <= times[row - 1] {
                return Err(ProfileError::NotMonotonic { row });
            }
        }
        Ok(Self {
            times,
            values,
            out_of_bounds,
        })
    }

    /// Parses the contents of a table file.
    pub fn parse(content: &str, source: &TableSource) -> Result<Self, ProfileError> {
        let value_column = source.value_column()?;
        let mut times = Vec::new();
        let mut values = Vec::new();

        for (i, line) in content.lines().enumerate().skip(source.n_header_line) {
            if line.trim().is_empty() {
                continue;
            }
            let fields = source.split(line);
            let line = i + 1;
            times.push(parse_field(&fields, source.ref_column, line)?);
            values.push(parse_field(&fields, value_column, line)?);
        }

        Self::new(Array1::from(times), Array1::from(values), source.out_of_bounds)
    }

    /// Reads and parses a table file, resolving its path against case_dir.
    pub fn load(source: &TableSource, case_dir: &Path) -> Result<Self, ProfileError> {
        let path = source.resolve(case_dir);
        let content = std::fs::read_to_string(&path).map_err(|source| ProfileError::Io {
            path: path.clone(),
            source,
        })?;
        let table = Self::parse(&content, source)?;
        log::debug!(
            "Read {} rows spanning t = [{}, {}] from {}",
            table.len(),
            table.times[0],
            table.times[table.len() - 1],
            path.display()
        );
        Ok(table)
    }

    pub fn times(&self) -> ArrayView1<Float> {
        self.times.view()
    }

    pub fn values(&self) -> ArrayView1<Float> {
        self.values.view()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Interpolates the table at time t.
    pub fn evaluate(&self, t: Float) -> Result<Float, ProfileError> {
        let n = self.len();
        let lo = self.times[0];
        let hi = self.times[n - 1];

        let t = if t < lo || t > hi {
            match self.out_of_bounds {
                OutOfBounds::Clamp => t.clamp(lo, hi),
                OutOfBounds::Warn => {
                    log::warn!("Time {t} is outside the table range [{lo}, {hi}], clamping");
                    t.clamp(lo, hi)
                }
                OutOfBounds::Error => return Err(ProfileError::OutOfBounds { t, lo, hi }),
                OutOfBounds::Repeat if n > 1 => lo + (t - lo).rem_euclid(hi - lo),
                OutOfBounds::Repeat => lo,
            }
        } else {
            t
        };

        // A single row is a constant, the interpolator needs two points.
        if n == 1 {
            return Ok(self.values[0]);
        }

        let interp = Interp1DBuilder::new(self.values.view())
            .x(self.times.view())
            .strategy(Linear::new())
            .build()?;
        Ok(interp.interp_scalar(t)?)
    }
}

fn parse_field(fields: &[&str], column: usize, line: usize) -> Result<Float, ProfileError> {
    let text = fields
        .get(column)
        .ok_or(ProfileError::MissingColumn { line, column })?;
    text.parse().map_err(|_| ProfileError::Parse {
        line,
        text: text.to_string(),
    })
}
