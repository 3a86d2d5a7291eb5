#![allow(clippy::new_without_default, clippy::op_ref)]

//! Actuator disk boundary conditions.
//!
//! An actuator applies a normal force `p(t) * n` over a circular region of a
//! boundary patch and leaves the rest of the patch force free. The result is
//! exposed as a per-face normal gradient which the host solver turns into face
//! values with its own discretization.

use ndarray::{prelude::*, Data, DataMut};

pub mod bc;
pub mod builder;
pub mod config;
pub mod geometry;
pub mod mapping;
pub mod profile;
pub mod table;

#[doc(inline)]
pub use crate::{
    bc::{ActuatorBC, BoundaryCondition, BoundaryError},
    builder::ActuatorBuilder,
    config::{BoundaryConfig, ConfigError, ProfileConfig},
    geometry::ActuatorDisk,
    mapping::{FaceMapping, MappingError},
    profile::{ForceProfile, SineBurst, TableProfile, TemporalProfile},
    table::{OutOfBounds, ProfileError, Table, TableSource},
};

pub type Float = f64;

/// A point or direction in the patch's embedding space.
pub type Vector = [Float; 3];

// Marker traits to make handling generic functions over arrays easier.
pub trait DataF: Data<Elem = Float> {}
impl<T> DataF for T where T: Data<Elem = Float> {}
pub trait DataMutF: DataMut<Elem = Float> {}
impl<T> DataMutF for T where T: DataMut<Elem = Float> {}

pub type ArrayBaseF<S, D> = ArrayBase<S, D>;

pub type ArrayBase1F<S> = ArrayBaseF<S, Ix1>;
pub type ArrayBase2F<S> = ArrayBaseF<S, Ix2>;

pub type Array1F = Array1<Float>;
pub type Array2F = Array2<Float>;
