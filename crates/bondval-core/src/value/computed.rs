//! Computed values.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::ValueDescriptor;

/// Numeric payload of a computed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    /// A single number.
    Scalar(f64),
    /// A small matrix (e.g. per-tenor sensitivities).
    Matrix(Array2<f64>),
}

impl Payload {
    /// Multiplies every element by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        match self {
            Payload::Scalar(x) => Payload::Scalar(x * factor),
            Payload::Matrix(m) => Payload::Matrix(m * factor),
        }
    }

    /// Returns the scalar, if this is one.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Payload::Scalar(x) => Some(*x),
            Payload::Matrix(_) => None,
        }
    }
}

impl From<f64> for Payload {
    fn from(x: f64) -> Self {
        Payload::Scalar(x)
    }
}

/// A published result: its identity and its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedValue {
    descriptor: ValueDescriptor,
    payload: Payload,
}

impl ComputedValue {
    /// Wraps a payload with its descriptor.
    pub fn new(descriptor: ValueDescriptor, payload: impl Into<Payload>) -> Self {
        Self {
            descriptor,
            payload: payload.into(),
        }
    }

    /// The published identity.
    #[must_use]
    pub fn descriptor(&self) -> &ValueDescriptor {
        &self.descriptor
    }

    /// The payload.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Splits into descriptor and payload.
    #[must_use]
    pub fn into_parts(self) -> (ValueDescriptor, Payload) {
        (self.descriptor, self.payload)
    }
}
