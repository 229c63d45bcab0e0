//! Immutable embedding vectors.

use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::sync::Arc;

/// A fixed-length embedding. Cloning is cheap; the components are shared.
#[derive(Clone, PartialEq)]
pub struct Vector(Arc<[f32]>);

impl Vector {
    pub fn new(components: Vec<f32>) -> Self {
        Self(components.into())
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn dot(&self, other: &Vector) -> f32 {
        debug_assert_eq!(self.dim(), other.dim());
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    pub fn norm(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Returns the vector scaled to unit length. The zero vector is returned unchanged.
    pub fn normalized(&self) -> Vector {
        let norm = self.norm();
        if norm > 0.0 {
            self * norm.recip()
        } else {
            self.clone()
        }
    }

    /// Cosine similarity in `[-1, 1]`. Zero if either vector has zero length.
    pub fn cosine_similarity(&self, other: &Vector) -> f32 {
        let denom = self.norm() * other.norm();
        if denom > 0.0 {
            self.dot(other) / denom
        } else {
            0.0
        }
    }

    fn zip_with<F>(&self, other: &Vector, f: F) -> Vector
    where
        F: Fn(f32, f32) -> f32,
    {
        debug_assert_eq!(self.dim(), other.dim());
        Vector::new(self.0
            .iter()
            .zip(other.0.iter())
            .map(|(&a, &b)| f(a, b))
            .collect())
    }
}

impl<'a> Add<&'a Vector> for &'a Vector {
    type Output = Vector;

    fn add(self, rhs: &'a Vector) -> Vector {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<'a> Sub<&'a Vector> for &'a Vector {
    type Output = Vector;

    fn sub(self, rhs: &'a Vector) -> Vector {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Mul<f32> for &Vector {
    type Output = Vector;

    fn mul(self, rhs: f32) -> Vector {
        Vector::new(self.0.iter().map(|x| x * rhs).collect())
    }
}

impl From<Vec<f32>> for Vector {
    fn from(components: Vec<f32>) -> Self {
        Self::new(components)
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector({:?})", &self.0[..])
    }
}
