//! Matrix utilities.

/// Tridiagonal QR eigendecomposition.
pub mod tqreigendecomposition;

pub use tqreigendecomposition::{
    EigenVectorCalculation, ShiftStrategy, TqrEigenDecomposition,
};
