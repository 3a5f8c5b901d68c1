//! Utilization Shapes
//!
//! A shape is an ordered list of (utilization, score) control points. It is
//! evaluated as a broken linear function: linear interpolation between
//! neighbouring points, flat before the first and after the last.

use super::MAX_UTILIZATION;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

// =============================================================================
// Function Shape
// =============================================================================

/// One control point of a utilization shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionShapePoint {
    /// Utilization percentage (0-100)
    pub utilization: i64,
    /// Score at this utilization
    pub score: i64,
}

impl FunctionShapePoint {
    pub fn new(utilization: i64, score: i64) -> Self {
        Self { utilization, score }
    }
}

/// Control points ordered by strictly increasing utilization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionShape(Vec<FunctionShapePoint>);

impl FunctionShape {
    pub fn new(points: Vec<FunctionShapePoint>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[FunctionShapePoint] {
        &self.0
    }

    /// Check that the shape is usable with scores bounded by `max_score`
    pub fn validate(&self, max_score: i64) -> Result<()> {
        if self.0.is_empty() {
            return Err(Error::InvalidShape {
                index: 0,
                reason: "shape must contain at least one point".into(),
            });
        }

        for (index, point) in self.0.iter().enumerate() {
            if !(0..=MAX_UTILIZATION).contains(&point.utilization) {
                return Err(Error::InvalidShape {
                    index,
                    reason: format!(
                        "utilization {} not in range [0, {}]",
                        point.utilization, MAX_UTILIZATION
                    ),
                });
            }
            if !(0..=max_score).contains(&point.score) {
                return Err(Error::InvalidShape {
                    index,
                    reason: format!("score {} not in range [0, {}]", point.score, max_score),
                });
            }
            if index > 0 && point.utilization <= self.0[index - 1].utilization {
                return Err(Error::InvalidShape {
                    index,
                    reason: "utilization values must be strictly increasing".into(),
                });
            }
        }

        Ok(())
    }

    /// Multiply every score by `factor`
    pub fn scaled(&self, factor: i64) -> Self {
        Self(
            self.0
                .iter()
                .map(|p| FunctionShapePoint::new(p.utilization, p.score * factor))
                .collect(),
        )
    }
}

impl From<Vec<(i64, i64)>> for FunctionShape {
    fn from(points: Vec<(i64, i64)>) -> Self {
        Self(
            points
                .into_iter()
                .map(|(utilization, score)| FunctionShapePoint::new(utilization, score))
                .collect(),
        )
    }
}

// =============================================================================
// Broken Linear Function
// =============================================================================

/// Integer piecewise-linear evaluator over a shape
#[derive(Debug, Clone)]
pub struct BrokenLinearFunction {
    shape: FunctionShape,
}

impl BrokenLinearFunction {
    pub fn new(shape: FunctionShape) -> Self {
        Self { shape }
    }

    pub fn shape(&self) -> &FunctionShape {
        &self.shape
    }

    /// Score for utilization `p`; interpolation truncates toward zero
    pub fn evaluate(&self, p: i64) -> i64 {
        let points = self.shape.points();
        for (i, point) in points.iter().enumerate() {
            if p <= point.utilization {
                if i == 0 {
                    return point.score;
                }
                let prev = points[i - 1];
                return prev.score
                    + (point.score - prev.score) * (p - prev.utilization)
                        / (point.utilization - prev.utilization);
            }
        }
        points.last().map_or(0, |last| last.score)
    }
}
