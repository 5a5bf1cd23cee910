use super::*;
use crate::error::IoError;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Append-only record of per-epoch average losses.
///
/// Grows by one entry per completed epoch and is read-only once training ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LossHistory {
    losses: Vec<f64>,
}

/// One point of a convergence curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePoint {
    /// 1-based epoch index
    pub epoch: usize,
    pub loss: f64,
}

impl LossHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, loss: f64) {
        self.losses.push(loss);
    }

    pub fn len(&self) -> usize {
        self.losses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.losses.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.losses
    }

    pub fn last(&self) -> Option<f64> {
        self.losses.last().copied()
    }

    /// Losses paired with their 1-based epoch index.
    pub fn points(&self) -> Vec<ConvergencePoint> {
        self.losses
            .iter()
            .enumerate()
            .map(|(i, &loss)| ConvergencePoint { epoch: i + 1, loss })
            .collect()
    }

    /// Writes the convergence curve to `path` as a JSON array of `{epoch, loss}` points.
    ///
    /// # Errors
    ///
    /// - `IoError::StdIoError` - File creation or write failed
    /// - `IoError::JsonError` - Serialization failed
    pub fn save_json(&self, path: &str) -> Result<(), IoError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.points())?;
        writer.flush()?;
        Ok(())
    }
}
