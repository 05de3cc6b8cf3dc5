use log::info;

/// Receives the mean loss of every finished epoch.
///
/// Epochs are numbered from 1.
pub trait EpochReporter {
    fn report(&mut self, epoch: usize, mean_loss: f64);
}

impl<F: FnMut(usize, f64)> EpochReporter for F {
    fn report(&mut self, epoch: usize, mean_loss: f64) {
        self(epoch, mean_loss)
    }
}

/// Logs each epoch at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl EpochReporter for LogReporter {
    fn report(&mut self, epoch: usize, mean_loss: f64) {
        info!("Epoch: {}, Loss: {:.3}", epoch, mean_loss);
    }
}

/// Keeps every report for later inspection.
#[derive(Debug, Clone, Default)]
pub struct LossHistory {
    entries: Vec<(usize, f64)>,
}

impl LossHistory {
    pub fn new() -> Self {
        LossHistory::default()
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Mean losses in report order.
    pub fn losses(&self) -> Vec<f64> {
        self.entries.iter().map(|&(_, loss)| loss).collect()
    }

    pub fn last(&self) -> Option<f64> {
        self.entries.last().map(|&(_, loss)| loss)
    }
}

impl EpochReporter for LossHistory {
    fn report(&mut self, epoch: usize, mean_loss: f64) {
        self.entries.push((epoch, mean_loss));
    }
}
