use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::panel::PanelView;

/// Commands delivered to a running [`Manager`](crate::service::Manager).
///
/// They are handled between ticks on the manager's own task, so a command
/// never overlaps a scan.
#[derive(Debug)]
pub enum ControlCommand {
    /// Panel button click: flip the enable flag.
    Toggle,
    Enable,
    Disable,
    GetStatus(oneshot::Sender<ManagerStatus>),
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerStatus {
    pub enabled: bool,
    pub processed_positions: usize,
    pub processed_orders: usize,
    pub ticks: u64,
    pub panel: PanelView,
}

#[derive(Clone)]
pub struct ControlHandle {
    tx: mpsc::Sender<ControlCommand>,
}

impl ControlHandle {
    /// Creates a handle plus the receiver to hand to [`Manager::run`](crate::service::Manager::run).
    #[must_use]
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<ControlCommand>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    /// Flips the enable flag, like clicking the panel button.
    ///
    /// # Errors
    /// Returns an error if the manager has stopped.
    pub async fn toggle(&self) -> Result<()> {
        self.tx.send(ControlCommand::Toggle).await?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if the manager has stopped.
    pub async fn enable(&self) -> Result<()> {
        self.tx.send(ControlCommand::Enable).await?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if the manager has stopped.
    pub async fn disable(&self) -> Result<()> {
        self.tx.send(ControlCommand::Disable).await?;
        Ok(())
    }

    /// Gets the current status of the manager.
    ///
    /// # Errors
    /// Returns an error if the command cannot be sent or the response cannot be received.
    pub async fn status(&self) -> Result<ManagerStatus> {
        let (tx, rx) = oneshot::channel();
        self.tx.send(ControlCommand::GetStatus(tx)).await?;
        Ok(rx.await?)
    }

    /// Stops the manager after the current tick.
    ///
    /// # Errors
    /// Returns an error if the manager has already stopped.
    pub async fn shutdown(&self) -> Result<()> {
        self.tx.send(ControlCommand::Shutdown).await?;
        Ok(())
    }
}
