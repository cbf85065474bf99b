// commands/mod.rs
use crate::{
    devices::GarageDoor,
    error::{AppError, CloudError},
    metrics,
    models::DoorState,
    utils::with_timeout,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// A state-changing action run against one garage door.
///
/// Every command refreshes before deciding and refreshes again before it
/// reports, so the returned state is what the cloud saw last.
#[async_trait]
pub trait DoorCommand: Send + Sync {
    fn name(&self) -> &'static str;
    async fn execute(&self, door: &DoorRemote<'_>) -> Result<DoorState, CloudError>;
}

/// Door handle whose remote calls are bounded by a timeout.
pub struct DoorRemote<'a> {
    door: &'a dyn GarageDoor,
    timeout: Duration,
}

impl<'a> DoorRemote<'a> {
    pub fn new(door: &'a dyn GarageDoor, timeout: Duration) -> Self {
        Self { door, timeout }
    }

    pub fn name(&self) -> &str {
        self.door.name()
    }

    /// Refreshes the cached state and reads it.
    pub async fn refresh(&self) -> Result<DoorState, CloudError> {
        with_timeout("refresh", self.timeout, self.door.refresh_state()).await?;
        Ok(DoorState::from_open(self.door.is_open()))
    }

    pub async fn open(&self) -> Result<(), CloudError> {
        with_timeout("open", self.timeout, self.door.open()).await
    }

    pub async fn close(&self) -> Result<(), CloudError> {
        with_timeout("close", self.timeout, self.door.close()).await
    }
}

pub struct Toggle;

#[async_trait]
impl DoorCommand for Toggle {
    fn name(&self) -> &'static str {
        "toggle"
    }

    async fn execute(&self, door: &DoorRemote<'_>) -> Result<DoorState, CloudError> {
        match door.refresh().await? {
            DoorState::Open => {
                info!("Door {} is open. Sending close", door.name());
                door.close().await?;
            }
            DoorState::Closed => {
                info!("Door {} is closed. Sending open", door.name());
                door.open().await?;
            }
        }
        door.refresh().await
    }
}

/// Opens a closed door, holds it open, then closes it again.
///
/// A door that is already open is left alone. Whatever happens to the door
/// during the hold is not observed.
pub struct OpenHalf {
    hold: Duration,
}

impl OpenHalf {
    pub fn new(hold: Duration) -> Self {
        Self { hold }
    }
}

#[async_trait]
impl DoorCommand for OpenHalf {
    fn name(&self) -> &'static str {
        "open_half"
    }

    async fn execute(&self, door: &DoorRemote<'_>) -> Result<DoorState, CloudError> {
        if door.refresh().await? == DoorState::Open {
            info!("Door {} is open. Doing nothing", door.name());
            return Ok(DoorState::Open);
        }

        info!("Door {} is closed. Sending open", door.name());
        door.open().await?;
        info!("Waiting {} seconds before closing", self.hold.as_secs());
        tokio::time::sleep(self.hold).await;
        door.close().await?;

        door.refresh().await
    }
}

/// Runs commands with the configured per-call timeout.
pub struct CommandExecutor {
    timeout: Duration,
}

impl CommandExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn execute(
        &self,
        door: &dyn GarageDoor,
        command: &dyn DoorCommand,
    ) -> Result<DoorState, AppError> {
        let remote = DoorRemote::new(door, self.timeout);
        match command.execute(&remote).await {
            Ok(state) => {
                metrics::record_command(command.name(), "ok");
                info!(command = command.name(), %state, "Door {} is now {}", door.name(), state);
                Ok(state)
            }
            Err(e) => {
                metrics::record_command(command.name(), "error");
                Err(AppError::DeviceCommandFailed(e))
            }
        }
    }
}
