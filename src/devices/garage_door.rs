// garage_door.rs
use crate::{error::CloudError, models::DeviceInfo};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory garage door backing the simulated cloud.
///
/// Keeps the physical position separately from the position last reported to
/// the session, so a stale read is possible until `refresh_state` runs.
pub struct SimulatedDoor {
    info: DeviceInfo,
    physical_open: RwLock<bool>,
    reported_open: AtomicBool,
}

impl SimulatedDoor {
    pub fn new(info: DeviceInfo, open: bool) -> Self {
        Self {
            info,
            physical_open: RwLock::new(open),
            reported_open: AtomicBool::new(open),
        }
    }

    #[cfg(test)]
    /// Moves the door without going through the cloud, like the wall button.
    pub async fn press_wall_button(&self) {
        let mut open = self.physical_open.write().await;
        *open = !*open;
    }

    #[cfg(test)]
    pub async fn physically_open(&self) -> bool {
        *self.physical_open.read().await
    }

    fn ensure_online(&self) -> Result<(), CloudError> {
        if self.info.online {
            Ok(())
        } else {
            Err(CloudError::Offline(self.info.name.clone()))
        }
    }
}

#[async_trait]
impl super::GarageDoor for SimulatedDoor {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    async fn refresh_state(&self) -> Result<(), CloudError> {
        self.ensure_online()?;
        let open = *self.physical_open.read().await;
        self.reported_open.store(open, Ordering::Relaxed);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.reported_open.load(Ordering::Relaxed)
    }

    async fn open(&self) -> Result<(), CloudError> {
        self.ensure_online()?;
        debug!(device = %self.info.name, "Simulated open");
        *self.physical_open.write().await = true;
        Ok(())
    }

    async fn close(&self) -> Result<(), CloudError> {
        self.ensure_online()?;
        debug!(device = %self.info.name, "Simulated close");
        *self.physical_open.write().await = false;
        Ok(())
    }
}
