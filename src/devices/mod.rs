// devices/mod.rs
mod garage_door;
pub use garage_door::SimulatedDoor;

use crate::{error::CloudError, models::DeviceInfo};

/// Remote garage-door opener as exposed by a cloud session.
///
/// `is_open` reads the state cached by the last `refresh_state` call; callers
/// refresh right before reading since the door may be moved by hand at any time.
#[async_trait::async_trait]
pub trait GarageDoor: Send + Sync {
    fn info(&self) -> &DeviceInfo;

    fn name(&self) -> &str {
        &self.info().name
    }

    async fn refresh_state(&self) -> Result<(), CloudError>;
    fn is_open(&self) -> bool;
    async fn open(&self) -> Result<(), CloudError>;
    async fn close(&self) -> Result<(), CloudError>;
}
