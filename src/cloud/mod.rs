// cloud/mod.rs
mod simulated;
pub use simulated::SimulatedCloud;

use crate::{
    devices::GarageDoor,
    error::CloudError,
    models::{Credential, DeviceInfo},
};
use async_trait::async_trait;
use std::sync::Arc;

/// A device as enumerated by the cloud.
///
/// `garage` is present only for devices that expose the garage-opener command
/// surface.
#[derive(Clone)]
pub struct DiscoveredDevice {
    pub info: DeviceInfo,
    pub garage: Option<Arc<dyn GarageDoor>>,
}

#[async_trait]
pub trait CloudClient: Send + Sync {
    async fn login(&self, credential: &Credential) -> Result<Box<dyn CloudSession>, CloudError>;
}

/// An authenticated context with the cloud service.
#[async_trait]
pub trait CloudSession: Send + Sync {
    async fn discover(&self) -> Result<Vec<DiscoveredDevice>, CloudError>;

    /// Ends the session. Backends without a logout call keep the default.
    async fn close(&self) -> Result<(), CloudError> {
        Ok(())
    }
}
