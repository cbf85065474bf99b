// session.rs
use crate::{
    cloud::{CloudClient, CloudSession},
    devices::GarageDoor,
    error::{AppError, CloudError},
    metrics,
    models::{Capability, Credential, DeviceInfo, Password},
    utils::with_timeout,
};
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

/// Logs in with the configured account and finds the garage doors on it.
pub struct SessionEstablisher {
    client: Arc<dyn CloudClient>,
    account: String,
    device_type: String,
    timeout: Duration,
}

/// A live cloud session and the garage doors it discovered.
pub struct DoorSession {
    session: Box<dyn CloudSession>,
    doors: Vec<Arc<dyn GarageDoor>>,
}

impl SessionEstablisher {
    pub fn new(
        client: Arc<dyn CloudClient>,
        account: impl Into<String>,
        device_type: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            account: account.into(),
            device_type: device_type.into(),
            timeout,
        }
    }

    pub async fn establish(&self, password: &Password) -> Result<DoorSession, AppError> {
        if password.is_empty() {
            return Err(AppError::MissingCredential);
        }
        let credential = Credential {
            account: self.account.clone(),
            password: password.clone(),
        };

        match self.discover(&credential).await {
            Ok(session) => {
                metrics::record_discovery("ok");
                info!(
                    account = %self.account,
                    doors = session.doors.len(),
                    "Discovery finished"
                );
                Ok(session)
            }
            Err(e) => {
                metrics::record_discovery("error");
                Err(AppError::DiscoveryFailed(e))
            }
        }
    }

    async fn discover(&self, credential: &Credential) -> Result<DoorSession, CloudError> {
        let session = with_timeout("login", self.timeout, self.client.login(credential)).await?;
        let devices = match with_timeout("discovery", self.timeout, session.discover()).await {
            Ok(devices) => devices,
            Err(e) => {
                close_quietly(session.as_ref()).await;
                return Err(e);
            }
        };

        let doors = devices
            .into_iter()
            .filter(|device| self.matches(&device.info))
            .filter_map(|device| device.garage)
            .collect();

        Ok(DoorSession { session, doors })
    }

    fn matches(&self, info: &DeviceInfo) -> bool {
        info.supports(Capability::GarageOpener)
            && info.device_type.eq_ignore_ascii_case(&self.device_type)
    }
}

impl DoorSession {
    pub fn doors(&self) -> &[Arc<dyn GarageDoor>] {
        &self.doors
    }

    pub fn first(&self) -> Option<&Arc<dyn GarageDoor>> {
        self.doors().first()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.doors.iter().map(|door| door.info().to_string()).collect()
    }

    /// Logs out. Errors are logged and swallowed.
    pub async fn close(&self) {
        close_quietly(self.session.as_ref()).await;
    }
}

async fn close_quietly(session: &dyn CloudSession) {
    if let Err(e) = session.close().await {
        warn!("Failed to close cloud session: {}", e);
    }
}
