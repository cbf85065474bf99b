// simulated.rs
use super::{CloudClient, CloudSession, DiscoveredDevice};
use crate::{
    config::SimulatorSettings,
    devices::{GarageDoor, SimulatedDoor},
    error::CloudError,
    models::{Capability, Credential, DeviceInfo},
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tracing::{debug, info};

/// Cloud backend that serves a set of in-memory devices.
///
/// The registry is shared by the client and every session it hands out, so
/// door state persists across requests and devices registered later show up
/// in the next discovery.
pub struct SimulatedCloud {
    account: String,
    password: String,
    registry: Registry,
    next_seq: AtomicU64,
}

type Registry = Arc<DashMap<String, Registered>>;

struct Registered {
    seq: u64,
    door: Arc<SimulatedDoor>,
}

impl SimulatedCloud {
    pub fn new(account: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            password: password.into(),
            registry: Arc::new(DashMap::new()),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn from_settings(account: &str, settings: &SimulatorSettings) -> Self {
        let cloud = Self::new(account, settings.password.clone());
        for door in &settings.doors {
            cloud.add_device(door.to_info(), door.open);
        }
        info!(devices = cloud.registry.len(), "Simulated cloud ready");
        cloud
    }

    /// Registers a device. Re-registering a uuid replaces the door but keeps
    /// its place in discovery order.
    pub fn add_device(&self, info: DeviceInfo, open: bool) -> Arc<SimulatedDoor> {
        let uuid = info.uuid.clone();
        let door = Arc::new(SimulatedDoor::new(info, open));
        self.registry
            .entry(uuid)
            .and_modify(|entry| entry.door = Arc::clone(&door))
            .or_insert_with(|| Registered {
                seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                door: Arc::clone(&door),
            });
        door
    }

    #[cfg(test)]
    pub fn device(&self, uuid: &str) -> Option<Arc<SimulatedDoor>> {
        self.registry.get(uuid).map(|entry| Arc::clone(&entry.door))
    }
}

#[async_trait]
impl CloudClient for SimulatedCloud {
    async fn login(&self, credential: &Credential) -> Result<Box<dyn CloudSession>, CloudError> {
        if credential.account != self.account || credential.password.expose() != self.password {
            return Err(CloudError::Authentication(
                "invalid account or password".to_string(),
            ));
        }

        debug!("Simulated login");
        Ok(Box::new(SimulatedSession {
            registry: Arc::clone(&self.registry),
        }))
    }
}

struct SimulatedSession {
    registry: Registry,
}

#[async_trait]
impl CloudSession for SimulatedSession {
    async fn discover(&self) -> Result<Vec<DiscoveredDevice>, CloudError> {
        let mut doors: Vec<(u64, Arc<SimulatedDoor>)> = self
            .registry
            .iter()
            .map(|entry| (entry.seq, Arc::clone(&entry.door)))
            .collect();
        doors.sort_by_key(|(seq, _)| *seq);

        Ok(doors
            .into_iter()
            .map(|(_, door)| {
                let garage = door
                    .info()
                    .supports(Capability::GarageOpener)
                    .then(|| Arc::clone(&door) as Arc<dyn GarageDoor>);
                DiscoveredDevice {
                    info: door.info().clone(),
                    garage,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Password;

    fn credential(password: &str) -> Credential {
        Credential {
            account: "me@example.com".into(),
            password: Password::new(password),
        }
    }

    fn info(uuid: &str, capabilities: Vec<Capability>) -> DeviceInfo {
        DeviceInfo {
            uuid: uuid.into(),
            name: format!("Device {uuid}"),
            device_type: "msg100".into(),
            firmware: "sim".into(),
            online: true,
            capabilities,
        }
    }

    #[tokio::test]
    async fn rejects_wrong_password() {
        let cloud = SimulatedCloud::new("me@example.com", "secret");
        let err = cloud.login(&credential("nope")).await.err().unwrap();
        assert!(matches!(err, CloudError::Authentication(_)));
        assert!(!err.to_string().contains("me@example.com"));
    }

    #[tokio::test]
    async fn discovery_keeps_registration_order() {
        let cloud = SimulatedCloud::new("me@example.com", "secret");
        cloud.add_device(info("b", vec![Capability::GarageOpener]), false);
        cloud.add_device(info("a", vec![Capability::Light]), false);

        let session = cloud.login(&credential("secret")).await.unwrap();
        let devices = session.discover().await.unwrap();
        let uuids: Vec<_> = devices.iter().map(|d| d.info.uuid.as_str()).collect();
        assert_eq!(uuids, ["b", "a"]);
        assert!(devices[0].garage.is_some());
        assert!(devices[1].garage.is_none());
    }

    #[tokio::test]
    async fn state_is_shared_between_sessions() {
        let cloud = SimulatedCloud::new("me@example.com", "secret");
        cloud.add_device(info("a", vec![Capability::GarageOpener]), false);

        let first = cloud.login(&credential("secret")).await.unwrap();
        let door = first.discover().await.unwrap()[0].garage.clone().unwrap();
        door.open().await.unwrap();

        assert!(cloud.device("a").unwrap().physically_open().await);
    }

    #[tokio::test]
    async fn session_sees_devices_registered_after_login() {
        let cloud = SimulatedCloud::new("me@example.com", "secret");
        let session = cloud.login(&credential("secret")).await.unwrap();
        assert!(session.discover().await.unwrap().is_empty());

        cloud.add_device(info("late", vec![Capability::GarageOpener]), false);
        assert_eq!(session.discover().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn re_registering_keeps_discovery_position() {
        let cloud = SimulatedCloud::new("me@example.com", "secret");
        cloud.add_device(info("a", vec![Capability::GarageOpener]), false);
        cloud.add_device(info("b", vec![Capability::GarageOpener]), false);
        cloud.add_device(info("a", vec![Capability::GarageOpener]), true);

        let session = cloud.login(&credential("secret")).await.unwrap();
        let devices = session.discover().await.unwrap();
        let uuids: Vec<_> = devices.iter().map(|d| d.info.uuid.as_str()).collect();
        assert_eq!(uuids, ["a", "b"]);
        assert!(cloud.device("a").unwrap().physically_open().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registration_is_safe() {
        let cloud = Arc::new(SimulatedCloud::new("me@example.com", "secret"));
        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let cloud = Arc::clone(&cloud);
                tokio::spawn(async move {
                    cloud.add_device(info(&format!("d{i}"), vec![Capability::GarageOpener]), false);
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let session = cloud.login(&credential("secret")).await.unwrap();
        assert_eq!(session.discover().await.unwrap().len(), 16);
        assert!(cloud.device("d7").is_some());
    }
}
