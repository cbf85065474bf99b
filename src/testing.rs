// testing.rs
//! Mock cloud and door used by the unit tests.

use crate::{
    cloud::{CloudClient, CloudSession, DiscoveredDevice},
    devices::GarageDoor,
    error::CloudError,
    models::{Capability, Credential, DeviceInfo},
};
use async_trait::async_trait;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicU32, Ordering},
};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Refresh,
    Open,
    Close,
}

pub struct MockDoor {
    info: DeviceInfo,
    physical_open: AtomicBool,
    reported_open: AtomicBool,
    calls: Mutex<Vec<(Call, Instant)>>,
    fail_on: Option<Call>,
    hang_on: Option<Call>,
}

impl MockDoor {
    pub fn new(name: &str, open: bool) -> Self {
        Self {
            info: garage_info(name, "msg100"),
            physical_open: AtomicBool::new(open),
            // Starts stale so a read without a refresh is caught.
            reported_open: AtomicBool::new(!open),
            calls: Mutex::new(Vec::new()),
            fail_on: None,
            hang_on: None,
        }
    }

    pub fn failing_on(mut self, call: Call) -> Self {
        self.fail_on = Some(call);
        self
    }

    pub fn hanging_on(mut self, call: Call) -> Self {
        self.hang_on = Some(call);
        self
    }

    pub fn calls(&self) -> Vec<(Call, Instant)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls().iter().filter(|(c, _)| *c == call).count()
    }

    pub fn set_physical(&self, open: bool) {
        self.physical_open.store(open, Ordering::SeqCst);
    }

    async fn record(&self, call: Call) -> Result<(), CloudError> {
        self.calls.lock().unwrap().push((call, Instant::now()));
        if self.hang_on == Some(call) {
            std::future::pending::<()>().await;
        }
        if self.fail_on == Some(call) {
            return Err(CloudError::Rejected {
                device: self.info.name.clone(),
                reason: format!("{call:?} refused"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl GarageDoor for MockDoor {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    async fn refresh_state(&self) -> Result<(), CloudError> {
        self.record(Call::Refresh).await?;
        let open = self.physical_open.load(Ordering::SeqCst);
        self.reported_open.store(open, Ordering::SeqCst);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.reported_open.load(Ordering::SeqCst)
    }

    async fn open(&self) -> Result<(), CloudError> {
        self.record(Call::Open).await?;
        self.physical_open.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> Result<(), CloudError> {
        self.record(Call::Close).await?;
        self.physical_open.store(false, Ordering::SeqCst);
        Ok(())
    }
}

pub fn garage_info(name: &str, device_type: &str) -> DeviceInfo {
    DeviceInfo {
        uuid: format!("uuid-{name}"),
        name: name.to_string(),
        device_type: device_type.to_string(),
        firmware: "1.0.0".to_string(),
        online: true,
        capabilities: vec![Capability::GarageOpener],
    }
}

#[derive(Default)]
pub struct MockCloud {
    pub devices: Vec<DiscoveredDevice>,
    pub reject_login: bool,
    pub hang_login: bool,
    pub fail_discovery: bool,
    pub hang_discovery: bool,
    pub fail_close: bool,
    pub closed: Arc<AtomicU32>,
}

impl MockCloud {
    pub fn with_doors(doors: Vec<Arc<MockDoor>>) -> Self {
        let devices = doors
            .into_iter()
            .map(|door| DiscoveredDevice {
                info: door.info().clone(),
                garage: Some(door as Arc<dyn GarageDoor>),
            })
            .collect();
        Self {
            devices,
            ..Default::default()
        }
    }

    pub fn sessions_closed(&self) -> u32 {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CloudClient for MockCloud {
    async fn login(&self, _credential: &Credential) -> Result<Box<dyn CloudSession>, CloudError> {
        if self.hang_login {
            std::future::pending::<()>().await;
        }
        if self.reject_login {
            return Err(CloudError::Authentication("bad password".into()));
        }
        Ok(Box::new(MockSession {
            devices: self.devices.clone(),
            fail_discovery: self.fail_discovery,
            hang_discovery: self.hang_discovery,
            fail_close: self.fail_close,
            closed: Arc::clone(&self.closed),
        }))
    }
}

struct MockSession {
    devices: Vec<DiscoveredDevice>,
    fail_discovery: bool,
    hang_discovery: bool,
    fail_close: bool,
    closed: Arc<AtomicU32>,
}

#[async_trait]
impl CloudSession for MockSession {
    async fn discover(&self) -> Result<Vec<DiscoveredDevice>, CloudError> {
        if self.hang_discovery {
            std::future::pending::<()>().await;
        }
        if self.fail_discovery {
            return Err(CloudError::Unavailable("503".into()));
        }
        Ok(self.devices.clone())
    }

    async fn close(&self) -> Result<(), CloudError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(CloudError::Unavailable("logout refused".into()));
        }
        Ok(())
    }
}
