// config/mod.rs
use crate::models::{Capability, DeviceInfo};
use config::{Config, ConfigBuilder, ConfigError, builder::DefaultState};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub cloud: CloudSettings,
    #[serde(default)]
    pub device: DeviceSettings,
    #[serde(default)]
    pub metrics: MetricsSettings,
    #[serde(default)]
    pub simulator: SimulatorSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CloudSettings {
    /// Account identifier used for every login.
    #[serde(default)]
    pub account: String,
    /// Hardware model a device must report to be driven.
    #[serde(default = "default_device_type")]
    pub device_type: String,
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            account: String::new(),
            device_type: default_device_type(),
        }
    }
}

fn default_device_type() -> String {
    "msg100".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    pub command_timeout_secs: u64,
    pub max_hold_secs: u64,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            command_timeout_secs: 30,
            max_hold_secs: 300,
        }
    }
}

impl DeviceSettings {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    pub enabled: bool,
    pub port: u16,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 9000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    pub password: String,
    pub doors: Vec<SimulatedDoorSettings>,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            password: "garage".to_string(),
            doors: vec![SimulatedDoorSettings {
                uuid: "sim-msg100-0001".to_string(),
                name: "Garage Door".to_string(),
                device_type: default_device_type(),
                firmware: "3.2.7".to_string(),
                online: true,
                capabilities: vec![Capability::GarageOpener],
                open: false,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SimulatedDoorSettings {
    pub uuid: String,
    pub name: String,
    #[serde(default = "default_device_type")]
    pub device_type: String,
    #[serde(default)]
    pub firmware: String,
    #[serde(default = "default_true")]
    pub online: bool,
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<Capability>,
    #[serde(default)]
    pub open: bool,
}

fn default_true() -> bool {
    true
}

fn default_capabilities() -> Vec<Capability> {
    vec![Capability::GarageOpener]
}

impl SimulatedDoorSettings {
    pub fn to_info(&self) -> DeviceInfo {
        DeviceInfo {
            uuid: self.uuid.clone(),
            name: self.name.clone(),
            device_type: self.device_type.clone(),
            firmware: self.firmware.clone(),
            online: self.online,
            capabilities: self.capabilities.clone(),
        }
    }
}

/// `APP_`-prefixed variables, nested with `__` (`APP_CLOUD__ACCOUNT`).
fn environment() -> config::Environment {
    config::Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(config::File::with_name("config/config").required(false))
                .add_source(environment()),
        )
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cloud.account.trim().is_empty() {
            return Err(ConfigError::Message(
                "cloud.account must be set (APP_CLOUD__ACCOUNT)".into(),
            ));
        }
        if self.device.command_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "device.command_timeout_secs must be positive".into(),
            ));
        }
        if self.device.max_hold_secs == 0 {
            return Err(ConfigError::Message(
                "device.max_hold_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}
