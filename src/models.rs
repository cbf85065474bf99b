use crate::{commands::CommandExecutor, session::SessionEstablisher};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DoorState {
    Open,
    Closed,
}

impl DoorState {
    pub fn from_open(is_open: bool) -> Self {
        if is_open { DoorState::Open } else { DoorState::Closed }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DoorState::Open => "open",
            DoorState::Closed => "closed",
        }
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    GarageOpener,
    Toggle,
    Light,
}

/// Metadata the cloud reports for every registered device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub uuid: String,
    pub name: String,
    pub device_type: String,
    pub firmware: String,
    pub online: bool,
    pub capabilities: Vec<Capability>,
}

impl DeviceInfo {
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, FW {}, {}) [{}]",
            self.name,
            self.device_type,
            self.firmware,
            if self.online { "online" } else { "offline" },
            self.uuid
        )
    }
}

/// Per-request password. Never printed.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Account identifier plus the password supplied with the request.
#[derive(Debug, Clone)]
pub struct Credential {
    pub account: String,
    pub password: Password,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct ToggleRequest {
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct OpenHalfRequest {
    #[validate(length(min = 1))]
    pub password: String,
    /// How long the door stays open before it is closed again.
    #[validate(range(min = 1))]
    pub seconds: u64,
}

pub struct AppState {
    pub establisher: SessionEstablisher,
    pub executor: CommandExecutor,
    pub max_hold_secs: u64,
}
