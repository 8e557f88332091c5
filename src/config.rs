use crate::ip::AddressRange;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Allocation request read from a YAML file
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Parent networks to allocate from, tried in text order
    pub networks: Vec<String>,
    /// Subnets that already exist and must be avoided
    #[serde(default)]
    pub subnets: Vec<String>,
    /// Requested prefix lengths, allocated in order
    #[serde(default)]
    pub sizes: Vec<u8>,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.general.validate()?;

        if self.networks.is_empty() {
            return Err(ValidationError::InvalidNetwork(
                "at least one network must be given".to_string(),
            ));
        }

        for network in &self.networks {
            AddressRange::parse_cidr(network)
                .map_err(|e| ValidationError::InvalidNetwork(e.to_string()))?;
        }

        for subnet in &self.subnets {
            AddressRange::parse_cidr(subnet)
                .map_err(|e| ValidationError::InvalidSubnet(e.to_string()))?;
        }

        if let Some(size) = self.sizes.iter().find(|size| **size > 32) {
            return Err(ValidationError::InvalidSize(format!(
                "/{} is not a valid IPv4 prefix length",
                size
            )));
        }

        Ok(())
    }
}

/// Shared general configuration
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl GeneralConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(level) = &self.log_level {
            log::LevelFilter::from_str(level).map_err(|_| {
                ValidationError::InvalidGeneral(format!("unknown log_level '{}'", level))
            })?;
        }
        Ok(())
    }
}

/// Static description of VPCs, standing in for a cloud provider lookup
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub vpcs: BTreeMap<String, VpcConfig>,
}

impl Inventory {
    /// Validate every CIDR in the inventory
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (vpc_id, vpc) in &self.vpcs {
            AddressRange::parse_cidr(&vpc.cidr_block)
                .map_err(|e| ValidationError::InvalidNetwork(format!("{}: {}", vpc_id, e)))?;

            for subnet in &vpc.subnets {
                AddressRange::parse_cidr(subnet)
                    .map_err(|e| ValidationError::InvalidSubnet(format!("{}: {}", vpc_id, e)))?;
            }
        }
        Ok(())
    }
}

/// One VPC: its own block and the subnets carved from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VpcConfig {
    pub cidr_block: String,
    #[serde(default)]
    pub subnets: Vec<String>,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid network configuration: {0}")]
    InvalidNetwork(String),
    #[error("Invalid subnet configuration: {0}")]
    InvalidSubnet(String),
    #[error("Invalid size configuration: {0}")]
    InvalidSize(String),
}
