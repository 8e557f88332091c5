use crate::config::{Config, Inventory};
use crate::handler::CustomResourceEvent;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::Path;

/// Load and validate an allocation config from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open config file '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse config file '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// Load and validate a VPC inventory from a YAML file
pub fn load_inventory(inventory_path: &Path) -> Result<Inventory> {
    info!("Loading inventory from: {:?}", inventory_path);

    let file = File::open(inventory_path)
        .wrap_err_with(|| format!("Failed to open inventory file '{}'", inventory_path.display()))?;

    let inventory: Inventory = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse inventory file '{}'", inventory_path.display()))?;

    inventory.validate()?;

    info!("Inventory describes {} VPC(s)", inventory.vpcs.len());
    Ok(inventory)
}

/// Load a custom-resource event from a JSON file
pub fn load_event(event_path: &Path) -> Result<CustomResourceEvent> {
    info!("Loading event from: {:?}", event_path);

    let file = File::open(event_path)
        .wrap_err_with(|| format!("Failed to open event file '{}'", event_path.display()))?;

    let event = serde_json::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse event file '{}'", event_path.display()))?;

    Ok(event)
}
