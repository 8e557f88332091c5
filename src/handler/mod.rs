//! Custom-resource handler.
//!
//! This module adapts the allocator to an orchestration system that sends
//! lifecycle events and expects a status response. Looking up the VPC and
//! delivering the response are left to the `NetworkDescriber` and
//! `Responder` implementations supplied by the caller.

pub mod sizes;
pub mod types;

pub use sizes::{parse_size, sizes_valid, MAX_SUBNET_SIZE, MIN_SUBNET_SIZE};
pub use types::{Context, CustomResourceEvent, RequestType, ResponseBody, ResponseData, ResponseStatus};

use crate::config::Inventory;
use crate::ip::find_subnets;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::Value;

/// Property naming the VPC to allocate in
pub const VPC_ID_PROPERTY: &str = "VpcId";

/// Property holding the requested prefix lengths
pub const SIZES_PROPERTY: &str = "Sizes";

/// Source of a VPC's own block and its existing subnets
pub trait NetworkDescriber {
    fn describe_vpc_cidr(&self, vpc_id: &str) -> Result<String>;

    fn describe_subnet_cidrs(&self, vpc_id: &str) -> Result<Vec<String>>;
}

/// Destination for the finished response
pub trait Responder {
    fn respond(&mut self, body: ResponseBody) -> Result<()>;
}

/// Describes VPCs from a static inventory file
#[derive(Debug, Default)]
pub struct InventoryDescriber {
    inventory: Inventory,
}

impl InventoryDescriber {
    pub fn new(inventory: Inventory) -> Self {
        InventoryDescriber { inventory }
    }
}

impl NetworkDescriber for InventoryDescriber {
    fn describe_vpc_cidr(&self, vpc_id: &str) -> Result<String> {
        self.inventory
            .vpcs
            .get(vpc_id)
            .map(|vpc| vpc.cidr_block.clone())
            .ok_or_else(|| eyre!("The vpc ID '{}' does not exist", vpc_id))
    }

    fn describe_subnet_cidrs(&self, vpc_id: &str) -> Result<Vec<String>> {
        Ok(self
            .inventory
            .vpcs
            .get(vpc_id)
            .map(|vpc| vpc.subnets.clone())
            .unwrap_or_default())
    }
}

/// Writes the response body to stdout as JSON
#[derive(Debug, Default)]
pub struct StdoutResponder;

impl Responder for StdoutResponder {
    fn respond(&mut self, body: ResponseBody) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(&body)?);
        Ok(())
    }
}

/// Keeps every response in memory
#[derive(Debug, Default)]
pub struct RecordingResponder {
    pub responses: Vec<ResponseBody>,
}

impl Responder for RecordingResponder {
    fn respond(&mut self, body: ResponseBody) -> Result<()> {
        self.responses.push(body);
        Ok(())
    }
}

/// Handle one custom-resource event and send exactly one response.
///
/// Returns the status that was sent.
pub fn handle(
    event: &CustomResourceEvent,
    context: &Context,
    describer: &dyn NetworkDescriber,
    responder: &mut dyn Responder,
) -> Result<ResponseStatus> {
    let body = build_response(event, context, describer);
    let status = body.status;

    log::info!("Responding: {}", serde_json::to_string(&body)?);
    responder.respond(body)?;

    Ok(status)
}

fn build_response(
    event: &CustomResourceEvent,
    context: &Context,
    describer: &dyn NetworkDescriber,
) -> ResponseBody {
    // Delete always succeeds
    if event.request_type == RequestType::Delete {
        return ResponseBody::success(event, context);
    }

    let properties = &event.resource_properties;

    let missing: Vec<&str> = [VPC_ID_PROPERTY, SIZES_PROPERTY]
        .into_iter()
        .filter(|param| !properties.contains_key(*param))
        .collect();

    if !missing.is_empty() {
        return ResponseBody::failed(
            event,
            context,
            format!("Missing parameter(s): {}", missing.join(", ")),
        );
    }

    let vpc_id = match &properties[VPC_ID_PROPERTY] {
        Value::String(id) => id.clone(),
        other => other.to_string(),
    };

    let raw_sizes: Vec<&Value> = match &properties[SIZES_PROPERTY] {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    };

    let parsed_sizes: Vec<Option<u8>> = raw_sizes.iter().map(|size| parse_size(size)).collect();

    if !sizes_valid(&parsed_sizes) {
        let written: Vec<String> = raw_sizes.iter().map(|size| sizes::raw_size(size)).collect();
        return ResponseBody::failed(
            event,
            context,
            format!("An invalid subnet size was specified: {}", written.join(", ")),
        );
    }

    let sizes: Vec<u8> = parsed_sizes.into_iter().flatten().collect();

    let vpc_cidr = match describer.describe_vpc_cidr(&vpc_id) {
        Ok(cidr) => cidr,
        Err(e) => return ResponseBody::failed(event, context, e.to_string()),
    };

    let subnet_cidrs = match describer.describe_subnet_cidrs(&vpc_id) {
        Ok(cidrs) => cidrs,
        Err(e) => return ResponseBody::failed(event, context, e.to_string()),
    };

    let result = find_subnets(&[vpc_cidr.as_str()], &subnet_cidrs, &sizes);

    log::info!(
        "VPC: {}, Subnets: {:?}, Request: {:?}, Result: {:?}",
        vpc_cidr,
        subnet_cidrs,
        sizes,
        result
    );

    match result {
        Ok(cidr_blocks) => ResponseBody::success(event, context).with_cidr_blocks(cidr_blocks),
        Err(e) => ResponseBody::failed(event, context, e.to_string()),
    }
}
