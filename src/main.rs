use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use cidr_findr::config::Config;
use cidr_findr::config_loader;
use cidr_findr::handler::{self, Context, InventoryDescriber, StdoutResponder};
use cidr_findr::ip::find_subnets;

const DEFAULT_LOG_LEVEL: &str = "info";

/// Find free IPv4 CIDR blocks inside a network
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Allocate subnets and print one CIDR per line
    Allocate {
        /// YAML file with networks, subnets and sizes
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Parent network CIDR (repeatable)
        #[arg(short, long = "network")]
        networks: Vec<String>,

        /// Existing subnet CIDR to avoid (repeatable)
        #[arg(short, long = "subnet")]
        subnets: Vec<String>,

        /// Requested prefix length (repeatable, allocated in order)
        #[arg(long = "size")]
        sizes: Vec<u8>,
    },

    /// Answer a custom-resource event using a VPC inventory file
    Handle {
        /// JSON event file
        #[arg(short, long)]
        event: PathBuf,

        /// YAML inventory describing the VPCs
        #[arg(short, long)]
        inventory: PathBuf,

        /// Reported as the physical resource id
        #[arg(long, default_value = "cidr-findr")]
        log_stream: String,
    },
}

fn init_logging(level: Option<&str>) {
    let level = level.unwrap_or(DEFAULT_LOG_LEVEL);
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    match args.command {
        Command::Allocate { config, networks, subnets, sizes } => {
            let file_config = match &config {
                Some(path) => config_loader::load_config(path)?,
                None => Config::default(),
            };

            init_logging(args.log_level.as_deref().or(file_config.general.log_level.as_deref()));
            if let Some(path) = &config {
                info!("Configuration file: {:?}", path);
            }

            let request = merge_request(file_config, networks, subnets, sizes);
            if request.networks.is_empty() {
                return Err(eyre!("No networks given: use --network or a config file"));
            }
            request.validate()?;

            info!(
                "Networks: {:?}, Subnets: {:?}, Request: {:?}",
                request.networks, request.subnets, request.sizes
            );

            let allocated = find_subnets(&request.networks, &request.subnets, &request.sizes)
                .wrap_err("Allocation failed")?;

            for cidr in &allocated {
                println!("{}", cidr);
            }

            info!("Allocated {} subnet(s)", allocated.len());
        }
        Command::Handle { event, inventory, log_stream } => {
            init_logging(args.log_level.as_deref());

            let event = config_loader::load_event(&event)?;
            let inventory = config_loader::load_inventory(&inventory)?;

            let context = Context { log_stream_name: log_stream };
            let describer = InventoryDescriber::new(inventory);

            let status = handler::handle(&event, &context, &describer, &mut StdoutResponder)?;
            info!("Handled {:?} event with status {:?}", event.request_type, status);
        }
    }

    Ok(())
}

/// Command-line lists extend the ones from the config file
fn merge_request(mut config: Config, networks: Vec<String>, subnets: Vec<String>, sizes: Vec<u8>) -> Config {
    config.networks.extend(networks);
    config.subnets.extend(subnets);
    config.sizes.extend(sizes);
    config
}
