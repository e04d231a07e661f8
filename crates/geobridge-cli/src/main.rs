mod commands;

use clap::{Args, Parser, Subcommand};
use commands::EXIT_FAILURE;
use geobridge_client::{InstanceConfig, Instances};
use geobridge_sync::SyncOptions;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "geobridge",
    version,
    about = "Admin client and replication tool for OGC map servers"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Connection flags for one instance, or a named entry from
/// `~/.config/geobridge/instances.toml`.
#[derive(Debug, Args)]
struct Connection {
    /// Named instance from the config file.
    #[arg(long, conflicts_with_all = ["url", "user", "password"])]
    instance: Option<String>,

    #[arg(long, required_unless_present = "instance")]
    url: Option<String>,

    #[arg(long, required_unless_present = "instance")]
    user: Option<String>,

    #[arg(long, required_unless_present = "instance")]
    password: Option<String>,

    /// Skip TLS certificate verification.
    #[arg(long, default_value_t = false)]
    insecure: bool,
}

impl Connection {
    fn resolve(&self) -> Result<InstanceConfig, String> {
        if let Some(name) = &self.instance {
            let instances = Instances::load_default().map_err(|e| e.to_string())?;
            return instances
                .get(name)
                .cloned()
                .ok_or_else(|| format!("instance '{name}' not found in config"));
        }
        let (Some(url), Some(user), Some(password)) = (&self.url, &self.user, &self.password)
        else {
            return Err("provide --instance or --url/--user/--password".to_owned());
        };
        let mut config = InstanceConfig::new(url, user, password);
        if self.insecure {
            config = config.insecure();
        }
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replicate a workspace from a source instance to a destination.
    Sync {
        #[arg(long)]
        src_url: String,
        #[arg(long)]
        src_user: String,
        #[arg(long)]
        src_password: String,
        #[arg(long, default_value_t = false)]
        src_insecure: bool,

        #[arg(long)]
        dst_url: String,
        #[arg(long)]
        dst_user: String,
        #[arg(long)]
        dst_password: String,
        #[arg(long, default_value_t = false)]
        dst_insecure: bool,

        /// Workspace to replicate.
        #[arg(long)]
        workspace: String,

        /// Copy styles only (combinable with the other selection flags).
        #[arg(long, default_value_t = false)]
        styles: bool,
        /// Copy PostGIS datastores with their feature types and layers.
        #[arg(long, default_value_t = false)]
        datastores: bool,
        /// Copy layer groups.
        #[arg(long, default_value_t = false)]
        layer_groups: bool,
    },
    /// Inspect catalog resources.
    Get {
        #[command(subcommand)]
        resource: GetResource,
    },
    /// Delete catalog resources.
    Delete {
        #[command(subcommand)]
        resource: DeleteResource,
    },
}

#[derive(Debug, Subcommand)]
enum GetResource {
    Workspace {
        name: String,
        #[command(flatten)]
        connection: Connection,
    },
}

#[derive(Debug, Subcommand)]
enum DeleteResource {
    Workspace {
        name: String,
        /// Cascade to contained stores, feature types and layers.
        #[arg(long, default_value_t = false)]
        recurse: bool,
        #[command(flatten)]
        connection: Connection,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("GEOBRIDGE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;

    let result = match cli.command {
        Commands::Sync {
            src_url,
            src_user,
            src_password,
            src_insecure,
            dst_url,
            dst_user,
            dst_password,
            dst_insecure,
            workspace,
            styles,
            datastores,
            layer_groups,
        } => {
            let mut src = InstanceConfig::new(&src_url, &src_user, &src_password);
            if src_insecure {
                src = src.insecure();
            }
            let mut dst = InstanceConfig::new(&dst_url, &dst_user, &dst_password);
            if dst_insecure {
                dst = dst.insecure();
            }
            // No selection flag means everything.
            let opts = if styles || datastores || layer_groups {
                SyncOptions {
                    styles,
                    datastores,
                    layer_groups,
                }
            } else {
                SyncOptions::default()
            };
            commands::sync::run(&src, &dst, &workspace, opts, json_output)
        }
        Commands::Get {
            resource: GetResource::Workspace { name, connection },
        } => connection
            .resolve()
            .and_then(|config| commands::get::workspace(&config, &name, json_output)),
        Commands::Delete {
            resource:
                DeleteResource::Workspace {
                    name,
                    recurse,
                    connection,
                },
        } => connection
            .resolve()
            .and_then(|config| commands::delete::workspace(&config, &name, recurse)),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
