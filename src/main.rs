//! boltzgen-launch CLI
//!
//! With no subcommand, starts the fixed gpr75 run in the background and
//! exits. Subcommands cover custom launches and blocking design jobs.

use anyhow::{anyhow, Result};
use clap::builder::PossibleValuesParser;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use boltzgen_launch::commands::{
    display_version, execute_design, execute_launch, execute_preset, inspect_record,
    render_structure, validate_args, DesignArgs, LaunchArgs,
};
use boltzgen_launch::design::{DesignRequest, TargetParams};
use boltzgen_launch::launch::{BoltzgenTool, DeviceSelector, RunInvocation};
use boltzgen_launch::utils::config::{
    DEFAULT_BINDER_MAX, DEFAULT_BINDER_MIN, DEFAULT_JOB_BUDGET, DEFAULT_JOB_NUM_DESIGNS,
    DEFAULT_SAMPLING_STEPS, DEFAULT_TARGET_CHAIN, DEFAULT_TOOL, DEFAULT_WORKSPACE,
    KNOWN_PROTOCOLS, MAX_SAMPLING_STEPS, MIN_SAMPLING_STEPS, PRESET_BUDGET, PRESET_CONFIG,
    PRESET_DEVICE, PRESET_LOG, PRESET_NUM_DESIGNS, PRESET_OUTPUT, PRESET_PROTOCOL, TOOL_ENV_VAR,
};

/// boltzgen-launch - detached boltzgen runs
#[derive(Parser, Debug)]
#[command(name = "boltzgen-launch")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute (none launches the fixed gpr75 run)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a detached boltzgen run
    Launch {
        /// Design spec passed to `boltzgen run`
        #[arg(default_value = PRESET_CONFIG)]
        config: PathBuf,

        /// Tool executable, optionally with wrapper arguments
        #[arg(long, env = TOOL_ENV_VAR, default_value = DEFAULT_TOOL)]
        tool: String,

        /// Output directory for the tool
        #[arg(short, long, default_value = PRESET_OUTPUT)]
        output: PathBuf,

        /// Design protocol
        #[arg(short, long, default_value = PRESET_PROTOCOL)]
        protocol: String,

        /// Number of designs to generate
        #[arg(long, default_value_t = PRESET_NUM_DESIGNS)]
        num_designs: u64,

        /// Number of designs to keep
        #[arg(long, default_value_t = PRESET_BUDGET)]
        budget: u64,

        /// Extra `--config <SECTION> <KEY=VALUE>` for the tool (repeatable)
        #[arg(long = "set", num_args = 2, value_names = ["SECTION", "KEY=VALUE"])]
        set: Vec<String>,

        /// Accelerator index exported as CUDA_VISIBLE_DEVICES
        #[arg(short, long, default_value_t = PRESET_DEVICE)]
        device: u32,

        /// Leave CUDA_VISIBLE_DEVICES untouched
        #[arg(long, conflicts_with = "device")]
        no_device: bool,

        /// Log file (appended; its directory must exist)
        #[arg(short, long, default_value = PRESET_LOG)]
        log: PathBuf,

        /// Write `<log>.launch.json` after starting
        #[arg(long)]
        record: bool,

        /// Print the command without starting it
        #[arg(long)]
        dry_run: bool,
    },

    /// Run a design job to completion in a fresh workspace
    Design {
        /// Target structure (.pdb or .cif)
        #[arg(short, long)]
        structure: PathBuf,

        /// Target chain id
        #[arg(short, long, default_value = DEFAULT_TARGET_CHAIN)]
        chain: String,

        /// Hotspot residues, comma separated (e.g. 12,14,61)
        #[arg(long)]
        hotspots: Option<String>,

        /// Minimum binder length
        #[arg(long, default_value_t = DEFAULT_BINDER_MIN)]
        binder_min: u32,

        /// Maximum binder length
        #[arg(long, default_value_t = DEFAULT_BINDER_MAX)]
        binder_max: u32,

        /// Design a cyclic peptide
        #[arg(long)]
        cyclic: bool,

        /// Design protocol
        #[arg(
            short,
            long,
            default_value = PRESET_PROTOCOL,
            value_parser = PossibleValuesParser::new(KNOWN_PROTOCOLS.iter().copied())
        )]
        protocol: String,

        /// Number of designs to generate
        #[arg(long, default_value_t = DEFAULT_JOB_NUM_DESIGNS)]
        num_designs: u64,

        /// Number of designs to keep
        #[arg(long, default_value_t = DEFAULT_JOB_BUDGET)]
        budget: u64,

        /// Diffusion sampling steps
        #[arg(
            long,
            default_value_t = DEFAULT_SAMPLING_STEPS,
            value_parser = clap::value_parser!(u32).range(MIN_SAMPLING_STEPS as i64..=MAX_SAMPLING_STEPS as i64)
        )]
        steps: u32,

        /// Parent directory for job workspaces
        #[arg(short, long, default_value = DEFAULT_WORKSPACE)]
        workspace: PathBuf,

        /// Accelerator index exported as CUDA_VISIBLE_DEVICES
        #[arg(short, long)]
        device: Option<u32>,

        /// Tool executable, optionally with wrapper arguments
        #[arg(long, env = TOOL_ENV_VAR, default_value = DEFAULT_TOOL)]
        tool: String,

        /// Write viewer.html for the best structure
        #[arg(long)]
        viewer: bool,
    },

    /// Print a launch record
    Inspect {
        /// Path to `<log>.launch.json`
        #[arg(short, long)]
        record: PathBuf,
    },

    /// Write a standalone 3D viewer page for a structure
    Viewer {
        /// Structure file (.pdb or .cif)
        #[arg(short, long)]
        structure: PathBuf,

        /// Output HTML path
        #[arg(short, long, default_value = "viewer.html")]
        output: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments; tokens we don't recognize fall back to the preset
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if falls_back_to_preset(e.kind()) => Cli {
            command: None,
            verbose: false,
        },
        Err(e) => e.exit(),
    };

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let Some(command) = cli.command else {
        execute_preset()?;
        return Ok(());
    };

    match command {
        Commands::Launch {
            config,
            tool,
            output,
            protocol,
            num_designs,
            budget,
            set,
            device,
            no_device,
            log,
            record,
            dry_run,
        } => {
            let mut invocation = RunInvocation::new(config, output);
            invocation.tool = parse_tool(&tool)?;
            invocation.protocol = protocol;
            invocation.num_designs = num_designs;
            invocation.budget = budget;
            for pair in set.chunks_exact(2) {
                invocation = invocation.with_override(&pair[0], pair[1].clone());
            }

            let args = LaunchArgs {
                invocation,
                device: (!no_device).then(|| DeviceSelector::new(device)),
                log_path: log,
                write_record: record,
                dry_run,
            };

            // Validate args first
            validate_args(&args)?;

            execute_launch(args)?;
        }

        Commands::Design {
            structure,
            chain,
            hotspots,
            binder_min,
            binder_max,
            cyclic,
            protocol,
            num_designs,
            budget,
            steps,
            workspace,
            device,
            tool,
            viewer,
        } => {
            let request = DesignRequest {
                structure,
                target: TargetParams {
                    chain,
                    hotspots,
                    binder_min,
                    binder_max,
                    cyclic,
                },
                protocol,
                num_designs,
                budget,
                steps,
                device: device.map(DeviceSelector::new),
                tool: parse_tool(&tool)?,
            };

            execute_design(DesignArgs {
                request,
                workspace,
                viewer,
            })?;
        }

        Commands::Inspect { record } => {
            inspect_record(record)?;
        }

        Commands::Viewer { structure, output } => {
            render_structure(structure, output)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Unknown tokens launch the fixed run as if no arguments were given.
/// Mistakes inside a real subcommand still report the parse error.
fn falls_back_to_preset(kind: ErrorKind) -> bool {
    if !matches!(kind, ErrorKind::UnknownArgument | ErrorKind::InvalidSubcommand) {
        return false;
    }
    let cmd = Cli::command();
    !std::env::args_os()
        .skip(1)
        .any(|arg| cmd.find_subcommand(&arg).is_some())
}

fn parse_tool(spec: &str) -> Result<BoltzgenTool> {
    BoltzgenTool::parse(spec).ok_or_else(|| anyhow!("--tool cannot be blank"))
}
