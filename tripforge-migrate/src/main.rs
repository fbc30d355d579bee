//! Tripforge Schema Script CLI Tool
//!
//! Command-line interface for generating and checking the planner's schema scripts.
//! Supports both manual use and CI pipelines (`verify` exits non-zero on drift).

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process;
use tripforge::migration::ScriptFile;
use tripforge::{GeneratorConfig, ScriptAssembler};
use tripforge_migrate::commands::{self, InitOutcome};

#[derive(Parser)]
#[command(name = "tripforge-migrate")]
#[command(about = "Schema script generator for the tripforge itinerary planner")]
#[command(version = "0.1.0")]
struct Cli {
    /// Directory scripts are written to and read from
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Schema document (.json or .toml); the built-in schema when omitted
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Skip pre-flight validation
    #[arg(long)]
    no_validate: bool,

    /// Keep declaration order instead of foreign key dependency order
    #[arg(long)]
    declared_order: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new schema script
    Generate {
        /// Script name (e.g., "initial_schema")
        #[arg(long)]
        name: Option<String>,
    },

    /// Print the schema script without writing it
    Print,

    /// Generate the initial script unless one already exists
    Init,

    /// List existing schema scripts
    List,

    /// Check that the latest script matches the current schema
    Verify,

    /// Validate the schema without generating anything
    Validate,
}

fn main() {
    let cli = Cli::parse();

    dotenv::dotenv().ok();

    // Initialize logging
    if cli.quiet {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();
    } else if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let mut config = match GeneratorConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format!("❌ Error loading configuration: {}", e).red());
            process::exit(1);
        }
    };

    // Flags win over file and environment
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    if let Commands::Generate { name: Some(ref name) } = cli.command {
        config.script_name = name.clone();
    }
    if cli.no_validate {
        config.validate = false;
    }
    if cli.declared_order {
        config.order_by_dependencies = false;
    }

    let assembler = ScriptAssembler::new(config);

    // `list` never needs a schema
    let schema_path = cli.schema.as_deref();
    let result = match cli.command {
        Commands::Generate { .. } => handle_generate(&assembler, schema_path),
        Commands::Print => handle_print(&assembler, schema_path),
        Commands::Init => handle_init(&assembler, schema_path),
        Commands::List => handle_list(&assembler),
        Commands::Verify => handle_verify(&assembler, schema_path),
        Commands::Validate => handle_validate(schema_path),
    };

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", format!("❌ Error: {:#}", e).red());
            process::exit(1);
        }
    }
}

fn handle_generate(assembler: &ScriptAssembler, schema_path: Option<&Path>) -> anyhow::Result<()> {
    let schema = commands::load_schema(schema_path)?;
    let generated = commands::generate(assembler, &schema)?;
    println!("{}", generated.path.display());
    Ok(())
}

fn handle_print(assembler: &ScriptAssembler, schema_path: Option<&Path>) -> anyhow::Result<()> {
    let schema = commands::load_schema(schema_path)?;
    print!("{}", commands::print(assembler, &schema)?);
    Ok(())
}

fn handle_init(assembler: &ScriptAssembler, schema_path: Option<&Path>) -> anyhow::Result<()> {
    let schema = commands::load_schema(schema_path)?;
    match commands::init(assembler, &schema)? {
        InitOutcome::Generated(generated) => {
            println!("{} {}", "✅ Generated initial schema script:".green(), generated.path.display());
        }
        InitOutcome::AlreadyInitialized(latest) => {
            println!("{} {}", "✅ Schema script already present:".green(), latest.path.display());
        }
    }
    Ok(())
}

fn handle_list(assembler: &ScriptAssembler) -> anyhow::Result<()> {
    let output_dir = &assembler.config().output_dir;
    let scripts = commands::list(output_dir)?;

    println!("\n📜 Schema Scripts in {}\n", output_dir.display());

    if scripts.is_empty() {
        println!("  None");
        return Ok(());
    }

    for script in &scripts {
        println!("  {}", describe(script));
    }
    println!("\n📈 Total: {}", scripts.len());

    Ok(())
}

fn handle_verify(assembler: &ScriptAssembler, schema_path: Option<&Path>) -> anyhow::Result<()> {
    let schema = commands::load_schema(schema_path)?;
    let latest = commands::verify(assembler, &schema)?;
    println!("{} {}", "✅ Up to date:".green(), describe(&latest));
    Ok(())
}

fn handle_validate(schema_path: Option<&Path>) -> anyhow::Result<()> {
    let schema = commands::load_schema(schema_path)?;
    let problems = commands::validate(&schema);

    if problems.is_empty() {
        println!("{}", format!("✅ Schema is valid ({} tables)", schema.len()).green());
        return Ok(());
    }

    for problem in &problems {
        println!("  {} {}", "✗".red(), problem);
    }
    anyhow::bail!("{} problem(s) found", problems.len())
}

fn describe(script: &ScriptFile) -> String {
    let created = script
        .created_at()
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let file_name = script
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!(
        "{} ({}, sha256 {})",
        file_name,
        created,
        &script.checksum[..script.checksum.len().min(12)]
    )
}
