//! OTTR Command Line Interface
//!
//! Expands stOTTR instance files against template libraries.
//!
//! # Usage
//!
//! ```bash
//! # Expand instances to N-Triples
//! ottr_cli expand -t library.stottr -i instances.stottr
//!
//! # JSON lines, instances expanded in parallel
//! ottr_cli expand -t library.stottr -i instances.stottr --format json --parallel
//!
//! # Parse and lint template files
//! ottr_cli check library.stottr other.stottr
//!
//! # List registered template signatures
//! ottr_cli templates -t library.stottr
//! ```

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use ottr::{write_statements, Diagnostic, OttrConfig, OttrGenerator, Severity};

#[derive(Parser)]
#[command(name = "ottr_cli")]
#[command(version = "0.1.0")]
#[command(about = "Expand OTTR template instances into statements")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to $OTTR_CONFIG, ottr.yaml, config/ottr.yaml)
    #[arg(long, short = 'c', global = true, env = "OTTR_CONFIG")]
    config: Option<PathBuf>,

    /// Do not load the o-rdf / o-rdfs standard templates
    #[arg(long, global = true)]
    no_standard_library: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[value(name = "ntriples")]
    NTriples,
    Json,
}

impl From<OutputFormat> for ottr::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::NTriples => ottr::OutputFormat::NTriples,
            OutputFormat::Json => ottr::OutputFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Expand an instance file into statements
    Expand {
        /// Template files, loaded in order
        #[arg(short, long = "templates", num_args = 1..)]
        templates: Vec<PathBuf>,

        /// Instance file
        #[arg(short, long)]
        instances: PathBuf,

        /// Output format
        #[arg(long, short = 'f', default_value = "ntriples", value_enum)]
        format: OutputFormat,

        /// Expand top-level instances in parallel
        #[arg(long)]
        parallel: bool,

        /// Write statements to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Parse template files and report diagnostics
    Check {
        /// Template files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List registered template signatures
    Templates {
        /// Template files to load before listing
        #[arg(short, long = "templates", num_args = 1..)]
        templates: Vec<PathBuf>,
    },
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = load_config(&cli).and_then(|config| match cli.command {
        Commands::Expand {
            templates,
            instances,
            format,
            parallel,
            output,
        } => {
            let config = OttrConfig {
                parallel: parallel || config.parallel,
                ..config
            };
            cmd_expand(&config, &templates, &instances, format, output, cli.quiet)
        }
        Commands::Check { files } => cmd_check(&config, &files, cli.quiet),
        Commands::Templates { templates } => cmd_templates(&config, &templates),
    });

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<OttrConfig> {
    let mut config = OttrConfig::load(cli.config.as_deref())?;
    if cli.no_standard_library {
        config.standard_library = false;
    }
    Ok(config)
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Returns `false` when any instance failed
fn cmd_expand(
    config: &OttrConfig,
    templates: &[PathBuf],
    instances: &Path,
    format: OutputFormat,
    output: Option<PathBuf>,
    quiet: bool,
) -> Result<bool> {
    let generator = load_generator(config, templates)?;
    if generator.has_errors() {
        return Err(anyhow!("template files have errors, nothing expanded"));
    }

    let source = std::fs::read_to_string(instances)
        .with_context(|| format!("Failed to read instance file {}", instances.display()))?;
    let source_name = instances.display().to_string();
    let parsed = match generator.instantiate(&source, &source_name) {
        Ok(parsed) => parsed,
        Err(e) => {
            print_diagnostics(&e.diagnostics());
            return Err(anyhow!("{} could not be parsed, nothing expanded", source_name));
        }
    };

    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut statements = 0;
    let mut failed = 0;
    for outcome in parsed.run() {
        match outcome.diagnostic(parsed.source_name()) {
            Some(diag) => {
                failed += 1;
                print_diagnostics(&[diag]);
            }
            None => {
                statements += outcome.statements().len();
                write_statements(&mut writer, outcome.statements(), format.into())
                    .context("Failed to write statements")?;
            }
        }
    }
    writer.flush().context("Failed to write statements")?;

    if !quiet {
        eprintln!(
            "{} Expanded {} instance(s) into {} statement(s){}",
            "OK".green(),
            parsed.len() - failed,
            statements,
            if failed > 0 {
                format!(", {} failed", failed).red().to_string()
            } else {
                String::new()
            }
        );
    }
    Ok(failed == 0)
}

fn cmd_check(config: &OttrConfig, files: &[PathBuf], quiet: bool) -> Result<bool> {
    let generator = load_generator(config, files)?;
    let diagnostics = generator.diagnostics();
    print_diagnostics(&diagnostics);

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics.iter().filter(|d| d.is_warning()).count();
    if !quiet {
        if errors == 0 {
            println!(
                "{} {} template(s) registered, {} warning(s)",
                "OK".green().bold(),
                generator.registry().len(),
                warnings
            );
        } else {
            println!(
                "{} {} error(s), {} warning(s)",
                "FAILED".red().bold(),
                errors,
                warnings
            );
        }
    }
    Ok(errors == 0)
}

fn cmd_templates(config: &OttrConfig, templates: &[PathBuf]) -> Result<bool> {
    let generator = load_generator(config, templates)?;
    print_diagnostics(&generator.diagnostics());

    let prefixes = generator.prefixes();
    for template in generator.registry().iter() {
        let name = prefixes
            .compact(&template.iri)
            .unwrap_or_else(|| template.iri.to_string());
        let kind = if template.is_base() { "base" } else { "composite" };
        println!(
            "{} {} {}",
            name.cyan().bold(),
            format!("({})", kind).dimmed(),
            template.signature()
        );
    }
    Ok(!generator.has_errors())
}

// =============================================================================
// HELPERS
// =============================================================================

fn load_generator(config: &OttrConfig, files: &[PathBuf]) -> Result<OttrGenerator> {
    let mut generator = OttrGenerator::new(config).context("Failed to initialize generator")?;
    for file in files {
        generator.load_template_file(file)?;
    }
    Ok(generator)
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        let line = diag.to_string();
        let line = match diag.severity {
            Severity::Error => line.red(),
            Severity::Warning => line.yellow(),
            Severity::Info => line.normal(),
        };
        eprintln!("{}", line);
    }
}
