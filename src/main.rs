//! ClauDent CLI
//!
//! Launches the interactive shell, or runs the patient search once from the
//! command line.

use clap::{Parser, Subcommand};
use claudent::config::{Paths, UserConfig};
use claudent::tui::{self, App, ShellOptions};
use claudent::{
    logging, match_patients, patient, ClaudentError, CurrentUser, LocalSession, PatientIndex, PatientRecord,
};
use console::style;
use indicatif::HumanDuration;
use std::path::PathBuf;
use std::time::Instant;

/// ClauDent - dental clinic records in the terminal
#[derive(Parser)]
#[command(name = "claudent")]
#[command(version)]
#[command(about = "Dental clinic shell with incremental patient search", long_about = None)]
struct Cli {
    /// Configuration directory (default: platform config dir)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive shell
    Shell {
        /// Patient index (JSON)
        #[arg(short, long)]
        patients: Option<PathBuf>,

        /// Email of the signed-in user
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Search patients by name or CURP
    Search {
        /// Text to look for (use -- before it if it starts with -)
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// Patient index (JSON)
        #[arg(short, long)]
        patients: Option<PathBuf>,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every patient in the index
    Patients {
        /// Patient index (JSON)
        #[arg(short, long)]
        patients: Option<PathBuf>,
    },

    /// Show resolved paths and configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> claudent::Result<()> {
    let paths = Paths::new(cli.root)?;
    paths.ensure_dirs()?;
    let config = UserConfig::load(&paths)?;

    // Keep the guard until exit so buffered log lines are flushed
    let _log_guard = match logging::init(&paths.log_dir, config.log_filter()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("{} logging disabled: {}", style("Warning:").yellow().bold(), e);
            None
        }
    };

    match cli.command {
        Commands::Shell { patients, user } => cmd_shell(&config, patients, user),
        Commands::Search {
            query,
            patients,
            json,
        } => cmd_search(&config, &query, patients, json),
        Commands::Patients { patients } => cmd_patients(&config, patients),
        Commands::Config => cmd_config(&paths, &config),
    }
}

/// Load the index named by the flag, config or environment.
fn load_patients(config: &UserConfig, cli: Option<PathBuf>) -> claudent::Result<Vec<PatientRecord>> {
    let path = config
        .resolve_patients_file(cli)
        .ok_or(ClaudentError::NoPatientIndex)?;
    patient::load_index_file(&path)
}

/// Shell command implementation
fn cmd_shell(
    config: &UserConfig,
    patients: Option<PathBuf>,
    user: Option<String>,
) -> claudent::Result<()> {
    // The shell also runs without an index; search then finds nothing
    let patients_file = config.resolve_patients_file(patients);
    let records = match &patients_file {
        Some(path) => patient::load_index_file(path)?,
        None => {
            tracing::warn!("no patient index configured");
            Vec::new()
        }
    };
    let index = PatientIndex::new(records)?;

    let user = config
        .resolve_user_email(user)
        .map(|email| CurrentUser::new(email).with_role(config.user_role()));
    let session = LocalSession::new(user);

    let options = ShellOptions {
        patients_file,
        sidebar_breakpoint: config.sidebar_breakpoint(),
        tick_rate: config.tick_rate(),
    };

    let start = Instant::now();
    let width = crossterm::terminal::size().map(|(w, _)| w).unwrap_or(80);
    let mut app = App::new(index, Box::new(session), options, width);

    tui::run(&mut app)?;

    let farewell = if app.session.current_user().is_none() {
        "Sesión cerrada"
    } else {
        "Hasta luego"
    };
    println!(
        "{} {} ({})",
        style("✓").green().bold(),
        farewell,
        style(HumanDuration(start.elapsed())).cyan()
    );
    Ok(())
}

/// Search command implementation
fn cmd_search(
    config: &UserConfig,
    query: &str,
    patients: Option<PathBuf>,
    json: bool,
) -> claudent::Result<()> {
    // An empty query has nothing to show, not even the empty marker or `[]`
    if query.is_empty() {
        return Ok(());
    }

    let records = load_patients(config, patients)?;

    if json {
        if let Some(out) = matches_json(query, &records)? {
            println!("{}", out);
        }
        return Ok(());
    }

    let matches = match_patients(query, &records);

    println!(
        "{} Buscando '{}' en {} pacientes:",
        style("→").cyan().bold(),
        style(query).yellow(),
        records.len()
    );
    println!();

    if matches.is_empty() {
        println!("  {}", style(tui::ui::NO_RESULTS).dim());
        return Ok(());
    }

    for (i, patient) in matches.iter().enumerate() {
        print_patient(i, patient);
    }

    Ok(())
}

/// Matches as pretty JSON; nothing at all for an empty query.
fn matches_json(query: &str, records: &[PatientRecord]) -> claudent::Result<Option<String>> {
    if query.is_empty() {
        return Ok(None);
    }
    let matches = match_patients(query, records);
    Ok(Some(serde_json::to_string_pretty(&matches)?))
}

/// Patients command implementation
fn cmd_patients(config: &UserConfig, patients: Option<PathBuf>) -> claudent::Result<()> {
    let records = load_patients(config, patients)?;

    println!(
        "{} {} pacientes",
        style("→").cyan().bold(),
        style(records.len()).green()
    );
    println!();

    for (i, patient) in records.iter().enumerate() {
        print_patient(i, patient);
    }

    Ok(())
}

fn print_patient(i: usize, patient: &PatientRecord) {
    let curp = patient.identity_code.as_deref().unwrap_or("Sin CURP");
    println!(
        "  {} {} {}",
        style(format!("{:3}.", i + 1)).dim(),
        style(patient.display_name()).cyan(),
        style(curp).dim()
    );
    println!("      {} /pacientes/{}", style("→").dim(), patient.id);
}

/// Config command implementation
fn cmd_config(paths: &Paths, config: &UserConfig) -> claudent::Result<()> {
    let show = |value: Option<String>| value.unwrap_or_else(|| "(sin definir)".to_string());

    println!("{} Configuración", style("→").cyan().bold());
    println!();
    println!("  {} {}", style("Archivo:").bold(), paths.config_file.display());
    println!("  {} {}", style("Logs:").bold(), logging::log_path(&paths.log_dir).display());
    println!();
    println!(
        "  {} {}",
        style("Pacientes:").bold(),
        show(config.resolve_patients_file(None).map(|p| p.display().to_string()))
    );
    println!(
        "  {} {}",
        style("Usuario:").bold(),
        show(config.resolve_user_email(None))
    );
    println!("  {} {}", style("Rol:").bold(), config.user_role());
    println!(
        "  {} {} columnas",
        style("Menú lateral:").bold(),
        config.sidebar_breakpoint()
    );
    println!(
        "  {} {} ms",
        style("Tick:").bold(),
        config.tick_rate().as_millis()
    );
    println!("  {} {}", style("Log:").bold(), config.log_filter());

    Ok(())
}
