//! Command-line front end for the agent commission tool

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

use agent_commission::config::{Config, FileConfig};
use agent_commission::session::Session;
use agent_commission::{constants, display, workbook};

#[derive(Parser, Debug)]
#[command(name = "agent-commission")]
#[command(about = "Commission reports from sales agent worksheets")]
struct Args {
    /// Config file path
    #[arg(long, default_value = constants::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Output directory for exported reports (overrides config.toml)
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the worksheet with computed commissions and totals
    Show {
        /// Excel (.xlsx, .xls) or CSV worksheet
        file: PathBuf,
    },

    /// List every column of the worksheet and which ones are displayed
    Headers {
        /// Excel (.xlsx, .xls) or CSV worksheet
        file: PathBuf,
    },

    /// Export the commission report
    Export {
        /// Excel (.xlsx, .xls) or CSV worksheet
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Xlsx)]
        format: ExportFormat,

        /// Row number (as shown by `show`) to delete before exporting; repeatable
        #[arg(long = "delete", value_name = "ROW")]
        delete: Vec<usize>,

        /// Delete rows without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExportFormat {
    /// Styled Excel report with a total row
    Xlsx,
    /// Report as CSV with formatted amounts
    Csv,
    /// All columns of every row as JSON records
    Json,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let file_config = FileConfig::load_or_default(&args.config)?;
    let config = Config::from_file(&file_config, args.output_dir);

    match args.command {
        Command::Show { file } => {
            let session = read_session(&file)?;
            print_table(&session);
            Ok(())
        }
        Command::Headers { file } => {
            let session = read_session(&file)?;
            print_headers(&session);
            Ok(())
        }
        Command::Export {
            file,
            format,
            delete,
            yes,
        } => {
            let mut session = read_session(&file)?;
            delete_rows(&mut session, &delete, yes)?;
            export_report(&session, &config, format)
        }
    }
}

/// Read a worksheet into a fresh session
fn read_session(file: &Path) -> Result<Session> {
    let mut session = Session::new();
    session
        .read(file)
        .with_context(|| "Could not read the file. Make sure it is a valid Excel workbook.")?;
    Ok(session)
}

/// Print the displayed columns and the commission summary
fn print_table(session: &Session) {
    if session.table().is_empty() {
        println!("No data rows found in sheet '{}'.", session.sheet_name());
        return;
    }

    println!("{}", display::render_table(session.sheet()));
    print_summary(session);
}

fn print_summary(session: &Session) {
    println!("\n============================================================");
    println!("                  COMMISSION SUMMARY");
    println!("============================================================\n");
    if let Some(source) = session.source() {
        println!("  File:               {}", source.display());
    }
    println!("  Sheet:              {}", session.sheet_name());
    println!("  Rows:               {}", session.table().len());
    println!(
        "  Earned commission:  {:>14}",
        display::format_currency(session.total_earned())
    );
    println!(
        "  Adjusted (/{}):     {:>14}",
        constants::ADJUSTMENT_DIVISOR,
        display::format_currency(session.total_adjusted())
    );
    println!("============================================================");
}

fn print_headers(session: &Session) {
    println!("Sheet: {}\n", session.sheet_name());
    for header in session.all_headers() {
        let marker = if session.projection().contains(header) {
            "*"
        } else {
            " "
        };
        println!("  {} {}", marker, header);
    }
    for derived in constants::DERIVED_HEADERS {
        if !session.all_headers().iter().any(|h| h == derived) {
            println!("  * {} (computed)", derived);
        }
    }
    println!("\n* = displayed and exported");
}

/// Ask the user to confirm a deletion on stdin
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sí"))
}

/// Delete rows by their displayed 1-based number.
///
/// Highest numbers go first so the remaining numbers still match what the
/// user saw.
fn delete_rows(session: &mut Session, rows: &[usize], assume_yes: bool) -> Result<()> {
    let mut rows = rows.to_vec();
    rows.sort_unstable_by(|a, b| b.cmp(a));
    rows.dedup();

    for row in rows {
        let Some(index) = row.checked_sub(1) else {
            anyhow::bail!("Row numbers start at 1");
        };
        if !assume_yes && !confirm(&format!("Are you sure you want to delete row {}?", row))? {
            println!("Kept row {}", row);
            continue;
        }
        session
            .delete_row(index)
            .with_context(|| format!("Cannot delete row {}", row))?;
        println!("Deleted row {}", row);
    }

    Ok(())
}

fn export_report(session: &Session, config: &Config, format: ExportFormat) -> Result<()> {
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;

    let today = chrono::Local::now().date_naive();
    let path = match format {
        ExportFormat::Xlsx => {
            let report = session.report(config, today);
            let path = workbook::output_path(&config.output_dir, &report.file_name, "xlsx");
            workbook::write_xlsx(&report, &path)?;
            path
        }
        ExportFormat::Csv => {
            let report = session.report(config, today);
            let path = workbook::output_path(&config.output_dir, &report.file_name, "csv");
            workbook::write_report_csv(&report, &path)?;
            path
        }
        ExportFormat::Json => {
            let path = config
                .output_dir
                .join(workbook::sanitize_file_name(&config.json_file_name));
            workbook::write_json(session.table(), &path)?;
            path
        }
    };

    println!("  Generated: {}", path.display());
    print_summary(session);
    Ok(())
}
