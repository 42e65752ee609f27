use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use eco_core::calculations::Aggregator;
use eco_ui::app::{self, PlannerApp, SAVE_ACKNOWLEDGEMENT};
use eco_ui::config::{ConfigOverrides, PlannerConfig};
use eco_ui::{csv_loader, logging, shell, utils};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Eco budget planner.
///
/// Totals a monthly budget, scores how sustainable the spending is, and
/// keeps named plan snapshots in local storage.
#[derive(Debug, Parser)]
#[command(name = "eco-planner", version)]
struct Cli {
    /// Storage backend (`sqlite` or `memory`).
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Storage location.
    /// For SQLite this is a file path (e.g. `eco_plans.db`) or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    /// TOML config file. Defaults to `eco-planner.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `eco_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calculate a plan and print the summary.
    Calc(PlanArgs),
    /// Calculate a plan and save it.
    Save(PlanArgs),
    /// List saved plans, newest first.
    List,
    /// Load a saved plan and print its summary.
    Show { id: i64 },
    /// Delete a saved plan.
    Delete { id: i64 },
    /// Write a saved plan's chart as SVG.
    ExportSvg { id: i64, output: PathBuf },
    /// Interactive planner.
    Shell,
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Plan name ("Plan" when blank).
    #[arg(long, default_value = "")]
    name: String,

    /// Monthly income. Non-numeric input counts as 0.
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    income: String,

    /// An expense row; repeat for more rows.
    #[arg(short, long = "expense", value_name = "CATEGORY:AMOUNT[:TAG]")]
    expenses: Vec<String>,

    /// Read expense rows from a CSV file (`category,amount,tag`).
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Also write the chart to this SVG file.
    #[arg(long)]
    svg: Option<PathBuf>,
}

// ─── helpers ─────────────────────────────────────────────────────────────────

fn fill_form(
    planner: &mut PlannerApp,
    args: &PlanArgs,
) -> anyhow::Result<()> {
    planner.set_name(&args.name);
    planner.set_income(&args.income);

    if let Some(path) = &args.csv {
        let entries = csv_loader::load_from_file(path)
            .with_context(|| format!("failed to import expenses from '{}'", path.display()))?;
        planner.import_expenses(entries);
    }
    planner.import_expenses(args.expenses.iter().map(|spec| utils::parse_expense_spec(spec)));
    Ok(())
}

fn calculate_and_report<W: Write>(
    planner: &mut PlannerApp,
    args: &PlanArgs,
    out: &mut W,
) -> anyhow::Result<()> {
    fill_form(planner, args)?;
    planner.calculate();
    shell::write_report(out, planner)?;
    if let Some(path) = &args.svg {
        shell::export_svg(planner, path)?;
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = PlannerConfig::discover(cli.config.as_deref())
        .context("failed to load configuration")?
        .apply(ConfigOverrides {
            backend: cli.backend,
            database: cli.db,
            log_level: cli.log_level,
            log_file: cli.log_file,
        });

    logging::init_logging(config.log_level());
    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }

    debug!(
        backend = %config.storage.backend,
        connection = %config.storage.connection_string,
        "opening storage"
    );
    let store = app::open_plan_store(&config.storage)
        .await
        .with_context(|| format!("failed to open {} storage", config.storage.backend))?;
    let mut planner = PlannerApp::with_aggregator(store, Aggregator::new(config.scoring.clone()));

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Calc(args) => calculate_and_report(&mut planner, &args, &mut out)?,
        Command::Save(args) => {
            calculate_and_report(&mut planner, &args, &mut out)?;
            let saved = planner.save_plan().await.context("failed to save plan")?;
            writeln!(out, "{SAVE_ACKNOWLEDGEMENT} (id {})", saved.id)?;
        }
        Command::List => {
            let plans = planner.saved_plans().await.context("failed to list plans")?;
            if plans.is_empty() {
                writeln!(out, "No saved plans.")?;
            }
            for plan in plans {
                writeln!(out, "{:>15}  {}", plan.id, plan.label)?;
            }
        }
        Command::Show { id } => {
            if !planner.load_plan(id).await.context("failed to load plan")? {
                bail!("no saved plan with id {id}");
            }
            writeln!(out, "{}", planner.form().name)?;
            shell::write_report(&mut out, &planner)?;
        }
        Command::Delete { id } => {
            if planner.delete_plan(id).await.context("failed to delete plan")? {
                writeln!(out, "Plan {id} deleted.")?;
            } else {
                writeln!(out, "No plan with id {id}.")?;
            }
        }
        Command::ExportSvg { id, output } => {
            if !planner.load_plan(id).await.context("failed to load plan")? {
                bail!("no saved plan with id {id}");
            }
            shell::export_svg(&planner, &output)?;
            writeln!(out, "Chart written to {}.", output.display())?;
        }
        Command::Shell => {
            let stdin = io::stdin();
            shell::run(&mut planner, stdin.lock(), &mut out).await?;
        }
    }

    Ok(())
}
