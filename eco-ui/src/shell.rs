//! Line-oriented interactive planner.
//!
//! Reads one command per line and drives a [`PlannerApp`]. Problems with a
//! command (unknown plan id, storage failure) are reported and the session
//! carries on; only I/O errors on the terminal itself end it.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::app::{PlannerApp, SAVE_ACKNOWLEDGEMENT};
use crate::render::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::utils::{format_currency, parse_expense_spec, parse_plan_id};

const PROMPT: &str = "eco> ";

const HELP: &str = "\
Commands:
  name <text>                      set the plan name
  income <amount>                  set the income
  add [category:amount[:tag]]      add an expense row (blank when no argument)
  edit <row> category:amount[:tag] replace an expense row
  remove <row>                     remove an expense row (numbered as in `rows`)
  rows                             show the expense rows
  calc                             calculate and show the summary
  save                             save the plan
  clear                            reset the form
  list                             show saved plans
  load <id>                        load a saved plan
  delete <id>                      delete a saved plan
  svg <file>                       write the chart as SVG
  help                             show this help
  quit                             leave the planner";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Prints the summary followed by the chart legend.
pub fn write_report<W: Write>(
    out: &mut W,
    app: &PlannerApp,
) -> std::io::Result<()> {
    writeln!(out, "{}", app.summary())?;
    writeln!(out, "Breakdown:")?;
    for line in app.chart().legend_text().lines() {
        writeln!(out, "  {line}")?;
    }
    Ok(())
}

/// Writes the current chart to `path` as an SVG document.
pub fn export_svg(
    app: &PlannerApp,
    path: &Path,
) -> Result<()> {
    let svg = app.chart().to_svg(DEFAULT_WIDTH, DEFAULT_HEIGHT);
    std::fs::write(path, svg).with_context(|| format!("failed to write '{}'", path.display()))
}

/// Runs the planner until `quit` or end of input.
pub async fn run<R: BufRead, W: Write>(
    app: &mut PlannerApp,
    input: R,
    mut out: W,
) -> Result<()> {
    writeln!(out, "Eco budget planner. Type `help` for commands.")?;
    write!(out, "{PROMPT}")?;
    out.flush()?;

    for line in input.lines() {
        let line = line.context("failed to read command")?;
        if execute(app, line.trim(), &mut out).await? == Flow::Quit {
            return Ok(());
        }
        write!(out, "{PROMPT}")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

async fn execute<W: Write>(
    app: &mut PlannerApp,
    line: &str,
    out: &mut W,
) -> Result<Flow> {
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "name" => {
            app.set_name(arg);
            writeln!(out, "Plan name set.")?;
        }
        "income" => {
            app.set_income(arg);
            writeln!(out, "Income: {}", format_currency(app.form().income))?;
        }
        "add" => {
            let index = if arg.is_empty() {
                app.add_expense_row()
            } else {
                app.add_expense(parse_expense_spec(arg))
            };
            writeln!(out, "Row {} set.", index + 1)?;
        }
        "edit" => {
            let target = arg
                .split_once(char::is_whitespace)
                .and_then(|(row, spec)| Some((row_index(row)?, spec.trim())));
            match target {
                Some((index, spec)) if !spec.is_empty() => {
                    if app.edit_expense_row(index, parse_expense_spec(spec)) {
                        writeln!(out, "Row {} set.", index + 1)?;
                    } else {
                        writeln!(out, "No row {}.", index + 1)?;
                    }
                }
                _ => writeln!(out, "usage: edit <row> category:amount[:tag]")?,
            }
        }
        "remove" => match row_index(arg) {
            Some(index) => match app.remove_expense_row(index) {
                Some(_) => writeln!(out, "Row {} removed.", index + 1)?,
                None => writeln!(out, "Cannot remove row {}.", index + 1)?,
            },
            None => writeln!(out, "usage: remove <row>")?,
        },
        "rows" => {
            for (i, row) in app.form().rows().iter().enumerate() {
                writeln!(
                    out,
                    "{:>3}. {} — {} ({})",
                    i + 1,
                    row.reported_category(),
                    format_currency(row.amount),
                    row.tag
                )?;
            }
        }
        "calc" => {
            app.calculate();
            write_report(out, app)?;
        }
        "save" => match app.save_plan().await {
            Ok(plan) => writeln!(out, "{SAVE_ACKNOWLEDGEMENT} (id {})", plan.id)?,
            Err(e) => report_error(out, &e)?,
        },
        "clear" => {
            app.clear_form();
            writeln!(out, "Form cleared.")?;
        }
        "list" => match app.saved_plans().await {
            Ok(plans) if plans.is_empty() => writeln!(out, "No saved plans.")?,
            Ok(plans) => {
                for plan in plans {
                    writeln!(out, "{:>15}  {}", plan.id, plan.label)?;
                }
            }
            Err(e) => report_error(out, &e)?,
        },
        "load" => match parse_plan_id(arg) {
            Some(id) => match app.load_plan(id).await {
                Ok(true) => write_report(out, app)?,
                Ok(false) => writeln!(out, "No plan with id {id}.")?,
                Err(e) => report_error(out, &e)?,
            },
            None => writeln!(out, "usage: load <id>")?,
        },
        "delete" => match parse_plan_id(arg) {
            Some(id) => match app.delete_plan(id).await {
                Ok(true) => writeln!(out, "Plan {id} deleted.")?,
                Ok(false) => writeln!(out, "No plan with id {id}.")?,
                Err(e) => report_error(out, &e)?,
            },
            None => writeln!(out, "usage: delete <id>")?,
        },
        "svg" => {
            if arg.is_empty() {
                writeln!(out, "usage: svg <file>")?;
            } else if let Err(e) = export_svg(app, Path::new(arg)) {
                writeln!(out, "error: {e:#}")?;
            } else {
                writeln!(out, "Chart written to {arg}.")?;
            }
        }
        "help" => writeln!(out, "{HELP}")?,
        "quit" | "exit" => return Ok(Flow::Quit),
        other => writeln!(out, "Unknown command '{other}'. Type `help` for commands.")?,
    }
    Ok(Flow::Continue)
}

/// Zero-based index of a row numbered from 1 as in `rows`.
fn row_index(text: &str) -> Option<usize> {
    text.parse::<usize>().ok()?.checked_sub(1)
}

fn report_error<W: Write>(
    out: &mut W,
    error: &dyn std::error::Error,
) -> std::io::Result<()> {
    warn!(%error, "planner command failed");
    writeln!(out, "error: {error}")
}
