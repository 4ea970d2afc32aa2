use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::application::{AppError, TrackerService};
use crate::domain::{Expense, format_amount, parse_amount_or_zero};
use crate::io::ImportResult;

mod menu;

pub use menu::MenuCommand;

/// Tally - Interactive Expense Tracker
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Track expenses against a budget limit, with CSV export/import and reports")]
#[command(version)]
pub struct Cli {
    /// Budget limit (prompted for when omitted)
    #[arg(short, long)]
    pub limit: Option<String>,

    /// Directory where expenses.csv and financial_report.txt are written
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut session = Session::new(stdin.lock(), stdout.lock());
        session.start(self.limit.as_deref(), self.output_dir)
    }
}

/// Whether the menu loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// One interactive session: reads answers from `input`, writes prompts and
/// results to `out`.
pub struct Session<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Ask for the budget limit (unless given), then run the menu until the
    /// user exits or input ends.
    pub fn start(&mut self, limit: Option<&str>, output_dir: PathBuf) -> Result<()> {
        let limit_input = match limit {
            Some(limit) => limit.to_string(),
            None => match self.prompt("Enter your budget limit: ")? {
                Some(line) => line,
                None => return Ok(()),
            },
        };
        let limit = self.read_amount(&limit_input)?;

        let mut service = TrackerService::new(limit).with_output_dir(output_dir);
        self.run_menu(&mut service)
    }

    pub fn run_menu(&mut self, service: &mut TrackerService) -> Result<()> {
        loop {
            writeln!(self.out)?;
            for command in MenuCommand::ALL {
                writeln!(self.out, "{}. {}", command.number(), command.label())?;
            }

            let Some(choice) = self.prompt("\nEnter your choice: ")? else {
                break;
            };

            let control = match MenuCommand::parse(&choice) {
                Some(command) => self.dispatch(service, command)?,
                None => {
                    writeln!(self.out, "Invalid choice. Please try again.")?;
                    LoopControl::Continue
                }
            };

            if control == LoopControl::Exit {
                break;
            }
        }
        Ok(())
    }

    pub fn dispatch(
        &mut self,
        service: &mut TrackerService,
        command: MenuCommand,
    ) -> Result<LoopControl> {
        match command {
            MenuCommand::AddExpense => self.add_expense(service),
            MenuCommand::ViewExpenses => self.view_expenses(service),
            MenuCommand::FilterByCategory => self.filter_by_category(service),
            MenuCommand::ViewRemaining => self.view_remaining(service),
            MenuCommand::GenerateReport => self.generate_report(service),
            MenuCommand::ExportCsv => self.export_csv(service),
            MenuCommand::ImportCsv => self.import_csv(service),
            MenuCommand::Exit => {
                writeln!(self.out, "Exiting...")?;
                Ok(LoopControl::Exit)
            }
        }
    }

    fn add_expense(&mut self, service: &mut TrackerService) -> Result<LoopControl> {
        let Some(name) = self.prompt("\nEnter expense name: ")? else {
            return Ok(LoopControl::Exit);
        };
        let Some(price) = self.prompt("Enter expense amount: ")? else {
            return Ok(LoopControl::Exit);
        };
        let Some(category) = self.prompt("Enter expense category: ")? else {
            return Ok(LoopControl::Exit);
        };

        let price = self.read_amount(&price)?;
        service.add_expense(name, price, category);
        writeln!(self.out, "Expense added successfully!")?;
        Ok(LoopControl::Continue)
    }

    fn view_expenses(&mut self, service: &TrackerService) -> Result<LoopControl> {
        match service.list_expenses() {
            Ok(expenses) => {
                writeln!(self.out, "\nExpenses:")?;
                self.print_expenses(expenses.iter())?;
            }
            Err(err) => self.report_error(err)?,
        }
        Ok(LoopControl::Continue)
    }

    fn filter_by_category(&mut self, service: &TrackerService) -> Result<LoopControl> {
        if service.ledger().is_empty() {
            self.report_error(AppError::NoExpenses)?;
            return Ok(LoopControl::Continue);
        }

        let Some(category) = self.prompt("Enter category to filter expenses: ")? else {
            return Ok(LoopControl::Exit);
        };

        match service.filter_by_category(&category) {
            Ok(filtered) if filtered.is_empty() => {
                writeln!(self.out, "No expenses found in the specified category.")?;
            }
            Ok(filtered) => {
                writeln!(self.out, "\nFiltered Expenses:")?;
                self.print_expenses(filtered.into_iter())?;
            }
            Err(err) => self.report_error(err)?,
        }
        Ok(LoopControl::Continue)
    }

    fn view_remaining(&mut self, service: &TrackerService) -> Result<LoopControl> {
        writeln!(
            self.out,
            "\nRemaining Budget: ${}",
            format_amount(service.remaining())
        )?;
        Ok(LoopControl::Continue)
    }

    fn generate_report(&mut self, service: &TrackerService) -> Result<LoopControl> {
        match service.write_report() {
            Ok(_) => writeln!(self.out, "Financial report generated successfully!")?,
            Err(err) => self.report_error(err)?,
        }
        Ok(LoopControl::Continue)
    }

    fn export_csv(&mut self, service: &TrackerService) -> Result<LoopControl> {
        match service.export_csv() {
            Ok(_) => writeln!(self.out, "Expenses exported to CSV successfully!")?,
            Err(err) => self.report_error(err)?,
        }
        Ok(LoopControl::Continue)
    }

    fn import_csv(&mut self, service: &mut TrackerService) -> Result<LoopControl> {
        let Some(path) = self.prompt("Enter the path of the CSV file: ")? else {
            return Ok(LoopControl::Exit);
        };

        match service.import_csv(&path) {
            Ok(result) => {
                self.print_import_result(&result)?;
                writeln!(self.out, "Expenses imported from CSV successfully!")?;
            }
            Err(err) => self.report_error(err)?,
        }
        Ok(LoopControl::Continue)
    }

    fn print_expenses<'e>(&mut self, expenses: impl Iterator<Item = &'e Expense>) -> Result<()> {
        for expense in expenses {
            writeln!(self.out, "{}", expense)?;
        }
        Ok(())
    }

    fn print_import_result(&mut self, result: &ImportResult) -> Result<()> {
        for problem in result.errors.iter().chain(&result.warnings) {
            writeln!(self.out, "  line {}: {}", problem.line, problem.error)?;
        }
        writeln!(
            self.out,
            "Imported {} expense(s), skipped {}.",
            result.imported, result.skipped
        )?;
        Ok(())
    }

    /// Session-level failures are shown to the user and never end the loop.
    fn report_error(&mut self, err: AppError) -> Result<()> {
        tracing::debug!(error = %err, "command failed");
        writeln!(self.out, "{}", err)?;
        Ok(())
    }

    /// Parse a user-entered amount, telling the user when it fell back to zero.
    fn read_amount(&mut self, input: &str) -> Result<f64> {
        let parsed = parse_amount_or_zero(input);
        if let Some(err) = parsed.warning {
            writeln!(self.out, "Error parsing amount ({}), using 0.00", err)?;
        }
        Ok(parsed.value)
    }

    /// Print `message` and read one line. Returns `None` at end of input.
    /// Bytes that are not valid UTF-8 are replaced, never rejected.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.out, "{}", message)?;
        self.out.flush()?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
