use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use uuid::Uuid;

use crate::application::{LedgerStore, MonthSummary, ReportOptions};
use crate::domain::{
    CATEGORY_SUGGESTIONS, FlowType, GateState, MonthKey, Theme, Transaction, format_decimal,
};
use crate::storage::Repository;

/// CashTrack - daily cash book for small businesses
#[derive(Parser)]
#[command(name = "cashtrack")]
#[command(about = "Record daily cash inflows and outflows and export monthly reports")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "CASHTRACK_DB", default_value = "cashtrack.db")]
    pub database: String,

    /// Currency symbol printed before amounts
    #[arg(long, env = "CASHTRACK_CURRENCY", default_value = "₦")]
    pub currency_symbol: String,

    /// Date format for report rows (strftime syntax)
    #[arg(long, env = "CASHTRACK_DATE_FORMAT", default_value = "%-m/%-d/%Y")]
    pub date_format: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Sign in on this device (no password, local only)
    Login {
        /// Email address
        email: String,
    },

    /// Sign out; ledger data is kept
    Logout,

    /// Show login, profile and theme state
    Status,

    /// Business profile commands
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Record a cash inflow or outflow
    Add {
        /// Amount (e.g. "500" or "12.50")
        amount: String,

        /// Transaction type: inflow, outflow
        #[arg(short = 't', long = "type", default_value = "inflow")]
        flow: String,

        /// Short note, e.g. "Sale" or "Restock"
        #[arg(short, long)]
        note: Option<String>,

        /// Date of the transaction (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },

    /// List transactions for a month, newest first
    History {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Inflow, outflow and net profit for a month
    Summary {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = SummaryFormat::Table)]
        format: SummaryFormat,
    },

    /// Export the monthly report as a text file
    Report {
        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Output file or directory (defaults to Report_<month>.txt in the current directory)
        #[arg(short, long)]
        output: Option<String>,

        /// Print the report instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Show or change the UI theme
    Theme {
        /// light or dark (omit to show the current theme)
        theme: Option<String>,

        /// Switch to the other theme
        #[arg(long, conflicts_with = "theme")]
        toggle: bool,
    },

    /// Delete all stored data
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Create or replace the business profile
    Set {
        /// Business name
        name: String,

        /// Business category (see `profile categories`; any text is accepted)
        #[arg(short, long, default_value = "Other")]
        category: String,
    },

    /// Show the business profile
    Show,

    /// List suggested business categories
    Categories,
}

impl Cli {
    fn report_options(&self) -> ReportOptions {
        ReportOptions {
            currency_symbol: self.currency_symbol.clone(),
            date_format: self.date_format.clone(),
        }
    }

    pub async fn run(self) -> Result<()> {
        let options = self.report_options();

        match self.command {
            Commands::Init => {
                Repository::init_path(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Login { email } => {
                let mut ledger = open_ledger(&self.database).await?;
                let session = ledger.login(&email).await?;
                println!("Logged in as {}", session.email);
                if ledger.profile().is_none() {
                    println!("Next: set up your business with `cashtrack profile set <name>`");
                }
            }

            Commands::Logout => {
                let mut ledger = open_ledger(&self.database).await?;
                ledger.logout().await?;
                println!("Logged out");
            }

            Commands::Status => {
                let ledger = open_ledger(&self.database).await?;
                run_status_command(&ledger);
            }

            Commands::Profile(profile_cmd) => {
                let mut ledger = open_ledger(&self.database).await?;
                run_profile_command(&mut ledger, profile_cmd).await?;
            }

            Commands::Add {
                amount,
                flow,
                note,
                date,
            } => {
                let mut ledger = open_ledger(&self.database).await?;
                require_ready(&ledger)?;
                let flow: FlowType = flow.parse().map_err(|e| {
                    anyhow::anyhow!("{}. Valid types: inflow, outflow", e)
                })?;

                let transaction = match date {
                    Some(date_str) => {
                        let date = parse_date(&date_str).with_context(|| {
                            format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str)
                        })?;
                        ledger
                            .add_transaction_at(&amount, note.as_deref(), flow, date)
                            .await?
                    }
                    None => ledger.add_transaction(&amount, note.as_deref(), flow).await?,
                };

                println!(
                    "Recorded {}: {}{} ({})",
                    transaction.flow,
                    options.currency_symbol,
                    transaction.amount,
                    transaction.id
                );
            }

            Commands::Delete { id } => {
                let mut ledger = open_ledger(&self.database).await?;
                require_ready(&ledger)?;
                let id = Uuid::parse_str(&id)
                    .context("Invalid transaction ID format (expected UUID)")?;

                match ledger.delete_transaction(id).await? {
                    Some(removed) => println!(
                        "Deleted {} of {}{}",
                        removed.flow, options.currency_symbol, removed.amount
                    ),
                    None => println!("No transaction with ID {}; nothing to delete", id),
                }
            }

            Commands::History { month } => {
                let ledger = open_ledger(&self.database).await?;
                require_ready(&ledger)?;
                let month = parse_month(month)?;
                print_history(&ledger.filter_by_month(month), month, &options);
            }

            Commands::Summary { month, format } => {
                let ledger = open_ledger(&self.database).await?;
                require_ready(&ledger)?;
                let month = parse_month(month)?;
                let summary = ledger.month_summary(month);

                match format {
                    SummaryFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&summary_json(&summary))?)
                    }
                    SummaryFormat::Table => print_summary(&summary, &options),
                }
            }

            Commands::Report {
                month,
                output,
                stdout,
            } => {
                options.validate().map_err(anyhow::Error::msg)?;
                let ledger = open_ledger(&self.database).await?;
                require_ready(&ledger)?;
                let month = parse_month(month)?;
                let report = ledger.report(month, &options);

                if stdout {
                    println!("{}", report.contents);
                } else {
                    let path = report_path(output.as_deref(), &report.filename);
                    std::fs::write(&path, report.as_bytes()).with_context(|| {
                        format!("Failed to write report: {}", path.display())
                    })?;
                    println!(
                        "Saved {} ({} transactions)",
                        path.display(),
                        report.row_count()
                    );
                }
            }

            Commands::Theme { theme, toggle } => {
                let mut ledger = open_ledger(&self.database).await?;
                let next = match (theme, toggle) {
                    (Some(name), _) => Some(name.parse::<Theme>().map_err(anyhow::Error::msg)?),
                    (None, true) => Some(ledger.theme().toggled()),
                    (None, false) => None,
                };

                if let Some(theme) = next {
                    ledger.set_theme(theme).await?;
                }
                println!("Theme: {}", ledger.theme());
            }

            Commands::Reset { yes } => {
                if !yes {
                    bail!("This deletes the profile and every transaction. Re-run with --yes to confirm");
                }
                let mut ledger = open_ledger(&self.database).await?;
                ledger.reset().await?;
                println!("All data cleared");
            }
        }

        Ok(())
    }
}

async fn open_ledger(database: &str) -> Result<LedgerStore<Repository>> {
    let repo = Repository::connect_path(database)
        .await
        .with_context(|| format!("Cannot open {}. Run `cashtrack init` first", database))?;
    debug!(database, "opened database");
    Ok(LedgerStore::initialize(repo).await?)
}

async fn run_profile_command(
    ledger: &mut LedgerStore<Repository>,
    cmd: ProfileCommands,
) -> Result<()> {
    match cmd {
        ProfileCommands::Set { name, category } => {
            if ledger.session().is_none() {
                bail!("Not logged in. Run `cashtrack login <email>` first");
            }
            let profile = ledger.set_profile(&name, &category).await?;
            println!("Saved profile: {} ({})", profile.name, profile.category);
        }

        ProfileCommands::Show => match ledger.profile() {
            Some(profile) => {
                println!("Business: {}", profile.name);
                println!("Category: {}", profile.category);
            }
            None => println!("No business profile set."),
        },

        ProfileCommands::Categories => {
            for category in CATEGORY_SUGGESTIONS {
                println!("{}", category);
            }
        }
    }
    Ok(())
}

fn run_status_command(ledger: &LedgerStore<Repository>) {
    let state = ledger.gate_state();
    println!("State:        {}", state);
    match ledger.session() {
        Some(session) => println!("Logged in as: {}", session.email),
        None => println!("Logged in as: -"),
    }
    match ledger.profile() {
        Some(profile) => println!("Business:     {} ({})", profile.name, profile.category),
        None => println!("Business:     -"),
    }
    println!("Theme:        {}", ledger.theme());
    println!("Transactions: {}", ledger.transactions().len());

    match state {
        GateState::Unauthenticated => println!("\nNext: cashtrack login <email>"),
        GateState::NeedsProfile => println!("\nNext: cashtrack profile set <name>"),
        GateState::Ready => {}
    }
}

/// Ledger commands are only available once login and profile setup are done.
fn require_ready<S>(ledger: &LedgerStore<S>) -> Result<()>
where
    S: crate::storage::KeyValueStore,
{
    match ledger.gate_state() {
        GateState::Ready => Ok(()),
        GateState::Unauthenticated => bail!("Not logged in. Run `cashtrack login <email>` first"),
        GateState::NeedsProfile => {
            bail!("No business profile yet. Run `cashtrack profile set <name>` first")
        }
    }
}

fn print_history(transactions: &[Transaction], month: MonthKey, options: &ReportOptions) {
    if transactions.is_empty() {
        println!("No transactions in {}.", month);
        return;
    }

    println!(
        "{:<36}  {:<10}  {:<8}  {:<24}  {:>12}",
        "ID", "DATE", "TYPE", "NOTE", "AMOUNT"
    );
    println!("{}", "-".repeat(98));
    for t in transactions {
        let sign = if t.is_inflow() { "+" } else { "-" };
        println!(
            "{:<36}  {:<10}  {:<8}  {:<24}  {:>12}",
            t.id,
            t.date.format("%Y-%m-%d"),
            t.flow,
            truncate(t.note.as_deref().unwrap_or("Cash Entry"), 24),
            format!("{} {}{}", sign, options.currency_symbol, t.amount)
        );
    }
}

fn print_summary(summary: &MonthSummary, options: &ReportOptions) {
    let symbol = &options.currency_symbol;
    println!("Summary for {}", summary.month);
    println!();
    println!(
        "  Inflow:      {}{}",
        symbol,
        format_decimal(summary.totals.total_inflow)
    );
    println!(
        "  Outflow:     {}{}",
        symbol,
        format_decimal(summary.totals.total_outflow)
    );
    println!(
        "  Net profit:  {}{}",
        symbol,
        format_decimal(summary.totals.net_profit)
    );
    println!("  Balance:     {}{}", symbol, format_decimal(summary.balance));
    println!("  Entries:     {}", summary.transactions.len());
}

fn summary_json(summary: &MonthSummary) -> serde_json::Value {
    serde_json::json!({
        "month": summary.month.to_string(),
        "total_inflow": format_decimal(summary.totals.total_inflow),
        "total_outflow": format_decimal(summary.totals.total_outflow),
        "net_profit": format_decimal(summary.totals.net_profit),
        "balance": format_decimal(summary.balance),
        "count": summary.transactions.len(),
    })
}

/// Resolve where a report goes: an existing directory gets the default file name inside it.
fn report_path(output: Option<&str>, filename: &str) -> PathBuf {
    match output {
        Some(path) if Path::new(path).is_dir() => Path::new(path).join(filename),
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(filename),
    }
}

fn parse_month(month: Option<String>) -> Result<MonthKey> {
    match month {
        Some(s) => Ok(s.parse::<MonthKey>()?),
        None => Ok(MonthKey::current()),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    // Parse YYYY-MM-DD format
    let naive_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .context("Date must be in YYYY-MM-DD format")?;

    // Midnight UTC
    Ok(naive_date.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-05-03").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-05-03T00:00:00+00:00");
        assert!(parse_date("03/05/2024").is_err());
    }

    #[test]
    fn test_parse_month_defaults_to_current() {
        assert_eq!(parse_month(None).unwrap(), MonthKey::current());
        assert_eq!(
            parse_month(Some("2024-05".into())).unwrap().to_string(),
            "2024-05"
        );
        assert!(parse_month(Some("May".into())).is_err());
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Sale", 10), "Sale");
        assert_eq!(truncate("₦₦₦₦₦₦₦₦₦₦₦₦", 6), "₦₦₦...");
    }

    #[test]
    fn test_report_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().to_str().unwrap();

        assert_eq!(
            report_path(Some(dir), "Report_2024-05.txt"),
            temp.path().join("Report_2024-05.txt")
        );
        assert_eq!(
            report_path(Some("out.txt"), "Report_2024-05.txt"),
            PathBuf::from("out.txt")
        );
        assert_eq!(
            report_path(None, "Report_2024-05.txt"),
            PathBuf::from("Report_2024-05.txt")
        );
    }

    #[test]
    fn test_summary_format_is_checked() {
        let cli = Cli::try_parse_from(["cashtrack", "summary", "--format", "json"]).unwrap();
        match cli.command {
            Commands::Summary { format, .. } => assert_eq!(format, SummaryFormat::Json),
            _ => panic!("expected summary command"),
        }

        let cli = Cli::try_parse_from(["cashtrack", "summary"]).unwrap();
        match cli.command {
            Commands::Summary { format, .. } => assert_eq!(format, SummaryFormat::Table),
            _ => panic!("expected summary command"),
        }

        assert!(Cli::try_parse_from(["cashtrack", "summary", "--format", "xml"]).is_err());
    }

    fn cli_with_date_format(database: &str, date_format: &str, args: &[&str]) -> Cli {
        let mut argv = vec![
            "cashtrack",
            "--database",
            database,
            "--date-format",
            date_format,
        ];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn test_bad_date_format_only_blocks_report() -> Result<()> {
        let temp = tempfile::TempDir::new()?;
        let db_path = temp.path().join("cli.db");
        let db = db_path.to_str().unwrap();

        for args in [
            &["init"][..],
            &["login", "owner@example.com"][..],
            &["profile", "set", "Kiosk"][..],
            &["theme", "dark"][..],
            &["add", "500", "--date", "2024-05-03"][..],
            &["summary", "--month", "2024-05"][..],
        ] {
            cli_with_date_format(db, "%Q", args).run().await?;
        }

        let err = cli_with_date_format(db, "%Q", &["report", "--month", "2024-05", "--stdout"])
            .run()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid date format"));

        cli_with_date_format(db, "%Y-%m-%d", &["report", "--month", "2024-05", "--stdout"])
            .run()
            .await?;
        Ok(())
    }

    #[test]
    fn test_cli_parses_add() {
        let cli = Cli::try_parse_from([
            "cashtrack", "add", "500", "--type", "outflow", "--note", "Restock",
        ])
        .unwrap();
        match cli.command {
            Commands::Add { amount, flow, note, date } => {
                assert_eq!(amount, "500");
                assert_eq!(flow, "outflow");
                assert_eq!(note.as_deref(), Some("Restock"));
                assert!(date.is_none());
            }
            _ => panic!("expected add command"),
        }
    }
}
