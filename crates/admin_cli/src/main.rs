use std::{error::Error, io::Write};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Completion, Engine, MoneyCents, ReportView, RevenueNew, Role, revenue_report_columns};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "sitebooks_admin")]
#[command(about = "Admin utilities for Sitebooks (bootstrap users, ledger data, reports)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./sitebooks.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Client(Client),
    Project(Project),
    Revenue(Revenue),
    Report(Report),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RoleArg {
    Viewer,
    Editor,
    Owner,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Viewer => Role::Viewer,
            RoleArg::Editor => Role::Editor,
            RoleArg::Owner => Role::Owner,
        }
    }
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long, value_enum, default_value = "viewer")]
    role: RoleArg,
}

#[derive(Args, Debug)]
struct Client {
    #[command(subcommand)]
    command: ClientCommand,
}

#[derive(Subcommand, Debug)]
enum ClientCommand {
    Create {
        #[arg(long)]
        name: String,
    },
}

#[derive(Args, Debug)]
struct Project {
    #[command(subcommand)]
    command: ProjectCommand,
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
    Create {
        #[arg(long)]
        number: String,
        #[arg(long)]
        name: String,
        /// Client name stored on the project.
        #[arg(long)]
        client_name: Option<String>,
    },
}

#[derive(Args, Debug)]
struct Revenue {
    #[command(subcommand)]
    command: RevenueCommand,
}

#[derive(Subcommand, Debug)]
enum RevenueCommand {
    Record(RevenueRecordArgs),
}

#[derive(Args, Debug)]
struct RevenueRecordArgs {
    /// Date as `YYYY-MM-DD`.
    #[arg(long)]
    date: NaiveDate,
    /// Amount, e.g. `1250.50` (`.` or `,` as decimal separator).
    #[arg(long, allow_hyphen_values = true)]
    amount: MoneyCents,
    #[arg(long)]
    invoice_number: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    account_code: Option<String>,
    #[arg(long)]
    account_name: Option<String>,
    #[arg(long)]
    external_txn_id: Option<String>,
    #[arg(long)]
    project_id: Option<Uuid>,
    #[arg(long)]
    client_id: Option<Uuid>,
    #[arg(long)]
    split: bool,
}

#[derive(Args, Debug)]
struct Report {
    #[command(subcommand)]
    command: ReportCommand,
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Prints the revenue line items report.
    Revenues,
}

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Keeps the terminal in raw mode while alive.
struct RawTerminal;

impl RawTerminal {
    fn enable() -> CliResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawTerminal)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Effect of one key press on a masked input line.
#[derive(Debug, PartialEq, Eq)]
enum Keystroke {
    Submit,
    Abort,
    Pushed,
    Erased,
    Ignored,
}

fn apply_key(secret: &mut String, key: KeyEvent) -> Keystroke {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Keystroke::Submit,
        KeyCode::Char('c') if control => Keystroke::Abort,
        KeyCode::Char(ch) if !control => {
            secret.push(ch);
            Keystroke::Pushed
        }
        KeyCode::Backspace if secret.pop().is_some() => Keystroke::Erased,
        _ => Keystroke::Ignored,
    }
}

fn status_line(out: &mut impl Write, text: &str) -> CliResult<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(text)
    )?;
    Ok(())
}

/// Reads a line without echoing it, printing `*` per character.
fn read_masked(label: &str) -> CliResult<String> {
    let _raw = RawTerminal::enable()?;
    let mut out = std::io::stderr();
    status_line(&mut out, label)?;
    out.flush()?;

    let mut secret = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match apply_key(&mut secret, key) {
            Keystroke::Submit => {
                execute!(out, Print("\r\n"))?;
                return Ok(secret);
            }
            Keystroke::Abort => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            Keystroke::Pushed => execute!(out, Print("*"))?,
            Keystroke::Erased => {
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?
            }
            Keystroke::Ignored => {}
        }
        out.flush()?;
    }
}

const PASSWORD_ATTEMPTS: usize = 3;

/// Asks for a new password and its confirmation.
fn read_new_password() -> CliResult<String> {
    let mut out = std::io::stderr();
    for _ in 0..PASSWORD_ATTEMPTS {
        let password = read_masked("Password: ")?;
        let problem = if password.is_empty() {
            "Password must not be empty.\r\n"
        } else if read_masked("Confirm password: ")? == password {
            return Ok(password);
        } else {
            "Passwords do not match. Try again.\r\n"
        };
        status_line(&mut out, problem)?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> CliResult<DatabaseConnection> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn cell(value: Option<&Value>, kind: engine::ColumnKind) -> String {
    match (value, kind) {
        (Some(Value::Number(n)), engine::ColumnKind::Currency) => n
            .as_i64()
            .map(|cents| MoneyCents::new(cents).to_string())
            .unwrap_or_default(),
        (Some(Value::String(s)), _) => s.clone(),
        (Some(Value::Null) | None, _) => String::new(),
        (Some(other), _) => other.to_string(),
    }
}

async fn print_revenue_report(engine: &Engine) -> CliResult<()> {
    let view = ReportView::new();
    let outcome = view.refresh(&engine.revenue_reconciler()).await;
    let snapshot = view.snapshot().await;

    if outcome != Completion::Applied {
        let message = snapshot
            .notice
            .map(|notice| notice.message)
            .unwrap_or_else(|| "report not loaded".to_string());
        return Err(message.into());
    }

    let columns = revenue_report_columns();
    let header: Vec<&str> = columns.iter().map(|c| c.label).collect();
    println!("{}", header.join("\t"));
    for row in &snapshot.rows {
        let record = row.to_record();
        let cells: Vec<String> = columns
            .iter()
            .map(|c| cell(record.get(c.key), c.kind))
            .collect();
        println!("{}", cells.join("\t"));
    }
    println!("Total: {} ({} rows)", snapshot.total, snapshot.rows.len());
    Ok(())
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = read_new_password()?;
            engine
                .new_user(&args.username, &password, args.role.into())
                .await?;
            println!("created user: {}", args.username);
        }
        Command::Client(Client {
            command: ClientCommand::Create { name },
        }) => {
            let id = engine.new_client(&name).await?;
            println!("created client: {name} ({id})");
        }
        Command::Project(Project {
            command:
                ProjectCommand::Create {
                    number,
                    name,
                    client_name,
                },
        }) => {
            let id = engine
                .new_project(&number, &name, client_name.as_deref())
                .await?;
            println!("created project: {number} {name} ({id})");
        }
        Command::Revenue(Revenue {
            command: RevenueCommand::Record(args),
        }) => {
            let id = engine
                .new_revenue(RevenueNew {
                    date: args.date,
                    invoice_number: args.invoice_number,
                    amount: args.amount,
                    description: args.description,
                    account_code: args.account_code,
                    account_name: args.account_name,
                    external_txn_id: args.external_txn_id,
                    project_id: args.project_id,
                    client_id: args.client_id,
                    is_split: args.split,
                })
                .await?;
            println!("recorded revenue: {} ({id})", args.amount);
        }
        Command::Report(Report {
            command: ReportCommand::Revenues,
        }) => print_revenue_report(&engine).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn masked_input_edits_the_secret() {
        let mut secret = String::new();
        assert_eq!(apply_key(&mut secret, key(KeyCode::Char('a'))), Keystroke::Pushed);
        assert_eq!(apply_key(&mut secret, key(KeyCode::Char('b'))), Keystroke::Pushed);
        assert_eq!(apply_key(&mut secret, key(KeyCode::Backspace)), Keystroke::Erased);
        assert_eq!(apply_key(&mut secret, key(KeyCode::Enter)), Keystroke::Submit);
        assert_eq!(secret, "a");
    }

    #[test]
    fn masked_input_ignores_backspace_on_empty_and_aborts_on_ctrl_c() {
        let mut secret = String::new();
        assert_eq!(apply_key(&mut secret, key(KeyCode::Backspace)), Keystroke::Ignored);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(apply_key(&mut secret, ctrl_c), Keystroke::Abort);
        assert!(secret.is_empty());
    }

    #[test]
    fn currency_cells_render_as_money() {
        let value = Value::from(-1250);
        assert_eq!(cell(Some(&value), engine::ColumnKind::Currency), "-12.50");
        assert_eq!(cell(Some(&Value::Null), engine::ColumnKind::Text), "");
        assert_eq!(cell(None, engine::ColumnKind::Text), "");
    }
}
