use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use log::LevelFilter;
use rust_decimal::Decimal;
use std::{env, fs, path::PathBuf, sync::Arc};

use spendtrack::aggregate::{self, StatusThresholds};
use spendtrack::auth::{Credentials, FileStorage, SessionStore, SignupFields, User};
use spendtrack::budgets::NewBudget;
use spendtrack::categories::NewCategory;
use spendtrack::config::ClientOptions;
use spendtrack::expenses::NewExpense;
use spendtrack::income::NewIncome;
use spendtrack::reports::{BudgetReport, ReportRequest};
use spendtrack::users::PasswordChange;
use spendtrack::views::{self, ListView};
use spendtrack::SpendTrack;

mod render;

#[derive(Parser, Debug)]
#[clap(name = "spendtrack", version)]
#[clap(about = "Track budgets, expenses and income from the terminal", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Backend URL. Defaults to SPENDTRACK_API_BASE_URL, then http://localhost:9000
    #[clap(long)]
    base_url: Option<String>,

    /// Where the session is kept between runs
    #[clap(long, env = "SPENDTRACK_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Output debug logs to stderr
    #[clap(long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    /// Create an account
    Signup {
        #[clap(long)]
        name: String,
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List all users
    Users,
    /// Manage budgets
    #[clap(subcommand)]
    Budgets(BudgetCommand),
    /// Manage expenses
    #[clap(subcommand)]
    Expenses(ExpenseCommand),
    /// Manage income
    #[clap(subcommand)]
    Income(IncomeCommand),
    /// Manage categories
    #[clap(subcommand)]
    Categories(CategoryCommand),
    /// Financial overview
    Dashboard,
    /// Generate the report of a budget
    Report {
        #[clap(long)]
        budget: String,
        /// Also write the report as CSV to this file or directory
        #[clap(long)]
        csv: Option<PathBuf>,
    },
    /// Change the account password
    Password {
        #[clap(long)]
        old: String,
        #[clap(long)]
        new: String,
        #[clap(long)]
        confirm: String,
    },
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    List,
    Add {
        #[clap(long)]
        description: String,
        #[clap(long)]
        amount: Decimal,
        /// End date, YYYY-MM-DD
        #[clap(long)]
        end_date: String,
        /// Income the budget draws from
        #[clap(long)]
        income: Option<String>,
    },
    Delete {
        id: String,
    },
    /// Compare a budget with the spending of its linked income
    Track {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ExpenseCommand {
    List,
    Add {
        #[clap(long)]
        description: String,
        #[clap(long)]
        amount: Decimal,
        /// Defaults to today
        #[clap(long)]
        date: Option<String>,
        #[clap(long)]
        category: String,
        #[clap(long)]
        budget: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum IncomeCommand {
    List,
    Add {
        #[clap(long)]
        source: String,
        #[clap(long)]
        amount: Decimal,
        /// Defaults to today
        #[clap(long)]
        date: Option<String>,
        #[clap(long, default_value = "")]
        description: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    List,
    Add {
        #[clap(long)]
        name: String,
        #[clap(long, default_value = "")]
        description: String,
    },
    Delete {
        id: String,
    },
}

fn init_logging(debug: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    match env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            builder.filter_level(LevelFilter::Warn);
        }
    }
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    // a logger may already be installed
    let _ = builder.try_init();
}

fn session_path(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let dirs = ProjectDirs::from("org", "spendtrack", "spendtrack")
        .context("Cannot determine a configuration directory; pass --session-file")?;
    Ok(dirs.config_dir().join("session.json"))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn date_or_today(date: Option<String>) -> String {
    date.unwrap_or_else(|| today().format("%Y-%m-%d").to_string())
}

// --- List printers, reused after every write ---

async fn print_budgets(client: &SpendTrack, user: &User) {
    let view = ListView::from_result(client.budgets().list(&user.id).await);
    render::budgets(&view, today());
}

async fn print_expenses(client: &SpendTrack, user: &User) {
    match views::load_expense_ledger(client, &user.id).await {
        Ok(ledger) => render::ledger(&ledger),
        Err(err) => {
            let view = ListView::from_result(Err(err));
            render::ledger(&views::ExpenseLedger::build(vec![], view.items.clone(), vec![]));
            render::list_error(&view);
        }
    }
}

async fn print_income(client: &SpendTrack, user: &User) {
    let view = ListView::from_result(client.income().list(&user.id).await);
    render::income(&view);
    render::breakdown("By source", &aggregate::by_source(&view.items));
}

async fn print_categories(client: &SpendTrack) {
    let view = ListView::from_result(client.categories().list().await);
    render::categories(&view);
}

// --- Main application logic ---

async fn run() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.debug);

    let mut options = ClientOptions::from_env();
    if let Some(url) = &cli.base_url {
        options = options.with_base_url(url);
    }
    let storage = Arc::new(FileStorage::new(session_path(cli.session_file)?));
    let client = SpendTrack::new_with_options(options, storage);
    let session = SessionStore::restore(client.clone());

    match cli.command {
        Commands::Login { email, password } => {
            let user = session.login(&Credentials::new(&email, &password)).await?;
            println!("Logged in as {} <{}>", user.name, user.email);
        }
        Commands::Signup {
            name,
            email,
            password,
        } => {
            session
                .signup(&SignupFields::new(&name, &email, &password))
                .await?;
            println!("Account created. Log in with `spendtrack login`.");
        }
        Commands::Logout => {
            session.logout()?;
            println!("Logged out.");
        }
        Commands::Whoami => render::user(&session.require_user()?),
        Commands::Users => {
            session.require_user()?;
            let view = ListView::from_result(client.users().list().await);
            render::users(&view);
        }
        Commands::Budgets(command) => {
            let user = session.require_user()?;
            match command {
                BudgetCommand::List => {}
                BudgetCommand::Add {
                    description,
                    amount,
                    end_date,
                    income,
                } => {
                    let budget =
                        NewBudget::new(&description, amount, &end_date, &user.id, income.as_deref())?;
                    client.budgets().create(&budget).await?;
                    println!("Budget added.");
                }
                BudgetCommand::Delete { id } => {
                    client.budgets().delete(&id).await?;
                    println!("Budget deleted.");
                }
                BudgetCommand::Track { id } => {
                    let budgets = client.budgets().list(&user.id).await?;
                    let budget = budgets
                        .iter()
                        .find(|b| b.id == id)
                        .with_context(|| format!("No budget with id {}", id))?;
                    let tracking = aggregate::track_budget(
                        &client,
                        budget,
                        &user.id,
                        &StatusThresholds::default(),
                    )
                    .await?;
                    render::progress(&budget.description, &tracking.progress);
                    if let Some(status) = tracking.server_status {
                        println!("Backend status: {}", status);
                    }
                    return Ok(());
                }
            }
            print_budgets(&client, &user).await;
        }
        Commands::Expenses(command) => {
            let user = session.require_user()?;
            match command {
                ExpenseCommand::List => {}
                ExpenseCommand::Add {
                    description,
                    amount,
                    date,
                    category,
                    budget,
                } => {
                    let expense = NewExpense::new(
                        &description,
                        amount,
                        &date_or_today(date),
                        &category,
                        budget.as_deref(),
                        &user.id,
                    )?;
                    client.expenses().create(&expense).await?;
                    println!("Expense added.");
                }
                ExpenseCommand::Delete { id } => {
                    client.expenses().delete(&id).await?;
                    println!("Expense deleted.");
                }
            }
            print_expenses(&client, &user).await;
        }
        Commands::Income(command) => {
            let user = session.require_user()?;
            match command {
                IncomeCommand::List => {}
                IncomeCommand::Add {
                    source,
                    amount,
                    date,
                    description,
                } => {
                    let income = NewIncome::new(
                        &source,
                        amount,
                        &date_or_today(date),
                        &description,
                        &user.id,
                    )?;
                    client.income().create(&income).await?;
                    println!("Income added.");
                }
                IncomeCommand::Delete { id } => {
                    client.income().delete(&id, &user.id).await?;
                    println!("Income deleted.");
                }
            }
            print_income(&client, &user).await;
        }
        Commands::Categories(command) => {
            session.require_user()?;
            match command {
                CategoryCommand::List => {}
                CategoryCommand::Add { name, description } => {
                    client
                        .categories()
                        .create(&NewCategory::new(&name, &description)?)
                        .await?;
                    println!("Category added.");
                }
                CategoryCommand::Delete { id } => {
                    client.categories().delete(&id).await?;
                    println!("Category deleted.");
                }
            }
            print_categories(&client).await;
        }
        Commands::Dashboard => {
            let user = session.require_user()?;
            let dashboard = views::load_dashboard(&client, &user.id).await?;
            render::dashboard(&dashboard.summary, &aggregate::by_month(&dashboard.income));
        }
        Commands::Report { budget, csv } => {
            let user = session.require_user()?;
            let report = client
                .reports()
                .create(&ReportRequest {
                    user_id: user.id.clone(),
                    budget_id: budget.clone(),
                })
                .await?;
            render::report(&report);

            if let Some(path) = csv {
                let path = if path.is_dir() {
                    path.join(BudgetReport::file_name(&budget, today()))
                } else {
                    path
                };
                fs::write(&path, report.to_csv()?)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Report written to {}", path.display());
            }
        }
        Commands::Password { old, new, confirm } => {
            session.require_user()?;
            client
                .users()
                .change_password(&PasswordChange::new(&old, &new, &confirm)?)
                .await?;
            println!("Password changed.");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
