//! Command-line front end.
//!
//! Every command maps onto a destination of the route table and goes through
//! the same guard the navigation bar uses:
//! - `login`, `logout`, `whoami`, `register`, `home`
//! - `hospitals`, `users`, `inventory`, `donations`, `requests` (admin)
//! - `donate` (donor), `request` (patient)
//! - `config check`

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::guard::Destination;
use crate::ui::forms::{
    DonationForm, HospitalForm, LoginForm, ProfileForm, RegisterForm, RequestForm, StockForm,
};
use crate::ui::pages::{
    donation_table, request_table, DonationPage, DonationReviewPage, HospitalsPage,
    InventoryPage, LoginPage, RegisterPage, RequestPage, RequestReviewPage, UsersPage,
};
use crate::ui::{self, navbar, Failure, Notice, SubmitOutcome, Submitted};
use crate::AppContext;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "bloodsync")]
#[command(author, version, about = "Administrative client for the BloodSync blood bank", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// API URL to connect to (overrides api.base_url)
    #[arg(long, env = "BLOODSYNC_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Password (can also be set via BLOODSYNC_PASSWORD env var)
        #[arg(long, env = "BLOODSYNC_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the saved session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Create an account (user, donor or patient)
    Register(RegisterArgs),

    /// Show the home page and navigation
    Home,

    /// Manage hospitals (admin)
    #[command(subcommand)]
    Hospitals(HospitalCommands),

    /// Manage user accounts (admin)
    #[command(subcommand)]
    Users(UserCommands),

    /// Blood stock levels (admin)
    #[command(subcommand)]
    Inventory(InventoryCommands),

    /// Review submitted donations (admin)
    #[command(subcommand)]
    Donations(ReviewCommands),

    /// Review blood requests (admin)
    #[command(subcommand)]
    Requests(ReviewCommands),

    /// Donate blood (donor)
    #[command(subcommand)]
    Donate(DonateCommands),

    /// Request blood (patient)
    #[command(subcommand)]
    Request(RequestCommands),

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug, Default)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub age: Option<String>,
    /// male, female or other
    #[arg(long)]
    pub gender: Option<String>,
    /// A+, A-, B+, B-, AB+, AB-, O+ or O-
    #[arg(long)]
    pub blood_type: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    /// user, donor or patient (default: user)
    #[arg(long)]
    pub role: Option<String>,
}

impl From<&RegisterArgs> for RegisterForm {
    fn from(args: &RegisterArgs) -> Self {
        Self {
            username: args.username.clone(),
            email: args.email.clone(),
            password: args.password.clone(),
            full_name: args.full_name.clone(),
            age: args.age.clone(),
            gender: args.gender.clone(),
            blood_type: args.blood_type.clone(),
            contact: args.contact.clone(),
            address: args.address.clone(),
            role: args.role.clone(),
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct HospitalArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
}

impl From<&HospitalArgs> for HospitalForm {
    fn from(args: &HospitalArgs) -> Self {
        Self {
            name: args.name.clone(),
            address: args.address.clone(),
            contact: args.contact.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum HospitalCommands {
    /// List all hospitals
    List,
    /// Show one hospital
    Show { id: i64 },
    /// Add a hospital
    Add(HospitalArgs),
    /// Edit a hospital; omitted fields keep their value
    Edit {
        id: i64,
        #[command(flatten)]
        fields: HospitalArgs,
    },
    /// Delete a hospital
    Delete { id: i64 },
}

#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub age: Option<String>,
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub blood_type: Option<String>,
    #[arg(long)]
    pub contact: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    /// Set a new password
    #[arg(long)]
    pub password: Option<String>,
}

impl From<&ProfileArgs> for ProfileForm {
    fn from(args: &ProfileArgs) -> Self {
        Self {
            username: args.username.clone(),
            email: args.email.clone(),
            role: args.role.clone(),
            full_name: args.full_name.clone(),
            age: args.age.clone(),
            gender: args.gender.clone(),
            blood_type: args.blood_type.clone(),
            contact: args.contact.clone(),
            address: args.address.clone(),
            password: args.password.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List all users
    List,
    /// Show a user's profile
    Show { id: i64 },
    /// Update profile fields or role
    Update {
        id: i64,
        #[command(flatten)]
        fields: ProfileArgs,
    },
    /// Delete a user
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum InventoryCommands {
    /// List stock records
    List {
        /// Only this hospital's stock
        #[arg(long)]
        hospital: Option<i64>,
    },
    /// Total units per blood type
    Dashboard,
    /// Set the quantity of a stock record
    Set {
        id: i64,
        #[arg(long)]
        quantity: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ReviewCommands {
    /// List everything submitted
    List,
    /// Change the status (pending, approved, rejected, fulfilled)
    SetStatus { id: i64, status: String },
}

#[derive(Subcommand, Debug)]
pub enum DonateCommands {
    /// Offer units of your blood type to a hospital
    Submit {
        #[arg(long)]
        hospital: Option<String>,
        #[arg(long)]
        quantity: Option<String>,
    },
    /// Your past donations
    History,
    /// Hospitals you can donate to
    Hospitals,
}

#[derive(Subcommand, Debug)]
pub enum RequestCommands {
    /// Request units of blood from a hospital
    Submit {
        #[arg(long)]
        hospital: Option<String>,
        /// Defaults to your own blood type
        #[arg(long)]
        blood_type: Option<String>,
        #[arg(long)]
        quantity: Option<String>,
    },
    /// Your past requests
    History,
    /// Hospitals you can request from
    Hospitals,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

// ============================================================================
// Output helpers
// ============================================================================

fn show_failure(failure: &Failure) {
    eprintln!("{}", failure.to_string().trim_end());
    if matches!(failure, Failure::Redirect(Destination::Login, _)) {
        eprintln!("Run `bloodsync login` to sign in.");
    }
}

fn report(outcome: Submitted<Notice>) {
    match outcome {
        SubmitOutcome::Completed(Ok(notice)) => println!("{}", notice),
        SubmitOutcome::Completed(Err(failure)) => show_failure(&failure),
        SubmitOutcome::Ignored => println!("A submission is already in progress."),
    }
}

fn show_home(ctx: &AppContext) {
    let session = ctx.session.current();
    println!("{}", navbar::render(session.as_ref()));
    println!();
    match session {
        Some(session) => println!(
            "Welcome back, {}.",
            if session.identity.full_name.is_empty() {
                &session.identity.username
            } else {
                &session.identity.full_name
            }
        ),
        None => println!("Welcome to BloodSync. Log in or register to continue."),
    }
}

/// Enter a destination. Returns false when the guard sent the user elsewhere.
fn enter(ctx: &AppContext, requested: Destination) -> bool {
    let target = ctx.navigate(requested);
    if target == requested {
        return true;
    }
    match target {
        Destination::Login => eprintln!("Login required. Run `bloodsync login` first."),
        _ => show_home(ctx),
    }
    false
}

// ============================================================================
// CLI Command Handlers
// ============================================================================

/// Run a CLI command
pub async fn run_command(cli: &Cli, config: Config) -> Result<()> {
    if let Commands::Config(ConfigCommands::Check) = &cli.command {
        return cmd_config_check(cli);
    }

    let ctx = AppContext::start(config).context("Failed to initialize session")?;

    match &cli.command {
        Commands::Login { email, password } => cmd_login(&ctx, email, password).await,
        Commands::Logout => match ui::logout(&ctx.session) {
            Ok(notice) => println!("{}", notice),
            Err(failure) => show_failure(&failure),
        },
        Commands::Whoami => cmd_whoami(&ctx),
        Commands::Register(args) => cmd_register(&ctx, args).await,
        Commands::Home => show_home(&ctx),
        Commands::Hospitals(command) => {
            if enter(&ctx, Destination::Hospitals) {
                cmd_hospitals(&ctx, command).await;
            }
        }
        Commands::Users(command) => {
            if enter(&ctx, Destination::Users) {
                cmd_users(&ctx, command).await;
            }
        }
        Commands::Inventory(command) => {
            if enter(&ctx, Destination::Inventory) {
                cmd_inventory(&ctx, command).await;
            }
        }
        Commands::Donations(command) => {
            if enter(&ctx, Destination::Donations) {
                cmd_donation_review(&ctx, command).await;
            }
        }
        Commands::Requests(command) => {
            if enter(&ctx, Destination::Requests) {
                cmd_request_review(&ctx, command).await;
            }
        }
        Commands::Donate(command) => {
            if enter(&ctx, Destination::Donate) {
                cmd_donate(&ctx, command).await;
            }
        }
        Commands::Request(command) => {
            if enter(&ctx, Destination::Request) {
                cmd_request(&ctx, command).await;
            }
        }
        Commands::Config(_) => {}
    }
    Ok(())
}

async fn cmd_login(ctx: &AppContext, email: &Option<String>, password: &Option<String>) {
    let form = LoginForm {
        email: email.clone(),
        password: password.clone(),
    };
    match LoginPage::new(ctx).submit(&form).await {
        SubmitOutcome::Completed(Ok(identity)) => {
            println!("[OK] Logged in as {} ({})", identity.username, identity.role);
            println!();
            show_home(ctx);
        }
        SubmitOutcome::Completed(Err(failure)) => show_failure(&failure),
        SubmitOutcome::Ignored => println!("A login is already in progress."),
    }
}

fn cmd_whoami(ctx: &AppContext) {
    match ctx.session.current_identity() {
        Some(identity) => print!("{}", UsersPage::details(&identity)),
        None => println!("Not logged in."),
    }
}

async fn cmd_register(ctx: &AppContext, args: &RegisterArgs) {
    if !enter(ctx, Destination::Register) {
        return;
    }
    let outcome = RegisterPage::new(ctx).submit(&RegisterForm::from(args)).await;
    let registered = matches!(outcome, SubmitOutcome::Completed(Ok(_)));
    report(outcome);
    if registered {
        println!("Next: bloodsync login --email <email>");
    }
}

async fn cmd_hospitals(ctx: &AppContext, command: &HospitalCommands) {
    let page = HospitalsPage::new(ctx);
    match command {
        HospitalCommands::List => match page.load().await {
            Ok(hospitals) => print!("{}", HospitalsPage::table(&hospitals)),
            Err(failure) => show_failure(&failure),
        },
        HospitalCommands::Show { id } => match page.find(*id).await {
            Ok(hospital) => {
                println!("=== Hospital: {} ===", hospital.name);
                println!();
                println!("ID:      {}", hospital.id);
                println!("Name:    {}", hospital.name);
                println!("Address: {}", hospital.address);
                println!("Contact: {}", hospital.contact);
            }
            Err(failure) => show_failure(&failure),
        },
        HospitalCommands::Add(fields) => {
            report(page.save(None, &HospitalForm::from(fields)).await);
        }
        HospitalCommands::Edit { id, fields } => match page.find(*id).await {
            Ok(hospital) => {
                let form = HospitalForm::from(&hospital).merge(HospitalForm::from(fields));
                report(page.save(Some(*id), &form).await);
            }
            Err(failure) => show_failure(&failure),
        },
        HospitalCommands::Delete { id } => report(page.delete(*id).await),
    }
}

async fn cmd_users(ctx: &AppContext, command: &UserCommands) {
    let page = UsersPage::new(ctx);
    match command {
        UserCommands::List => match page.load().await {
            Ok(users) => print!("{}", UsersPage::table(&users)),
            Err(failure) => show_failure(&failure),
        },
        UserCommands::Show { id } => match page.find(*id).await {
            Ok(user) => print!("{}", UsersPage::details(&user)),
            Err(failure) => show_failure(&failure),
        },
        UserCommands::Update { id, fields } => {
            let form = ProfileForm::from(fields);
            if form.is_empty() {
                println!("Nothing to update.");
                return;
            }
            report(page.update(*id, &form).await);
        }
        UserCommands::Delete { id } => report(page.delete(*id).await),
    }
}

async fn cmd_inventory(ctx: &AppContext, command: &InventoryCommands) {
    let page = InventoryPage::new(ctx);
    match command {
        InventoryCommands::List { hospital } => match page.load(*hospital).await {
            Ok(stock) => print!("{}", InventoryPage::table(&stock)),
            Err(failure) => show_failure(&failure),
        },
        InventoryCommands::Dashboard => match page.load(None).await {
            Ok(stock) => print!("{}", InventoryPage::render_dashboard(&stock)),
            Err(failure) => show_failure(&failure),
        },
        InventoryCommands::Set { id, quantity } => {
            let form = StockForm {
                quantity: quantity.clone(),
            };
            report(page.update_quantity(*id, &form).await);
        }
    }
}

async fn cmd_donation_review(ctx: &AppContext, command: &ReviewCommands) {
    let page = DonationReviewPage::new(ctx);
    match command {
        ReviewCommands::List => match page.load().await {
            Ok(donations) => {
                let hospitals = HospitalsPage::new(ctx).load().await.unwrap_or_default();
                print!("{}", donation_table(&donations, &hospitals));
            }
            Err(failure) => show_failure(&failure),
        },
        ReviewCommands::SetStatus { id, status } => report(page.set_status(*id, status).await),
    }
}

async fn cmd_request_review(ctx: &AppContext, command: &ReviewCommands) {
    let page = RequestReviewPage::new(ctx);
    match command {
        ReviewCommands::List => match page.load().await {
            Ok(requests) => {
                let hospitals = HospitalsPage::new(ctx).load().await.unwrap_or_default();
                print!("{}", request_table(&requests, &hospitals));
            }
            Err(failure) => show_failure(&failure),
        },
        ReviewCommands::SetStatus { id, status } => report(page.set_status(*id, status).await),
    }
}

async fn cmd_donate(ctx: &AppContext, command: &DonateCommands) {
    let page = DonationPage::new(ctx);
    match command {
        DonateCommands::Submit { hospital, quantity } => {
            let form = DonationForm {
                hospital_id: hospital.clone(),
                quantity: quantity.clone(),
            };
            report(page.submit(&form).await);
        }
        DonateCommands::History => match page.history().await {
            Ok(donations) => {
                let hospitals = page.hospitals().await.unwrap_or_default();
                print!("{}", donation_table(&donations, &hospitals));
            }
            Err(failure) => show_failure(&failure),
        },
        DonateCommands::Hospitals => match page.hospitals().await {
            Ok(hospitals) => print!("{}", HospitalsPage::table(&hospitals)),
            Err(failure) => show_failure(&failure),
        },
    }
}

async fn cmd_request(ctx: &AppContext, command: &RequestCommands) {
    let page = RequestPage::new(ctx);
    match command {
        RequestCommands::Submit {
            hospital,
            blood_type,
            quantity,
        } => {
            let form = RequestForm {
                hospital_id: hospital.clone(),
                blood_type: blood_type.clone(),
                quantity: quantity.clone(),
            };
            report(page.submit(&form).await);
        }
        RequestCommands::History => match page.history().await {
            Ok(requests) => {
                let hospitals = page.hospitals().await.unwrap_or_default();
                print!("{}", request_table(&requests, &hospitals));
            }
            Err(failure) => show_failure(&failure),
        },
        RequestCommands::Hospitals => match page.hospitals().await {
            Ok(hospitals) => print!("{}", HospitalsPage::table(&hospitals)),
            Err(failure) => show_failure(&failure),
        },
    }
}

fn cmd_config_check(cli: &Cli) -> Result<()> {
    let config_path = &cli.config;

    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[!!] Configuration file not found: {}",
            config_path.display()
        );
        println!();
        println!("The default configuration will be used.");
        return Ok(());
    }

    let mut config = Config::load(config_path)?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    println!("[OK] Configuration file is valid!");
    println!();
    println!("=== Configuration Summary ===");
    println!();
    println!("API:");
    println!("  Base URL:     {}", config.api.base_url);
    println!("  Timeout:      {}s", config.api.timeout_secs);
    println!();
    println!("Session:");
    println!("  Data Dir:     {}", config.session.data_dir.display());
    println!();
    println!("Logging:");
    println!("  Level:        {}", config.logging.level);
    Ok(())
}
