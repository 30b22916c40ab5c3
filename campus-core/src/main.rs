use anyhow::{Context, Result};
use campus_core::domain::{CreateStallInput, Stall, UpdateStallInput};
use campus_core::repository::{CollegeRepositoryImpl, StallRepositoryImpl};
use campus_core::service::{CollegeService, StallService};
use campus_core::store::MySqlDocumentStore;
use campus_core::{config::Config, telemetry};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

/// Campus console administration
#[derive(Parser, Debug)]
#[command(name = "campus-admin")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage the college email domain whitelist and food stalls")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply the database schema
    Migrate,

    /// College record commands
    #[command(subcommand)]
    College(CollegeCommands),

    /// Email domain whitelist of the configured college
    #[command(subcommand)]
    Domains(DomainCommands),

    /// Check whether an email address belongs to a whitelisted domain
    CheckEmail { email: String },

    /// Stall management commands
    #[command(subcommand)]
    Stalls(StallCommands),
}

#[derive(Subcommand, Debug)]
enum CollegeCommands {
    /// Create the configured college unless it already exists
    Ensure {
        /// Display name (defaults to COLLEGE_NAME)
        #[arg(long)]
        name: Option<String>,
        /// Initial allowed domain, repeatable (defaults to COLLEGE_DOMAINS)
        #[arg(long = "domain")]
        domains: Vec<String>,
    },
    /// List all colleges
    List,
}

#[derive(Subcommand, Debug)]
enum DomainCommands {
    List,
    Add { domain: String },
    Remove { domain: String },
}

#[derive(Subcommand, Debug)]
enum StallCommands {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    Delete { id: String },
    /// Flip the verification flag of a stall
    Toggle { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    telemetry::init(&config.telemetry);

    info!(college_id = %config.college.id, "Starting campus-admin");

    let store = Arc::new(
        MySqlDocumentStore::connect(&config.database)
            .await
            .context("Failed to connect to database")?,
    );

    if let Command::Migrate = cli.command {
        store.migrate().await.context("Failed to run migrations")?;
        println!("Schema is up to date");
        return Ok(());
    }

    let colleges = CollegeService::new(Arc::new(CollegeRepositoryImpl::new(store.clone())));
    let stalls = StallService::new(Arc::new(StallRepositoryImpl::new(store)));
    let college_id = config.college.id.as_str();

    match cli.command {
        Command::Migrate => {}
        Command::College(CollegeCommands::Ensure { name, domains }) => {
            let name = name.unwrap_or_else(|| config.college.name.clone());
            let domains = if domains.is_empty() {
                config.college.initial_domains.clone()
            } else {
                domains
            };
            let college = colleges.get_or_create(college_id, &name, &domains).await?;
            println!("{} ({})", college.name, college.id);
            print_domains(&college.domains);
        }
        Command::College(CollegeCommands::List) => {
            for college in colleges.list().await? {
                println!(
                    "{}\t{}\t{} domain(s)\tcreated {}",
                    college.id,
                    college.name,
                    college.domains.len(),
                    college.created_at.to_rfc3339()
                );
            }
        }
        Command::Domains(DomainCommands::List) => {
            let whitelist = colleges.get_domains(college_id).await?;
            println!("{}", whitelist.college_name);
            print_domains(&whitelist.domains);
        }
        Command::Domains(DomainCommands::Add { domain }) => {
            colleges.add_domain(college_id, &domain).await?;
            println!("Domain added successfully");
        }
        Command::Domains(DomainCommands::Remove { domain }) => {
            colleges.remove_domain(college_id, &domain).await?;
            println!("Domain removed successfully");
        }
        Command::CheckEmail { email } => {
            let allowed = colleges.is_domain_allowed(college_id, &email).await;
            println!("{}", if allowed { "allowed" } else { "denied" });
        }
        Command::Stalls(StallCommands::List) => {
            for stall in stalls.list().await? {
                print_stall(&stall);
            }
        }
        Command::Stalls(StallCommands::Add { name, email }) => {
            let stall = stalls
                .create(CreateStallInput { name, email }, &config.admin_id)
                .await?;
            println!("Stall added successfully!");
            print_stall(&stall);
        }
        Command::Stalls(StallCommands::Update { id, name, email }) => {
            let stall = stalls.update(&id, UpdateStallInput { name, email }).await?;
            println!("Stall updated successfully!");
            print_stall(&stall);
        }
        Command::Stalls(StallCommands::Delete { id }) => {
            stalls.delete(&id).await?;
            println!("Stall deleted successfully!");
        }
        Command::Stalls(StallCommands::Toggle { id }) => {
            let current = stalls.get(&id).await?;
            let stall = stalls.toggle_verification(&id, current.is_verified).await?;
            println!(
                "Stall {} successfully!",
                if stall.is_verified { "verified" } else { "unverified" }
            );
        }
    }

    Ok(())
}

fn print_domains(domains: &[String]) {
    if domains.is_empty() {
        println!("  (no domains configured)");
    }
    for domain in domains {
        println!("  {}", domain);
    }
}

fn print_stall(stall: &Stall) {
    println!(
        "{}\t{}\t{}\t{}\tcreated {} by {}",
        stall.id,
        stall.name,
        stall.email,
        if stall.is_verified { "verified" } else { "unverified" },
        stall.created_at.format("%Y-%m-%d"),
        stall.created_by
    );
}
