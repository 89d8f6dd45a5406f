use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use inboxguard_dashboard::error::Error as DashboardError;
use inboxguard_dashboard::pagination::RowLimit;
use inboxguard_dashboard::records::Resource;

mod commands;
mod utils;

use commands::config::ConfigCommands;

/// inboxguard - Operator console for the inboxguard deliverability API
#[derive(Parser)]
#[command(name = "inboxguard")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file to load instead of the default search path
    #[arg(long, global = true, env = "INBOXGUARD_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one page of a resource
    List {
        /// Resource to list (campaigns, mailboxes, domains, leads, audit-log)
        #[arg(value_parser = utils::parse_resource)]
        resource: Resource,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Rows per page (20 or 50)
        #[arg(short, long, value_parser = utils::parse_limit)]
        limit: Option<RowLimit>,

        /// Print the raw page as JSON
        #[arg(long)]
        json: bool,
    },
    /// Page through a resource and act on selected rows
    Browse {
        /// Resource to browse (campaigns, mailboxes, domains, leads, audit-log)
        #[arg(value_parser = utils::parse_resource)]
        resource: Resource,

        /// Rows per page (20 or 50)
        #[arg(short, long, value_parser = utils::parse_limit)]
        limit: Option<RowLimit>,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List {
            resource,
            page,
            limit,
            json,
        } => {
            commands::list::execute(cli.config.as_deref(), cli.verbose, resource, page, limit, json)
                .await
        }
        Commands::Browse { resource, limit } => {
            commands::browse::execute(cli.config.as_deref(), cli.verbose, resource, limit).await
        }
        Commands::Config { command } => {
            commands::config::execute(cli.config.as_deref(), command).await
        }
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            match e.downcast_ref::<DashboardError>() {
                Some(DashboardError::Unauthorized { login_url }) => {
                    eprintln!("{} Your session has expired.", "Error:".red().bold());
                    eprintln!("\n{} {}", "Sign in at:".yellow(), login_url.cyan());
                }
                Some(err) => {
                    eprintln!("{} {}", "Error:".red().bold(), err.user_message());
                    if err.is_retriable() {
                        eprintln!("\n{}", "The request can be retried.".dimmed());
                    }
                }
                None => {
                    eprintln!("{} {}", "Error:".red().bold(), e);

                    if let Some(source) = e.source() {
                        eprintln!("\n{} {}", "Caused by:".yellow(), source);
                    }
                }
            }

            std::process::exit(1);
        }
    }
}
