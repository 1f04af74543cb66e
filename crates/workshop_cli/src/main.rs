//! Operator CLI for the workshop registration store.
//!
//! Opens the same SQLite file the server uses, so seeding and seat reports
//! can run without the HTTP layer.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use workshop_core::db::open_db;
use workshop_core::db::seed::seed_demo_data;
use workshop_core::{SqliteWorkshopRepository, WorkshopService};

#[derive(Debug, Parser)]
#[command(name = "workshop-cli", about = "Workshop registration store utilities")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prints the linked core version.
    Version,
    /// Applies migrations and inserts demo data into empty tables.
    Seed {
        #[arg(long, env = "WORKSHOP_DB_PATH", default_value = "workshop.db")]
        db: PathBuf,
    },
    /// Lists workshops with enrolled and waitlisted counts.
    Stats {
        #[arg(long, env = "WORKSHOP_DB_PATH", default_value = "workshop.db")]
        db: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        Command::Version => {
            println!("workshop_core version={}", workshop_core::core_version());
        }
        Command::Seed { db } => {
            let mut conn = open_db(&db).with_context(|| format!("opening {}", db.display()))?;
            let report = seed_demo_data(&mut conn).context("seeding demo data")?;
            println!(
                "seeded users={} workshops={} registrations={}",
                report.users, report.workshops, report.registrations
            );
        }
        Command::Stats { db } => {
            let conn = open_db(&db).with_context(|| format!("opening {}", db.display()))?;
            let service = WorkshopService::new(SqliteWorkshopRepository::new(&conn));
            for entry in service.list_workshops()? {
                println!(
                    "{}\t{}\t{}\tcapacity={} enrolled={} waitlist={} seats_left={}",
                    entry.workshop.id,
                    entry.workshop.scheduled_at,
                    entry.workshop.title,
                    entry.workshop.capacity,
                    entry.enrolled,
                    entry.waitlist,
                    entry.seats_left()
                );
            }
        }
    }
    Ok(())
}
