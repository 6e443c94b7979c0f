use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

mod aggregate;
mod db;
mod models;
mod report;

use models::Field;

#[derive(Parser)]
#[command(name = "survey-insights")]
#[command(about = "Analytics for the eating habits and academic performance survey", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct FetchArgs {
    /// Restrict to responses from one course
    #[arg(long)]
    course: Option<String>,
    /// Restrict to responses submitted in the last N days
    #[arg(long)]
    since_days: Option<i64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load realistic seed data
    Seed,
    /// Import survey responses from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Count responses per known category of a field
    Distribution {
        #[arg(long, value_enum)]
        field: Field,
        /// Known categories, in display order
        #[arg(long, value_delimiter = ',', required = true)]
        categories: Vec<String>,
        #[command(flatten)]
        fetch: FetchArgs,
        /// Emit chart-shaped JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Count exact integer values of a field against explicit buckets
    Histogram {
        #[arg(long, value_enum)]
        field: Field,
        /// Exact bucket values, in display order
        #[arg(long, value_delimiter = ',', required = true)]
        edges: Vec<i64>,
        #[command(flatten)]
        fetch: FetchArgs,
        #[arg(long)]
        json: bool,
    },
    /// Average a numeric field per category of a grouping field
    Average {
        #[arg(long, value_enum)]
        group_field: Field,
        #[arg(long, value_delimiter = ',', required = true)]
        categories: Vec<String>,
        #[arg(long, value_enum)]
        value_field: Field,
        #[command(flatten)]
        fetch: FetchArgs,
        #[arg(long)]
        json: bool,
    },
    /// Mean of a numeric field across all responses
    Mean {
        #[arg(long, value_enum)]
        field: Field,
        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Emit raw x/y value pairs for correlation rendering
    Paired {
        #[arg(long, value_enum)]
        x_field: Field,
        #[arg(long, value_enum)]
        y_field: Field,
        #[command(flatten)]
        fetch: FetchArgs,
    },
    /// Generate a markdown report across all chart sections
    Report {
        #[command(flatten)]
        fetch: FetchArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} responses from {}.", csv.display());
        }
        Commands::Distribution {
            field,
            categories,
            fetch,
            json,
        } => {
            let records = fetch_records(&pool, &fetch).await?;
            let series = aggregate::categorical_distribution(&records, field, &categories);
            if json {
                let chart = series.into_chart("Distribution");
                println!("{}", serde_json::to_string_pretty(&chart)?);
            } else {
                for (label, value) in series.labels.iter().zip(series.values.iter()) {
                    println!("{label}: {}", *value as usize);
                }
            }
        }
        Commands::Histogram {
            field,
            edges,
            fetch,
            json,
        } => {
            let records = fetch_records(&pool, &fetch).await?;
            let series = aggregate::numeric_histogram(&records, field, &edges);
            if json {
                let chart = series.into_chart("Histogram");
                println!("{}", serde_json::to_string_pretty(&chart)?);
            } else {
                for (label, value) in series.labels.iter().zip(series.values.iter()) {
                    println!("{label}: {}", *value as usize);
                }
            }
        }
        Commands::Average {
            group_field,
            categories,
            value_field,
            fetch,
            json,
        } => {
            let records = fetch_records(&pool, &fetch).await?;
            let series = aggregate::grouped_average(
                &records,
                group_field,
                &categories,
                value_field,
                aggregate::parse_number,
            );
            if json {
                let chart = series.into_chart("Average");
                println!("{}", serde_json::to_string_pretty(&chart)?);
            } else {
                let counts = series.meta.clone().unwrap_or_default();
                for (index, label) in series.labels.iter().enumerate() {
                    println!(
                        "{label}: {:.2} ({} valid)",
                        series.values[index],
                        counts.get(index).copied().unwrap_or(0)
                    );
                }
            }
        }
        Commands::Mean { field, fetch } => {
            let records = fetch_records(&pool, &fetch).await?;
            let mean = aggregate::scalar_mean(&records, field, aggregate::parse_number);
            println!("{mean:.2}");
        }
        Commands::Paired {
            x_field,
            y_field,
            fetch,
        } => {
            let records = fetch_records(&pool, &fetch).await?;
            let pairs = aggregate::paired_series(&records, x_field, y_field);
            println!("{}", serde_json::to_string_pretty(&pairs)?);
        }
        Commands::Report { fetch, out } => {
            let records = fetch_records(&pool, &fetch).await?;
            let report = report::build_report(fetch.course.as_deref(), &records);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

async fn fetch_records(
    pool: &sqlx::PgPool,
    fetch: &FetchArgs,
) -> anyhow::Result<Vec<models::SurveyRecord>> {
    let since = fetch.since_days.map(db::cutoff_date);
    db::fetch_responses(pool, since, fetch.course.as_deref()).await
}
