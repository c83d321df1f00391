use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hr_server::{
    config::AppConfig,
    http::{self, AppState, ServeConfig},
};
use migration::{Migrator, MigratorTrait};
use platform_db::{DbPool, connect};
use platform_obs::{ObsConfig, init_tracing};
use products_hr::{
    export,
    seed::{self, SeedOptions},
    validation::today,
};
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hr-server", version, about = "HR analytics dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Generate sample employees, attendance, leave and exits.
    Seed {
        #[arg(long, help = "Delete existing records first")]
        clear: bool,
    },
    /// Write every employee as CSV.
    Export {
        #[arg(long, value_name = "FILE", default_value = "-", help = "Destination file, `-` for stdout")]
        output: String,
    },
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Allow starting even when migrations are pending")]
    allow_dirty: bool,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::from_env())?;
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, config).await,
        Command::Migrate(action) => {
            let pool = setup_pool(&config).await?;
            match action {
                MigrateCommand::Up => {
                    Migrator::up(&pool, None).await?;
                    info!("database migrations applied");
                }
                MigrateCommand::Down => {
                    Migrator::down(&pool, Some(1)).await?;
                    info!("most recent migration rolled back");
                }
            }
            Ok(())
        }
        Command::Seed { clear } => run_seed(&config, clear).await,
        Command::Export { output } => run_export(&config, &output).await,
    }
}

async fn setup_pool(config: &AppConfig) -> Result<DbPool> {
    connect(&config.database)
        .await
        .with_context(|| format!("failed to open {}", config.database.database_url()))
}

async fn run_server(cmd: ServeCommand, config: AppConfig) -> Result<()> {
    let pool = setup_pool(&config).await?;
    ensure_migrations(&pool, cmd.allow_dirty).await?;
    let state = AppState::new(pool, config);
    http::serve(ServeConfig::from(&cmd), state).await
}

async fn ensure_migrations(pool: &DbPool, allow_dirty: bool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() && !allow_dirty {
        anyhow::bail!(
            "{} pending migration(s); run `hr-server migrate up` or pass --allow-dirty",
            pending.len()
        );
    }
    Ok(())
}

async fn run_seed(config: &AppConfig, clear: bool) -> Result<()> {
    let pool = setup_pool(config).await?;
    ensure_migrations(&pool, false).await?;
    let mut rng = StdRng::from_entropy();
    let report = seed::generate_sample_data(&pool, &mut rng, SeedOptions::new(today()).clear(clear))
        .await
        .context("failed to generate sample data")?;
    info!(
        departments = report.departments,
        employees = report.employees,
        attendance = report.attendance,
        leaves = report.leaves,
        exits = report.exits,
        "sample data generated"
    );
    Ok(())
}

async fn run_export(config: &AppConfig, output: &str) -> Result<()> {
    let pool = setup_pool(config).await?;
    let rows = export::export_employees_to(&pool, output)
        .await
        .with_context(|| format!("failed to export employees to {output}"))?;
    info!(rows, output, "employees exported");
    Ok(())
}
