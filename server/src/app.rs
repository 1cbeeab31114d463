//! Core application

use std::sync::Arc;

use anyhow::{Context, Result, bail};

use crate::api::ApiServer;
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands, SystemCommands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::sqlite::SqlitePool;
use crate::data::types::{
    CountryRow, DepartmentRow, EmployeeRow, Entity, JobRow, LocationRow, RegionRow, TaskRow,
};
use crate::data::{SearchService, SqliteRepository, SqliteService};
use crate::domain::criteria;
use crate::domain::records::RecordService;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub database: Arc<SqliteService>,
    pub search: Arc<SearchService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        // Entity declarations and criteria types must agree before anything binds
        criteria::validate_all().context("Invalid criteria declarations")?;

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config).await?;
        match command {
            Some(Commands::System {
                command: SystemCommands::Reindex,
            }) => app.reindex().await,
            Some(Commands::Start) | None => Self::start_server(app).await,
        }
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init(&config).await?;

        let database = Arc::new(
            SqliteService::init(&storage)
                .await
                .context("Failed to initialize database")?,
        );
        let search = Arc::new(
            SearchService::new(&config.search, &storage)
                .await
                .context("Failed to initialize search mirror")?,
        );
        tracing::debug!(backend = search.backend_name(), "Search initialized");

        let shutdown = ShutdownService::new(database.clone(), search.clone());

        Ok(Self {
            shutdown,
            config,
            storage,
            database,
            search,
        })
    }

    /// Rebuild the search mirror for every entity from the primary store
    async fn reindex(self) -> Result<()> {
        if !self.config.search.enabled {
            bail!("Search mirror is disabled; enable it before reindexing");
        }

        let pool = self.database.pool();
        let counts = [
            (RegionRow::META.name, reindex_entity::<RegionRow>(pool, &self.search).await?),
            (CountryRow::META.name, reindex_entity::<CountryRow>(pool, &self.search).await?),
            (LocationRow::META.name, reindex_entity::<LocationRow>(pool, &self.search).await?),
            (
                DepartmentRow::META.name,
                reindex_entity::<DepartmentRow>(pool, &self.search).await?,
            ),
            (TaskRow::META.name, reindex_entity::<TaskRow>(pool, &self.search).await?),
            (EmployeeRow::META.name, reindex_entity::<EmployeeRow>(pool, &self.search).await?),
            (JobRow::META.name, reindex_entity::<JobRow>(pool, &self.search).await?),
        ];

        for (name, count) in counts {
            println!("  {:<12} {} indexed", name, count);
        }

        self.shutdown.shutdown().await;
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.shutdown
            .register(
                app.database
                    .start_checkpoint_task(app.shutdown.subscribe()),
            )
            .await;

        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            app.search.backend_name(),
            &app.storage.data_dir().display().to_string(),
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }
}

async fn reindex_entity<E: Entity>(pool: &SqlitePool, search: &Arc<SearchService>) -> Result<usize> {
    let records = RecordService::new(
        Arc::new(SqliteRepository::<E>::new(pool.clone())),
        search.clone(),
    );
    records
        .reindex()
        .await
        .with_context(|| format!("Failed to reindex {}", E::META.name))
}
