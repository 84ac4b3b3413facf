use crate::config::AppConfig;
use crate::entities::{authors, categories, post_tags, posts, tags};
use sea_orm::sea_query::Index;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Schema,
    SqlxSqliteConnector,
};
use sqlx::ConnectOptions as _;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

pub const POST_TAG_UNIQUE_INDEX: &str = "idx_post_tags_post_tag";

pub async fn setup_database(config: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    info!("📂 Database: {}", config.database_url);

    let db = if config.is_sqlite() {
        connect_sqlite(&config.database_url).await?
    } else {
        let mut opt = ConnectOptions::new(&config.database_url);
        opt.max_connections(config.db_max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(30))
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);
        Database::connect(opt).await?
    };

    info!("✅ Database connected successfully");

    run_migrations(&db, &config.database_url).await?;

    Ok(db)
}

/// Opens a single, never-recycled SQLite connection with foreign keys on.
///
/// Every connection to "sqlite::memory:" is its own database, so the pool must
/// hold exactly one and keep it for the life of the process.
async fn connect_sqlite(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .foreign_keys(true)
        .log_statements(log::LevelFilter::Debug);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

pub async fn run_migrations(db: &DatabaseConnection, database_url: &str) -> anyhow::Result<()> {
    let builder = db.get_database_backend();

    if builder == DbBackend::Postgres {
        info!("🔄 Running SQLx migrations for PostgreSQL...");
        let pool = sqlx::PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        pool.close().await;
        return Ok(());
    }

    info!("🔄 Running SeaORM auto-migrations for SQLite/Other...");

    let schema = Schema::new(builder);

    // Parents before children so foreign keys resolve
    let stmts = vec![
        schema
            .create_table_from_entity(authors::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(categories::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(tags::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(posts::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(post_tags::Entity)
            .if_not_exists()
            .to_owned(),
    ];

    for stmt in stmts {
        db.execute(builder.build(&stmt)).await?;
    }

    let unique_pair = Index::create()
        .if_not_exists()
        .name(POST_TAG_UNIQUE_INDEX)
        .table(post_tags::Entity)
        .col(post_tags::Column::PostId)
        .col(post_tags::Column::TagId)
        .unique()
        .to_owned();

    // Fails if the table already holds a duplicated (post_id, tag_id) pair
    db.execute(builder.build(&unique_pair)).await?;

    Ok(())
}
