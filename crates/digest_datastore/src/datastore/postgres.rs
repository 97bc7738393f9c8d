use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};

use crate::{
    datastore::{HistoryStore, ModelStore, ModelStoreError},
    HistoryRecord, ModelConfiguration, NewHistoryRecord, NewModelConfiguration,
};

static MIGRATOR: Migrator = sqlx::migrate!();

const MODEL_COLUMNS: &str =
    "id, name, provider, model_id, api_key, is_active, created_at, updated_at";

const HISTORY_COLUMNS: &str = "id, video_url, video_title, video_duration, video_thumbnail, \
     transcript, summary, summary_length, created_at";

#[derive(Debug, Clone)]
pub struct PgDataStore {
    pub pool: PgPool,
}

impl PgDataStore {
    /// Establish connection to database and run the embedded migrations
    pub async fn init(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .inspect_err(
                |e| tracing::error!(error = ?e, "Failed to establish connection to database"),
            )
            .context("Failed to connect to postgres database")?;

        MIGRATOR
            .run(&pool)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to run database migrations"))
            .context("Failed to run database migrations")?;

        Ok(PgDataStore { pool })
    }
}

#[derive(sqlx::FromRow)]
struct ModelRow {
    id: i64,
    name: String,
    provider: String,
    model_id: String,
    api_key: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ModelRow> for ModelConfiguration {
    fn from(row: ModelRow) -> Self {
        ModelConfiguration {
            id: row.id,
            name: row.name,
            provider: row.provider.as_str().into(),
            model_id: row.model_id,
            api_key: row.api_key,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    id: i64,
    video_url: String,
    video_title: Option<String>,
    video_duration: Option<String>,
    video_thumbnail: Option<String>,
    transcript: String,
    summary: String,
    summary_length: String,
    created_at: DateTime<Utc>,
}

impl From<HistoryRow> for HistoryRecord {
    fn from(row: HistoryRow) -> Self {
        HistoryRecord {
            id: row.id,
            video_url: row.video_url,
            title: row.video_title,
            duration: row.video_duration,
            thumbnail_url: row.video_thumbnail,
            transcript: row.transcript,
            summary: row.summary,
            summary_length: row.summary_length,
            created_at: row.created_at,
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

impl PgDataStore {
    /// Locks the configuration table for the rest of `tx` and checks that `id`
    /// exists. Concurrent toggles queue behind the lock.
    async fn lock_model(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: i64,
    ) -> Result<(), ModelStoreError> {
        sqlx::query("LOCK TABLE model_configurations IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut **tx)
            .await
            .context("Failed to lock model configurations")?;

        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM model_configurations WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await
                .context("Failed to look up model configuration")?;

        exists.map(|_| ()).ok_or(ModelStoreError::NotFound(id))
    }
}

impl ModelStore for PgDataStore {
    async fn list_models(&self) -> anyhow::Result<Vec<ModelConfiguration>> {
        let rows = sqlx::query_as::<_, ModelRow>(&format!(
            "SELECT {MODEL_COLUMNS} FROM model_configurations ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Failed to fetch model configurations"))
        .context("Failed to fetch model configurations")?;

        Ok(rows.into_iter().map(ModelConfiguration::from).collect())
    }

    async fn insert_model(
        &self,
        model: &NewModelConfiguration,
    ) -> Result<ModelConfiguration, ModelStoreError> {
        let result = sqlx::query_as::<_, ModelRow>(&format!(
            r#"
            INSERT INTO model_configurations (name, provider, model_id, api_key)
            VALUES ($1, $2, $3, $4)
            RETURNING {MODEL_COLUMNS}
            "#
        ))
        .bind(&model.name)
        .bind(model.provider.as_str())
        .bind(&model.model_id)
        .bind(&model.api_key)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(err) if is_unique_violation(&err) => Err(ModelStoreError::Duplicate {
                provider: model.provider.clone(),
                model_id: model.model_id.clone(),
            }),
            Err(err) => {
                tracing::error!(
                    error = ?err,
                    provider = %model.provider,
                    model_id = %model.model_id,
                    "Failed to insert model configuration"
                );
                Err(anyhow::Error::new(err)
                    .context("Failed to insert model configuration")
                    .into())
            }
        }
    }

    async fn activate_model(&self, id: i64) -> Result<(), ModelStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        Self::lock_model(&mut tx, id).await?;

        // clear first: the partial unique index rejects a second active row
        sqlx::query(
            r#"
            UPDATE model_configurations
            SET is_active = FALSE, updated_at = NOW()
            WHERE is_active AND id <> $1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear active model configurations")?;

        sqlx::query(
            r#"
            UPDATE model_configurations
            SET is_active = TRUE, updated_at = NOW()
            WHERE id = $1 AND NOT is_active
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, id, "Failed to activate model configuration"))
        .context("Failed to activate model configuration")?;

        tx.commit().await.context("Failed to commit activation")?;

        Ok(())
    }

    async fn deactivate_model(&self, id: i64) -> Result<(), ModelStoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        Self::lock_model(&mut tx, id).await?;

        sqlx::query(
            r#"
            UPDATE model_configurations
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1 AND is_active
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to deactivate model configuration")?;

        tx.commit().await.context("Failed to commit deactivation")?;

        Ok(())
    }
}

impl HistoryStore for PgDataStore {
    async fn insert_history(&self, record: &NewHistoryRecord) -> anyhow::Result<HistoryRecord> {
        let row = sqlx::query_as::<_, HistoryRow>(&format!(
            r#"
            INSERT INTO video_history
                (video_url, video_title, video_duration, video_thumbnail, transcript, summary, summary_length)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {HISTORY_COLUMNS}
            "#
        ))
        .bind(&record.video_url)
        .bind(&record.title)
        .bind(&record.duration)
        .bind(&record.thumbnail_url)
        .bind(&record.transcript)
        .bind(&record.summary)
        .bind(&record.summary_length)
        .fetch_one(&self.pool)
        .await
        .inspect_err(|err| {
            tracing::error!(
                error = ?err,
                video_url = %record.video_url,
                "Failed to insert history record"
            )
        })
        .context("Failed to insert history record")?;

        Ok(row.into())
    }

    async fn list_history(&self, limit: i64) -> anyhow::Result<Vec<HistoryRecord>> {
        let rows = sqlx::query_as::<_, HistoryRow>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM video_history ORDER BY created_at DESC, id DESC LIMIT $1"
        ))
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Failed to fetch history"))
        .context("Failed to fetch history")?;

        Ok(rows.into_iter().map(HistoryRecord::from).collect())
    }

    async fn get_history(&self, id: i64) -> anyhow::Result<Option<HistoryRecord>> {
        let row = sqlx::query_as::<_, HistoryRow>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM video_history WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, id, "Failed to fetch history record"))
        .context("Failed to fetch history record")?;

        Ok(row.map(HistoryRecord::from))
    }

    async fn latest_history(&self) -> anyhow::Result<Option<HistoryRecord>> {
        Ok(self.list_history(1).await?.into_iter().next())
    }
}
