use crate::application_port::FriendshipError;
use crate::domain_port::{StorageTx, TxManager};
use crate::settings::Database;
use anyhow::Context;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySql, MySqlConnection, MySqlPool, Transaction};
use std::time::{Duration, Instant};

pub const MYSQL_BACKEND: &str = "mysql";

/// Owns the connection pool; every service operation borrows one
/// transaction from it.
pub struct MySqlTxManager {
    pool: MySqlPool,
}

impl MySqlTxManager {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlTxManager { pool }
    }

    /// Opens the pool and, when asked to, brings the schema up to date.
    pub async fn connect(database: &Database) -> anyhow::Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(database.max_connections)
            .acquire_timeout(Duration::from_secs(database.acquire_timeout_secs))
            .connect(&database.url)
            .await
            .context("connect to mysql")?;

        if database.migrate {
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("run migrations")?;
            tracing::info!("migrations applied");
        }

        Ok(Self::new(pool))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait::async_trait]
impl TxManager for MySqlTxManager {
    async fn begin<'t>(&'t self) -> anyhow::Result<Box<dyn StorageTx<'t> + 't>> {
        let inner = self.pool.begin().await.context("begin mysql transaction")?;
        Ok(Box::new(MySqlTx {
            inner: Some(inner),
            opened_at: Instant::now(),
        }))
    }
}

/// A transaction that was neither committed nor rolled back is rolled back
/// by sqlx when dropped.
pub struct MySqlTx<'t> {
    inner: Option<Transaction<'t, MySql>>,
    opened_at: Instant,
}

impl<'t> MySqlTx<'t> {
    pub fn conn(&mut self) -> Result<&mut MySqlConnection, FriendshipError> {
        self.inner
            .as_deref_mut()
            .ok_or_else(|| FriendshipError::Store("mysql transaction already finished".to_string()))
    }

    fn take(&mut self) -> anyhow::Result<Transaction<'t, MySql>> {
        self.inner
            .take()
            .ok_or_else(|| anyhow::anyhow!("mysql transaction already finished"))
    }
}

#[async_trait::async_trait]
impl<'t> StorageTx<'t> for MySqlTx<'t> {
    fn backend(&self) -> &'static str {
        MYSQL_BACKEND
    }

    async fn commit(mut self: Box<Self>) -> anyhow::Result<()> {
        self.take()?.commit().await.context("commit mysql transaction")?;
        tracing::trace!(elapsed = ?self.opened_at.elapsed(), "mysql transaction committed");
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> anyhow::Result<()> {
        self.take()?.rollback().await.context("roll back mysql transaction")?;
        tracing::trace!(elapsed = ?self.opened_at.elapsed(), "mysql transaction rolled back");
        Ok(())
    }
}

impl Drop for MySqlTx<'_> {
    fn drop(&mut self) {
        if self.inner.is_some() {
            tracing::debug!(elapsed = ?self.opened_at.elapsed(), "mysql transaction dropped while open");
        }
    }
}
