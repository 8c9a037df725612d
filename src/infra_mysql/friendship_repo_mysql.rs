use super::tables::{FRIENDSHIP_COLUMNS, MySqlTables};
use super::util::{decode_friendship, downcast};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::Utc;
use sqlx::{MySql, QueryBuilder};

pub struct MySqlFriendshipRepo {
    tables: MySqlTables,
}

impl MySqlFriendshipRepo {
    pub fn new(tables: MySqlTables) -> Self {
        Self { tables }
    }

    fn select<'args>(&self, query: &FriendshipQuery) -> QueryBuilder<'args, MySql> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT {FRIENDSHIP_COLUMNS} FROM {} f",
            self.tables.friendships()
        ));
        self.tables.push_where(&mut qb, query);
        qb
    }
}

#[async_trait::async_trait]
impl FriendshipRepo for MySqlFriendshipRepo {
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        sender: &EntityRef,
        recipient: &EntityRef,
        status: FriendshipStatus,
    ) -> Result<FriendshipRecord, FriendshipError> {
        let tx = downcast(tx)?;
        let now = Utc::now();

        let sql = format!(
            r#"
INSERT INTO {} (sender_id, sender_type, recipient_id, recipient_type, status, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?)
"#,
            self.tables.friendships()
        );
        let res = sqlx::query(&sql)
            .bind(sender.id)
            .bind(&sender.kind)
            .bind(recipient.id)
            .bind(&recipient.kind)
            .bind(status.code())
            .bind(now)
            .bind(now)
            .execute(tx.conn()?)
            .await
            .map_err(|e| FriendshipError::Store(format!("insert friendship: {e}")))?;

        Ok(FriendshipRecord {
            id: FriendshipId(res.last_insert_id()),
            sender: sender.clone(),
            recipient: recipient.clone(),
            status,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
    ) -> Result<Vec<FriendshipRecord>, FriendshipError> {
        let tx = downcast(tx)?;

        let mut qb = self.select(query);
        qb.push(" ORDER BY f.id ASC");
        let rows = qb
            .build()
            .fetch_all(tx.conn()?)
            .await
            .map_err(|e| FriendshipError::Store(format!("select friendships: {e}")))?;

        rows.iter().map(decode_friendship).collect()
    }

    async fn first_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
    ) -> Result<Option<FriendshipRecord>, FriendshipError> {
        let tx = downcast(tx)?;

        let mut qb = self.select(query);
        qb.push(" ORDER BY f.id ASC LIMIT 1");
        let row = qb
            .build()
            .fetch_optional(tx.conn()?)
            .await
            .map_err(|e| FriendshipError::Store(format!("select friendship: {e}")))?;

        row.as_ref().map(decode_friendship).transpose()
    }

    async fn count_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
    ) -> Result<u64, FriendshipError> {
        let tx = downcast(tx)?;

        let mut qb = QueryBuilder::new(format!(
            "SELECT COUNT(*) FROM {} f",
            self.tables.friendships()
        ));
        self.tables.push_where(&mut qb, query);
        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(tx.conn()?)
            .await
            .map_err(|e| FriendshipError::Store(format!("count friendships: {e}")))?;

        Ok(count.max(0) as u64)
    }

    async fn update_status_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
        status: FriendshipStatus,
    ) -> Result<u64, FriendshipError> {
        let tx = downcast(tx)?;

        let mut qb = QueryBuilder::new(format!("UPDATE {} f SET f.status = ", self.tables.friendships()));
        qb.push_bind(status.code())
            .push(", f.updated_at = ")
            .push_bind(Utc::now());
        self.tables.push_where(&mut qb, query);

        let res = qb
            .build()
            .execute(tx.conn()?)
            .await
            .map_err(|e| FriendshipError::Store(format!("update friendship status: {e}")))?;

        Ok(res.rows_affected())
    }

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        query: &FriendshipQuery,
    ) -> Result<u64, FriendshipError> {
        let tx = downcast(tx)?;

        // group tags go with the row through ON DELETE CASCADE
        let mut qb = QueryBuilder::new(format!("DELETE f FROM {} f", self.tables.friendships()));
        self.tables.push_where(&mut qb, query);

        let res = qb
            .build()
            .execute(tx.conn()?)
            .await
            .map_err(|e| FriendshipError::Store(format!("delete friendships: {e}")))?;

        Ok(res.rows_affected())
    }
}
