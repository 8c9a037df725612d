use super::tables::MySqlTables;
use super::util::{downcast, is_dup_key};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::{MySql, QueryBuilder};

pub struct MySqlGroupTagRepo {
    tables: MySqlTables,
}

impl MySqlGroupTagRepo {
    pub fn new(tables: MySqlTables) -> Self {
        Self { tables }
    }
}

#[async_trait::async_trait]
impl GroupTagRepo for MySqlGroupTagRepo {
    async fn first_or_create_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        tag: &FriendshipGroupTag,
    ) -> Result<bool, FriendshipError> {
        let tx = downcast(tx)?;

        let sql = format!(
            r#"
INSERT INTO {} (friendship_id, group_id, friend_id, friend_type)
VALUES (?, ?, ?, ?)
"#,
            self.tables.groups()
        );
        let res = sqlx::query(&sql)
            .bind(tag.friendship_id)
            .bind(tag.group_id)
            .bind(tag.friend.id)
            .bind(&tag.friend.kind)
            .execute(tx.conn()?)
            .await;

        match res {
            Ok(_) => Ok(true),
            Err(e) if is_dup_key(&e) => Ok(false),
            Err(e) => Err(FriendshipError::Store(format!("insert group tag: {e}"))),
        }
    }

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        friendship_id: FriendshipId,
        friend: &EntityRef,
        group_id: Option<GroupId>,
    ) -> Result<u64, FriendshipError> {
        let tx = downcast(tx)?;

        let mut qb: QueryBuilder<MySql> =
            QueryBuilder::new(format!("DELETE FROM {} WHERE friendship_id = ", self.tables.groups()));
        qb.push_bind(friendship_id)
            .push(" AND friend_id = ")
            .push_bind(friend.id)
            .push(" AND friend_type = ")
            .push_bind(friend.kind.clone());
        if let Some(group_id) = group_id {
            qb.push(" AND group_id = ").push_bind(group_id);
        }

        let res = qb
            .build()
            .execute(tx.conn()?)
            .await
            .map_err(|e| FriendshipError::Store(format!("delete group tags: {e}")))?;

        Ok(res.rows_affected())
    }
}
