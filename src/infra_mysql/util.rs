use super::repo_tx_mysql::{MYSQL_BACKEND, MySqlTx};
use crate::application_port::FriendshipError;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::mysql::{MySqlDatabaseError, MySqlRow};
use sqlx::Row;

pub fn downcast<'a, 't>(
    tx: &'a mut dyn StorageTx<'t>,
) -> Result<&'a mut MySqlTx<'t>, FriendshipError> {
    if tx.backend() != MYSQL_BACKEND {
        return Err(FriendshipError::Store(format!(
            "expected a {MYSQL_BACKEND} transaction, got {}",
            tx.backend()
        )));
    }

    // SAFETY: MySqlTx is the only StorageTx reporting MYSQL_BACKEND.
    unsafe {
        let p = tx as *mut dyn StorageTx<'t>;
        let p = p as *mut MySqlTx<'t>;
        Ok(&mut *p)
    }
}

pub fn is_dup_key(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db) = err {
        if let Some(mysql_err) = db.try_downcast_ref::<MySqlDatabaseError>() {
            return mysql_err.number() == 1062; // ER_DUP_ENTRY
        }
    }

    false
}

pub fn decode_friendship(row: &MySqlRow) -> Result<FriendshipRecord, FriendshipError> {
    let decode = |e: sqlx::Error| FriendshipError::Store(format!("decode friendship: {e}"));

    let status: i8 = row.try_get("status").map_err(decode)?;

    Ok(FriendshipRecord {
        id: row.try_get::<FriendshipId, _>("id").map_err(decode)?,
        sender: EntityRef::new(
            row.try_get::<String, _>("sender_type").map_err(decode)?,
            row.try_get::<EntityId, _>("sender_id").map_err(decode)?,
        ),
        recipient: EntityRef::new(
            row.try_get::<String, _>("recipient_type").map_err(decode)?,
            row.try_get::<EntityId, _>("recipient_id").map_err(decode)?,
        ),
        status: FriendshipStatus::try_from(status)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}
