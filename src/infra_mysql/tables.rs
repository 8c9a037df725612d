use crate::domain_model::*;
use anyhow::anyhow;
use sqlx::{MySql, QueryBuilder};

pub const FRIENDSHIP_COLUMNS: &str = "f.id, f.sender_id, f.sender_type, f.recipient_id, \
     f.recipient_type, f.status, f.created_at, f.updated_at";

/// Configured table names, quoted and ready to splice into SQL.
#[derive(Debug, Clone)]
pub struct MySqlTables {
    friendships: String,
    groups: String,
}

impl MySqlTables {
    pub fn new(friendships: &str, groups: &str) -> anyhow::Result<Self> {
        Ok(Self {
            friendships: quote_ident(friendships)?,
            groups: quote_ident(groups)?,
        })
    }

    pub fn friendships(&self) -> &str {
        &self.friendships
    }

    pub fn groups(&self) -> &str {
        &self.groups
    }

    /// Appends ` WHERE ...` for `query`, with the friendship table aliased
    /// as `f`.
    pub fn push_where<'args>(&self, qb: &mut QueryBuilder<'args, MySql>, query: &FriendshipQuery) {
        qb.push(" WHERE 1=1");

        if let Some((a, b)) = &query.between {
            qb.push(" AND ((");
            push_side(qb, "sender", a);
            qb.push(" AND ");
            push_side(qb, "recipient", b);
            qb.push(") OR (");
            push_side(qb, "sender", b);
            qb.push(" AND ");
            push_side(qb, "recipient", a);
            qb.push("))");
        }
        if let Some(sender) = &query.sender {
            qb.push(" AND ");
            push_side(qb, "sender", sender);
        }
        if let Some(recipient) = &query.recipient {
            qb.push(" AND ");
            push_side(qb, "recipient", recipient);
        }
        if let Some(me) = &query.involving {
            qb.push(" AND ");
            push_either_side(qb, me);
        }
        if let Some(any) = &query.involving_any {
            if any.is_empty() {
                qb.push(" AND 1=0");
            } else {
                qb.push(" AND (");
                for (i, entity) in any.iter().enumerate() {
                    if i > 0 {
                        qb.push(" OR ");
                    }
                    push_either_side(qb, entity);
                }
                qb.push(")");
            }
        }
        if let Some(status) = query.status {
            qb.push(" AND f.status = ").push_bind(status.code());
        }
        if let Some(scope) = &query.group {
            qb.push(" AND EXISTS (SELECT 1 FROM ")
                .push(&self.groups)
                .push(" g WHERE g.friendship_id = f.id AND g.group_id = ")
                .push_bind(scope.group_id)
                .push(" AND NOT (g.friend_id = ")
                .push_bind(scope.viewer.id)
                .push(" AND g.friend_type = ")
                .push_bind(scope.viewer.kind.clone())
                .push("))");
        }
    }
}

fn push_side<'args>(qb: &mut QueryBuilder<'args, MySql>, side: &str, entity: &EntityRef) {
    qb.push(format!("(f.{side}_id = "))
        .push_bind(entity.id)
        .push(format!(" AND f.{side}_type = "))
        .push_bind(entity.kind.clone())
        .push(")");
}

fn push_either_side<'args>(qb: &mut QueryBuilder<'args, MySql>, entity: &EntityRef) {
    qb.push("(");
    push_side(qb, "sender", entity);
    qb.push(" OR ");
    push_side(qb, "recipient", entity);
    qb.push(")");
}

fn quote_ident(name: &str) -> anyhow::Result<String> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(anyhow!("invalid table name: {name:?}"));
    }
    Ok(format!("`{name}`"))
}
