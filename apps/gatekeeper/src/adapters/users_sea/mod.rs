//! SeaORM adapter for the user store.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set,
};

use crate::entities::users;
use crate::repos::users::{NewUser, StoreError, UserRecord, UserStore};

pub mod dto;

pub use dto::UserUpsert;

// Adapter functions return DbErr; the store maps to StoreError via From<DbErr>.

pub async fn find_user_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find_by_id(email.to_string()).one(conn).await
}

pub async fn upsert_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserUpsert,
) -> Result<users::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let email = dto.email.clone();
    let user_active = users::ActiveModel {
        email: Set(dto.email),
        name: Set(dto.name),
        password_hash: Set(dto.password_hash),
        role: Set(dto.role),
        created_at: Set(now),
        updated_at: Set(now),
    };

    // created_at is left out of the update set so overwrites keep it
    users::Entity::insert(user_active)
        .on_conflict(
            OnConflict::column(users::Column::Email)
                .update_columns([
                    users::Column::Name,
                    users::Column::PasswordHash,
                    users::Column::Role,
                    users::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    find_user_by_email(conn, &email)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound(format!("users.email {email} vanished")))
}

pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<bool, sea_orm::DbErr> {
    let result = users::Entity::delete_by_id(email.to_string())
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offset: u64,
) -> Result<Vec<users::Model>, sea_orm::DbErr> {
    // SQLite rejects OFFSET without LIMIT; i64::MAX is the largest bound both backends accept
    users::Entity::find()
        .order_by_desc(users::Column::UpdatedAt)
        .order_by_asc(users::Column::Email)
        .offset(offset)
        .limit(i64::MAX as u64)
        .all(conn)
        .await
}

/// [`UserStore`] over a pooled SeaORM connection.
#[derive(Debug, Clone)]
pub struct SeaUserStore {
    db: DatabaseConnection,
}

impl SeaUserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for SeaUserStore {
    async fn find(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(find_user_by_email(&self.db, email)
            .await?
            .map(UserRecord::from))
    }

    async fn upsert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        Ok(upsert_user(&self.db, user.into()).await?.into())
    }

    async fn delete(&self, email: &str) -> Result<bool, StoreError> {
        Ok(delete_user(&self.db, email).await?)
    }

    async fn list(&self, offset: u64) -> Result<Vec<UserRecord>, StoreError> {
        let rows = list_users(&self.db, offset).await?;
        Ok(rows.into_iter().map(UserRecord::from).collect())
    }
}
