//! SeaORM implementation of UserRepository

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::principal::UserRole;
use crate::domain::user::{NewUser, User, UserRepository};
use crate::infrastructure::database::entities::user;
use crate::shared::{db_err, DomainError, DomainResult};

pub struct SeaOrmUserRepository<C = DatabaseConnection> {
    conn: Arc<C>,
}

impl<C> SeaOrmUserRepository<C> {
    pub fn new(conn: Arc<C>) -> Self {
        Self { conn }
    }
}

fn model_to_domain(m: user::Model) -> DomainResult<User> {
    let role = UserRole::from_str(&m.role).ok_or_else(|| {
        DomainError::Internal(format!("user {} has unknown role '{}'", m.id, m.role))
    })?;
    Ok(User {
        id: m.id,
        email: m.email,
        password_hash: m.password_hash,
        role,
        is_active: m.is_active,
        customer_id: m.customer_id,
        created_at: m.created_at,
        last_login_at: m.last_login_at,
    })
}

#[async_trait]
impl<C> UserRepository for SeaOrmUserRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, new: NewUser, now: DateTime<Utc>) -> DomainResult<User> {
        let model = user::ActiveModel {
            email: Set(new.email.to_lowercase()),
            password_hash: Set(new.password_hash),
            role: Set(new.role.as_str().to_string()),
            is_active: Set(true),
            customer_id: Set(new.customer_id),
            created_at: Set(now),
            last_login_at: Set(None),
            ..Default::default()
        };
        let saved = model.insert(self.conn.as_ref()).await.map_err(db_err)?;
        model_to_domain(saved)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        user::Entity::find_by_id(id)
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .one(self.conn.as_ref())
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_all(&self, role: Option<UserRole>) -> DomainResult<Vec<User>> {
        let mut query = user::Entity::find();
        if let Some(role) = role {
            query = query.filter(user::Column::Role.eq(role.as_str()));
        }
        let models = query
            .order_by_asc(user::Column::Id)
            .all(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn count(&self) -> DomainResult<u64> {
        user::Entity::find()
            .count(self.conn.as_ref())
            .await
            .map_err(db_err)
    }

    async fn touch_last_login(&self, id: i32, at: DateTime<Utc>) -> DomainResult<()> {
        user::Entity::update_many()
            .filter(user::Column::Id.eq(id))
            .col_expr(user::Column::LastLoginAt, Expr::value(at))
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn count_active_with_role(&self, role: UserRole) -> DomainResult<u64> {
        user::Entity::find()
            .filter(user::Column::Role.eq(role.as_str()))
            .filter(user::Column::IsActive.eq(true))
            .count(self.conn.as_ref())
            .await
            .map_err(db_err)
    }

    async fn update(&self, u: &User) -> DomainResult<()> {
        let model = user::ActiveModel {
            id: Set(u.id),
            password_hash: Set(u.password_hash.clone()),
            role: Set(u.role.as_str().to_string()),
            is_active: Set(u.is_active),
            ..Default::default()
        };
        model.update(self.conn.as_ref()).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => DomainError::not_found("User", u.id),
            other => db_err(other),
        })?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(self.conn.as_ref())
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", id));
        }
        Ok(())
    }
}
