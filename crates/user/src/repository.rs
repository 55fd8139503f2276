use async_trait::async_trait;
use eventbook_db::table;
use eventbook_shared::{Error, Result, State};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::prelude::FromRow;
use ulid::Ulid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub image_url: Option<String>,
    pub is_admin: bool,
    pub created_at: i64,
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    username: String,
    image_url: Option<String>,
    is_admin: bool,
    created_at: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            image_url: row.image_url,
            is_admin: row.is_admin,
            created_at: row.created_at,
        }
    }
}

/// Stored login material for one user. The hash never leaves this crate's callers.
#[derive(FromRow)]
pub struct Credentials {
    pub id: String,
    pub password: String,
}

pub struct NewUser {
    pub username: String,
    pub image_url: Option<String>,
    pub password_hash: String,
    pub is_admin: bool,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_credentials(&self, username: &str) -> Result<Option<Credentials>>;
    async fn set_admin(&self, id: &str, is_admin: bool) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct SqliteUserRepository(pub State);

impl SqliteUserRepository {
    async fn find(&self, column: table::User, value: &str) -> Result<Option<User>> {
        let statement = Query::select()
            .columns([
                table::User::Id,
                table::User::Username,
                table::User::ImageUrl,
                table::User::IsAdmin,
                table::User::CreatedAt,
            ])
            .from(table::User::Table)
            .and_where(Expr::col(column).eq(value))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?
            .map(User::from))
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: NewUser) -> Result<User> {
        let id = Ulid::new().to_string();
        let created_at = eventbook_shared::now();

        let statement = Query::insert()
            .into_table(table::User::Table)
            .columns([
                table::User::Id,
                table::User::Username,
                table::User::ImageUrl,
                table::User::Password,
                table::User::IsAdmin,
                table::User::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                user.username.to_owned().into(),
                user.image_url.to_owned().into(),
                user.password_hash.into(),
                user.is_admin.into(),
                created_at.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values)
            .execute(&self.0.write_db)
            .await
        {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(Error::DuplicateUsername);
            }
            Err(e) => return Err(e.into()),
        }

        Ok(User {
            id,
            username: user.username,
            image_url: user.image_url,
            is_admin: user.is_admin,
            created_at,
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        self.find(table::User::Id, id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.find(table::User::Username, username).await
    }

    async fn find_credentials(&self, username: &str) -> Result<Option<Credentials>> {
        let statement = Query::select()
            .columns([table::User::Id, table::User::Password])
            .from(table::User::Table)
            .and_where(Expr::col(table::User::Username).eq(username))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Credentials, _>(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?)
    }

    async fn set_admin(&self, id: &str, is_admin: bool) -> Result<()> {
        let statement = Query::update()
            .table(table::User::Table)
            .value(table::User::IsAdmin, is_admin)
            .and_where(Expr::col(table::User::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.0.write_db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("User"));
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let statement = Query::delete()
            .from_table(table::User::Table)
            .and_where(Expr::col(table::User::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.0.write_db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("User"));
        }

        tracing::info!(user_id = %id, "user deleted with owned events and bookings");

        Ok(())
    }
}
