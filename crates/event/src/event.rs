use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eventbook_db::table;
use eventbook_shared::{Error, Result, State};
use sea_query::{Expr, ExprTrait, Order, Query, SelectStatement, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::prelude::FromRow;
use ulid::Ulid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub admin_id: String,
    pub created_at: i64,
}

#[derive(FromRow)]
pub(crate) struct EventRow {
    id: String,
    title: String,
    image_url: Option<String>,
    description: String,
    date: i64,
    location: String,
    admin_id: String,
    created_at: i64,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            image_url: row.image_url,
            description: row.description,
            date: eventbook_shared::from_unix(row.date),
            location: row.location,
            admin_id: row.admin_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Default, Validate)]
pub struct NewEvent {
    #[validate(length(max = 150))]
    pub title: String,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
    pub description: String,
    pub date: String,
    #[validate(length(max = 200))]
    pub location: String,
}

/// Fields left as `None` keep their stored value. An empty `image_url` clears it.
#[derive(Debug, Default, Validate)]
pub struct EventPatch {
    #[validate(length(min = 1, max = 150))]
    pub title: Option<String>,
    /// `Some(None)` clears the image; `None` leaves it unchanged.
    #[validate(length(max = 255))]
    pub image_url: Option<Option<String>>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub date: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.image_url.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.location.is_none()
    }
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create_event(&self, admin_id: &str, input: NewEvent) -> Result<Event>;
    async fn list_events(&self) -> Result<Vec<Event>>;
    async fn find_event(&self, id: &str) -> Result<Option<Event>>;
    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<Event>;
    async fn delete_event(&self, id: &str) -> Result<()>;
    async fn list_events_by_admin(&self, admin_id: &str) -> Result<Vec<Event>>;
}

/// Event columns qualified by table, ordered by date then id.
pub(crate) fn select_events() -> SelectStatement {
    Query::select()
        .columns([
            (table::Event::Table, table::Event::Id),
            (table::Event::Table, table::Event::Title),
            (table::Event::Table, table::Event::ImageUrl),
            (table::Event::Table, table::Event::Description),
            (table::Event::Table, table::Event::Date),
            (table::Event::Table, table::Event::Location),
            (table::Event::Table, table::Event::AdminId),
            (table::Event::Table, table::Event::CreatedAt),
        ])
        .from(table::Event::Table)
        .order_by((table::Event::Table, table::Event::Date), Order::Asc)
        .order_by((table::Event::Table, table::Event::Id), Order::Asc)
        .to_owned()
}

#[derive(Clone)]
pub struct SqliteEventRepository(pub State);

impl SqliteEventRepository {
    async fn fetch_all(&self, statement: SelectStatement) -> Result<Vec<Event>> {
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, EventRow, _>(&sql, values)
            .fetch_all(&self.0.read_db)
            .await?
            .into_iter()
            .map(Event::from)
            .collect())
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn create_event(&self, admin_id: &str, input: NewEvent) -> Result<Event> {
        if [&input.title, &input.description, &input.date, &input.location]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            eventbook_shared::invalid!("Missing required fields");
        }

        input.validate()?;

        let date = eventbook_shared::parse_timestamp(&input.date)?;
        let image_url = input.image_url.filter(|url| !url.is_empty());
        let id = Ulid::new().to_string();
        let created_at = eventbook_shared::now();

        let statement = Query::insert()
            .into_table(table::Event::Table)
            .columns([
                table::Event::Id,
                table::Event::Title,
                table::Event::ImageUrl,
                table::Event::Description,
                table::Event::Date,
                table::Event::Location,
                table::Event::AdminId,
                table::Event::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                input.title.to_owned().into(),
                image_url.to_owned().into(),
                input.description.to_owned().into(),
                date.timestamp().into(),
                input.location.to_owned().into(),
                admin_id.into(),
                created_at.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values)
            .execute(&self.0.write_db)
            .await
        {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                return Err(Error::NotFound("User"));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(event_id = %id, admin_id, "event created");

        Ok(Event {
            id,
            title: input.title,
            image_url,
            description: input.description,
            date,
            location: input.location,
            admin_id: admin_id.to_owned(),
            created_at,
        })
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        self.fetch_all(select_events()).await
    }

    async fn find_event(&self, id: &str) -> Result<Option<Event>> {
        let statement = select_events()
            .and_where(Expr::col((table::Event::Table, table::Event::Id)).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, EventRow, _>(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?
            .map(Event::from))
    }

    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<Event> {
        patch.validate()?;

        let date = patch
            .date
            .as_deref()
            .map(eventbook_shared::parse_timestamp)
            .transpose()?;

        let select = select_events()
            .and_where(Expr::col((table::Event::Table, table::Event::Id)).eq(id))
            .limit(1)
            .to_owned();

        let mut tx = self.0.write_db.begin().await?;

        let (sql, values) = select.build_sqlx(SqliteQueryBuilder);
        let exists = sqlx::query_as_with::<_, EventRow, _>(&sql, values)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();

        if !exists {
            return Err(Error::NotFound("Event"));
        }

        if !patch.is_empty() {
            let mut statement = Query::update();
            statement
                .table(table::Event::Table)
                .and_where(Expr::col(table::Event::Id).eq(id));

            if let Some(title) = patch.title {
                statement.value(table::Event::Title, title);
            }

            if let Some(image_url) = patch.image_url {
                let image_url = image_url.filter(|url| !url.is_empty());
                statement.value(table::Event::ImageUrl, image_url);
            }

            if let Some(description) = patch.description {
                statement.value(table::Event::Description, description);
            }

            if let Some(date) = date {
                statement.value(table::Event::Date, date.timestamp());
            }

            if let Some(location) = patch.location {
                statement.value(table::Event::Location, location);
            }

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        }

        let (sql, values) = select.build_sqlx(SqliteQueryBuilder);
        let Some(row) = sqlx::query_as_with::<_, EventRow, _>(&sql, values)
            .fetch_optional(&mut *tx)
            .await?
        else {
            eventbook_shared::bail!("event {id} vanished during update");
        };

        tx.commit().await?;

        tracing::info!(event_id = %id, "event updated");

        Ok(row.into())
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        let statement = Query::delete()
            .from_table(table::Event::Table)
            .and_where(Expr::col(table::Event::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.0.write_db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Event"));
        }

        tracing::info!(event_id = %id, "event deleted with its bookings");

        Ok(())
    }

    async fn list_events_by_admin(&self, admin_id: &str) -> Result<Vec<Event>> {
        let statement = select_events()
            .and_where(Expr::col((table::Event::Table, table::Event::AdminId)).eq(admin_id))
            .to_owned();

        self.fetch_all(statement).await
    }
}
