use async_trait::async_trait;
use eventbook_db::table;
use eventbook_shared::{Error, Result, State};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::prelude::FromRow;
use ulid::Ulid;

use crate::{Event, event::EventRow, event::select_events};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub number_of_tickets: i64,
    pub created_at: i64,
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(
        &self,
        user_id: &str,
        event_id: &str,
        number_of_tickets: i64,
    ) -> Result<Booking>;
    async fn find_booking(&self, user_id: &str, event_id: &str) -> Result<Option<Booking>>;
    async fn delete_booking(&self, user_id: &str, event_id: &str) -> Result<()>;
    /// Events the user holds a booking for. Bookings whose event is gone are skipped.
    async fn booked_events(&self, user_id: &str) -> Result<Vec<Event>>;
}

#[derive(Clone)]
pub struct SqliteBookingRepository(pub State);

#[async_trait]
impl BookingRepository for SqliteBookingRepository {
    async fn create_booking(
        &self,
        user_id: &str,
        event_id: &str,
        number_of_tickets: i64,
    ) -> Result<Booking> {
        if number_of_tickets < 1 {
            eventbook_shared::invalid!("Number of tickets must be at least 1");
        }

        let mut tx = self.0.write_db.begin().await?;

        let statement = Query::select()
            .column(table::Event::Id)
            .from(table::Event::Table)
            .and_where(Expr::col(table::Event::Id).eq(event_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let event = sqlx::query_as_with::<_, (String,), _>(&sql, values)
            .fetch_optional(&mut *tx)
            .await?;

        if event.is_none() {
            return Err(Error::NotFound("Event"));
        }

        let booking = Booking {
            id: Ulid::new().to_string(),
            user_id: user_id.to_owned(),
            event_id: event_id.to_owned(),
            number_of_tickets,
            created_at: eventbook_shared::now(),
        };

        let statement = Query::insert()
            .into_table(table::Booking::Table)
            .columns([
                table::Booking::Id,
                table::Booking::UserId,
                table::Booking::EventId,
                table::Booking::NumberOfTickets,
                table::Booking::CreatedAt,
            ])
            .values_panic([
                booking.id.to_owned().into(),
                booking.user_id.to_owned().into(),
                booking.event_id.to_owned().into(),
                booking.number_of_tickets.into(),
                booking.created_at.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(&mut *tx).await {
            Ok(_) => {}
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                eventbook_shared::invalid!("Event already booked");
            }
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                return Err(Error::NotFound("User"));
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;

        tracing::info!(
            booking_id = %booking.id,
            user_id,
            event_id,
            number_of_tickets,
            "event booked"
        );

        Ok(booking)
    }

    async fn find_booking(&self, user_id: &str, event_id: &str) -> Result<Option<Booking>> {
        let statement = Query::select()
            .columns([
                table::Booking::Id,
                table::Booking::UserId,
                table::Booking::EventId,
                table::Booking::NumberOfTickets,
                table::Booking::CreatedAt,
            ])
            .from(table::Booking::Table)
            .and_where(Expr::col(table::Booking::UserId).eq(user_id))
            .and_where(Expr::col(table::Booking::EventId).eq(event_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Booking, _>(&sql, values)
            .fetch_optional(&self.0.read_db)
            .await?)
    }

    async fn delete_booking(&self, user_id: &str, event_id: &str) -> Result<()> {
        let statement = Query::delete()
            .from_table(table::Booking::Table)
            .and_where(Expr::col(table::Booking::UserId).eq(user_id))
            .and_where(Expr::col(table::Booking::EventId).eq(event_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.0.write_db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Booking"));
        }

        tracing::info!(user_id, event_id, "booking cancelled");

        Ok(())
    }

    async fn booked_events(&self, user_id: &str) -> Result<Vec<Event>> {
        let statement = select_events()
            .inner_join(
                table::Booking::Table,
                Expr::col((table::Booking::Table, table::Booking::EventId))
                    .equals((table::Event::Table, table::Event::Id)),
            )
            .and_where(Expr::col((table::Booking::Table, table::Booking::UserId)).eq(user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, EventRow, _>(&sql, values)
            .fetch_all(&self.0.read_db)
            .await?
            .into_iter()
            .map(Event::from)
            .collect())
    }
}
