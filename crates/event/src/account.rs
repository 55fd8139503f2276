use eventbook_shared::{Error, Result};
use eventbook_user::{User, UserRepository};

use crate::{BookingRepository, Event};

/// Load a user together with the events they booked, in date order.
pub async fn get_user_with_bookings(
    users: &dyn UserRepository,
    bookings: &dyn BookingRepository,
    user_id: &str,
) -> Result<(User, Vec<Event>)> {
    let Some(user) = users.find_by_id(user_id).await? else {
        return Err(Error::NotFound("User"));
    };

    let events = bookings.booked_events(user_id).await?;

    Ok((user, events))
}
