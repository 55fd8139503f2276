use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
pub enum User {
    Table,
    Id,
    Username,
    ImageUrl,
    Password,
    IsAdmin,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Event {
    Table,
    Id,
    Title,
    ImageUrl,
    Description,
    Date,
    Location,
    AdminId,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Booking {
    Table,
    Id,
    UserId,
    EventId,
    NumberOfTickets,
    CreatedAt,
}
