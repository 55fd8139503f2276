mod account;
mod booking;
mod event;

pub use account::*;
pub use booking::*;
pub use event::*;
