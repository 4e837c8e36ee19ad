//! Date and time primitives: Julian code conversion and timezone shifts.

pub mod julian;
pub mod zones;

pub use julian::{decode, encode, sentinel_date};
pub use zones::{local_to_utc, utc_to_local, Zone};
