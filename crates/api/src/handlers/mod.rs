pub mod records;
pub mod sessions;
pub mod uploads;
