//! Domain logic for the Tabula dashboards.
//!
//! Pure functions and in-memory data structures only: the record table with
//! its CRUD operations, and the spreadsheet parsing / duplicate-removal
//! utilities. No I/O happens in this crate.

pub mod error;
pub mod records;
pub mod spreadsheet;
pub mod types;
