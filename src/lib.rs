//! Sales analytics over a superstore-style transaction table.
//!
//! Load once with [`data::loader::load_file`] (or [`session::DashboardSession::open`]),
//! then run the reports in [`analysis`] against the table or a filtered view.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod session;

pub use data::model::{SalesRecord, SalesTable};
pub use error::LoadError;
pub use session::DashboardSession;
