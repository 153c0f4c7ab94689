//! Database query functions organized by table.

pub mod accounts;
pub mod distributions;
pub mod members;
pub mod pools;
pub mod settings;
