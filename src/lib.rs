//! Seatcart
//!
//! Seatcart is a client-side lesson booking engine: it keeps a catalog of lessons with limited
//! seats, stages and commits reservations into a cart without ever overselling a seat, and
//! reconciles those reservations whenever the catalog is reloaded from the backend.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod fixtures;
pub mod forms;
pub mod gateway;
pub mod lessons;
pub mod notices;
pub mod observability;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod render;
pub mod selection;
pub mod storefront;
pub mod views;
