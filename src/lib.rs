//! Client-side data layer for the six-cities rental catalog.

pub mod actions;
pub mod api;
pub mod config;
pub mod model;
pub mod routes;
pub mod selectors;
pub mod store;
pub mod token;
