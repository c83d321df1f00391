//! HTTP surface of the HR dashboard: HTML pages, JSON endpoints and wiring.

pub mod api;
pub mod config;
pub mod http;
pub mod pages;
pub mod views;
