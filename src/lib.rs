#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub(crate) mod api;
pub mod app;
pub mod artifacts;
pub mod classification;
pub mod config;
pub mod error;
pub mod observability;
pub mod pipeline;
