//! Client-side core of PyBebra: the event model and wire protocol of the
//! optimization service, the incremental frame decoder, the run-state store
//! and the presentation model shared by every front end.

pub mod api;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod run;
pub mod view;
