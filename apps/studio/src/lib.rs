//! Resume Studio engine.
//!
//! A single resume content model owned by [`store::ResumeStore`], three
//! layout renderers that turn a snapshot into a [`layout::LayoutTree`], an
//! A4 paginator, and an exporter that paints the same tree into a PDF on a
//! background task. The `studio` binary is a thin command-line host over
//! this library.

pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod layout;
pub mod models;
pub mod scoring;
pub mod store;
