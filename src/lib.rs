//! Core library for the sbrp-data command line application.
//!
//! The library turns the GML-like graph dumps and the distance/time
//! workbooks of a school-bus routing instance into the CSV files the solver
//! reads. Parsing lives in [`sbrp::data::parse`], the record types in
//! [`sbrp::data::model`], file adapters under [`sbrp::data::io`], the optional
//! directed view in [`sbrp::data::graph`], and the end-to-end steps used by the
//! CLI in [`sbrp::data::pipeline`].

pub mod sbrp;

pub use sbrp::data::{Result, ToolError, error, graph, io, model, parse, pipeline};
