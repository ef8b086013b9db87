pub mod error;
pub mod graph;
pub mod io;
pub mod model;
pub mod parse;
pub mod pipeline;

pub use error::{Result, ToolError};
