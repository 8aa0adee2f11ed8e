pub mod builder;
pub mod bundle;
pub mod changes;
pub mod comment;
pub mod config;
pub mod error;
pub mod git;
pub mod interactive;
pub mod io;
pub mod lint;
pub mod manifest;
pub mod paths;
pub mod preview;
pub mod project;
pub mod report;
pub mod scaffold;
pub mod screenshot;
pub mod validate;
pub mod workflow;

pub use error::{Result, ShutterError};
