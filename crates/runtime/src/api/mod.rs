//! Public runtime API surface.
//!
//! The Action API is implemented directly on [`crate::Runtime`]: primitive
//! actions and queries in `actions`, path-following in `navigation`. This
//! module also gathers the error type and the script abstraction.

mod actions;
pub mod errors;
mod navigation;
pub mod script;

pub use errors::{Result, RuntimeError};
pub use script::{ActionScript, ScriptOutcome, run_script};
