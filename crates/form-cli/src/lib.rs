//! Library half of the `formnav` command: logging setup, outlines and
//! scripted filling.

pub mod logging;
pub mod outline;
pub mod script;
