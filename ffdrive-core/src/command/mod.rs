//! ffmpeg command-line construction.
//!
//! [`TranscodeRequest`] describes one invocation; [`assemble`] renders it into
//! the single command-line string handed to a [`crate::external::ToolInvoker`].

mod assembler;
pub mod escape;
mod request;

pub use assembler::{NULL_OUTPUT, assemble};
pub use request::{ComplexFilter, TranscodeRequest};
pub(crate) use request::is_blank_path;
