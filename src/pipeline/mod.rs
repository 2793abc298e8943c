pub mod types;
pub mod prompt;
pub mod classify;
pub mod openrouter;
pub mod orchestrator;
pub mod parser;
pub mod repair;
pub mod normalize;

pub use types::*;
pub use prompt::*;
pub use classify::*;
pub use openrouter::*;
pub use orchestrator::*;
pub use parser::*;
pub use repair::*;
pub use normalize::*;

use thiserror::Error;

use self::classify::FailureKind;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("{0} is not configured")]
    Configuration(String),

    #[error("resume text is empty")]
    EmptyInput,

    #[error("resume extraction failed ({reason}): {detail}")]
    AllBackendsFailed {
        reason: FailureKind,
        detail: String,
    },

    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
