//! Error types
//!
//! The simulation itself never fails; only the data it is fed and the GPU
//! setup around it can.

/// Problems found while loading or validating levels and quiz questions
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to parse quiz bank: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Quiz bank is empty")]
    EmptyBank,

    #[error("Question {index} has an empty prompt")]
    EmptyPrompt { index: usize },

    #[error("Question {index} needs at least two options, found {found}")]
    TooFewOptions { index: usize, found: usize },

    #[error("Question {index} lists option {option:?} twice")]
    DuplicateOption { index: usize, option: String },

    #[error("Question {index}: correct answer {answer:?} is not one of the options")]
    AnswerNotInOptions { index: usize, answer: String },

    #[error("Level table is empty")]
    NoLevels,

    #[error("Level {level}: {reason}")]
    InvalidLevel { level: u32, reason: &'static str },
}

/// GPU setup failures
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Surface reports no supported formats")]
    NoSurfaceFormat,
}
