use thiserror::Error;

/// A failure local to one channel's calibration pipeline.
///
/// Channel failures never abort the whole process: the remaining channels
/// still run. The combined export, however, requires every channel to have
/// reached a calibration.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// No input file was selected for the channel.
    #[error("no input file provided")]
    InputNotProvided,

    /// A record in the centroid CSV did not parse as two numeric fields.
    #[error("record {line}: {message}")]
    Parse { line: usize, message: String },

    /// The spatial-profile fit did not converge.
    #[error("spatial profile fit did not converge: {0}")]
    FitDivergence(String),

    /// Detected peak count differs from the known-line count.
    #[error("found {found} peaks, expected {expected} known emission lines")]
    PeakCountMismatch { found: usize, expected: usize },

    /// The source could not be opened or read.
    #[error("{0}")]
    Io(String),
}

/// Application-level error carrying a process exit code.
///
/// Exit codes: 2 = input/usage, 3 = data, 4 = numeric.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ChannelError> for AppError {
    fn from(err: ChannelError) -> Self {
        let code = match &err {
            ChannelError::InputNotProvided | ChannelError::Io(_) => 2,
            ChannelError::Parse { .. } => 3,
            ChannelError::FitDivergence(_) | ChannelError::PeakCountMismatch { .. } => 4,
        };
        AppError::new(code, err.to_string())
    }
}
