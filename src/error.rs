/// Broad failure categories. Each maps to a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A random-variable spec cannot be sampled (bad weights, bad std dev, mixed modes).
    InvalidSpec,
    /// Any other invalid configuration value.
    Config,
    /// Nothing left to summarize after filtering.
    EmptyResultSet,
    /// Filesystem failure; the message names the offending path.
    Io,
    /// The run was cancelled between iterations.
    Cancelled,
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidSpec, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn empty_result_set(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyResultSet, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        match self.kind {
            ErrorKind::InvalidSpec | ErrorKind::Config => 2,
            ErrorKind::EmptyResultSet => 3,
            ErrorKind::Io => 4,
            ErrorKind::Cancelled => 5,
        }
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
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
