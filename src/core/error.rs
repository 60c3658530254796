//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A file sink could not be opened or written
    #[error("File sink error for '{path}': {source}")]
    FileSink {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Console sink write failure
    #[error("Console sink error: {0}")]
    ConsoleSink(#[source] std::io::Error),

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Configuration file could not be read
    #[error("Failed to read configuration file '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A delivery thread could not be started
    #[error("Failed to spawn {role} thread: {source}")]
    WorkerSpawn {
        role: String,
        #[source]
        source: std::io::Error,
    },

    /// The process-wide logger was installed twice
    #[error("Global logger already initialized")]
    AlreadyInitialized,

    /// A sink panicked while writing
    #[error("Sink '{sink}' panicked: {message}")]
    SinkPanicked { sink: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::FileSink {
            path: path.into(),
            source,
        }
    }

    pub fn config_read(path: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::ConfigRead {
            path: path.into(),
            source,
        }
    }

    /// Create a worker spawn error
    pub fn worker_spawn(role: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::WorkerSpawn {
            role: role.into(),
            source,
        }
    }

    /// Create a sink panic error from a `catch_unwind` payload
    pub fn sink_panicked(sink: impl Into<String>, payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        LoggerError::SinkPanicked {
            sink: sink.into(),
            message,
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
