use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShutterError {
    #[error("invalid service name '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidTenant(String),

    #[error("template directory not found: {0}")]
    TemplateDirNotFound(String),

    #[error("must be run from the shuttering template directory (no {0} found)")]
    NotAProject(String),

    #[error("validation-results.json not found at: {0}")]
    ResultsNotFound(String),

    #[error("page not built: {0}")]
    PageNotBuilt(String),

    #[error("no services given: pass at least one --service=<name>")]
    NoServices,

    #[error("tool not found on PATH: {0}")]
    ToolNotFound(String),

    #[error("failed to spawn {tool}: {reason}")]
    ToolSpawnFailed { tool: String, reason: String },

    #[error("{tool} exited with {status}: {output}")]
    ToolFailed {
        tool: String,
        status: String,
        output: String,
    },

    #[error("git error: {0}")]
    Git(String),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("HTML validation failed for {0}")]
    ValidationFailed(String),

    #[error("prompt error: {0}")]
    Prompt(String),

    #[error(transparent)]
    Template(#[from] minijinja::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShutterError>;
