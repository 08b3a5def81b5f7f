use thiserror::Error as DError;

#[derive(Debug, Clone, DError)]
pub enum ErrorKind {
    #[error("Worker pool size must be at least one")]
    InvalidPoolSize,
}
