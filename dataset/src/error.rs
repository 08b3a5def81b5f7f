use thiserror::Error as DError;

#[derive(Debug, Clone, DError)]
pub enum ErrorKind {
    #[error("Malformed row at line {0}, expected user,item,score")]
    MalformedRow(usize),

    #[error("Couldn't parse score at line {0}")]
    InvalidScore(usize),
}
