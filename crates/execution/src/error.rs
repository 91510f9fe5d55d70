use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("gave up after {attempts} consecutive failed connection attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}
