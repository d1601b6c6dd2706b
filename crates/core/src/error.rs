use thiserror::Error;

use crumbtrail_router::RouterError;

pub type Result<T> = std::result::Result<T, TrailError>;

#[derive(Error, Debug)]
pub enum TrailError {
    /// The session's active route could not be resolved
    #[error(transparent)]
    Router(#[from] RouterError),
}
