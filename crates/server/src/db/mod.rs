//! Record store adapter for user documents.
//!
//! # Database: `MongoDB`
//!
//! One collection of user documents, keyed by `_id` (an `ObjectId` assigned on
//! insert). The database and collection names are fixed at startup.
//!
//! ## Document shape
//!
//! ```text
//! { "_id": ObjectId, ...client fields }
//! ```
//!
//! # Timeouts
//!
//! Every store call is bounded: [`OPERATION_TIMEOUT`] for reads and writes,
//! [`CONNECT_TIMEOUT`] for the initial connection. An expired call is dropped
//! and surfaces as [`RepositoryError::Timeout`].

#[cfg(test)]
pub mod memory;
pub mod users;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ClientOptions;
use mongodb::Client;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use user_service_core::{User, UserFields, UserId};

#[cfg(test)]
pub use memory::MemoryUserStore;
pub use users::MongoUserStore;

/// Upper bound for a single read or write.
pub const OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound for establishing the initial connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Application name reported to the server in the connection handshake.
const APP_NAME: &str = "user-service";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(mongodb::error::Error),

    /// The operation did not complete within its time bound.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// The input cannot be represented as a stored document.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl From<mongodb::error::Error> for RepositoryError {
    /// Driver errors caused by the document itself are the caller's fault;
    /// everything else means the store could not serve the request.
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(_))
            | ErrorKind::InvalidArgument { .. }
            | ErrorKind::BsonSerialization(_) => Self::InvalidArgument(err.to_string()),
            _ => Self::Unavailable(err),
        }
    }
}

/// Persistence operations for users.
///
/// Implementations must be safe to share across request tasks.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this identifier.
    async fn find_by_id(&self, id: UserId) -> Result<User, RepositoryError>;

    /// Persist a new user under a freshly assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidArgument` if the store rejects the
    /// document, `RepositoryError::Unavailable` if it cannot be reached.
    async fn insert(&self, fields: UserFields) -> Result<User, RepositoryError>;

    /// Remove a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if nothing was removed.
    async fn delete_by_id(&self, id: UserId) -> Result<(), RepositoryError>;

    /// Check that the store answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Run a store call, giving up after `limit`.
///
/// # Errors
///
/// Returns `RepositoryError::Timeout` if `limit` elapses first, otherwise
/// whatever the call returned.
pub async fn with_timeout<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, RepositoryError>>,
) -> Result<T, RepositoryError> {
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| RepositoryError::Timeout(limit))?
}

/// Connect to `MongoDB` and verify the deployment answers a ping.
///
/// The returned client owns an internal connection pool and is cheap to clone.
///
/// # Arguments
///
/// * `database_url` - `MongoDB` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `RepositoryError::InvalidArgument` if the URL cannot be parsed,
/// `RepositoryError::Unavailable` if the server cannot be reached, and
/// `RepositoryError::Timeout` after [`CONNECT_TIMEOUT`].
pub async fn connect(database_url: &SecretString) -> Result<Client, RepositoryError> {
    with_timeout(CONNECT_TIMEOUT, async {
        let mut options = ClientOptions::parse(database_url.expose_secret()).await?;
        options.app_name = Some(APP_NAME.to_owned());
        options.connect_timeout = Some(CONNECT_TIMEOUT);

        let client = Client::with_options(options)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        Ok::<_, RepositoryError>(client)
    })
    .await
}
