//! `MongoDB`-backed user store.
//!
//! Client fields are stored as-is next to the `_id`. JSON values are mapped to
//! BSON one to one, so `$`-prefixed objects in client input (`{"$date": ..}`,
//! `{"$numberLong": ..}`) stay ordinary sub-documents and read back unchanged.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Client, Collection, Database};
use serde_json::Value;
use tracing::{debug, instrument};

use user_service_core::{User, UserFields, UserId};

use super::{OPERATION_TIMEOUT, RepositoryError, UserStore, with_timeout};

/// Repository for user documents in one fixed collection.
#[derive(Clone)]
pub struct MongoUserStore {
    database: Database,
    collection: Collection<Document>,
}

impl MongoUserStore {
    /// Create a user store over `database.collection`.
    #[must_use]
    pub fn new(client: &Client, database: &str, collection: &str) -> Self {
        let database = client.database(database);
        let collection = database.collection::<Document>(collection);
        Self {
            database,
            collection,
        }
    }

    /// Namespace this store reads and writes, as `database.collection`.
    #[must_use]
    pub fn namespace(&self) -> String {
        self.collection.namespace().to_string()
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    #[instrument(skip(self), fields(user_id = %id))]
    async fn find_by_id(&self, id: UserId) -> Result<User, RepositoryError> {
        let filter = doc! { "_id": ObjectId::from(id) };

        let document = with_timeout(OPERATION_TIMEOUT, async move {
            self.collection
                .find_one(filter)
                .await
                .map_err(RepositoryError::from)
        })
        .await?
        .ok_or(RepositoryError::NotFound)?;

        user_from_document(document)
    }

    #[instrument(skip(self, record), fields(field_count = record.len()))]
    async fn insert(&self, record: UserFields) -> Result<User, RepositoryError> {
        let oid = ObjectId::new();
        let document = document_from_fields(oid, &record)?;

        with_timeout(OPERATION_TIMEOUT, async move {
            self.collection
                .insert_one(document)
                .await
                .map_err(RepositoryError::from)
        })
        .await?;

        debug!(user_id = %oid, "user inserted");
        Ok(User::new(UserId::from(oid), record))
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn delete_by_id(&self, id: UserId) -> Result<(), RepositoryError> {
        let filter = doc! { "_id": ObjectId::from(id) };

        let result = with_timeout(OPERATION_TIMEOUT, async move {
            self.collection
                .delete_one(filter)
                .await
                .map_err(RepositoryError::from)
        })
        .await?;

        if result.deleted_count == 0 {
            return Err(RepositoryError::NotFound);
        }

        debug!("user deleted");
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        with_timeout(OPERATION_TIMEOUT, async move {
            self.database
                .run_command(doc! { "ping": 1 })
                .await
                .map(|_| ())
                .map_err(RepositoryError::from)
        })
        .await
    }
}

/// Build the stored document for a new user.
///
/// `_id` comes first, followed by the client fields.
fn document_from_fields(oid: ObjectId, fields: &UserFields) -> Result<Document, RepositoryError> {
    let mut document = doc! { "_id": oid };
    for (key, value) in fields.as_map() {
        document.insert(key.clone(), bson_from_json(value)?);
    }
    Ok(document)
}

fn bson_from_json(value: &Value) -> Result<Bson, RepositoryError> {
    Ok(match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Bson::Int64(i)
            } else if n.is_u64() {
                return Err(RepositoryError::InvalidArgument(format!(
                    "integer {n} is out of range"
                )));
            } else {
                Bson::Double(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => Bson::Array(
            items
                .iter()
                .map(bson_from_json)
                .collect::<Result<Vec<_>, RepositoryError>>()?,
        ),
        Value::Object(map) => {
            let mut document = Document::new();
            for (key, value) in map {
                document.insert(key.clone(), bson_from_json(value)?);
            }
            Bson::Document(document)
        }
    })
}

/// Convert a stored document back into a user.
fn user_from_document(mut document: Document) -> Result<User, RepositoryError> {
    let id = match document.remove("_id") {
        Some(Bson::ObjectId(oid)) => UserId::from(oid),
        Some(other) => {
            return Err(RepositoryError::DataCorruption(format!(
                "user _id is not an ObjectId: {other}"
            )));
        }
        None => {
            return Err(RepositoryError::DataCorruption(
                "user document has no _id".to_owned(),
            ));
        }
    };

    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => Ok(User::new(id, UserFields::from_map(map))),
        other => Err(RepositoryError::DataCorruption(format!(
            "user document did not convert to an object: {other}"
        ))),
    }
}
