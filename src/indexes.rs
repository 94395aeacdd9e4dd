//! Index manager
//!
//! The index set is static: each schema declares its own indexes through
//! [`IntoIndexes`] and this module applies all of them. Indexes take the
//! server's default `<field>_<direction>` names, so applying twice leaves the
//! server unchanged and matches indexes created by other tools on the same
//! keys. The unique email index fails to build while duplicate emails exist.

use bson::{Bson, Document};
use mongodb::options::IndexOptions;
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::db::schemas::{
    AssignmentDoc, CourseDoc, EnrollmentDoc, LessonDoc, SubmissionDoc, UserDoc,
    ASSIGNMENT_COLLECTION, COURSE_COLLECTION, ENROLLMENT_COLLECTION, LESSON_COLLECTION,
    SUBMISSION_COLLECTION, USER_COLLECTION,
};
use crate::db::{IntoIndexes, MongoClient};
use crate::types::Result;

/// One declared index
#[derive(Debug, Clone)]
pub struct IndexDeclaration {
    pub collection: &'static str,
    pub keys: Document,
    pub options: Option<IndexOptions>,
}

impl IndexDeclaration {
    /// Explicit name if one was declared, otherwise the name the server
    /// derives from the keys (e.g. `title_1_category_1`)
    pub fn name(&self) -> String {
        match self.options.as_ref().and_then(|o| o.name.as_deref()) {
            Some(name) => name.to_string(),
            None => default_index_name(&self.keys),
        }
    }

    pub fn is_unique(&self) -> bool {
        self.options
            .as_ref()
            .and_then(|o| o.unique)
            .unwrap_or(false)
    }
}

/// MongoDB's generated index name for a key document
pub fn default_index_name(keys: &Document) -> String {
    keys.iter()
        .map(|(field, direction)| {
            let direction = match direction {
                Bson::Int32(n) => n.to_string(),
                Bson::Int64(n) => n.to_string(),
                Bson::Double(n) => n.to_string(),
                Bson::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("{}_{}", field, direction)
        })
        .collect::<Vec<_>>()
        .join("_")
}

fn declared<T: IntoIndexes>(collection: &'static str) -> impl Iterator<Item = IndexDeclaration> {
    T::into_indices()
        .into_iter()
        .map(move |(keys, options)| IndexDeclaration {
            collection,
            keys,
            options,
        })
}

/// Every index EduHub expects, in application order
pub fn declarations() -> Vec<IndexDeclaration> {
    declared::<UserDoc>(USER_COLLECTION)
        .chain(declared::<CourseDoc>(COURSE_COLLECTION))
        .chain(declared::<AssignmentDoc>(ASSIGNMENT_COLLECTION))
        .chain(declared::<EnrollmentDoc>(ENROLLMENT_COLLECTION))
        .chain(declared::<LessonDoc>(LESSON_COLLECTION))
        .chain(declared::<SubmissionDoc>(SUBMISSION_COLLECTION))
        .collect()
}

async fn apply_for<T>(db: &MongoClient, collection: &'static str) -> Result<usize>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
{
    let applied = db.collection::<T>(collection).apply_indexes().await?;
    if applied > 0 {
        info!("Applied {} index(es) on '{}'", applied, collection);
    }
    Ok(applied)
}

/// Create every declared index. Returns how many declarations were sent.
pub async fn apply_indexes(db: &MongoClient) -> Result<usize> {
    let mut total = 0;
    total += apply_for::<UserDoc>(db, USER_COLLECTION).await?;
    total += apply_for::<CourseDoc>(db, COURSE_COLLECTION).await?;
    total += apply_for::<AssignmentDoc>(db, ASSIGNMENT_COLLECTION).await?;
    total += apply_for::<EnrollmentDoc>(db, ENROLLMENT_COLLECTION).await?;
    total += apply_for::<LessonDoc>(db, LESSON_COLLECTION).await?;
    total += apply_for::<SubmissionDoc>(db, SUBMISSION_COLLECTION).await?;

    info!("Index declarations applied ({} total)", total);
    Ok(total)
}
