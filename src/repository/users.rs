//! User accessors

use bson::{doc, oid::ObjectId, DateTime, Document};

use crate::db::schemas::{Role, UserDoc, USER_COLLECTION};
use crate::db::{MongoClient, MongoCollection, PlannedQuery};
use crate::types::{EduHubError, Result};

/// Partial profile update; only the fields that are set are written
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl ProfileUpdate {
    /// The `$set` body for this update
    pub fn to_set_document(&self) -> Document {
        let mut set = doc! {};

        if let Some(ref first_name) = self.first_name {
            set.insert("firstName", first_name);
        }
        if let Some(ref last_name) = self.last_name {
            set.insert("lastName", last_name);
        }
        if let Some(ref bio) = self.bio {
            set.insert("profile.bio", bio);
        }
        if let Some(ref avatar) = self.avatar {
            set.insert("profile.avatar", avatar);
        }
        if let Some(ref skills) = self.skills {
            set.insert("profile.skills", skills.clone());
        }

        set
    }
}

/// Accessors for the `users` collection
#[derive(Debug, Clone)]
pub struct UserRepository {
    collection: MongoCollection<UserDoc>,
}

impl UserRepository {
    pub fn new(mongo: &MongoClient) -> Self {
        Self {
            collection: mongo.collection::<UserDoc>(USER_COLLECTION),
        }
    }

    pub fn collection(&self) -> &MongoCollection<UserDoc> {
        &self.collection
    }

    /// Insert a student
    pub async fn add_student_user(&self, user: UserDoc) -> Result<ObjectId> {
        if user.role != Role::Student {
            return Err(EduHubError::InvalidInput(format!(
                "user {} is not a student",
                user.user_id
            )));
        }
        self.collection.insert_one(user).await
    }

    /// Insert any user regardless of role
    pub async fn add_user(&self, user: UserDoc) -> Result<ObjectId> {
        self.collection.insert_one(user).await
    }

    pub async fn insert_many(&self, users: Vec<UserDoc>) -> Result<usize> {
        self.collection.insert_many(users).await
    }

    /// Get a user by domain ID
    pub async fn get(&self, user_id: &str) -> Result<Option<UserDoc>> {
        self.collection.find_one(doc! { "userId": user_id }).await
    }

    pub fn active_students_query() -> PlannedQuery {
        PlannedQuery::find(
            USER_COLLECTION,
            doc! { "role": Role::Student.as_str(), "isActive": true },
        )
        .with_sort(doc! { "userId": 1 })
    }

    /// Active students ordered by ID
    pub async fn get_active_students(&self) -> Result<Vec<UserDoc>> {
        self.collection
            .find_planned(Self::active_students_query())
            .await
    }

    pub fn recent_users_query(since: DateTime) -> PlannedQuery {
        PlannedQuery::find(USER_COLLECTION, doc! { "dateJoined": { "$gte": since } })
            .with_sort(doc! { "dateJoined": -1 })
    }

    /// Users who joined at or after `since`, newest first
    pub async fn recent_users(&self, since: DateTime) -> Result<Vec<UserDoc>> {
        self.collection
            .find_planned(Self::recent_users_query(since))
            .await
    }

    /// Apply a partial profile update. Returns whether the user exists.
    pub async fn update_user_profile(&self, user_id: &str, update: &ProfileUpdate) -> Result<bool> {
        let set = update.to_set_document();
        if set.is_empty() {
            return Err(EduHubError::InvalidInput("empty profile update".into()));
        }

        let result = self
            .collection
            .update_one(doc! { "userId": user_id }, doc! { "$set": set })
            .await?;

        Ok(result.matched_count > 0)
    }

    /// Deactivate a user without removing the document
    pub async fn soft_delete_user(&self, user_id: &str) -> Result<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "userId": user_id },
                doc! { "$set": { "isActive": false } },
            )
            .await?;

        Ok(result.matched_count > 0)
    }
}
