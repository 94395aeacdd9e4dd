//! Assignment accessors

use bson::{doc, oid::ObjectId, DateTime};

use crate::db::schemas::{AssignmentDoc, ASSIGNMENT_COLLECTION};
use crate::db::{MongoClient, MongoCollection, PlannedQuery};
use crate::types::Result;

const WEEK_MILLIS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Accessors for the `assignments` collection
#[derive(Debug, Clone)]
pub struct AssignmentRepository {
    collection: MongoCollection<AssignmentDoc>,
}

impl AssignmentRepository {
    pub fn new(mongo: &MongoClient) -> Self {
        Self {
            collection: mongo.collection::<AssignmentDoc>(ASSIGNMENT_COLLECTION),
        }
    }

    pub fn collection(&self) -> &MongoCollection<AssignmentDoc> {
        &self.collection
    }

    pub async fn create_assignment(&self, assignment: AssignmentDoc) -> Result<ObjectId> {
        self.collection.insert_one(assignment).await
    }

    pub async fn insert_many(&self, assignments: Vec<AssignmentDoc>) -> Result<usize> {
        self.collection.insert_many(assignments).await
    }

    pub fn due_between_query(from: DateTime, to: DateTime) -> PlannedQuery {
        PlannedQuery::find(
            ASSIGNMENT_COLLECTION,
            doc! { "dueDate": { "$gte": from, "$lte": to } },
        )
        .with_sort(doc! { "dueDate": 1 })
    }

    /// Assignments due within seven days of `now`, soonest first
    pub async fn assignments_due_next_week(&self, now: DateTime) -> Result<Vec<AssignmentDoc>> {
        let next_week = DateTime::from_millis(now.timestamp_millis() + WEEK_MILLIS);
        self.collection
            .find_planned(Self::due_between_query(now, next_week))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_window_bounds() {
        let from = DateTime::from_millis(0);
        let to = DateTime::from_millis(WEEK_MILLIS);
        let PlannedQuery::Find { filter, sort, .. } = AssignmentRepository::due_between_query(from, to)
        else {
            panic!("expected find");
        };
        let due = filter.get_document("dueDate").unwrap();
        assert_eq!(due.get_datetime("$gte").unwrap(), &from);
        assert_eq!(due.get_datetime("$lte").unwrap(), &to);
        assert_eq!(sort, Some(doc! { "dueDate": 1 }));
    }
}
