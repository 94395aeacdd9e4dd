//! Plannable queries
//!
//! A `PlannedQuery` is a find or aggregate against one collection, held as
//! data so it can be executed or handed to the server's `explain` command.

use bson::{doc, Bson, Document};
use futures_util::TryStreamExt;

use crate::db::MongoClient;
use crate::types::{EduHubError, Result};

/// Verbosity requested from `explain`
const EXPLAIN_VERBOSITY: &str = "executionStats";

/// A read query that can be executed or explained
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedQuery {
    /// `find` with a filter and optional sort
    Find {
        collection: &'static str,
        filter: Document,
        sort: Option<Document>,
    },
    /// `aggregate` with a pipeline
    Aggregate {
        collection: &'static str,
        pipeline: Vec<Document>,
    },
}

impl PlannedQuery {
    /// Plain find
    pub fn find(collection: &'static str, filter: Document) -> Self {
        PlannedQuery::Find {
            collection,
            filter,
            sort: None,
        }
    }

    /// Aggregation pipeline
    pub fn aggregate(collection: &'static str, pipeline: Vec<Document>) -> Self {
        PlannedQuery::Aggregate {
            collection,
            pipeline,
        }
    }

    /// Add a sort order to a find; aggregates are returned unchanged
    pub fn with_sort(self, order: Document) -> Self {
        match self {
            PlannedQuery::Find {
                collection, filter, ..
            } => PlannedQuery::Find {
                collection,
                filter,
                sort: Some(order),
            },
            other => other,
        }
    }

    /// Target collection
    pub fn collection(&self) -> &'static str {
        match self {
            PlannedQuery::Find { collection, .. } => collection,
            PlannedQuery::Aggregate { collection, .. } => collection,
        }
    }

    /// The `explain` command document for this query
    pub fn explain_command(&self) -> Document {
        let inner = match self {
            PlannedQuery::Find {
                collection,
                filter,
                sort,
            } => {
                let mut find = doc! { "find": *collection, "filter": filter.clone() };
                if let Some(sort) = sort {
                    find.insert("sort", sort.clone());
                }
                find
            }
            PlannedQuery::Aggregate {
                collection,
                pipeline,
            } => doc! {
                "aggregate": *collection,
                "pipeline": pipeline.iter().cloned().map(Bson::Document).collect::<Vec<_>>(),
                "cursor": {},
            },
        };

        doc! { "explain": inner, "verbosity": EXPLAIN_VERBOSITY }
    }

    /// Execute and return raw documents
    pub async fn fetch_documents(&self, db: &MongoClient) -> Result<Vec<Document>> {
        let collection = db.database().collection::<Document>(self.collection());

        let cursor = match self {
            PlannedQuery::Find { filter, sort, .. } => {
                let find = collection.find(filter.clone());
                match sort {
                    Some(order) => find.sort(order.clone()).await,
                    None => find.await,
                }
            }
            PlannedQuery::Aggregate { pipeline, .. } => {
                collection.aggregate(pipeline.clone()).await
            }
        }
        .map_err(|e| EduHubError::from_driver("Query failed", e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| EduHubError::from_driver("Reading query results failed", e))
    }
}
