use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    Client, Collection,
};

use crate::dbs::mongo::models::MongoMessage;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoMessageRepository {
    collection: Collection<MongoMessage>,
}

impl MongoMessageRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("chat_messages");
        Self { collection }
    }

    /// Save a single message
    pub async fn save_message(&self, message: &MongoMessage) -> Result<()> {
        self.collection.insert_one(message).await?;
        Ok(())
    }

    /// Get all messages for a session, oldest first
    pub async fn get_messages(&self, session_id: &str) -> Result<Vec<MongoMessage>> {
        let filter = doc! { "session_id": session_id };
        let messages = self
            .collection
            .find(filter)
            .sort(history_order())
            .await?
            .try_collect()
            .await?;
        Ok(messages)
    }

    pub async fn delete_for_session(&self, session_id: &str) -> Result<u64> {
        let result = self
            .collection
            .delete_many(doc! { "session_id": session_id })
            .await?;
        Ok(result.deleted_count)
    }
}

/// Chronological, with insertion order deciding messages that share a millisecond
fn history_order() -> Document {
    doc! { "created_at": 1, "seq": 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_order_breaks_ties_by_seq() {
        let order = history_order();
        let keys: Vec<&str> = order.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["created_at", "seq"]);
    }
}
