use futures::TryStreamExt;
use mongodb::{bson::doc, Client, Collection};

use crate::dbs::mongo::models::MongoSession;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoSessionRepository {
    collection: Collection<MongoSession>,
}

impl MongoSessionRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("chat_sessions");
        Self { collection }
    }

    pub async fn insert_session(&self, session: &MongoSession) -> Result<()> {
        self.collection.insert_one(session).await?;
        Ok(())
    }

    /// Sessions for a user, most recently updated first
    pub async fn list_sessions(&self, user_id: &str) -> Result<Vec<MongoSession>> {
        let filter = doc! { "user_id": user_id };
        let sessions = self
            .collection
            .find(filter)
            .sort(doc! { "updated_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(sessions)
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Option<MongoSession>> {
        Ok(self.collection.find_one(doc! { "_id": session_id }).await?)
    }

    pub async fn replace_session(&self, session: &MongoSession) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &session.id }, session)
            .await?;
        Ok(())
    }

    pub async fn delete_session(&self, session_id: &str, user_id: &str) -> Result<bool> {
        let filter = doc! { "_id": session_id, "user_id": user_id };
        let result = self.collection.delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }
}
