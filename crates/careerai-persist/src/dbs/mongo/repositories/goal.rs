use futures::TryStreamExt;
use mongodb::{bson::doc, Client, Collection};

use crate::dbs::mongo::models::MongoGoal;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoGoalRepository {
    collection: Collection<MongoGoal>,
}

impl MongoGoalRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("career_goals");
        Self { collection }
    }

    pub async fn insert_goal(&self, goal: &MongoGoal) -> Result<()> {
        self.collection.insert_one(goal).await?;
        Ok(())
    }

    /// Goals for a user, newest first
    pub async fn list_goals(&self, user_id: &str, limit: Option<i64>) -> Result<Vec<MongoGoal>> {
        let filter = doc! { "user_id": user_id };
        let mut find = self.collection.find(filter).sort(doc! { "created_at": -1 });
        if let Some(limit) = limit {
            find = find.limit(limit);
        }
        Ok(find.await?.try_collect().await?)
    }

    pub async fn get_goal(&self, goal_id: &str) -> Result<Option<MongoGoal>> {
        Ok(self.collection.find_one(doc! { "_id": goal_id }).await?)
    }

    pub async fn replace_goal(&self, goal: &MongoGoal) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &goal.id }, goal)
            .await?;
        Ok(())
    }

    /// Returns whether a row was removed
    pub async fn delete_goal(&self, goal_id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": goal_id }).await?;
        Ok(result.deleted_count > 0)
    }
}
