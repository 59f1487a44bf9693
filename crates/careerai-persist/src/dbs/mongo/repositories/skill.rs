use futures::TryStreamExt;
use mongodb::{bson::doc, Client, Collection};

use crate::dbs::mongo::models::MongoSkill;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoSkillRepository {
    collection: Collection<MongoSkill>,
}

impl MongoSkillRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("skills");
        Self { collection }
    }

    pub async fn insert_skill(&self, skill: &MongoSkill) -> Result<()> {
        self.collection.insert_one(skill).await?;
        Ok(())
    }

    pub async fn list_skills(&self, user_id: &str, limit: Option<i64>) -> Result<Vec<MongoSkill>> {
        let filter = doc! { "user_id": user_id };
        let mut find = self.collection.find(filter).sort(doc! { "created_at": -1 });
        if let Some(limit) = limit {
            find = find.limit(limit);
        }
        Ok(find.await?.try_collect().await?)
    }

    pub async fn delete_skill(&self, skill_id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": skill_id }).await?;
        Ok(result.deleted_count > 0)
    }
}
