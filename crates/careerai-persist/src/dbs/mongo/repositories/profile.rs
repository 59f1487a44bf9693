use mongodb::{bson::doc, Client, Collection};

use crate::dbs::mongo::models::MongoProfile;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoProfileRepository {
    collection: Collection<MongoProfile>,
}

impl MongoProfileRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("profiles");
        Self { collection }
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<MongoProfile>> {
        let filter = doc! { "_id": user_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Insert or replace the whole row
    pub async fn save_profile(&self, profile: &MongoProfile) -> Result<()> {
        let filter = doc! { "_id": &profile.id };
        self.collection
            .replace_one(filter, profile)
            .upsert(true)
            .await?;
        Ok(())
    }
}
