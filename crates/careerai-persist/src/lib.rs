pub mod builder;
pub mod error;
pub mod memory;
pub mod trait_client;

#[cfg(feature = "mongodb")]
pub mod dbs;

#[cfg(any(test, feature = "test-util"))]
pub mod faulty;

pub use builder::{PersistClientBuilder, StoreBackend};
pub use error::{PersistError, Result};
pub use memory::InMemoryPersistenceClient;
pub use trait_client::PersistenceClient;

#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoPersistenceClient;

#[cfg(any(test, feature = "test-util"))]
pub use faulty::{Fault, FaultyPersistenceClient};
