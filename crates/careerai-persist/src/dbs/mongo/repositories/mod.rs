pub mod goal;
pub mod message;
pub mod profile;
pub mod session;
pub mod skill;

pub use goal::MongoGoalRepository;
pub use message::MongoMessageRepository;
pub use profile::MongoProfileRepository;
pub use session::MongoSessionRepository;
pub use skill::MongoSkillRepository;
