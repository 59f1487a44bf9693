pub mod keyword;
pub mod templates;
pub mod traits;

pub use keyword::{KeywordResponder, ReplyTopic};
pub use traits::Responder;
