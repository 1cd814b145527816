pub mod chat;
pub mod question;

pub use chat::{ChatMessage, Sender};
pub use question::{Question, QuestionKind};
