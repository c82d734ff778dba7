pub mod types;

pub use types::{Credentials, MessageTemplates, Settings};
