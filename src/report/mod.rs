pub mod checker;
pub mod message;

pub use checker::GrassChecker;
pub use message::MessageRenderer;
