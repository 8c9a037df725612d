mod friendship_notifier;
mod friendship_service;

pub use friendship_notifier::*;
pub use friendship_service::*;
