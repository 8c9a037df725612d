mod entity;
mod event;
mod friendship;
mod group;
mod page;
mod query;

pub use entity::*;
pub use event::*;
pub use friendship::*;
pub use group::*;
pub use page::*;
pub use query::*;
