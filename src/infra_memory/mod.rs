//! Process-local storage adapter. Transactions snapshot the tables and
//! restore them on rollback; they do not isolate concurrent writers.

mod friendship_repo_memory;
mod group_tag_repo_memory;
mod repo_tx_memory;
mod store;

pub use friendship_repo_memory::*;
pub use group_tag_repo_memory::*;
pub use repo_tx_memory::*;
pub use store::*;
