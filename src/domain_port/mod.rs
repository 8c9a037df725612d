// repo

mod friendship_repo;
mod group_tag_repo;

mod repo_tx;

pub use friendship_repo::*;
pub use group_tag_repo::*;

pub use repo_tx::*;
