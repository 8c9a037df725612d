mod friendship_repo_mysql;
mod group_tag_repo_mysql;

pub use friendship_repo_mysql::*;
pub use group_tag_repo_mysql::*;

mod repo_tx_mysql;

pub use repo_tx_mysql::*;

mod tables;

pub use tables::*;

mod util;
