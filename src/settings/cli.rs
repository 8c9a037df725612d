use super::{Parser, Subcommand};
use crate::logger::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "friendships", about = "Manage friendships between entities")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Full)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Entities are written as `kind:uuid`; a bare uuid is a `user`.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a friend request
    Befriend { actor: String, target: String },
    /// Accept a pending request from `sender`
    Accept { actor: String, sender: String },
    /// Deny a pending request from `sender`
    Deny { actor: String, sender: String },
    /// Remove any friendship between the two
    Unfriend { actor: String, target: String },
    Block { actor: String, target: String },
    Unblock { actor: String, target: String },
    /// File a friend under a group
    Group { actor: String, friend: String, group: String },
    /// Remove a friend from one group, or all groups
    Ungroup {
        actor: String,
        friend: String,
        group: Option<String>,
    },
    Friends {
        actor: String,
        #[arg(long)]
        group: Option<String>,
        #[arg(long, default_value_t = 0)]
        per_page: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Mutual {
        actor: String,
        other: String,
        #[arg(long, default_value_t = 0)]
        per_page: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Friends of friends
    Fof {
        actor: String,
        #[arg(long)]
        group: Option<String>,
        #[arg(long, default_value_t = 0)]
        per_page: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Pending requests addressed to `actor`
    Requests {
        actor: String,
        #[arg(long, default_value_t = 0)]
        per_page: u32,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Friendships of `actor` with a given status (or any)
    Status {
        actor: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        group: Option<String>,
    },
}
