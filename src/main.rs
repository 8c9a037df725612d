use friendships::app::App;
use friendships::application_port::FriendshipService;
use friendships::domain_model::{EntityRef, PageRequest};
use friendships::logger::*;
use friendships::settings::*;
use serde_json::{Value, json};

fn entity(raw: &str) -> anyhow::Result<EntityRef> {
    raw.parse::<EntityRef>()
        .map_err(|e| anyhow::anyhow!("invalid entity {raw:?}: {e}"))
}

fn page(per_page: u32, page: u32) -> PageRequest {
    PageRequest::per_page(per_page).page(page)
}

async fn execute(service: &dyn FriendshipService, command: &Command) -> anyhow::Result<Value> {
    let out = match command {
        Command::Befriend { actor, target } => {
            json!(service.befriend(&entity(actor)?, &entity(target)?).await?)
        }
        Command::Accept { actor, sender } => json!({
            "updated": service.accept_friend_request(&entity(actor)?, &entity(sender)?).await?
        }),
        Command::Deny { actor, sender } => json!({
            "updated": service.deny_friend_request(&entity(actor)?, &entity(sender)?).await?
        }),
        Command::Unfriend { actor, target } => json!({
            "deleted": service.unfriend(&entity(actor)?, &entity(target)?).await?
        }),
        Command::Block { actor, target } => {
            json!(service.block_friend(&entity(actor)?, &entity(target)?).await?)
        }
        Command::Unblock { actor, target } => json!({
            "deleted": service.unblock_friend(&entity(actor)?, &entity(target)?).await?
        }),
        Command::Group {
            actor,
            friend,
            group,
        } => json!({
            "created": service.group_friend(&entity(actor)?, &entity(friend)?, group).await?
        }),
        Command::Ungroup {
            actor,
            friend,
            group,
        } => json!({
            "deleted": service
                .ungroup_friend(&entity(actor)?, &entity(friend)?, group.as_deref())
                .await?
        }),
        Command::Friends {
            actor,
            group,
            per_page,
            page: p,
        } => json!(
            service
                .get_friends(&entity(actor)?, page(*per_page, *p), group.as_deref())
                .await?
        ),
        Command::Mutual {
            actor,
            other,
            per_page,
            page: p,
        } => json!(
            service
                .get_mutual_friends(&entity(actor)?, &entity(other)?, page(*per_page, *p))
                .await?
        ),
        Command::Fof {
            actor,
            group,
            per_page,
            page: p,
        } => json!(
            service
                .get_friends_of_friends(&entity(actor)?, page(*per_page, *p), group.as_deref())
                .await?
        ),
        Command::Requests {
            actor,
            per_page,
            page: p,
        } => json!(
            service
                .get_friend_requests(&entity(actor)?, page(*per_page, *p))
                .await?
        ),
        Command::Status {
            actor,
            status,
            group,
        } => json!(
            service
                .friendships_by_status(&entity(actor)?, status.as_deref(), group.as_deref())
                .await?
        ),
    };
    Ok(out)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap("warn", cli.log_format)?;

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let app = App::try_new(&project_settings).await?;

    let result = execute(app.friendship_service.as_ref(), &cli.command).await;

    app.shutdown().await;

    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}
