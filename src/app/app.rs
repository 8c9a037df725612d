use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::GroupRegistry;
use crate::domain_port::*;
use crate::events::*;
use crate::infra_mysql::*;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Process wiring: MySQL storage, the friendship service and the background
/// event relay.
pub struct App {
    pub friendship_service: Arc<dyn FriendshipService>,
    relay_handle: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
    storage: Arc<MySqlTxManager>,
}

impl App {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let storage = Arc::new(MySqlTxManager::connect(&settings.database).await?);

        let tables = MySqlTables::new(
            &settings.friendships.tables.friendships,
            &settings.friendships.tables.groups,
        )?;
        let tx_manager: Arc<dyn TxManager> = storage.clone();
        let friendship_repo: Arc<dyn FriendshipRepo> =
            Arc::new(MySqlFriendshipRepo::new(tables.clone()));
        let group_tag_repo: Arc<dyn GroupTagRepo> = Arc::new(MySqlGroupTagRepo::new(tables));

        let publisher: Arc<dyn EventPublisher> = match settings.events.backend.as_str() {
            "log" => Arc::new(LogPublisher),
            "kafka" => Arc::new(KafkaPublisher::from_settings(&settings.events)?),
            other => return Err(anyhow::anyhow!("Unknown events backend: {}", other)),
        };

        let cancel = CancellationToken::new();
        let (notifier, receiver) = ChannelNotifier::channel();
        let relay = EventRelay::new(receiver, publisher, &settings.events.topic, cancel.clone());
        let relay_handle = tokio::spawn(async move {
            if let Err(e) = relay.run().await {
                error!("event relay stopped: {e:#}");
            }
        });

        let friendship_service: Arc<dyn FriendshipService> = Arc::new(RealFriendshipService::new(
            friendship_repo,
            group_tag_repo,
            tx_manager,
            Arc::new(notifier),
            GroupRegistry::from(settings.friendships.groups.clone()),
            settings.friendships.notify,
        ));

        info!("friendships started");

        Ok(Self {
            friendship_service,
            relay_handle: Mutex::new(Some(relay_handle)),
            cancel,
            storage,
        })
    }

    pub async fn shutdown(&self) {
        info!("friendships shutting down...");

        self.cancel.cancel();

        let handle = match self.relay_handle.lock() {
            Ok(mut lock) => lock.take(),
            Err(_) => None,
        };
        if let Some(handle) = handle {
            let r = handle.await;
            info!("event relay handle dropped: {:?}", r);
        }

        self.storage.close().await;
    }
}
