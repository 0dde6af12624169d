//! Application context - dependency injection container

use std::sync::Arc;

use delegate_core::{
    ActiveTab, ActivityLedger, Broadcaster, MissionLifecycle, PermissionRegistry, RecordStore,
    ScriptRegistry, TransitionGate, TypedStore,
};
use delegate_domain::{Config, Result};
use delegate_infra::{BroadcastHub, Database, MemoryScriptRegistry, TabTracker};
use tracing::info;

/// Application context - holds all services and the adapters behind them
pub struct AppContext {
    pub config: Config,
    /// Opened on first use; see [`AppContext::warm_up`].
    pub database: Arc<Database>,
    pub broadcasts: Arc<BroadcastHub>,
    pub tabs: Arc<TabTracker>,
    pub scripts: Arc<MemoryScriptRegistry>,

    // Core services
    pub missions: Arc<MissionLifecycle>,
    pub ledger: Arc<ActivityLedger>,
    pub permissions: Arc<PermissionRegistry>,
}

impl AppContext {
    /// Wire services to their adapters. Performs no I/O.
    pub fn new(config: Config) -> Self {
        let database = Arc::new(Database::new(config.database.clone()));
        let broadcasts = Arc::new(BroadcastHub::default());
        let tabs = Arc::new(TabTracker::new());
        let scripts = Arc::new(MemoryScriptRegistry::new());

        let store = TypedStore::new(Arc::clone(&database) as Arc<dyn RecordStore>);
        let broadcaster = Arc::clone(&broadcasts) as Arc<dyn Broadcaster>;
        let gate = TransitionGate::new();

        let missions = Arc::new(MissionLifecycle::new(
            store.clone(),
            Arc::clone(&tabs) as Arc<dyn ActiveTab>,
            Arc::clone(&scripts) as Arc<dyn ScriptRegistry>,
            config.tracking.clone(),
            gate.clone(),
        ));
        let ledger = Arc::new(ActivityLedger::new(store.clone(), Arc::clone(&broadcaster), gate));
        let permissions = Arc::new(PermissionRegistry::new(store, broadcaster));

        Self { config, database, broadcasts, tabs, scripts, missions, ledger, permissions }
    }

    /// Open the database now instead of on the first command, surfacing a bad
    /// path or schema failure at startup.
    pub async fn warm_up(&self) -> Result<()> {
        self.database.store().await?;
        info!(path = %self.config.database.path, "database ready");
        Ok(())
    }
}
