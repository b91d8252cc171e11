use std::mem::replace;
use std::sync::Arc;
use std::time::Duration;

use tokio;
use tokio::sync::oneshot::Receiver;
use tokio::sync::oneshot::Sender;
use tokio::task::JoinHandle;

use storage::Base;
use vsync::conf::VaultConf;
use vsync::entry::NodeId;
use vsync::service::{LogDispatcher, VersionService};

use crate::ServerError;

/// Server runs the version service of one vault and its maintenance loop.
/// The loop drives periodic gossip and stale-entry eviction; everything
/// else is reaction to inbound messages fed into the service.
pub struct Server {
    service: Arc<VersionService<LogDispatcher>>,
    sync_interval: Duration,
    stop_txs: Vec<(&'static str, Sender<()>)>,
    join_handle: Option<JoinHandle<()>>,
}

impl Server {
    pub fn new(sto: Arc<dyn Base>, conf: &VaultConf, node_name: &str) -> Server {
        let service = VersionService::new(
            NodeId::from(node_name),
            sto,
            conf.sync_conf(),
            LogDispatcher,
        );

        Server {
            service: Arc::new(service),
            sync_interval: Duration::from_millis(conf.sync_interval_ms),
            stop_txs: Vec::new(),
            join_handle: None,
        }
    }

    /// service hands out the shared service, for feeding inbound messages.
    pub fn service(&self) -> Arc<VersionService<LogDispatcher>> {
        self.service.clone()
    }

    /// Starts the maintenance loop.
    pub fn start(&mut self) {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let fut = Server::_maintenance_loop(self.service.clone(), self.sync_interval, rx);
        let j = tokio::spawn(fut);

        self.join_handle = Some(j);
        self.stop_txs.push(("maintenance", tx));
    }

    async fn _maintenance_loop(
        service: Arc<VersionService<LogDispatcher>>,
        interval: Duration,
        mut sig: Receiver<()>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        // the first tick of tokio interval fires at once, skip it.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    service.do_sync();

                    let (nput, ndel) = service.unresolved_counts();
                    info!("maintenance round done";
                          "pending_put" => nput,
                          "pending_delete" => ndel,
                    );
                }
                _ = &mut sig => {
                    info!("maintenance loop stopped");
                    return;
                }
            }
        }
    }

    pub fn stop(&mut self) -> Result<(), ServerError> {
        while let Some((name, tx)) = self.stop_txs.pop() {
            tx.send(()).or(Err(ServerError::RxClosed))?;
            info!("stop signal sent"; "to" => name);
        }
        Ok(())
    }

    pub async fn join(&mut self) -> Result<(), ServerError> {
        let j = replace(&mut self.join_handle, None);
        j.ok_or(ServerError::NotStarted)?.await.unwrap();
        Ok(())
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
