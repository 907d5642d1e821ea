use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::{
    runtime::{Handle, Runtime},
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    task, time,
};
use tracing::{debug, warn};

use crate::{
    error::{LookupKind, SelectorError},
    inventory::Inventory,
    navigator::Message,
};

/// Budgets for background work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deadlines {
    /// Region and instance list loads.
    pub list: Duration,
    /// Tag preview loads.
    pub preview: Duration,
    /// Delay between busy-indicator frames.
    pub tick: Duration,
}

impl Default for Deadlines {
    fn default() -> Self {
        Self {
            list: Duration::from_secs(15),
            preview: Duration::from_secs(5),
            tick: Duration::from_millis(80),
        }
    }
}

/// Work the navigator asks to have done off the event loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    LoadRegions {
        profile: String,
    },
    LoadInstances {
        profile: String,
        region: String,
    },
    LoadTags {
        profile: String,
        region: String,
        instance_id: String,
    },
    ScheduleTick,
}

/// Runs commands on the runtime and reports each outcome as exactly one
/// [`Message`] on the channel handed out by [`Dispatcher::new`].
#[derive(Clone)]
pub struct Dispatcher {
    handle: Handle,
    inventory: Arc<dyn Inventory>,
    deadlines: Deadlines,
    message_tx: UnboundedSender<Message>,
}

impl Dispatcher {
    pub fn new(
        runtime: &Runtime,
        inventory: Arc<dyn Inventory>,
        deadlines: Deadlines,
    ) -> (Self, UnboundedReceiver<Message>) {
        let (message_tx, message_rx) = unbounded_channel();
        let dispatcher = Self {
            handle: runtime.handle().clone(),
            inventory,
            deadlines,
            message_tx,
        };
        (dispatcher, message_rx)
    }

    pub fn dispatch(&self, command: Command) {
        let inventory = Arc::clone(&self.inventory);
        match command {
            Command::LoadRegions { profile } => {
                debug!(%profile, "dispatching region lookup");
                self.spawn_lookup(
                    LookupKind::Regions,
                    self.deadlines.list,
                    move || inventory.list_regions(&profile),
                    Message::RegionsLoaded,
                );
            }
            Command::LoadInstances { profile, region } => {
                debug!(%profile, %region, "dispatching instance lookup");
                self.spawn_lookup(
                    LookupKind::Instances,
                    self.deadlines.list,
                    move || inventory.list_hosts(&profile, &region),
                    Message::InstancesLoaded,
                );
            }
            Command::LoadTags {
                profile,
                region,
                instance_id,
            } => {
                debug!(%instance_id, "dispatching tag lookup");
                let target = instance_id.clone();
                self.spawn_lookup(
                    LookupKind::Tags,
                    self.deadlines.preview,
                    move || inventory.fetch_tags(&profile, &region, &target),
                    move |result| Message::TagsLoaded {
                        instance_id,
                        result,
                    },
                );
            }
            Command::ScheduleTick => self.schedule_tick(),
        }
    }

    /// Races `lookup` on a blocking thread against `deadline`.
    ///
    /// A lookup that loses the race keeps running until it returns, but its
    /// result is dropped with the detached join handle.
    fn spawn_lookup<T, L, M>(&self, kind: LookupKind, deadline: Duration, lookup: L, into_message: M)
    where
        T: Send + 'static,
        L: FnOnce() -> anyhow::Result<T> + Send + 'static,
        M: FnOnce(Result<T, SelectorError>) -> Message + Send + 'static,
    {
        let tx = self.message_tx.clone();
        self.handle.spawn(async move {
            let started = Instant::now();
            let worker = task::spawn_blocking(lookup);
            let result = match time::timeout(deadline, worker).await {
                Ok(Ok(Ok(value))) => Ok(value),
                Ok(Ok(Err(err))) => Err(SelectorError::lookup(kind, &err)),
                Ok(Err(join_err)) => Err(SelectorError::Lookup {
                    kind,
                    reason: format!("lookup worker failed: {join_err}"),
                }),
                Err(_) => Err(SelectorError::Timeout {
                    kind,
                    after: deadline,
                }),
            };
            match &result {
                Ok(_) => debug!(%kind, elapsed = ?started.elapsed(), "lookup finished"),
                Err(err) => warn!(%kind, elapsed = ?started.elapsed(), "{err}"),
            }
            let _ = tx.send(into_message(result));
        });
    }

    fn schedule_tick(&self) {
        let tx = self.message_tx.clone();
        let delay = self.deadlines.tick;
        self.handle.spawn(async move {
            time::sleep(delay).await;
            let _ = tx.send(Message::Tick);
        });
    }
}
