//! Display mode shared between the host shell and the map.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// How the map is being presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Regular window with controls.
    #[default]
    Normal,
    /// Whole-map view; the follow camera stands down.
    FullMap,
    /// Small always-on-top overlay.
    Minimap,
}

impl DisplayMode {
    /// Next mode in the Normal -> FullMap -> Minimap cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Normal => Self::FullMap,
            Self::FullMap => Self::Minimap,
            Self::Minimap => Self::Normal,
        }
    }
}

/// One `(mode, transparent)` message from the broadcast channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeUpdate {
    pub mode: DisplayMode,
    pub transparent: bool,
}

/// Receiving end of a [`ModeBroadcaster`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct ModeSubscription {
    rx: Receiver<ModeUpdate>,
}

/// Fans mode updates out to every live subscription.
#[derive(Debug, Default)]
pub struct ModeBroadcaster {
    subscribers: Vec<Sender<ModeUpdate>>,
}

impl ModeBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> ModeSubscription {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        ModeSubscription { rx }
    }

    /// Sends `update` to all subscribers, forgetting the ones that were dropped.
    /// Returns how many received it.
    pub fn broadcast(&mut self, update: ModeUpdate) -> usize {
        self.subscribers.retain(|tx| tx.send(update).is_ok());
        self.subscribers.len()
    }
}

/// Current display mode and transparency, kept in sync with a subscription.
#[derive(Debug)]
pub struct ModeStore {
    state: ModeUpdate,
    subscription: Option<ModeSubscription>,
}

impl ModeStore {
    pub fn new(initial: ModeUpdate, subscription: ModeSubscription) -> Self {
        Self {
            state: initial,
            subscription: Some(subscription),
        }
    }

    /// A store with no channel attached; only [`set`](Self::set) changes it.
    pub fn detached(initial: ModeUpdate) -> Self {
        Self {
            state: initial,
            subscription: None,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.state.mode
    }

    pub fn is_transparent(&self) -> bool {
        self.state.transparent
    }

    pub fn state(&self) -> ModeUpdate {
        self.state
    }

    #[cfg(test)]
    fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn set(&mut self, update: ModeUpdate) -> bool {
        let changed = self.state != update;
        if changed {
            log::info!(
                "Display mode: {:?} -> {:?} (transparent: {})",
                self.state.mode,
                update.mode,
                update.transparent
            );
        }
        self.state = update;
        changed
    }

    /// Applies every pending update, keeping the last. Returns whether the
    /// state changed.
    pub fn poll(&mut self) -> bool {
        let Some(subscription) = &self.subscription else {
            return false;
        };

        let mut latest = None;
        let mut disconnected = false;
        loop {
            match subscription.rx.try_recv() {
                Ok(update) => latest = Some(update),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }

        if disconnected {
            log::warn!("Mode broadcast channel disconnected");
            self.subscription = None;
        }

        latest.is_some_and(|update| self.set(update))
    }

    /// Drops the subscription. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        if self.subscription.take().is_some() {
            log::debug!("Unsubscribed from mode broadcasts");
        }
    }
}
