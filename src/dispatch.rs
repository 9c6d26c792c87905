use crossbeam_channel::{Sender, TrySendError};
use log::{info, warn};

use crate::types::{GestureEvent, SystemCommand};
use crate::utils::format_timestamp;

/// Boundary to the system-control collaborator. Dispatch is fire-and-forget:
/// the pipeline never waits on the outcome of a system action. The return
/// value only feeds the `commands_dropped` metric.
pub trait ActionDispatcher: Send + 'static {
    /// Forward a confirmed gesture. Returns false if the command had to be
    /// dropped (slow or absent consumer).
    fn dispatch(&self, event: &GestureEvent) -> bool;
}

/// Dispatcher that only logs the abstract command. Useful for dry runs and
/// as the default when no system-control consumer is wired up.
pub struct LogDispatcher;

impl ActionDispatcher for LogDispatcher {
    fn dispatch(&self, event: &GestureEvent) -> bool {
        match SystemCommand::for_gesture(event.gesture, event.confidence) {
            Some(command) => {
                info!(
                    "[{}] {} hand {} (confidence {:.2}) -> {}",
                    format_timestamp(event.timestamp_ms),
                    event.hand,
                    event.gesture,
                    event.confidence,
                    command
                );
                true
            }
            None => false,
        }
    }
}

/// Dispatcher handing abstract commands to an external consumer over a
/// bounded channel. A full or disconnected channel drops the command
/// rather than blocking the dispatch stage.
pub struct CommandDispatcher {
    tx: Sender<SystemCommand>,
}

impl CommandDispatcher {
    pub fn new(tx: Sender<SystemCommand>) -> Self {
        Self { tx }
    }
}

impl ActionDispatcher for CommandDispatcher {
    fn dispatch(&self, event: &GestureEvent) -> bool {
        let Some(command) = SystemCommand::for_gesture(event.gesture, event.confidence) else {
            return false;
        };
        match self.tx.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(command)) => {
                warn!("command consumer backlogged, dropping {}", command);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Gesture, Handedness};
    use std::time::Instant;

    fn event(gesture: Gesture) -> GestureEvent {
        GestureEvent {
            gesture,
            confidence: 0.8,
            hand: Handedness::Right,
            at: Instant::now(),
            timestamp_ms: 0,
        }
    }

    #[test]
    fn commands_reach_the_consumer() {
        let (tx, rx) = crossbeam_channel::bounded(4);
        let dispatcher = CommandDispatcher::new(tx);
        assert!(dispatcher.dispatch(&event(Gesture::PeaceSign)));
        assert_eq!(rx.try_recv().unwrap(), SystemCommand::TakeScreenshot);
    }

    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let dispatcher = CommandDispatcher::new(tx);
        assert!(dispatcher.dispatch(&event(Gesture::Fist)));
        assert!(!dispatcher.dispatch(&event(Gesture::OpenPalm)));
        drop(rx);
    }

    #[test]
    fn gesture_command_mapping_matches_control_table() {
        assert_eq!(
            SystemCommand::for_gesture(Gesture::Pinch, 0.9),
            Some(SystemCommand::AdjustVolume { confidence: 0.9 })
        );
        assert_eq!(
            SystemCommand::for_gesture(Gesture::PeaceSign, 0.9),
            Some(SystemCommand::TakeScreenshot)
        );
        assert_eq!(
            SystemCommand::for_gesture(Gesture::ThumbsUp, 0.9),
            Some(SystemCommand::SendLike)
        );
        assert_eq!(
            SystemCommand::for_gesture(Gesture::Fist, 0.9),
            Some(SystemCommand::ToggleMedia)
        );
        assert_eq!(
            SystemCommand::for_gesture(Gesture::OpenPalm, 0.9),
            Some(SystemCommand::StopMedia)
        );
        assert_eq!(SystemCommand::for_gesture(Gesture::None, 0.9), None);
    }
}
