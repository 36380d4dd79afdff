//! Thread-safe hand-off of commands to the tick thread.

use super::{Command, CommandArgs};
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::trace;

/// A command together with its payload, as carried by the queue.
pub type QueuedCommand = (Command, CommandArgs);

/// Producer handle of an unbounded command channel.
///
/// Clones feed the same channel. A [`super::CommandableStateMachine`] owns
/// the receiving end and drains it at the start of every update, so commands
/// pushed from other threads are applied before the tick that follows them.
#[derive(Clone, Debug)]
pub struct CommandQueue {
    sender: Sender<QueuedCommand>,
}

impl CommandQueue {
    /// Create a producer handle and the receiver its commands arrive on.
    pub fn channel() -> (Self, Receiver<QueuedCommand>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    /// Enqueue a command. Never blocks.
    ///
    /// Returns `false` if the receiving machine has been dropped.
    pub fn push(&self, command: Command, args: CommandArgs) -> bool {
        match self.sender.send((command, args)) {
            Ok(()) => true,
            Err(_) => {
                trace!(?command, "command queue disconnected, dropping command");
                false
            }
        }
    }

    /// Commands pushed but not yet drained.
    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }

    /// Observer that forwards into this queue, for [`super::CommandPipeline::subscribe`].
    pub fn sink(&self) -> impl FnMut(Command, &CommandArgs) + Send + 'static {
        let queue = self.clone();
        move |command, args| {
            queue.push(command, *args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Vec2;
    use std::thread;

    #[test]
    fn drain_preserves_arrival_order() {
        let (queue, receiver) = CommandQueue::channel();
        queue.push(Command::Move, CommandArgs::Vector(Vec2::new(1.0, 0.0)));
        queue.push(Command::Sheathe, CommandArgs::None);

        let drained: Vec<_> = receiver.try_iter().collect();

        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].0, Command::Move);
        assert_eq!(drained[1].0, Command::Sheathe);
        assert!(queue.is_empty());
    }

    #[test]
    fn producers_on_other_threads_share_channel() {
        let (queue, receiver) = CommandQueue::channel();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let producer = queue.clone();
                thread::spawn(move || producer.push(Command::AttackConfirm, CommandArgs::None))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }

        assert_eq!(queue.len(), 4);
        assert_eq!(receiver.try_iter().count(), 4);
    }

    #[test]
    fn sink_pushes_into_queue() {
        let (queue, receiver) = CommandQueue::channel();
        let mut sink = queue.sink();

        sink(Command::AbsorbStart, &CommandArgs::None);

        assert_eq!(
            receiver.try_recv().ok(),
            Some((Command::AbsorbStart, CommandArgs::None))
        );
    }

    #[test]
    fn push_after_receiver_dropped_reports_failure() {
        let (queue, receiver) = CommandQueue::channel();
        drop(receiver);

        assert!(!queue.push(Command::Move, CommandArgs::None));
    }
}
