use crate::xfade::Controls;
use crossbeam_channel::TrySendError;

pub enum Message {
    Update(Controls),
}

pub type Receiver = crossbeam_channel::Receiver<Message>;
pub type Sender = crossbeam_channel::Sender<Message>;

const CAPACITY: usize = 64;

pub fn channel() -> (Sender, Receiver) {
    crossbeam_channel::bounded(CAPACITY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    // channel full; the caller should send the same state again later
    Dropped,
    Disconnected,
}

/// Non-blocking send of the complete control state.
pub fn send(sender: &Sender, controls: Controls) -> Delivery {
    match sender.try_send(Message::Update(controls)) {
        Ok(()) => Delivery::Sent,
        Err(TrySendError::Full(_)) => Delivery::Dropped,
        Err(TrySendError::Disconnected(_)) => Delivery::Disconnected,
    }
}

/// GUI side of the channel. Sends the control state whenever it changed, and
/// keeps resending it while the channel is full so the newest state always
/// gets through eventually.
pub struct Publisher {
    sender: Sender,
    delivered: Option<Controls>,
}

impl Publisher {
    pub fn new(sender: Sender) -> Publisher {
        Publisher {
            sender,
            delivered: None,
        }
    }

    /// Call once per frame with the current controls. Returns `Sent` without
    /// touching the channel when `controls` was already delivered.
    pub fn publish(&mut self, controls: Controls) -> Delivery {
        if self.delivered == Some(controls) {
            return Delivery::Sent;
        }
        let delivery = send(&self.sender, controls);
        if delivery == Delivery::Sent {
            self.delivered = Some(controls);
        }
        delivery
    }
}

/// Applies every pending message to `controls`, so the newest update wins.
/// Never blocks; safe to call from the process callback.
pub fn drain(receiver: &Receiver, controls: &mut Controls) {
    while let Ok(message) = receiver.try_recv() {
        match message {
            Message::Update(update) => *controls = update,
        }
    }
}
