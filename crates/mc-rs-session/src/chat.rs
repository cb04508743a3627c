//! Process-wide chat broadcast.

use std::collections::HashMap;
use std::sync::Arc;

use mc_rs_proto::types::Uuid;
use parking_lot::RwLock;
use tracing::info;

/// Receives every line printed to the chat.
pub trait Subscriber: Send + Sync {
    fn message(&self, text: &str);
}

#[derive(Default)]
pub struct Chat {
    subscribers: RwLock<HashMap<Uuid, Arc<dyn Subscriber>>>,
}

impl Chat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a line to every subscriber and the server log.
    pub fn println(&self, text: &str) {
        info!("[chat] {text}");
        let subscribers: Vec<Arc<dyn Subscriber>> =
            self.subscribers.read().values().cloned().collect();
        for subscriber in subscribers {
            subscriber.message(text);
        }
    }

    pub fn subscribe(&self, uuid: Uuid, subscriber: Arc<dyn Subscriber>) {
        self.subscribers.write().insert(uuid, subscriber);
    }

    pub fn unsubscribe(&self, uuid: &Uuid) {
        self.subscribers.write().remove(uuid);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Inbox(Mutex<Vec<String>>);

    impl Subscriber for Inbox {
        fn message(&self, text: &str) {
            self.0.lock().push(text.to_string());
        }
    }

    #[test]
    fn println_reaches_subscribers() {
        let chat = Chat::new();
        let a = Arc::new(Inbox::default());
        let b = Arc::new(Inbox::default());
        chat.subscribe(Uuid::new(0, 1), a.clone());
        chat.subscribe(Uuid::new(0, 2), b.clone());

        chat.println("hello");
        assert_eq!(*a.0.lock(), vec!["hello"]);
        assert_eq!(*b.0.lock(), vec!["hello"]);

        chat.unsubscribe(&Uuid::new(0, 2));
        chat.println("again");
        assert_eq!(a.0.lock().len(), 2);
        assert_eq!(b.0.lock().len(), 1);
        assert_eq!(chat.subscriber_count(), 1);
    }
}
