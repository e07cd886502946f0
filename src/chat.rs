//! In-memory two-party message threads.
//!
//! Threads are keyed by the unordered participant pair and live for the
//! process lifetime. One coarse RwLock guards the whole map; volume is
//! expected to be low, so per-key locking would buy nothing. Append and
//! read both hand out owned snapshots, never references into the map.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;

/// Separator inside thread keys. A plain concatenation would make
/// ("ab","c") and ("a","bc") collide.
const KEY_SEPARATOR: char = '\u{1f}';

/// One immutable chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub sender: String,
    #[serde(rename = "message")]
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("sender, receiver, and message cannot be empty")]
    EmptyField,
}

/// Canonical key for the unordered pair (a, b).
/// Pure function of the pair: thread_key(a, b) == thread_key(b, a).
fn thread_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}{KEY_SEPARATOR}{b}")
    } else {
        format!("{b}{KEY_SEPARATOR}{a}")
    }
}

/// Append-only message store for two-party threads.
#[derive(Debug, Default)]
pub struct ThreadStore {
    threads: RwLock<HashMap<String, Vec<Message>>>,
}

impl ThreadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the (sender, receiver) thread, creating the
    /// thread on first use. Returns the full post-append snapshot.
    pub fn append(
        &self,
        sender: &str,
        receiver: &str,
        text: &str,
    ) -> Result<Vec<Message>, ChatError> {
        let sender = sender.trim();
        let receiver = receiver.trim();
        let text = text.trim();
        if sender.is_empty() || receiver.is_empty() || text.is_empty() {
            return Err(ChatError::EmptyField);
        }

        let key = thread_key(sender, receiver);
        let mut threads = self
            .threads
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let thread = threads.entry(key).or_default();
        thread.push(Message {
            sender: sender.to_string(),
            text: text.to_string(),
        });

        Ok(thread.clone())
    }

    /// Snapshot of the (a, b) thread; empty when no thread exists yet.
    pub fn get(&self, a: &str, b: &str) -> Vec<Message> {
        let key = thread_key(a.trim(), b.trim());
        let threads = self
            .threads
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        threads.get(&key).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_symmetric() {
        assert_eq!(thread_key("alice", "bob"), thread_key("bob", "alice"));
    }

    #[test]
    fn test_key_does_not_collide_across_pairs() {
        assert_ne!(thread_key("ab", "c"), thread_key("a", "bc"));
    }

    #[test]
    fn test_append_then_symmetric_get() {
        let store = ThreadStore::new();
        store.append("alice", "bob", "hi").unwrap();

        let thread = store.get("bob", "alice");
        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0].sender, "alice");
        assert_eq!(thread[0].text, "hi");
    }

    #[test]
    fn test_get_unknown_pair_is_empty_not_error() {
        let store = ThreadStore::new();
        assert!(store.get("nobody", "anybody").is_empty());
    }

    #[test]
    fn test_empty_fields_rejected() {
        let store = ThreadStore::new();
        assert!(matches!(store.append("", "bob", "hi"), Err(ChatError::EmptyField)));
        assert!(matches!(store.append("alice", "", "hi"), Err(ChatError::EmptyField)));
        assert!(matches!(store.append("alice", "bob", "   "), Err(ChatError::EmptyField)));
    }

    #[test]
    fn test_interleaved_appends_keep_order() {
        let store = ThreadStore::new();
        store.append("alice", "bob", "one").unwrap();
        store.append("bob", "alice", "two").unwrap();
        store.append("alice", "bob", "three").unwrap();

        for (a, b) in [("alice", "bob"), ("bob", "alice")] {
            let thread = store.get(a, b);
            assert_eq!(thread.len(), 3);
            assert_eq!(thread[0].text, "one");
            assert_eq!(thread[1].sender, "bob");
            assert_eq!(thread[2].text, "three");
        }
    }

    #[test]
    fn test_append_returns_full_snapshot() {
        let store = ThreadStore::new();
        store.append("alice", "bob", "one").unwrap();
        let snapshot = store.append("bob", "alice", "two").unwrap();
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_threads_are_isolated_per_pair() {
        let store = ThreadStore::new();
        store.append("alice", "bob", "hi bob").unwrap();
        store.append("alice", "carol", "hi carol").unwrap();

        assert_eq!(store.get("alice", "bob").len(), 1);
        assert_eq!(store.get("alice", "carol").len(), 1);
        assert_eq!(store.get("bob", "carol").len(), 0);
    }

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        use std::sync::Arc;

        let store = Arc::new(ThreadStore::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                for j in 0..25 {
                    let (a, b) = if i % 2 == 0 { ("alice", "bob") } else { ("bob", "alice") };
                    store.append(a, b, &format!("msg {i}-{j}")).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get("alice", "bob").len(), 200);
    }
}
