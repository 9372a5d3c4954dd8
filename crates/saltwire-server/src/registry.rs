//! Connection registry for live sessions and announced usernames.
//!
//! The registry keeps two coupled, insertion-ordered collections: the live
//! connections and the encrypted-username envelope each one announced. The
//! username entries are opaque ciphertext to the server; it stores and
//! forwards them without a passphrase.
//!
//! Removal is always paired: unregistering a connection drops its username
//! entry in the same call, so a completed teardown never leaves an orphaned
//! announcement. Iteration happens over snapshots so a broadcast never races
//! structural mutation.

/// Identifier for one live connection.
pub type SessionId = u64;

/// Registry of live connections and their announced-username envelopes.
///
/// The struct itself is not synchronized; the relay owns one behind a
/// `tokio::sync::Mutex` and every operation runs under that lock. Keeping
/// the structure pure makes the invariants directly unit-testable.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    /// Live connections in join order.
    connections: Vec<SessionId>,
    /// Encrypted-username envelope per announced connection, in announce
    /// order. At most one entry per live connection.
    usernames: Vec<(SessionId, String)>,
}

impl ConnectionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live connection.
    ///
    /// Returns `false` if the session is already registered.
    pub fn add_connection(&mut self, session_id: SessionId) -> bool {
        if self.connections.contains(&session_id) {
            return false;
        }
        self.connections.push(session_id);
        true
    }

    /// Remove a connection and its username entry together.
    ///
    /// Idempotent: removing an absent connection is a no-op returning
    /// `false`. Returns `true` if the connection was live.
    pub fn remove_connection(&mut self, session_id: SessionId) -> bool {
        let was_live = self.connections.iter().any(|&id| id == session_id);
        self.connections.retain(|&id| id != session_id);
        self.usernames.retain(|(id, _)| *id != session_id);
        was_live
    }

    /// Record the encrypted-username envelope announced by a connection.
    ///
    /// Returns `false` if the session is not registered or has already
    /// announced; every live connection has at most one username entry.
    pub fn add_username(&mut self, session_id: SessionId, envelope: String) -> bool {
        if !self.connections.contains(&session_id) {
            return false;
        }
        if self.usernames.iter().any(|(id, _)| *id == session_id) {
            return false;
        }
        self.usernames.push((session_id, envelope));
        true
    }

    /// Remove a connection's username entry, if any. Idempotent.
    pub fn remove_username(&mut self, session_id: SessionId) -> bool {
        let had_entry = self.usernames.iter().any(|(id, _)| *id == session_id);
        self.usernames.retain(|(id, _)| *id != session_id);
        had_entry
    }

    /// Point-in-time copy of the live connections, in join order.
    ///
    /// Broadcast iterates this copy, so a join or leave during a slow
    /// fan-out can never corrupt the iteration or the registry.
    pub fn snapshot_connections(&self) -> Vec<SessionId> {
        self.connections.clone()
    }

    /// Point-in-time copy of the announced-username envelopes, in announce
    /// order. Used to bring a new joiner up to date.
    pub fn snapshot_usernames(&self) -> Vec<String> {
        self.usernames.iter().map(|(_, envelope)| envelope.clone()).collect()
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of announced usernames.
    pub fn username_count(&self) -> usize {
        self.usernames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_snapshot_connections() {
        let mut registry = ConnectionRegistry::new();

        assert!(registry.add_connection(1));
        assert!(registry.add_connection(2));

        assert_eq!(registry.snapshot_connections(), vec![1, 2]);
        assert_eq!(registry.connection_count(), 2);
    }

    #[test]
    fn duplicate_connection_is_rejected() {
        let mut registry = ConnectionRegistry::new();

        assert!(registry.add_connection(1));
        assert!(!registry.add_connection(1));
        assert_eq!(registry.connection_count(), 1);
    }

    #[test]
    fn remove_connection_is_idempotent() {
        let mut registry = ConnectionRegistry::new();
        registry.add_connection(1);

        assert!(registry.remove_connection(1));
        assert!(!registry.remove_connection(1));
        assert_eq!(registry.connection_count(), 0);
    }

    #[test]
    fn username_requires_live_connection() {
        let mut registry = ConnectionRegistry::new();

        assert!(!registry.add_username(99, "envelope".into()));
        assert_eq!(registry.username_count(), 0);
    }

    #[test]
    fn one_username_per_connection() {
        let mut registry = ConnectionRegistry::new();
        registry.add_connection(1);

        assert!(registry.add_username(1, "first".into()));
        assert!(!registry.add_username(1, "second".into()));

        assert_eq!(registry.snapshot_usernames(), vec!["first".to_string()]);
    }

    #[test]
    fn remove_connection_drops_username_entry() {
        let mut registry = ConnectionRegistry::new();
        registry.add_connection(1);
        registry.add_connection(2);
        registry.add_username(1, "alice".into());
        registry.add_username(2, "bob".into());

        registry.remove_connection(1);

        assert_eq!(registry.snapshot_connections(), vec![2]);
        assert_eq!(registry.snapshot_usernames(), vec!["bob".to_string()]);
    }

    #[test]
    fn remove_username_is_idempotent_and_keeps_connection() {
        let mut registry = ConnectionRegistry::new();
        registry.add_connection(1);
        registry.add_username(1, "alice".into());

        assert!(registry.remove_username(1));
        assert!(!registry.remove_username(1));
        assert_eq!(registry.connection_count(), 1);
    }

    #[test]
    fn snapshots_preserve_insertion_order() {
        let mut registry = ConnectionRegistry::new();
        for id in [5, 3, 9] {
            registry.add_connection(id);
        }
        registry.add_username(3, "b".into());
        registry.add_username(5, "a".into());
        registry.add_username(9, "c".into());

        assert_eq!(registry.snapshot_connections(), vec![5, 3, 9]);
        assert_eq!(
            registry.snapshot_usernames(),
            vec!["b".to_string(), "a".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn snapshot_is_detached_from_registry() {
        let mut registry = ConnectionRegistry::new();
        registry.add_connection(1);

        let snapshot = registry.snapshot_connections();
        registry.add_connection(2);
        registry.remove_connection(1);

        assert_eq!(snapshot, vec![1]);
        assert_eq!(registry.snapshot_connections(), vec![2]);
    }
}
