//! Presence directory: who is online, and every client's player list.

use std::sync::Arc;

use mc_rs_proto::packets::{Packet, PlayerList, PlayerListEntry};
use mc_rs_world::Entity;
use parking_lot::Mutex;

use super::Session;

/// Something that keeps a player list the directory can add to and remove from.
pub trait PresenceMember: Send + Sync {
    fn add_to_player_list(&self, other: &Self);
    fn remove_from_player_list(&self, other: &Self);
}

/// The set of live sessions, optionally capped.
///
/// Both membership changes and the list updates they cause run under one
/// lock, so no member ever observes a half-applied join or leave, and the
/// cap cannot be overshot by concurrent joins.
pub struct PresenceDirectory<M: PresenceMember = Session> {
    members: Mutex<Vec<Arc<M>>>,
    limit: usize,
}

impl<M: PresenceMember> PresenceDirectory<M> {
    pub fn new() -> Self {
        Self::with_limit(usize::MAX)
    }

    /// A directory admitting at most `limit` members.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            members: Mutex::new(Vec::new()),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Add a member and introduce it to everyone, itself included.
    ///
    /// Returns `false`, changing nothing, when the directory is full.
    pub fn join(&self, member: &Arc<M>) -> bool {
        let mut members = self.members.lock();
        if members.len() >= self.limit {
            return false;
        }
        members.push(Arc::clone(member));
        for existing in members.iter() {
            existing.add_to_player_list(member);
            if !Arc::ptr_eq(existing, member) {
                member.add_to_player_list(existing);
            }
        }
        true
    }

    /// Remove a member and take it off every remaining member's list.
    pub fn leave(&self, member: &M) {
        let mut members = self.members.lock();
        let remaining: Vec<Arc<M>> = members
            .iter()
            .filter(|m| !std::ptr::eq(Arc::as_ptr(m), member))
            .cloned()
            .collect();
        for other in &remaining {
            other.remove_from_player_list(member);
        }
        *members = remaining;
    }

    pub fn len(&self) -> usize {
        self.members.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, member: &M) -> bool {
        self.members
            .lock()
            .iter()
            .any(|m| std::ptr::eq(Arc::as_ptr(m), member))
    }

    /// Snapshot of the current members.
    pub fn members(&self) -> Vec<Arc<M>> {
        self.members.lock().clone()
    }
}

impl<M: PresenceMember> Default for PresenceDirectory<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceMember for Session {
    fn add_to_player_list(&self, other: &Session) {
        let Some(c) = other.controllable() else {
            return;
        };
        let xuid = other
            .identity_data()
            .map(|d| d.xuid.clone())
            .unwrap_or_default();
        let handle = self.handles.handle_for(c.id());
        self.write_packet(Packet::PlayerList(PlayerList::Add(vec![PlayerListEntry {
            uuid: c.uuid(),
            entity_unique_id: handle as i64,
            username: c.name().to_string(),
            xuid,
        }])));
    }

    fn remove_from_player_list(&self, other: &Session) {
        let Some(c) = other.controllable() else {
            return;
        };
        self.write_packet(Packet::PlayerList(PlayerList::Remove(vec![c.uuid()])));
        self.handles.forget(c.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// In-memory member keeping its player list as a set of names.
    struct Member {
        name: &'static str,
        list: Mutex<BTreeSet<&'static str>>,
    }

    impl Member {
        fn new(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                list: Mutex::new(BTreeSet::new()),
            })
        }

        fn list(&self) -> Vec<&'static str> {
            self.list.lock().iter().copied().collect()
        }
    }

    impl PresenceMember for Member {
        fn add_to_player_list(&self, other: &Self) {
            self.list.lock().insert(other.name);
        }
        fn remove_from_player_list(&self, other: &Self) {
            self.list.lock().remove(other.name);
        }
    }

    #[test]
    fn two_join_then_one_leaves() {
        let dir = PresenceDirectory::new();
        let a = Member::new("A");
        let b = Member::new("B");

        dir.join(&a);
        assert_eq!(a.list(), vec!["A"]);

        dir.join(&b);
        assert_eq!(a.list(), vec!["A", "B"]);
        assert_eq!(b.list(), vec!["A", "B"]);

        dir.leave(&b);
        assert_eq!(a.list(), vec!["A"]);
        assert_eq!(dir.len(), 1);
        assert!(dir.contains(&a));
        assert!(!dir.contains(&b));
    }

    #[test]
    fn full_mesh_after_n_joins() {
        let dir = PresenceDirectory::new();
        let names = ["A", "B", "C", "D", "E", "F"];
        let members: Vec<_> = names.iter().map(|&n| Member::new(n)).collect();
        for m in &members {
            dir.join(m);
        }
        assert_eq!(dir.len(), names.len());
        for m in &members {
            assert_eq!(m.list().len(), names.len(), "{}", m.name);
        }
    }

    #[test]
    fn leave_shrinks_by_exactly_one() {
        let dir = PresenceDirectory::new();
        let members: Vec<_> = ["A", "B", "C", "D"].into_iter().map(Member::new).collect();
        for m in &members {
            dir.join(m);
        }

        dir.leave(&members[1]);
        assert_eq!(dir.len(), 3);
        for m in members.iter().filter(|m| m.name != "B") {
            assert!(!m.list().contains(&"B"), "{} still lists B", m.name);
            assert_eq!(m.list().len(), 3);
        }

        // Leaving twice changes nothing
        dir.leave(&members[1]);
        assert_eq!(dir.len(), 3);
    }

    #[test]
    fn limit_refuses_extra_members() {
        let dir = PresenceDirectory::with_limit(2);
        let members: Vec<_> = ["A", "B", "C"].into_iter().map(Member::new).collect();

        assert!(dir.join(&members[0]));
        assert!(dir.join(&members[1]));
        assert!(!dir.join(&members[2]));
        assert_eq!(dir.len(), 2);
        assert!(!dir.contains(&members[2]));
        assert!(members[2].list().is_empty());
        assert!(!members[0].list().contains(&"C"));

        // A freed slot is available again
        dir.leave(&members[0]);
        assert!(dir.join(&members[2]));
        assert_eq!(members[1].list(), vec!["B", "C"]);
    }

    #[test]
    fn independent_directories() {
        let one = PresenceDirectory::new();
        let two = PresenceDirectory::new();
        let a = Member::new("A");
        let b = Member::new("B");
        one.join(&a);
        two.join(&b);
        assert_eq!(a.list(), vec!["A"]);
        assert_eq!(b.list(), vec!["B"]);
        assert_eq!(one.members().len(), 1);
    }
}
