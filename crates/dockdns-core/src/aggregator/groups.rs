//! Insertion-ordered grouping of pending container states

use std::collections::HashMap;

/// Map from group key to members that remembers first-insertion order
///
/// Iteration yields groups in the order their key was first seen, with
/// members in the order they were pushed.
#[derive(Debug, Clone)]
pub struct OrderedGroups<T> {
    order: Vec<String>,
    members: HashMap<String, Vec<T>>,
}

impl<T> Default for OrderedGroups<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            members: HashMap::new(),
        }
    }
}

impl<T> OrderedGroups<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a member to the group `key`, creating the group if needed
    pub fn push(&mut self, key: &str, member: T) {
        match self.members.get_mut(key) {
            Some(group) => group.push(member),
            None => {
                self.order.push(key.to_string());
                self.members.insert(key.to_string(), vec![member]);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consume the map, yielding `(key, members)` in first-insertion order
    pub fn into_ordered(mut self) -> impl Iterator<Item = (String, Vec<T>)> {
        self.order.into_iter().map(move |key| {
            let members = self.members.remove(&key).unwrap_or_default();
            (key, members)
        })
    }
}
