use crate::domain::ticket::Ticket;
use std::collections::HashMap;

/// Group key used for tickets without a parent epic
pub const NO_EPIC_KEY: &str = "NO_EPIC";

/// Display name of the no-epic group
pub const NO_EPIC_NAME: &str = "No Epic";

/// Tickets sharing one parent epic, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicGroup {
    pub key: String,
    pub name: String,
    pub tickets: Vec<Ticket>,
}

impl EpicGroup {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            tickets: Vec::new(),
        }
    }

    pub fn is_no_epic(&self) -> bool {
        self.key == NO_EPIC_KEY
    }
}

/// Epic groups keyed by epic key, iterated in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpicGroups {
    groups: Vec<EpicGroup>,
    index: HashMap<String, usize>,
}

impl EpicGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the group for a key, creating it with `name` on first sight
    ///
    /// An existing group keeps the name it was created with.
    pub fn entry(&mut self, key: &str, name: &str) -> &mut EpicGroup {
        let position = match self.index.get(key).copied() {
            Some(position) => position,
            None => {
                self.groups.push(EpicGroup::new(key, name));
                self.index.insert(key.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[position]
    }

    pub fn get(&self, key: &str) -> Option<&EpicGroup> {
        self.index.get(key).map(|&position| &self.groups[position])
    }

    /// Removes a group, preserving the order of the rest
    pub fn remove(&mut self, key: &str) -> Option<EpicGroup> {
        let position = self.index.remove(key)?;
        let removed = self.groups.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EpicGroup> {
        self.groups.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of tickets across all groups
    pub fn ticket_count(&self) -> usize {
        self.groups.iter().map(|group| group.tickets.len()).sum()
    }
}

impl<'a> IntoIterator for &'a EpicGroups {
    type Item = &'a EpicGroup;
    type IntoIter = std::slice::Iter<'a, EpicGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Partitions tickets by parent epic
///
/// The no-epic group is created up front, so when it has tickets it comes
/// first; it is dropped when every ticket has an epic. Within a group tickets
/// keep their input order.
pub fn group_by_epic(tickets: &[Ticket]) -> EpicGroups {
    let mut groups = EpicGroups::new();
    groups.entry(NO_EPIC_KEY, NO_EPIC_NAME);

    for ticket in tickets {
        let group = match &ticket.epic {
            Some(epic) => groups.entry(&epic.key, &epic.summary),
            None => groups.entry(NO_EPIC_KEY, NO_EPIC_NAME),
        };
        group.tickets.push(ticket.clone());
    }

    if groups
        .get(NO_EPIC_KEY)
        .map(|group| group.tickets.is_empty())
        .unwrap_or(false)
    {
        groups.remove(NO_EPIC_KEY);
    }

    groups
}
