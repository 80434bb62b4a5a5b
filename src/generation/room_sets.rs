//! # Room Sets
//!
//! Ordered position lists that serve both as phase work queues and as the
//! final per-category results.
//!
//! Insertion order drives processing order and every tie-break, so the lists
//! never reorder. Membership is tracked by coordinate in a side set, which
//! keeps `contains` O(1) while the growth queue is still being appended to.

use crate::generation::Position;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Insertion-ordered set of tile positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Position>", into = "Vec<Position>")]
pub struct RoomList {
    order: Vec<Position>,
    members: HashSet<Position>,
}

impl RoomList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a position unless it is already present.
    ///
    /// Returns `true` if the position was added.
    pub fn insert(&mut self, pos: Position) -> bool {
        if !self.members.insert(pos) {
            return false;
        }
        self.order.push(pos);
        true
    }

    /// Checks membership by coordinate.
    pub fn contains(&self, pos: Position) -> bool {
        self.members.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position at an insertion index.
    pub fn get(&self, index: usize) -> Option<Position> {
        self.order.get(index).copied()
    }

    /// Positions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.order.iter().copied()
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.order
    }
}

impl From<Vec<Position>> for RoomList {
    fn from(positions: Vec<Position>) -> Self {
        let mut list = RoomList::new();
        for pos in positions {
            list.insert(pos);
        }
        list
    }
}

impl From<RoomList> for Vec<Position> {
    fn from(list: RoomList) -> Self {
        list.order
    }
}

/// Every list a generation attempt builds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSets {
    /// Grown rooms in placement order, start room first
    pub rooms: RoomList,
    /// Leaves of the room graph
    pub end_rooms: RoomList,
    /// End rooms turned into locked item rooms
    pub locked_rooms: RoomList,
    /// Empty tiles eligible to become secret rooms
    pub secret_candidates: RoomList,
    /// Accepted secret rooms
    pub secrets: RoomList,
    /// Empty tiles eligible to become the super secret room
    pub super_candidates: RoomList,
}

impl RoomSets {
    pub fn new() -> Self {
        Self::default()
    }
}
