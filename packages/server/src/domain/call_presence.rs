//! Call Presence Tracker
//!
//! ルームごとに「通話中」のユーザーを参照カウント付きで保持する。
//! 同じユーザーが複数のコネクションから call_join した場合、
//! 全てのコネクションが抜けるまでユーザーは通話中のまま。
//!
//! ## 不変条件
//!
//! - ユーザーのレコードが存在する ⇔ 参照カウントが 1 以上
//! - ユーザーが 0 人になったルームのエントリは削除する

use std::collections::HashMap;

use super::{
    entity::{Participant, sort_participants},
    value_object::{RoomId, UserId},
};

#[derive(Debug)]
struct CallEntry {
    count: usize,
    participant: Participant,
}

#[derive(Debug, Default)]
pub struct CallPresence {
    rooms: HashMap<RoomId, HashMap<UserId, CallEntry>>,
}

impl CallPresence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the user's count; returns the new count.
    ///
    /// The display record is refreshed with the latest name.
    pub fn mark_in_call(&mut self, room_id: RoomId, participant: Participant) -> usize {
        let users = self.rooms.entry(room_id).or_default();
        let entry = users
            .entry(participant.user_id)
            .or_insert_with(|| CallEntry {
                count: 0,
                participant: participant.clone(),
            });
        entry.count += 1;
        entry.participant = participant;
        entry.count
    }

    /// Decrement the user's count; returns the remaining count.
    ///
    /// Unknown rooms or users are left untouched and report 0.
    pub fn mark_out_of_call(&mut self, room_id: &RoomId, user_id: &UserId) -> usize {
        let Some(users) = self.rooms.get_mut(room_id) else {
            return 0;
        };
        let remaining = match users.get_mut(user_id) {
            Some(entry) => {
                entry.count -= 1;
                entry.count
            }
            None => return 0,
        };
        if remaining == 0 {
            users.remove(user_id);
            if users.is_empty() {
                self.rooms.remove(room_id);
            }
        }
        remaining
    }

    /// Users currently in the room's call
    pub fn snapshot(&self, room_id: &RoomId) -> Vec<Participant> {
        let mut participants: Vec<Participant> = self
            .rooms
            .get(room_id)
            .map(|users| users.values().map(|entry| entry.participant.clone()).collect())
            .unwrap_or_default();
        sort_participants(&mut participants);
        participants
    }

    pub fn count(&self, room_id: &RoomId, user_id: &UserId) -> usize {
        self.rooms
            .get(room_id)
            .and_then(|users| users.get(user_id))
            .map_or(0, |entry| entry.count)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
