use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::mcq_set::McqSet;

pub const SLOT_POSITIONS: [u8; 5] = [1, 2, 3, 4, 5];
pub const FEATURED_POSITION: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotSize {
    Small,
    Big,
}

pub fn check_position(position: u8) -> Result<u8> {
    if SLOT_POSITIONS.contains(&position) {
        Ok(position)
    } else {
        Err(Error::BadRequest(format!(
            "Invalid layout position {}: expected 1-5",
            position
        )))
    }
}

pub fn slot_size(position: u8) -> SlotSize {
    if position == FEATURED_POSITION {
        SlotSize::Big
    } else {
        SlotSize::Small
    }
}

/// A persisted slot as returned by `GET /api/admin/mcq/layout`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSlot {
    pub position: u8,
    #[serde(default)]
    pub mcq_set_id: Option<String>,
    #[serde(default)]
    pub mcq_set: Option<McqSet>,
}

impl LayoutSlot {
    pub fn set_id(&self) -> Option<&str> {
        self.mcq_set_id
            .as_deref()
            .or_else(|| self.mcq_set.as_ref().map(|s| s.id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_position_five_is_big() {
        assert_eq!(slot_size(1), SlotSize::Small);
        assert_eq!(slot_size(4), SlotSize::Small);
        assert_eq!(slot_size(5), SlotSize::Big);
    }

    #[test]
    fn rejects_positions_outside_the_grid() {
        assert!(check_position(0).is_err());
        assert!(check_position(6).is_err());
        assert_eq!(check_position(3).unwrap(), 3);
    }

    #[test]
    fn set_id_falls_back_to_embedded_set() {
        let slot: LayoutSlot = serde_json::from_value(serde_json::json!({
            "position": 2,
            "mcqSet": { "id": "set-9", "title": "Nine" }
        }))
        .unwrap();
        assert_eq!(slot.set_id(), Some("set-9"));
    }
}
