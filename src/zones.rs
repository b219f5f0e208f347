//! Game zones (Library, Hand, Graveyard, Battlefield)

use crate::core::{CardId, PlayerId};
use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};

/// Different zones where cards can exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Library,
    Hand,
    Battlefield,
    Graveyard,
}

/// An ordered zone of cards (library top is the end of the list)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardZone {
    pub zone_type: Zone,

    pub owner: PlayerId,

    pub cards: Vec<CardId>,
}

impl CardZone {
    pub fn new(zone_type: Zone, owner: PlayerId) -> Self {
        CardZone {
            zone_type,
            owner,
            cards: Vec::new(),
        }
    }

    pub fn add(&mut self, card_id: CardId) {
        self.cards.push(card_id);
    }

    pub fn remove(&mut self, card_id: CardId) -> bool {
        if let Some(pos) = self.cards.iter().position(|&id| id == card_id) {
            // Order-preserving remove keeps iteration deterministic for controllers
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw from top (for Library)
    pub fn draw_top(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }
}

/// Library, hand and graveyard for one player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerZones {
    pub library: CardZone,
    pub hand: CardZone,
    pub graveyard: CardZone,
}

impl PlayerZones {
    pub fn new(player_id: PlayerId) -> Self {
        PlayerZones {
            library: CardZone::new(Zone::Library, player_id),
            hand: CardZone::new(Zone::Hand, player_id),
            graveyard: CardZone::new(Zone::Graveyard, player_id),
        }
    }
}

/// A fixed position on a player's battlefield
///
/// The occupant is a back-reference; the card itself lives in the session's
/// card store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattlefieldSlot {
    pub player: PlayerId,
    pub index: usize,
    pub occupant: Option<CardId>,
}

impl BattlefieldSlot {
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Fixed-capacity creature slots owned by one player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battlefield {
    owner: PlayerId,
    slots: Vec<BattlefieldSlot>,
}

impl Battlefield {
    pub fn new(owner: PlayerId, capacity: usize) -> Self {
        Battlefield {
            owner,
            slots: (0..capacity)
                .map(|index| BattlefieldSlot {
                    player: owner,
                    index,
                    occupant: None,
                })
                .collect(),
        }
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> Option<&BattlefieldSlot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[BattlefieldSlot] {
        &self.slots
    }

    pub fn occupant(&self, index: usize) -> Option<CardId> {
        self.slots.get(index).and_then(|s| s.occupant)
    }

    /// Slot index holding `card_id`, if any
    pub fn position_of(&self, card_id: CardId) -> Option<usize> {
        self.slots.iter().position(|s| s.occupant == Some(card_id))
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.position_of(card_id).is_some()
    }

    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.is_empty())
    }

    pub fn is_full(&self) -> bool {
        self.first_empty().is_none()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occupants in slot order
    pub fn creatures(&self) -> impl Iterator<Item = CardId> + '_ {
        self.slots.iter().filter_map(|s| s.occupant)
    }

    /// Put a card into a specific empty slot
    pub fn place(&mut self, card_id: CardId, index: usize) -> Result<()> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(DuelError::InvalidSlot(index))?;
        if let Some(occupant) = slot.occupant {
            return Err(DuelError::SlotOccupied {
                index,
                occupant: occupant.as_u32(),
            });
        }
        slot.occupant = Some(card_id);
        Ok(())
    }

    /// Put a card into the first empty slot, returning its index
    pub fn place_first_empty(&mut self, card_id: CardId) -> Result<usize> {
        let index = self
            .first_empty()
            .ok_or(DuelError::BattlefieldFull(self.owner.as_u32()))?;
        self.place(card_id, index)?;
        Ok(index)
    }

    /// Vacate the slot holding `card_id`, returning the index it was in
    pub fn remove(&mut self, card_id: CardId) -> Option<usize> {
        let index = self.position_of(card_id)?;
        self.slots[index].occupant = None;
        Some(index)
    }
}
