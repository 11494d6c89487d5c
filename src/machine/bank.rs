use std::collections::HashSet;

use anyhow::{anyhow, Result};

use crate::types::pad::{Pad, PadKey, PAD_COUNT, POWER_KEY};

/// The fixed set of pads for one session
/// Keys are pairwise distinct; a pad's index is its engine slot
#[derive(Debug, Clone)]
pub struct PadBank {
    pads: Vec<Pad>,
}

impl PadBank {
    /// Build a bank, checking the pad count and key uniqueness
    pub fn new(pads: Vec<Pad>) -> Result<Self> {
        if pads.len() != PAD_COUNT {
            return Err(anyhow!(
                "A kit must have exactly {} pads, found {}",
                PAD_COUNT,
                pads.len()
            ));
        }

        let mut seen = HashSet::new();
        for pad in &pads {
            if pad.key.matches(POWER_KEY) {
                return Err(anyhow!("Key {} is reserved for the power switch", POWER_KEY));
            }
            if pad.label.trim().is_empty() {
                return Err(anyhow!("Pad {} has an empty label", pad.key));
            }
            if !seen.insert(pad.key) {
                return Err(anyhow!("Key {} is bound to more than one pad", pad.key));
            }
        }

        Ok(Self { pads })
    }

    /// Case-insensitive lookup; `None` for keys outside the kit
    pub fn resolve(&self, input: char) -> Option<&Pad> {
        self.pads.iter().find(|pad| pad.key.matches(input))
    }

    /// Engine slot of the pad bound to `key`
    pub fn slot_of(&self, key: PadKey) -> Option<usize> {
        self.pads.iter().position(|pad| pad.key == key)
    }

    pub fn get(&self, slot: usize) -> Option<&Pad> {
        self.pads.get(slot)
    }

    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    pub fn len(&self) -> usize {
        self.pads.len()
    }
}
