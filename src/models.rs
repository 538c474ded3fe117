//! Data models for weapon presets, inventories and calculation results

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

/// Material name -> quantity, kept in catalog material order
pub type MaterialVec = IndexMap<String, u64>;

/// A named, fixed bill of pieces for one weapon
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Preset {
    pub name: String,
    pub category: String,
    pub counts: Vec<u64>, // one entry per piece slot, body slot first
}

/// The static recipe catalog, immutable once loaded
#[derive(Debug, Clone)]
pub struct Catalog {
    pub materials: Vec<String>,
    pub pieces: Vec<String>,
    pub body_cost: MaterialVec,
    pub other_cost: MaterialVec,
    pub presets: IndexMap<String, Preset>,
}

/// Available material quantities for a single calculation
///
/// Materials that were never set read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    quantities: IndexMap<String, u64>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, material: impl Into<String>, quantity: u64) {
        self.quantities.insert(material.into(), quantity);
    }

    pub fn get(&self, material: &str) -> u64 {
        self.quantities.get(material).copied().unwrap_or(0)
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for (material, quantity) in iter {
            inventory.set(material, quantity);
        }
        inventory
    }
}

/// How many weapons a single material allows on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Limit {
    Units(u64),
    /// The recipe does not use this material at all
    Unbounded,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Units(n) => write!(f, "{}", n),
            Limit::Unbounded => write!(f, "∞"),
        }
    }
}

/// Result of checking an inventory against a per-weapon requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feasibility {
    pub max_units: u64,
    pub limits: IndexMap<String, Limit>,
    pub leftover: MaterialVec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    /// Zero weapons were asked for
    NothingRequested,
    Satisfiable,
    Short,
}

/// Materials needed for a desired number of weapons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPlan {
    pub desired: u64,
    pub required_total: MaterialVec,
    pub shortfall: MaterialVec,
    pub surplus: IndexMap<String, i128>, // negative = still missing
    pub status: TargetStatus,
}

impl TargetPlan {
    pub fn satisfiable(&self) -> bool {
        self.status != TargetStatus::Short
    }
}
