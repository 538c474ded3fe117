//! Parsing and validation of user-typed quantities
//!
//! Everything here runs before the calculator is invoked, so the calculator
//! only ever sees non-negative integers.

use regex::Regex;

use crate::error::InputError;
use crate::models::{Catalog, Inventory};

/// Parse one quantity field; blank text counts as zero
pub fn parse_quantity(field: &str, text: &str) -> Result<u64, InputError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }

    let value: i128 = text.parse().map_err(|_| InputError::NotInteger {
        field: field.to_string(),
        text: text.to_string(),
    })?;
    if value < 0 {
        return Err(InputError::Negative {
            field: field.to_string(),
            value,
        });
    }
    u64::try_from(value).map_err(|_| InputError::TooLarge {
        field: field.to_string(),
        value,
    })
}

/// Parse a comma-separated list of piece counts, body slot first
///
/// The length is not checked here; a mismatch is reported by the calculator.
pub fn parse_counts(text: &str) -> Result<Vec<u64>, InputError> {
    text.split(',')
        .enumerate()
        .map(|(i, part)| parse_quantity(&format!("piece count #{}", i + 1), part))
        .collect()
}

/// Build an inventory from `NAME=QUANTITY` assignments
///
/// Each argument may hold several comma-separated assignments. Later
/// assignments to the same material win.
pub fn parse_inventory(catalog: &Catalog, args: &[String]) -> Result<Inventory, InputError> {
    let assignment_re = Regex::new(r"^\s*([^=]+?)\s*=\s*(\S*)\s*$")?;
    let mut inventory = Inventory::new();

    for part in args.iter().flat_map(|a| a.split(',')) {
        if part.trim().is_empty() {
            continue;
        }
        let cap = assignment_re
            .captures(part)
            .ok_or_else(|| InputError::MalformedAssignment(part.trim().to_string()))?;

        let material = catalog
            .material(&cap[1])
            .ok_or_else(|| InputError::UnknownMaterial(cap[1].to_string()))?;
        let quantity = parse_quantity(material, &cap[2])?;
        inventory.set(material, quantity);
    }

    Ok(inventory)
}
