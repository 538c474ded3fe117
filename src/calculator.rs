//! Weapon crafting calculator logic

use std::fmt;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::error::CalcError;
use crate::models::{
    Catalog, Feasibility, Inventory, Limit, MaterialVec, TargetPlan, TargetStatus,
};

/// Materials needed to assemble one weapon from the given piece counts
///
/// `counts` must hold exactly one entry per catalog piece slot, body first.
pub fn unit_requirement(catalog: &Catalog, counts: &[u64]) -> Result<MaterialVec, CalcError> {
    if counts.len() != catalog.pieces.len() {
        return Err(CalcError::InvalidRecipe {
            expected: catalog.pieces.len(),
            actual: counts.len(),
        });
    }

    let mut need: MaterialVec = catalog.materials.iter().map(|m| (m.clone(), 0)).collect();
    for (slot, &count) in counts.iter().enumerate() {
        for (material, total) in need.iter_mut() {
            let sum = count
                .checked_mul(catalog.slot_cost(slot, material))
                .and_then(|cost| cost.checked_add(*total))
                .ok_or_else(|| CalcError::Overflow {
                    material: material.clone(),
                })?;
            *total = sum;
        }
    }

    trace!("Unit requirement for {:?}: {:?}", counts, need);
    Ok(need)
}

/// How many weapons the inventory supports, and what remains afterwards
///
/// A recipe that needs no material at all yields zero weapons, not unbounded.
pub fn feasibility(inventory: &Inventory, requirement: &MaterialVec) -> Feasibility {
    let limits: IndexMap<String, Limit> = requirement
        .iter()
        .map(|(material, &need)| {
            let limit = if need > 0 {
                Limit::Units(inventory.get(material) / need)
            } else {
                Limit::Unbounded
            };
            (material.clone(), limit)
        })
        .collect();

    let max_units = match limits.values().min() {
        Some(Limit::Units(n)) => *n,
        _ => 0,
    };

    // max_units * need <= available for every material, so this cannot underflow
    let leftover = requirement
        .iter()
        .map(|(material, &need)| (material.clone(), inventory.get(material) - max_units * need))
        .collect();

    debug!("Max units {} (limits {:?})", max_units, limits);
    Feasibility {
        max_units,
        limits,
        leftover,
    }
}

/// Compare the inventory against the materials needed for `desired` weapons
pub fn target(
    inventory: &Inventory,
    requirement: &MaterialVec,
    desired: u64,
) -> Result<TargetPlan, CalcError> {
    let mut required_total = MaterialVec::new();
    let mut shortfall = MaterialVec::new();
    let mut surplus = IndexMap::new();

    for (material, &need) in requirement {
        let required = need.checked_mul(desired).ok_or_else(|| CalcError::Overflow {
            material: material.clone(),
        })?;
        let available = inventory.get(material);

        required_total.insert(material.clone(), required);
        shortfall.insert(material.clone(), required.saturating_sub(available));
        surplus.insert(material.clone(), available as i128 - required as i128);
    }

    let status = if desired == 0 {
        TargetStatus::NothingRequested
    } else if shortfall.values().all(|&s| s == 0) {
        TargetStatus::Satisfiable
    } else {
        TargetStatus::Short
    };

    debug!("Target of {} weapons: {:?}", desired, status);
    Ok(TargetPlan {
        desired,
        required_total,
        shortfall,
        surplus,
        status,
    })
}

/// Maximum weapons for every catalog preset, in catalog order
pub fn rank_presets(
    catalog: &Catalog,
    inventory: &Inventory,
) -> Result<IndexMap<String, u64>, CalcError> {
    let mut ranking = IndexMap::new();
    for preset in catalog.presets.values() {
        let requirement = unit_requirement(catalog, &preset.counts)?;
        ranking.insert(
            preset.name.clone(),
            feasibility(inventory, &requirement).max_units,
        );
    }
    Ok(ranking)
}

/// Everything shown for one selected recipe
#[derive(Debug)]
pub struct Report {
    pub title: String,
    pub pieces: Vec<(String, u64)>,
    pub requirement: MaterialVec,
    pub available: MaterialVec,
    pub ranking: IndexMap<String, u64>,
    pub feasibility: Feasibility,
    pub target: TargetPlan,
}

/// Run every calculation for one recipe and collect the results
pub fn build_report(
    catalog: &Catalog,
    title: &str,
    counts: &[u64],
    inventory: &Inventory,
    desired: u64,
) -> Result<Report, CalcError> {
    let requirement = unit_requirement(catalog, counts)?;
    let feasibility = feasibility(inventory, &requirement);
    let target = target(inventory, &requirement, desired)?;
    let ranking = rank_presets(catalog, inventory)?;

    Ok(Report {
        title: title.to_string(),
        pieces: catalog.pieces.iter().cloned().zip(counts.iter().copied()).collect(),
        available: catalog
            .materials
            .iter()
            .map(|m| (m.clone(), inventory.get(m)))
            .collect(),
        requirement,
        ranking,
        feasibility,
        target,
    })
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Recipe: {} ===", self.title)?;
        writeln!(f, "Pieces per weapon:")?;
        for (piece, count) in &self.pieces {
            writeln!(f, "  {}: {}", piece, count)?;
        }
        writeln!(f)?;

        writeln!(f, "Materials per weapon:")?;
        for (material, need) in &self.requirement {
            writeln!(f, "  {}: {}", material, need)?;
        }
        writeln!(f)?;

        writeln!(f, "Buildable with current materials, per preset:")?;
        for (name, units) in &self.ranking {
            writeln!(f, "  {}: {} weapons", name, units)?;
        }
        writeln!(f)?;

        writeln!(f, "Maximum weapons for this recipe: {}", self.feasibility.max_units)?;
        writeln!(f, "Limit per material:")?;
        for (material, limit) in &self.feasibility.limits {
            writeln!(f, "  {}: {}", material, limit)?;
        }
        writeln!(f)?;

        writeln!(f, "Leftover after building the maximum:")?;
        for (material, left) in &self.feasibility.leftover {
            writeln!(f, "  {}: {}", material, left)?;
        }
        writeln!(f)?;

        let plan = &self.target;
        writeln!(f, "---")?;
        writeln!(f, "To build {} weapons:", plan.desired)?;
        if plan.status == TargetStatus::NothingRequested {
            writeln!(f, "  (no weapons requested)")?;
            return Ok(());
        }

        for (material, required) in &plan.required_total {
            let have = self.available.get(material).copied().unwrap_or(0);
            let missing = plan.shortfall.get(material).copied().unwrap_or(0);
            if missing > 0 {
                writeln!(f, "  {}: {} (have {} -> short {})", material, required, have, missing)?;
            } else {
                let spare = plan.surplus.get(material).copied().unwrap_or(0);
                writeln!(f, "  {}: {} (have {} -> enough, {} spare)", material, required, have, spare)?;
            }
        }
        writeln!(f)?;

        if plan.satisfiable() {
            writeln!(f, "Result: enough materials for the requested weapons.")?;
        } else {
            writeln!(f, "Result: not enough materials; shortfalls listed above.")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn inventory(values: [u64; 4]) -> Inventory {
        ["Iron", "Copper", "Aluminium", "Plastic"]
            .into_iter()
            .zip(values)
            .collect()
    }

    fn requirement(values: [u64; 4]) -> MaterialVec {
        ["Iron", "Copper", "Aluminium", "Plastic"]
            .into_iter()
            .map(String::from)
            .zip(values)
            .collect()
    }

    #[test]
    fn unit_requirement_for_reference_recipe() {
        let need = unit_requirement(&catalog(), &[1, 10, 10, 10, 10]).unwrap();
        assert_eq!(need, requirement([500, 500, 500, 750]));
    }

    #[test]
    fn unit_requirement_for_catalog_presets() {
        let catalog = catalog();
        let kbz = unit_requirement(&catalog, &catalog.presets["KBZ"].counts).unwrap();
        assert_eq!(kbz, requirement([800, 800, 800, 1200]));
        let p90 = unit_requirement(&catalog, &catalog.presets["P90"].counts).unwrap();
        assert_eq!(p90, requirement([600, 600, 600, 900]));
    }

    #[test]
    fn zero_counts_are_legal() {
        let need = unit_requirement(&catalog(), &[0, 0, 0, 0, 0]).unwrap();
        assert!(need.values().all(|&n| n == 0));
        assert_eq!(need.len(), 4);
    }

    #[test]
    fn wrong_slot_count_is_invalid_recipe() {
        assert_eq!(
            unit_requirement(&catalog(), &[1, 10, 10, 10]),
            Err(CalcError::InvalidRecipe {
                expected: 5,
                actual: 4
            })
        );
        assert!(unit_requirement(&catalog(), &[1, 1, 1, 1, 1, 1]).is_err());
    }

    #[test]
    fn huge_counts_overflow_instead_of_wrapping() {
        let result = unit_requirement(&catalog(), &[u64::MAX, 0, 0, 0, 0]);
        assert!(matches!(result, Err(CalcError::Overflow { .. })));
    }

    #[test]
    fn feasibility_reference_example() {
        let result = feasibility(
            &inventory([2500, 3000, 1000, 1500]),
            &requirement([1000, 1000, 1000, 1500]),
        );
        assert_eq!(result.max_units, 1);
        assert_eq!(
            result.limits.values().copied().collect::<Vec<_>>(),
            [Limit::Units(2), Limit::Units(3), Limit::Units(1), Limit::Units(1)]
        );
        assert_eq!(result.leftover, requirement([1500, 2000, 0, 0]));
    }

    #[test]
    fn zero_requirement_builds_nothing() {
        for stock in [[0, 0, 0, 0], [10, 20, 30, 40], [u64::MAX; 4]] {
            let result = feasibility(&inventory(stock), &requirement([0, 0, 0, 0]));
            assert_eq!(result.max_units, 0);
            assert!(result.limits.values().all(|&l| l == Limit::Unbounded));
            assert_eq!(result.leftover, requirement(stock));
        }
    }

    #[test]
    fn unused_material_never_limits() {
        let result = feasibility(&inventory([500, 0, 0, 0]), &requirement([100, 0, 0, 0]));
        assert_eq!(result.max_units, 5);
        assert_eq!(result.limits["Copper"], Limit::Unbounded);
        assert_eq!(result.leftover, requirement([0, 0, 0, 0]));
    }

    #[test]
    fn absent_inventory_entries_count_as_zero() {
        let result = feasibility(&Inventory::new(), &requirement([1, 0, 0, 0]));
        assert_eq!(result.max_units, 0);
        assert_eq!(result.limits["Iron"], Limit::Units(0));
    }

    #[test]
    fn max_units_is_greatest_feasible_and_leftover_non_negative() {
        let stocks = [0, 1, 7, 99, 100, 101, 250, 1000];
        let needs = [0, 1, 3, 10, 100];
        for &a in &stocks {
            for &b in &stocks {
                for &na in &needs {
                    for &nb in &needs {
                        let req = requirement([na, nb, 0, 0]);
                        let result = feasibility(&inventory([a, b, 0, 0]), &req);
                        let k = result.max_units;
                        let fits = |k: u64| req.iter().all(|(m, &n)| k * n <= [a, b, 0, 0][index(m)]);

                        if na == 0 && nb == 0 {
                            assert_eq!(k, 0);
                        } else {
                            assert!(fits(k));
                            assert!(!fits(k + 1));
                        }
                        // leftover is u64; recompute to make sure it matches the definition
                        for (m, &left) in &result.leftover {
                            assert_eq!(left + k * req[m], [a, b, 0, 0][index(m)]);
                        }
                    }
                }
            }
        }
    }

    fn index(material: &str) -> usize {
        ["Iron", "Copper", "Aluminium", "Plastic"]
            .iter()
            .position(|m| *m == material)
            .unwrap()
    }

    #[test]
    fn feasibility_is_repeatable() {
        let inv = inventory([2500, 3000, 1000, 1500]);
        let req = requirement([1000, 1000, 1000, 1500]);
        assert_eq!(feasibility(&inv, &req), feasibility(&inv, &req));
    }

    #[test]
    fn more_stock_never_lowers_max_units() {
        let req = requirement([300, 200, 0, 50]);
        let base = [900, 700, 0, 160];
        let before = feasibility(&inventory(base), &req).max_units;
        for i in 0..4 {
            for extra in [1, 50, 1000] {
                let mut stock = base;
                stock[i] += extra;
                assert!(feasibility(&inventory(stock), &req).max_units >= before);
            }
        }
    }

    #[test]
    fn higher_requirement_never_raises_max_units() {
        let inv = inventory([900, 700, 400, 160]);
        let base = [300, 200, 0, 50];
        let before = feasibility(&inv, &requirement(base)).max_units;
        for i in 0..4 {
            if base[i] == 0 {
                continue;
            }
            for extra in [1, 50, 1000] {
                let mut need = base;
                need[i] += extra;
                assert!(feasibility(&inv, &requirement(need)).max_units <= before);
            }
        }
    }

    #[test]
    fn target_reports_shortfall() {
        let mut req = MaterialVec::new();
        req.insert("Iron".to_string(), 100);
        let inv: Inventory = [("Iron", 450)].into_iter().collect();

        let plan = target(&inv, &req, 5).unwrap();
        assert_eq!(plan.required_total["Iron"], 500);
        assert_eq!(plan.shortfall["Iron"], 50);
        assert_eq!(plan.surplus["Iron"], -50);
        assert_eq!(plan.status, TargetStatus::Short);
        assert!(!plan.satisfiable());
    }

    #[test]
    fn target_reports_surplus_when_satisfiable() {
        let plan = target(
            &inventory([2500, 3000, 1000, 1500]),
            &requirement([1000, 1000, 1000, 1500]),
            1,
        )
        .unwrap();
        assert_eq!(plan.status, TargetStatus::Satisfiable);
        assert!(plan.shortfall.values().all(|&s| s == 0));
        assert_eq!(plan.surplus["Iron"], 1500);
        assert_eq!(plan.surplus["Aluminium"], 0);
    }

    #[test]
    fn satisfiable_iff_no_shortfall() {
        let req = requirement([100, 50, 0, 10]);
        for desired in 0..12 {
            for iron in [0, 450, 1000, 1200] {
                let plan = target(&inventory([iron, 400, 0, 90]), &req, desired).unwrap();
                let no_shortfall = plan.shortfall.values().all(|&s| s == 0);
                assert_eq!(plan.satisfiable(), no_shortfall);
            }
        }
    }

    #[test]
    fn zero_desired_is_nothing_requested() {
        let plan = target(&Inventory::new(), &requirement([100, 100, 100, 150]), 0).unwrap();
        assert_eq!(plan.status, TargetStatus::NothingRequested);
        assert!(plan.satisfiable());
        assert!(plan.shortfall.values().all(|&s| s == 0));
        assert!(plan.required_total.values().all(|&r| r == 0));
    }

    #[test]
    fn target_overflow_is_an_error() {
        let result = target(&Inventory::new(), &requirement([2, 0, 0, 0]), u64::MAX);
        assert!(matches!(result, Err(CalcError::Overflow { .. })));
    }

    #[test]
    fn rank_follows_catalog_order() {
        let catalog = catalog();
        let ranking = rank_presets(&catalog, &inventory([2500, 2500, 2500, 3750])).unwrap();
        let entries: Vec<_> = ranking.iter().map(|(n, &u)| (n.as_str(), u)).collect();
        assert_eq!(entries, [("PDW", 5), ("KBZ", 3), ("P90", 4)]);
    }

    #[test]
    fn rank_fails_on_malformed_preset() {
        let text = r#"(materials: ["A"], pieces: ["body", "s1"], body_cost: {"A": 1}, presets: [
            (name: "Ok", category: "pistol", counts: [1, 0]),
            (name: "Bad", category: "pistol", counts: [1]),
        ])"#;
        let catalog = Catalog::from_ron(text, "test").unwrap();
        let inv: Inventory = [("A", 10)].into_iter().collect();
        assert!(matches!(
            rank_presets(&catalog, &inv),
            Err(CalcError::InvalidRecipe { .. })
        ));
    }

    #[test]
    fn report_renders_all_sections() {
        let catalog = catalog();
        let inv = inventory([2500, 3000, 1000, 1500]);
        let report = build_report(&catalog, "PDW (SMG)", &[1, 10, 10, 10, 10], &inv, 3).unwrap();
        let text = report.to_string();

        assert!(text.starts_with("=== Recipe: PDW (SMG) ==="));
        assert!(text.contains("  Gun Barrel: 10\n"));
        assert!(text.contains("  Plastic: 750\n"));
        assert!(text.contains("  PDW: 2 weapons\n"));
        assert!(text.contains("Maximum weapons for this recipe: 2\n"));
        assert!(text.contains("  Iron: 1500 (have 2500 -> enough, 1000 spare)\n"));
        assert!(text.contains("  Aluminium: 1500 (have 1000 -> short 500)\n"));
        assert!(text.contains("Result: not enough materials"));
    }

    #[test]
    fn report_marks_nothing_requested() {
        let catalog = catalog();
        let report = build_report(&catalog, "custom", &[0, 0, 0, 0, 0], &Inventory::new(), 0)
            .unwrap();
        let text = report.to_string();

        assert!(text.contains("Maximum weapons for this recipe: 0\n"));
        assert!(text.contains("  Iron: ∞\n"));
        assert!(text.contains("(no weapons requested)"));
        assert!(!text.contains("Result:"));
    }

    #[test]
    fn report_aborts_on_invalid_recipe() {
        let result = build_report(&catalog(), "custom", &[1, 2], &Inventory::new(), 1);
        assert!(matches!(result, Err(CalcError::InvalidRecipe { .. })));
    }
}
