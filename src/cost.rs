//! Cost annotations attached to every cut of the exchange document.
//!
//! All costs are pure functions of a cut's truth table and leaf count:
//! - `area_cost` is the leaf count, a proxy for the fan-in (hence the area) of the cell
//!   implementing the cut
//! - `depth_cost` is always 1: every selected cut counts as one level, whatever its inner
//!   structure
//! - `inv_cost` counts the leaves the function is binate in, ie how many inverters a gate
//!   level realization needs when the library has no complemented-input cells.

use serde::{Deserialize, Serialize};

use crate::TruthTable;

/// Depth contribution of any selected cut.
pub const DEPTH_COST: u32 = 1;

/// The three costs of a cut, as exported in the exchange document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CutCost {
    pub inv_cost: u32,
    pub depth_cost: u32,
    pub area_cost: u32,
}

impl CutCost {
    /// Costs of a cut computing `function` over its leaves (one variable per leaf).
    pub fn of(function: &TruthTable) -> Self {
        CutCost {
            inv_cost: inv_cost(function),
            depth_cost: DEPTH_COST,
            area_cost: function.num_vars() as u32,
        }
    }
}

/// Returns true if `function` is neither positive nor negative unate in `var`: some
/// assignment of the other variables sees it fall when `var` rises, and another sees it rise.
pub fn is_binate(function: &TruthTable, var: usize) -> bool {
    let tt0 = function.cofactor0(var);
    let tt1 = function.cofactor1(var);
    let bad_pos = tt0.and(&tt1.not());
    let bad_neg = tt1.and(&tt0.not());
    !bad_pos.is_const0() && !bad_neg.is_const0()
}

/// Number of variables `function` is binate in.
pub fn inv_cost(function: &TruthTable) -> u32 {
    (0..function.num_vars())
        .filter(|&var| is_binate(function, var))
        .count() as u32
}
