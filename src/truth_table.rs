//! Dynamic truth tables for single-output Boolean functions.
//!
//! A function `f(x0, ..., x(n-1))` over `n` variables is stored as `2^n` bits packed
//! in `u64` words. Bit `i` holds the output value for the input assignment encoded by `i`:
//! variable `v` takes the value `(i >> v) & 1`, so `x0` is the least-significant selector
//! bit and toggles fastest.
//!
//! ```rust
//! use lutcut::TruthTable;
//! let a = TruthTable::var(2, 0);
//! let b = TruthTable::var(2, 1);
//! let and = a.and(&b);
//! assert_eq!(and.to_string(), "8");
//! assert!(and.get_bit(3));
//! assert!(!and.get_bit(1));
//! ```

use std::fmt::Display;

/// Largest number of variables a table may carry (`2^16` bits).
pub const MAX_VARS: usize = 16;

const WORD_BITS: usize = 64;

/// Projection masks for variables living inside a single word.
const VAR_MASKS: [u64; 6] = [
    0xAAAA_AAAA_AAAA_AAAA,
    0xCCCC_CCCC_CCCC_CCCC,
    0xF0F0_F0F0_F0F0_F0F0,
    0xFF00_FF00_FF00_FF00,
    0xFFFF_0000_FFFF_0000,
    0xFFFF_FFFF_0000_0000,
];

/// A truth table over a fixed number of variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TruthTable {
    num_vars: usize,
    words: Vec<u64>,
}

impl TruthTable {
    /// Returns the constant false function over `num_vars` variables.
    pub fn new(num_vars: usize) -> Self {
        assert!(
            num_vars <= MAX_VARS,
            "truth tables support at most {} variables, got {}",
            MAX_VARS,
            num_vars
        );
        let num_words = ((1usize << num_vars) + WORD_BITS - 1) / WORD_BITS;
        TruthTable {
            num_vars,
            words: vec![0; num_words],
        }
    }

    /// Returns the constant function `value` over `num_vars` variables.
    pub fn constant(num_vars: usize, value: bool) -> Self {
        let tt = TruthTable::new(num_vars);
        if value { tt.not() } else { tt }
    }

    /// Returns the projection function `x<index>` over `num_vars` variables.
    pub fn var(num_vars: usize, index: usize) -> Self {
        assert!(
            index < num_vars,
            "variable index {} out of range for a {}-variable table",
            index,
            num_vars
        );
        let mut tt = TruthTable::new(num_vars);
        if index < 6 {
            for word in tt.words.iter_mut() {
                *word = VAR_MASKS[index];
            }
        } else {
            let period = 1usize << (index - 6);
            for (w, word) in tt.words.iter_mut().enumerate() {
                if (w / period) & 1 == 1 {
                    *word = u64::MAX;
                }
            }
        }
        tt.mask_unused();
        tt
    }

    /// The identity function of a single variable.
    pub fn identity() -> Self {
        TruthTable::var(1, 0)
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Number of input assignments, ie `2^num_vars`.
    pub fn num_bits(&self) -> usize {
        1 << self.num_vars
    }

    pub fn get_bit(&self, assignment: usize) -> bool {
        debug_assert!(assignment < self.num_bits());
        (self.words[assignment / WORD_BITS] >> (assignment % WORD_BITS)) & 1 == 1
    }

    pub fn set_bit(&mut self, assignment: usize, value: bool) {
        debug_assert!(assignment < self.num_bits());
        let mask = 1u64 << (assignment % WORD_BITS);
        if value {
            self.words[assignment / WORD_BITS] |= mask;
        } else {
            self.words[assignment / WORD_BITS] &= !mask;
        }
    }

    /// Clears the bits above `2^num_vars` when the table is smaller than a word.
    fn mask_unused(&mut self) {
        if self.num_vars < 6 {
            self.words[0] &= (1u64 << (1 << self.num_vars)) - 1;
        }
    }

    fn zip_with(&self, other: &TruthTable, op: impl Fn(u64, u64) -> u64) -> TruthTable {
        assert_eq!(
            self.num_vars, other.num_vars,
            "truth tables must have the same number of variables"
        );
        TruthTable {
            num_vars: self.num_vars,
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(&a, &b)| op(a, b))
                .collect(),
        }
    }

    pub fn not(&self) -> TruthTable {
        let mut tt = TruthTable {
            num_vars: self.num_vars,
            words: self.words.iter().map(|w| !w).collect(),
        };
        tt.mask_unused();
        tt
    }

    pub fn and(&self, other: &TruthTable) -> TruthTable {
        self.zip_with(other, |a, b| a & b)
    }

    pub fn or(&self, other: &TruthTable) -> TruthTable {
        self.zip_with(other, |a, b| a | b)
    }

    pub fn xor(&self, other: &TruthTable) -> TruthTable {
        self.zip_with(other, |a, b| a ^ b)
    }

    pub fn is_const0(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn is_const1(&self) -> bool {
        self.not().is_const0()
    }

    /// Number of assignments for which the function is true.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterates over the assignments for which the function is true, in increasing order.
    pub fn minterms(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_bits()).filter(|&i| self.get_bit(i))
    }

    /// Evaluates the function on the given variable values (`values[v]` is `x<v>`).
    pub fn evaluate(&self, values: &[bool]) -> bool {
        debug_assert_eq!(values.len(), self.num_vars);
        let assignment = values
            .iter()
            .enumerate()
            .fold(0, |acc, (v, &b)| acc | ((b as usize) << v));
        self.get_bit(assignment)
    }

    /// Cofactor with respect to `x<var> = 0`, kept over the same variables.
    pub fn cofactor0(&self, var: usize) -> TruthTable {
        self.cofactor(var, false)
    }

    /// Cofactor with respect to `x<var> = 1`, kept over the same variables.
    pub fn cofactor1(&self, var: usize) -> TruthTable {
        self.cofactor(var, true)
    }

    fn cofactor(&self, var: usize, value: bool) -> TruthTable {
        assert!(var < self.num_vars);
        let mut tt = TruthTable::new(self.num_vars);
        let bit = 1usize << var;
        for i in 0..self.num_bits() {
            let source = if value { i | bit } else { i & !bit };
            tt.set_bit(i, self.get_bit(source));
        }
        tt
    }

    /// Functional composition.
    ///
    /// `inputs[v]` is the function plugged into variable `x<v>` of `self`; all inputs
    /// are expressed over the same `num_vars` variables, which are the variables of the result.
    pub fn compose(&self, num_vars: usize, inputs: &[TruthTable]) -> TruthTable {
        assert_eq!(
            inputs.len(),
            self.num_vars,
            "composition needs one input function per variable"
        );
        assert!(inputs.iter().all(|tt| tt.num_vars == num_vars));

        let mut tt = TruthTable::new(num_vars);
        for j in 0..tt.num_bits() {
            let assignment = inputs
                .iter()
                .enumerate()
                .fold(0, |acc, (v, input)| acc | ((input.get_bit(j) as usize) << v));
            tt.set_bit(j, self.get_bit(assignment));
        }
        tt
    }

    /// Re-expresses the function over `num_vars` variables, variable `x<v>` becoming
    /// `x<mapping[v]>`. Used to extend and permute a table to a larger support.
    pub fn remap(&self, num_vars: usize, mapping: &[usize]) -> TruthTable {
        let projections = mapping
            .iter()
            .map(|&target| TruthTable::var(num_vars, target))
            .collect::<Vec<_>>();
        self.compose(num_vars, &projections)
    }
}

impl Display for TruthTable {
    /// Hexadecimal, most significant nibble first.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let num_nibbles = (self.num_bits() + 3) / 4;
        for k in (0..num_nibbles).rev() {
            let nibble = (0..4)
                .filter(|b| 4 * k + b < self.num_bits())
                .fold(0u8, |acc, b| acc | ((self.get_bit(4 * k + b) as u8) << b));
            write!(f, "{:x}", nibble)?;
        }
        Ok(())
    }
}
