//! BTEB regulations and their semester weight tables.
//!
//! Each regulation weights the eight diploma semesters differently when the
//! board computes a cumulative GPA. The tables are compile-time constants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BtebError;

/// Number of semesters in a diploma program.
pub const SEMESTER_COUNT: usize = 8;

const WEIGHTS_2010: [u32; SEMESTER_COUNT] = [5, 5, 5, 15, 15, 20, 25, 10];
const WEIGHTS_2016: [u32; SEMESTER_COUNT] = [5, 5, 5, 10, 15, 20, 25, 15];
const WEIGHTS_2022: [u32; SEMESTER_COUNT] = [5, 5, 10, 10, 20, 20, 20, 10];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Regulation {
    R2010,
    R2016,
    #[default]
    R2022,
}

impl Regulation {
    pub const ALL: [Regulation; 3] = [Regulation::R2010, Regulation::R2016, Regulation::R2022];

    pub fn id(&self) -> &'static str {
        match self {
            Regulation::R2010 => "2010",
            Regulation::R2016 => "2016",
            Regulation::R2022 => "2022",
        }
    }

    pub fn weight_table(&self) -> WeightTable<'static> {
        let weights: &'static [u32] = match self {
            Regulation::R2010 => &WEIGHTS_2010,
            Regulation::R2016 => &WEIGHTS_2016,
            Regulation::R2022 => &WEIGHTS_2022,
        };
        WeightTable::new(weights)
    }

    pub fn known_ids() -> Vec<String> {
        Self::ALL.iter().map(|r| r.id().to_string()).collect()
    }
}

impl fmt::Display for Regulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Regulation {
    type Err = BtebError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2010" => Ok(Regulation::R2010),
            "2016" => Ok(Regulation::R2016),
            "2022" => Ok(Regulation::R2022),
            other => Err(BtebError::invalid_regulation(other, Self::known_ids())),
        }
    }
}

impl TryFrom<String> for Regulation {
    type Error = BtebError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Regulation> for String {
    fn from(value: Regulation) -> Self {
        value.id().to_string()
    }
}

/// Per-semester percentage weights, indexed by 1-based semester position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightTable<'a> {
    weights: &'a [u32],
}

impl<'a> WeightTable<'a> {
    pub const fn new(weights: &'a [u32]) -> Self {
        Self { weights }
    }

    /// Weight for a 1-based semester position. Positions past the end of
    /// the table weigh nothing.
    pub fn weight_at(&self, position: usize) -> u32 {
        position
            .checked_sub(1)
            .and_then(|i| self.weights.get(i))
            .copied()
            .unwrap_or(0)
    }

    pub fn weights(&self) -> &'a [u32] {
        self.weights
    }

    pub fn total(&self) -> u32 {
        self.weights.iter().sum()
    }
}
