use std::fmt;

use serde::{Deserialize, Serialize};

pub const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

/// 0.001 ETH per cell
pub const DEFAULT_UNIT_PRICE_WEI: u128 = WEI_PER_ETH / 1000;

/// An exact amount in wei. Formats as ETH.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub u128);

impl Price {
    /// Saturates rather than wrapping; config validation keeps real totals in range
    pub fn for_cells(count: usize, unit: Price) -> Self {
        Price((count as u128).saturating_mul(unit.0))
    }

    pub fn wei(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / WEI_PER_ETH;
        let frac = self.0 % WEI_PER_ETH;
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:018}", frac);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}
