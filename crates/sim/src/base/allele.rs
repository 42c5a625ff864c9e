use std::fmt;

use serde::{Deserialize, Serialize};

/// The state of one allele slot of a biallelic locus.
///
/// Every locus stores two slots. On a hemizygous chromosome (an X in a male,
/// a Y anywhere) the slot with no chromosome copy holds [`Allele::Unexpressed`]
/// so the layout never depends on sex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Allele {
    /// Ancestral state.
    #[default]
    Wild = 0,
    /// Derived state.
    Mutant = 1,
    /// No chromosome copy carries this slot.
    Unexpressed = 2,
}

impl Allele {
    /// Returns true when a chromosome copy carries this slot.
    #[inline]
    pub fn is_expressed(self) -> bool {
        !matches!(self, Self::Unexpressed)
    }

    /// Number of mutant copies this slot contributes (0 or 1).
    #[inline]
    pub fn dosage(self) -> u32 {
        u32::from(self == Self::Mutant)
    }

    /// Biallelic flip. The sentinel is left unchanged.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Self::Wild => Self::Mutant,
            Self::Mutant => Self::Wild,
            Self::Unexpressed => Self::Unexpressed,
        }
    }

    /// Expressed allele from a boolean "is mutant".
    #[inline]
    pub fn from_mutant(mutant: bool) -> Self {
        if mutant {
            Self::Mutant
        } else {
            Self::Wild
        }
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Wild => '0',
            Self::Mutant => '1',
            Self::Unexpressed => '-',
        };
        write!(f, "{c}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_is_biallelic() {
        assert_eq!(Allele::Wild.flipped(), Allele::Mutant);
        assert_eq!(Allele::Mutant.flipped(), Allele::Wild);
        assert_eq!(Allele::Unexpressed.flipped(), Allele::Unexpressed);
    }

    #[test]
    fn test_dosage_and_expression() {
        assert_eq!(Allele::Wild.dosage(), 0);
        assert_eq!(Allele::Mutant.dosage(), 1);
        assert_eq!(Allele::Unexpressed.dosage(), 0);
        assert!(!Allele::Unexpressed.is_expressed());
        assert!(Allele::Wild.is_expressed());
    }

    #[test]
    fn test_display() {
        assert_eq!(Allele::Wild.to_string(), "0");
        assert_eq!(Allele::Mutant.to_string(), "1");
        assert_eq!(Allele::Unexpressed.to_string(), "-");
    }
}
