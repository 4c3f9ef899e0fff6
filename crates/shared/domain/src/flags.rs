use bitflags::bitflags;

bitflags! {
    /// Structural traits of a declared property.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct PropertyFlags: u8 {
        /// The value is an ordered sequence.
        const COLLECTION = 1 << 0;
        /// The property owns a nested schema.
        const NESTED = 1 << 1;
        /// Input is converted before it is stored: nested values become
        /// sub-contracts (never plain maps) and coerced scalars take their declared type.
        const TYPED = 1 << 2;

        const FORM = Self::NESTED.bits() | Self::TYPED.bits();
    }
}

impl PropertyFlags {
    #[must_use]
    pub const fn is_collection(self) -> bool {
        self.contains(Self::COLLECTION)
    }

    #[must_use]
    pub const fn is_nested(self) -> bool {
        self.contains(Self::NESTED)
    }

    /// Lowercase flag names, for diagnostics.
    #[must_use]
    pub fn labels(self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.contains(Self::COLLECTION) {
            out.push("collection");
        }
        if self.contains(Self::NESTED) {
            out.push("nested");
        }
        if self.contains(Self::TYPED) {
            out.push("typed");
        }
        out
    }
}
