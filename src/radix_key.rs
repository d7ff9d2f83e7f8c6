use std::fmt::Debug;

/// The direction a sort should order keys in.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Fixed-width unsigned integer a key is transformed into before binning.
///
/// Unsigned comparison of two transformed values must agree with the
/// intended ordering of the keys they were produced from.
pub trait RadixBits: Copy + Eq + Ord + Debug + Send + Sync + 'static {
    /// Width of the transformed key in bits.
    const BITS: u32;

    /// Value used for padding slots beyond the end of the input. It compares
    /// greater than or equal to every transformed key, so padding always lands
    /// after real data and can be dropped at scatter time.
    const SORT_IDENTITY: Self;

    /// Extract the `radix_bits` wide digit for `stage`, counting from the least
    /// significant end. Bits above the key width read as zero.
    fn digit(self, stage: usize, radix_bits: u32) -> u8;

    fn invert(self) -> Self;
}

/// A key that can be sorted by the radix sort engine.
///
/// Implementations map the key into an unsigned integer such that unsigned
/// ordering of the result equals ascending ordering of the key.
///
/// ```
/// use dpsort::RadixKey;
///
/// #[derive(Clone, Copy)]
/// struct Timestamp {
///     seconds: u32,
/// }
///
/// impl RadixKey for Timestamp {
///     type Bits = u32;
///
///     fn to_radix_bits(&self) -> u32 {
///         self.seconds
///     }
/// }
/// ```
pub trait RadixKey: Copy {
    type Bits: RadixBits;

    fn to_radix_bits(&self) -> Self::Bits;

    #[inline]
    fn ordered_bits(&self, order: SortOrder) -> Self::Bits {
        match order {
            SortOrder::Ascending => self.to_radix_bits(),
            SortOrder::Descending => self.to_radix_bits().invert(),
        }
    }
}

/// Number of digit stages needed to cover a key of `key_bits` bits.
#[inline]
pub fn stage_count(key_bits: u32, radix_bits: u32) -> usize {
    key_bits.div_ceil(radix_bits) as usize
}

macro_rules! radix_bits_impl {
    ($($t:ty),*) => {
        $(
            impl RadixBits for $t {
                const BITS: u32 = <$t>::BITS;
                const SORT_IDENTITY: Self = <$t>::MAX;

                #[inline]
                fn digit(self, stage: usize, radix_bits: u32) -> u8 {
                    let shift = stage as u32 * radix_bits;
                    if shift >= Self::BITS {
                        return 0;
                    }

                    let mask = (1u32 << radix_bits) - 1;
                    ((self >> shift) as u32 & mask) as u8
                }

                #[inline]
                fn invert(self) -> Self {
                    !self
                }
            }
        )*
    };
}

radix_bits_impl!(u8, u16, u32, u64, u128);
