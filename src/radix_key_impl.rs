use crate::RadixKey;

macro_rules! unsigned_key_impl {
    ($($t:ty),*) => {
        $(
            impl RadixKey for $t {
                type Bits = $t;

                #[inline]
                fn to_radix_bits(&self) -> $t {
                    *self
                }
            }
        )*
    };
}

macro_rules! signed_key_impl {
    ($($t:ty => $u:ty),*) => {
        $(
            impl RadixKey for $t {
                type Bits = $u;

                #[inline]
                fn to_radix_bits(&self) -> $u {
                    (*self as $u) ^ (<$t>::MIN as $u)
                }
            }
        )*
    };
}

macro_rules! float_key_impl {
    ($($t:ty => $u:ty),*) => {
        $(
            impl RadixKey for $t {
                type Bits = $u;

                #[inline]
                fn to_radix_bits(&self) -> $u {
                    let bits = self.to_bits();
                    let sign: $u = 1 << (<$u>::BITS - 1);

                    if bits & sign == 0 {
                        bits ^ sign
                    } else {
                        !bits
                    }
                }
            }
        )*
    };
}

unsigned_key_impl!(u8, u16, u32, u64, u128);
signed_key_impl!(i8 => u8, i16 => u16, i32 => u32, i64 => u64, i128 => u128);
float_key_impl!(f32 => u32, f64 => u64);

#[cfg(target_pointer_width = "16")]
impl RadixKey for usize {
    type Bits = u16;

    #[inline]
    fn to_radix_bits(&self) -> u16 {
        *self as u16
    }
}

#[cfg(target_pointer_width = "32")]
impl RadixKey for usize {
    type Bits = u32;

    #[inline]
    fn to_radix_bits(&self) -> u32 {
        *self as u32
    }
}

#[cfg(target_pointer_width = "64")]
impl RadixKey for usize {
    type Bits = u64;

    #[inline]
    fn to_radix_bits(&self) -> u64 {
        *self as u64
    }
}

#[cfg(target_pointer_width = "16")]
impl RadixKey for isize {
    type Bits = u16;

    #[inline]
    fn to_radix_bits(&self) -> u16 {
        (*self as i16).to_radix_bits()
    }
}

#[cfg(target_pointer_width = "32")]
impl RadixKey for isize {
    type Bits = u32;

    #[inline]
    fn to_radix_bits(&self) -> u32 {
        (*self as i32).to_radix_bits()
    }
}

#[cfg(target_pointer_width = "64")]
impl RadixKey for isize {
    type Bits = u64;

    #[inline]
    fn to_radix_bits(&self) -> u64 {
        (*self as i64).to_radix_bits()
    }
}

impl RadixKey for bool {
    type Bits = u8;

    #[inline]
    fn to_radix_bits(&self) -> u8 {
        *self as u8
    }
}

#[cfg(test)]
mod tests {
    use crate::{RadixKey, SortOrder};

    fn assert_ascending<K: RadixKey>(keys: &[K]) {
        for w in keys.windows(2) {
            assert!(w[0].to_radix_bits() < w[1].to_radix_bits());
        }
    }

    #[test]
    pub fn test_signed_order() {
        assert_ascending(&[i8::MIN, -1, 0, 1, i8::MAX]);
        assert_ascending(&[i32::MIN, -70_000, -1, 0, 1, 70_000, i32::MAX]);
        assert_ascending(&[i64::MIN, -1, 0, i64::MAX]);
        assert_ascending(&[isize::MIN, -1, 0, isize::MAX]);
    }

    #[test]
    pub fn test_float_order() {
        assert_ascending(&[
            f32::NEG_INFINITY,
            -1.5f32,
            -f32::MIN_POSITIVE,
            -0.0,
            0.0,
            f32::MIN_POSITIVE,
            1.5,
            f32::INFINITY,
        ]);
        assert_ascending(&[f64::NEG_INFINITY, -1e300, -0.0, 0.0, 1e-300, f64::INFINITY]);
    }

    #[test]
    pub fn test_nan_placement() {
        let pos_nan = f32::NAN.abs();
        let neg_nan = -pos_nan;

        assert!(pos_nan.to_radix_bits() > f32::INFINITY.to_radix_bits());
        assert!(neg_nan.to_radix_bits() < f32::NEG_INFINITY.to_radix_bits());
    }

    #[test]
    pub fn test_descending_inverts_order() {
        let a = -3i16;
        let b = 7i16;

        assert!(a.ordered_bits(SortOrder::Ascending) < b.ordered_bits(SortOrder::Ascending));
        assert!(a.ordered_bits(SortOrder::Descending) > b.ordered_bits(SortOrder::Descending));
        assert_eq!(
            a.ordered_bits(SortOrder::Descending),
            !a.ordered_bits(SortOrder::Ascending)
        );
    }

    #[test]
    pub fn test_bool_and_unsigned() {
        assert_ascending(&[false, true]);
        assert_ascending(&[0u8, 1, 255]);
        assert_ascending(&[0u128, 1, u128::MAX]);
    }
}
