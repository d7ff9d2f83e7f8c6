use crate::tuner::{Strategy, Tuner, TuningParams};
use crate::{RadixKey, RadixSort};
use rand::distributions::{Distribution, Standard};
use rand::{thread_rng, Rng};
use std::fmt::Debug;
use std::ops::{Shl, ShlAssign, Shr, ShrAssign};

pub trait NumericTest<T>:
    RadixKey
    + Sized
    + Copy
    + Debug
    + PartialEq
    + Ord
    + Send
    + Sync
    + Shl<Output = T>
    + Shr<Output = T>
    + ShrAssign
    + ShlAssign
{
}

impl<T> NumericTest<T> for T
where
    T: RadixKey
        + Sized
        + Copy
        + Debug
        + PartialEq
        + Ord
        + Send
        + Sync
        + Shl<Output = T>
        + Shr<Output = T>
        + ShrAssign
        + ShlAssign,
{
}

pub struct SingleStrategyTuner {
    pub(crate) strategy: Strategy,
}

impl Tuner for SingleStrategyTuner {
    #[inline]
    fn pick_strategy(&self, _p: &TuningParams) -> Strategy {
        self.strategy
    }
}

pub fn gen_inputs<T>(n: usize, shift: T) -> Vec<T>
where
    T: NumericTest<T>,
    Standard: Distribution<T>,
{
    let mut rng = thread_rng();
    let mut inputs: Vec<T> = (0..n).map(|_| rng.gen()).collect();

    inputs[0..(n / 2)].iter_mut().for_each(|v| *v >>= shift);
    inputs[(n / 2)..n].iter_mut().for_each(|v| *v <<= shift);

    inputs
}

/// Inputs straddling every strategy threshold of the default configuration.
pub fn gen_input_set<T>(shift: T) -> Vec<Vec<T>>
where
    T: NumericTest<T>,
    Standard: Distribution<T>,
{
    let n = 600_000;
    let half = n / 2;
    let inputs = gen_inputs(n, shift);

    // Middle values are used for the case where shift is provided
    let mut out = vec![
        vec![],
        inputs[..1].to_vec(),
        inputs[(half - 5)..(half + 5)].to_vec(),
        inputs[(half - 50)..(half + 50)].to_vec(),
        inputs[(half - 8_192)..(half + 8_192)].to_vec(),
        inputs[(half - 8_192)..(half + 8_193)].to_vec(),
        inputs[(half - 65_536)..(half + 65_536)].to_vec(),
        inputs[(half - 131_072)..(half + 131_072)].to_vec(),
        inputs[(half - 131_072)..(half + 131_073)].to_vec(),
        inputs,
    ];

    out.reverse();

    out
}

pub fn validate_sort<T, F>(mut inputs: Vec<T>, sort_fn: F)
where
    T: NumericTest<T>,
    F: Fn(&mut [T]),
{
    let mut inputs_clone = inputs.clone();

    sort_fn(&mut inputs);
    inputs_clone.sort_unstable();

    assert_eq!(inputs, inputs_clone);
}

pub fn sort_comparison_suite<T, F>(shift: T, sort_fn: F)
where
    F: Fn(&mut [T]),
    T: NumericTest<T>,
    Standard: Distribution<T>,
{
    let input_set = gen_input_set(shift);

    for s in input_set {
        validate_sort(s, &sort_fn);
    }
}

pub fn validate_u32_patterns<F>(n: usize, sort_fn: F)
where
    F: Fn(&mut [u32]),
{
    let mut rng = thread_rng();
    let random: Vec<u32> = (0..n).map(|_| rng.gen()).collect();
    let input_sets: Vec<Vec<u32>> = vec![vec![u32::MAX; n], random, (0..n as u32).rev().collect()];
    let masks: [u32; 13] = [
        0xFFFF_FFFF,
        // Empty levels
        0xFFFF_FF00,
        0xFFFF_00FF,
        0xFF00_FFFF,
        0x00FF_FFFF,
        0x0000_FFFF,
        0xFFFF_0000,
        0b10000000000000000000000000000000,
        0b00000000000000000000000000000001,
        0b11111111111111111111111111111110,
        0b01111111111111111111111111111111,
        0b10101010101010101010101010101010,
        0b01010101010101010101010101010101,
    ];

    for inputs in input_sets.iter() {
        for mask in masks {
            validate_sort(
                inputs.iter().map(|v| *v & mask).collect::<Vec<u32>>(),
                &sort_fn,
            );
        }
    }
}

/// Sort `count` random keys with a forced strategy, checking the result and
/// the strategy actually used.
pub fn sort_single_strategy<T>(count: usize, strategy: Strategy)
where
    T: NumericTest<T>,
    Standard: Distribution<T>,
{
    let mut rng = thread_rng();
    let mut input_set: Vec<T> = (0..count).map(|_| rng.gen()).collect();
    let mut input_set_expected = input_set.clone();
    let report = input_set
        .radix_sort_builder()
        .with_tuner(&SingleStrategyTuner { strategy })
        .sort()
        .unwrap();

    input_set_expected.sort_unstable();

    assert_eq!(input_set, input_set_expected);
    if count >= 2 {
        assert_eq!(report.strategy(), Some(strategy));
    }
}
