mod single_threaded_tuner;
mod standard_tuner;

pub use single_threaded_tuner::SingleThreadedTuner;
pub use standard_tuner::StandardTuner;
