mod cycle;
mod driver;
mod mode;

pub use cycle::TimerCycle;
pub use driver::{TimerDriver, TICK};
pub use mode::{Durations, TimerMode, MAX_DURATION_MIN, MIN_DURATION_MIN};
