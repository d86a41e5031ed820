#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`SignalController`**: Phase/countdown state machine, evaluated once per coarse tick
//! - **`SignalPhase`**: `Stopped`, `Go`, `Caution` or `Pedestrian`, with its lamp pattern
//! - **`PedestrianLatch`**: Crossing request flag raised from an interrupt, consumed by the controller
//! - **`Buzzer`**: Time-bounded crossing cue on a PWM output, silenced by the fine tick
//! - **`TickScheduler`** / **`Cadence`**: Coarse (1 s) and fine (100 ms) periodic drivers
//! - **`SignalLights`** / **`ToneOutput`**: Traits to implement for your lamp and buzzer hardware
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`SignalConfig`**: Phase lengths and crossing cue settings
//!
//! The controller never fails at runtime. Only configuration is validated, by
//! returning [`ConfigError`].

pub(crate) mod fmt;

pub mod buzzer;
pub mod config;
pub mod controller;
pub mod latch;
pub mod output;
pub mod phase;
pub mod scheduler;
pub mod time;

pub use buzzer::{Buzzer, BuzzerSchedule};
pub use config::{
    COARSE_PERIOD_MS, CUE_DURATION_MS, CUE_DUTY, ConfigError, FINE_PERIOD_MS, PhaseTimings,
    SignalConfig, SignalConfigBuilder, TONE_FREQUENCY_HZ,
};
pub use controller::{SignalController, status_line};
pub use latch::PedestrianLatch;
pub use output::{LightPattern, SignalLights, SignalOutput, ToneOutput};
pub use phase::{PhaseState, SignalPhase, TickOutcome};
pub use scheduler::{Cadence, ServiceReport, TickScheduler};
pub use time::{TimeDuration, TimeInstant, TimeSource};
