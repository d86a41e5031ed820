//! Shared test infrastructure for crosswalk-signal integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crosswalk_signal::{
    Buzzer, LightPattern, PedestrianLatch, SignalController, SignalLights, SignalOutput,
    TimeDuration, TimeInstant, TimeSource, ToneOutput,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        Some(TestInstant(self.0 + duration.0))
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + duration.0));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Lamps
// ============================================================================

/// Mock signal lamps that record every output write
pub struct MockLights {
    red: bool,
    green: bool,
    writes: heapless::Vec<(SignalOutput, bool), 256>,
}

impl MockLights {
    pub fn new() -> Self {
        Self {
            red: false,
            green: false,
            writes: heapless::Vec::new(),
        }
    }

    pub fn pattern(&self) -> LightPattern {
        LightPattern::new(self.red, self.green)
    }

    pub fn writes(&self) -> &[(SignalOutput, bool)] {
        &self.writes
    }
}

impl SignalLights for MockLights {
    fn set_level(&mut self, output: SignalOutput, on: bool) {
        match output {
            SignalOutput::Red => self.red = on,
            SignalOutput::Green => self.green = on,
        }
        let _ = self.writes.push((output, on));
    }
}

// ============================================================================
// Mock Tone Output
// ============================================================================

/// Mock PWM output; clones share the same recorded state so a test can keep
/// a handle after moving one into a `Buzzer`
#[derive(Clone)]
pub struct MockTone {
    duty: Rc<Cell<f32>>,
    history: Rc<RefCell<heapless::Vec<f32, 64>>>,
}

impl MockTone {
    pub fn new() -> Self {
        Self {
            duty: Rc::new(Cell::new(0.0)),
            history: Rc::new(RefCell::new(heapless::Vec::new())),
        }
    }

    pub fn duty(&self) -> f32 {
        self.duty.get()
    }

    pub fn history(&self) -> heapless::Vec<f32, 64> {
        self.history.borrow().clone()
    }
}

impl ToneOutput for MockTone {
    fn set_duty(&mut self, duty: f32) {
        self.duty.set(duty);
        let _ = self.history.borrow_mut().push(duty);
    }
}

// ============================================================================
// Type Aliases
// ============================================================================

pub type TestBuzzer<'t> = Buzzer<'t, TestInstant, MockTone, MockTimeSource>;

pub type TestController<'a> =
    SignalController<'a, TestInstant, MockLights, MockTone, MockTimeSource>;

/// Builds a controller over fresh lamps; latch and buzzer stay with the caller
pub fn controller<'a>(latch: &'a PedestrianLatch, buzzer: &'a TestBuzzer<'a>) -> TestController<'a> {
    SignalController::new(MockLights::new(), latch, buzzer)
}
