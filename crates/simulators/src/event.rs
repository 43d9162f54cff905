use tracksim_core::Position;

/// Control actions supported by the simulators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Abort the run.
    StopEarly,
}

/// Emitted after each accepted step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Step index (1-based; position 0 is the start).
    pub step: usize,
    /// The accepted position.
    pub position: Position,
    /// Candidates rejected before this step was accepted.
    pub rejections: usize,
    /// True if every attempt was rejected and the particle stayed put.
    pub exhausted: bool,
}
