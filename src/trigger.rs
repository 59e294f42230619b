#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Armed,
    Fired,
}

/// One-shot visibility trigger for the stats region.
#[derive(Debug)]
pub struct VisibilityTrigger {
    state: TriggerState,
}

impl Default for VisibilityTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityTrigger {
    pub fn new() -> Self {
        Self {
            state: TriggerState::Armed,
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Feed one intersection event. Returns `true` only for the event that fires.
    pub fn observe(&mut self, intersecting: bool) -> bool {
        match self.state {
            TriggerState::Armed if intersecting => {
                self.state = TriggerState::Fired;
                true
            }
            _ => false,
        }
    }
}
