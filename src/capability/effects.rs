/// Side-effect annotations surfaced to clients. Advisory only: nothing in the
/// registry or dispatcher enforces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SideEffects {
    pub read_only: bool,
    pub idempotent: bool,
    /// The action reaches outside this process (starts another application).
    pub externally_visible: bool,
}

impl SideEffects {
    /// Pure local query.
    pub const OBSERVE: Self = Self {
        read_only: true,
        idempotent: true,
        externally_visible: false,
    };

    /// Starts an external process; repeating it repeats the effect.
    pub const ACT: Self = Self {
        read_only: false,
        idempotent: false,
        externally_visible: true,
    };

    pub fn is_mutating(&self) -> bool {
        !self.read_only
    }
}
