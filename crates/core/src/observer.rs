/// Watches a running simulation one event at a time.
///
/// A simulator hands every accepted step to its observer. Returning
/// `Some(action)` asks the simulator to act on it (each simulator family
/// defines its own action type), while `None` leaves the run untouched.
/// Typical uses are counting rejections, tracing positions, or cutting a run
/// short.
///
/// Any `FnMut(&E) -> Option<A>` closure is an observer, and `()` is the
/// observer that never acts.
pub trait Observer<E, A> {
    /// Inspects `event` and optionally requests an action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
