/// Lifecycle phase of a triggerable action.
///
/// The progress button never advances through these on its own; it only reacts
/// to whichever state the host sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    /// The user pressed the button; the host is about to start work
    Clicked,
    /// Work is in flight, the fill animation runs and clicks are ignored
    Loading,
    /// Idle / ready
    #[default]
    Completed,
}
