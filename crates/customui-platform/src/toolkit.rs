use customui_core::{Mutation, NativeHandle, Slot, UserInput, Widget};

/// Something a native control reported: "the user did X".
#[derive(Clone, Debug, PartialEq)]
pub struct NativeEvent {
    pub handle: NativeHandle,
    pub input: UserInput,
}

/// The native widget toolkit, as seen by the render context.
///
/// Every method runs on the render thread. Controls are identified by the
/// [`NativeHandle`] returned from `create`; handles are never reused while
/// the control is alive.
pub trait Toolkit {
    /// Creates the control for `widget`, initialised from its model state.
    fn create(&mut self, widget: &Widget, parent: Option<NativeHandle>) -> NativeHandle;

    /// Creates page `index` of a tabs control.
    fn create_page(&mut self, tabs: NativeHandle, index: usize, title: &str) -> NativeHandle;

    /// Puts `child` into the layout of `container`.
    fn place(&mut self, container: NativeHandle, child: NativeHandle, slot: Slot);

    /// Wires the control's change notification so it shows up in
    /// [`Toolkit::poll_events`].
    fn connect(&mut self, handle: NativeHandle);

    /// Mirrors a mutation that has already been applied to `widget`.
    fn update(&mut self, handle: NativeHandle, widget: &Widget, mutation: &Mutation);

    /// Blocks or unblocks change notifications. Returns the previous state.
    fn block_signals(&mut self, handle: NativeHandle, blocked: bool) -> bool;

    fn release(&mut self, handle: NativeHandle);

    /// Drains user input collected since the last call, oldest first.
    fn poll_events(&mut self) -> Vec<NativeEvent>;
}
