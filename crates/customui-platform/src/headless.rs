//! In-memory toolkit for tests, demos and CI machines without a display.
//!
//! Controls live in a slotmap; their keys are handed out as native handles.
//! A [`HeadlessProbe`] shares the same state and plays the user: it injects
//! input and inspects what the render context did to the controls.
//!
//! Like a real toolkit, a control whose value changes because of an update
//! emits its change signal, unless signals are blocked.

use std::collections::VecDeque;
use std::sync::Arc;

use customui_core::{
    Mutation, NativeHandle, ProxyHandle, Slot, UserInput, Widget, WidgetClass, WidgetId,
    WidgetKind, WindowOp, registry,
};
use parking_lot::Mutex;
use slotmap::{Key, KeyData, SlotMap, new_key_type};

use crate::toolkit::{NativeEvent, Toolkit};

new_key_type! {
    struct ControlKey;
}

fn handle_of(key: ControlKey) -> NativeHandle {
    NativeHandle(key.data().as_ffi())
}

fn key_of(handle: NativeHandle) -> ControlKey {
    ControlKey::from(KeyData::from_ffi(handle.0))
}

/// Snapshot of one headless control.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessControl {
    /// `None` for tab pages.
    pub class: Option<WidgetClass>,
    pub label: String,
    pub parent: Option<NativeHandle>,
    pub slot: Option<Slot>,
    pub connected: bool,
    pub blocked: bool,
    pub enabled: bool,
    pub visible: bool,
    pub shown: bool,
    /// Current value in the shape of the signal the control would emit.
    pub value: Option<UserInput>,
    pub updates: usize,
}

#[derive(Default)]
struct Shared {
    controls: SlotMap<ControlKey, HeadlessControl>,
    pending: VecDeque<NativeEvent>,
    released: usize,
}

impl Shared {
    fn emit(&mut self, handle: NativeHandle, input: UserInput) {
        match self.controls.get(key_of(handle)) {
            Some(c) if c.connected && !c.blocked => {
                self.pending.push_back(NativeEvent { handle, input })
            }
            Some(_) => log::trace!("signal from {handle:?} dropped: blocked or not connected"),
            None => log::debug!("signal from unknown control {handle:?} dropped"),
        }
    }
}

/// The value signal a control for `widget` carries.
fn value_signal(widget: &Widget) -> Option<UserInput> {
    Some(match &widget.kind {
        WidgetKind::Edit(e) => UserInput::TextChanged(e.value.clone()),
        WidgetKind::TextBrowser(t) => UserInput::TextChanged(t.text.clone()),
        WidgetKind::Slider(s) => UserInput::IntChanged(s.range.value),
        WidgetKind::Spinbox(s) if s.float => UserInput::DoubleChanged(s.value),
        WidgetKind::Spinbox(s) => UserInput::IntChanged(s.value as i32),
        WidgetKind::Checkbox(c) => UserInput::Toggled(c.checked),
        WidgetKind::Radiobutton(r) => UserInput::Toggled(r.checked),
        WidgetKind::Button(b) if b.checkable => UserInput::Toggled(b.pressed),
        WidgetKind::Combobox(c) => UserInput::IndexChanged(c.selected),
        WidgetKind::Tabs(t) => UserInput::IndexChanged(t.current as i32),
        WidgetKind::Table(t) => UserInput::CellSelected {
            row: t.selection.0,
            column: t.selection.1,
        },
        WidgetKind::Tree(t) => UserInput::TreeItemSelected(t.selection),
        _ => return None,
    })
}

fn label_of(widget: &Widget) -> String {
    match &widget.kind {
        WidgetKind::Window(w) => w.title.clone(),
        WidgetKind::Button(b) => b.text.clone(),
        WidgetKind::Label(l) => l.text.clone(),
        WidgetKind::Checkbox(c) => c.text.clone(),
        WidgetKind::Radiobutton(r) => r.text.clone(),
        WidgetKind::Group(g) => g.text.clone(),
        _ => String::new(),
    }
}

/// Toolkit half; moved onto the render thread.
pub struct HeadlessToolkit {
    shared: Arc<Mutex<Shared>>,
}

/// Test half; stays with the host.
#[derive(Clone)]
pub struct HeadlessProbe {
    shared: Arc<Mutex<Shared>>,
}

impl HeadlessToolkit {
    pub fn new() -> (HeadlessToolkit, HeadlessProbe) {
        let shared = Arc::new(Mutex::new(Shared::default()));
        (
            HeadlessToolkit {
                shared: shared.clone(),
            },
            HeadlessProbe { shared },
        )
    }
}

impl Toolkit for HeadlessToolkit {
    fn create(&mut self, widget: &Widget, parent: Option<NativeHandle>) -> NativeHandle {
        let control = HeadlessControl {
            class: Some(widget.class()),
            label: label_of(widget),
            parent,
            slot: None,
            connected: false,
            blocked: false,
            enabled: widget.enabled,
            visible: widget.visible,
            shown: matches!(&widget.kind, WidgetKind::Window(w) if w.shown),
            value: value_signal(widget),
            updates: 0,
        };
        let handle = handle_of(self.shared.lock().controls.insert(control));
        log::trace!("created <{}> as {handle:?}", widget.class());
        handle
    }

    fn create_page(&mut self, tabs: NativeHandle, index: usize, title: &str) -> NativeHandle {
        let control = HeadlessControl {
            class: None,
            label: title.to_string(),
            parent: Some(tabs),
            slot: Some(Slot::Stack(index)),
            connected: false,
            blocked: false,
            enabled: true,
            visible: true,
            shown: false,
            value: None,
            updates: 0,
        };
        handle_of(self.shared.lock().controls.insert(control))
    }

    fn place(&mut self, container: NativeHandle, child: NativeHandle, slot: Slot) {
        if let Some(c) = self.shared.lock().controls.get_mut(key_of(child)) {
            c.parent = Some(container);
            c.slot = Some(slot);
        }
    }

    fn connect(&mut self, handle: NativeHandle) {
        if let Some(c) = self.shared.lock().controls.get_mut(key_of(handle)) {
            c.connected = true;
        }
    }

    fn update(&mut self, handle: NativeHandle, widget: &Widget, mutation: &Mutation) {
        let mut shared = self.shared.lock();
        let Some(c) = shared.controls.get_mut(key_of(handle)) else {
            log::debug!("update for released control {handle:?} ignored");
            return;
        };
        c.updates += 1;
        c.enabled = widget.enabled;
        c.visible = widget.visible;
        c.label = label_of(widget);
        if let Mutation::Window(op) = mutation {
            match op {
                WindowOp::Show => c.shown = true,
                WindowOp::Hide => c.shown = false,
                _ => {}
            }
        }
        let value = value_signal(widget);
        if value != c.value {
            c.value = value.clone();
            if let Some(input) = value {
                shared.emit(handle, input);
            }
        }
    }

    fn block_signals(&mut self, handle: NativeHandle, blocked: bool) -> bool {
        match self.shared.lock().controls.get_mut(key_of(handle)) {
            Some(c) => std::mem::replace(&mut c.blocked, blocked),
            None => false,
        }
    }

    fn release(&mut self, handle: NativeHandle) {
        let mut shared = self.shared.lock();
        if shared.controls.remove(key_of(handle)).is_some() {
            shared.released += 1;
        }
        shared.pending.retain(|e| e.handle != handle);
    }

    fn poll_events(&mut self) -> Vec<NativeEvent> {
        self.shared.lock().pending.drain(..).collect()
    }
}

impl HeadlessProbe {
    /// Native control bound to widget `id` of `proxy`, if rendered.
    pub fn handle_of(&self, proxy: ProxyHandle, id: WidgetId) -> Option<NativeHandle> {
        registry::native_of(registry::by_id(proxy, id)?.key)
    }

    pub fn control(&self, handle: NativeHandle) -> Option<HeadlessControl> {
        self.shared.lock().controls.get(key_of(handle)).cloned()
    }

    /// Simulates the user acting on a control. Value inputs also move the
    /// control's own value, as they would on screen.
    pub fn user(&self, handle: NativeHandle, input: UserInput) {
        let mut shared = self.shared.lock();
        let same_shape =
            |v: &UserInput| std::mem::discriminant(v) == std::mem::discriminant(&input);
        if let Some(c) = shared.controls.get_mut(key_of(handle))
            && c.value.as_ref().is_some_and(same_shape)
        {
            c.value = Some(input.clone());
        }
        shared.emit(handle, input);
    }

    pub fn live_controls(&self) -> usize {
        self.shared.lock().controls.len()
    }

    pub fn released(&self) -> usize {
        self.shared.lock().released
    }

    /// Children of `container`, ordered by slot.
    pub fn children(&self, container: NativeHandle) -> Vec<(Slot, NativeHandle)> {
        let shared = self.shared.lock();
        let mut out: Vec<(Slot, NativeHandle)> = shared
            .controls
            .iter()
            .filter(|(_, c)| c.parent == Some(container))
            .filter_map(|(k, c)| Some((c.slot?, handle_of(k))))
            .collect();
        out.sort_by_key(|(slot, _)| match *slot {
            Slot::Stack(i) => (i, 0),
            Slot::Grid { row, column } => (row, column),
            Slot::FormLabel { row } => (row, 0),
            Slot::FormField { row } => (row, 1),
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use customui_core::Proxy;

    #[test]
    fn test_handles_round_trip_through_ffi() {
        let (mut tk, probe) = HeadlessToolkit::new();
        let proxy = Proxy::parse(r#"<ui><button id="1" text="Go"/></ui>"#).unwrap();
        let w = proxy.get_widget_by_id(1).unwrap();
        let h = tk.create(w, None);
        let c = probe.control(h).unwrap();
        assert_eq!(c.class, Some(WidgetClass::Button));
        assert_eq!(c.label, "Go");
        tk.release(h);
        assert!(probe.control(h).is_none());
        assert_eq!(probe.released(), 1);
    }

    #[test]
    fn test_blocked_control_stays_silent() {
        let (mut tk, probe) = HeadlessToolkit::new();
        let mut proxy = Proxy::parse(r#"<ui><hslider id="1"/></ui>"#).unwrap();
        let w = proxy.get_widget_by_id_mut(1).unwrap();
        let h = tk.create(w, None);
        tk.connect(h);

        w.apply(&Mutation::SetInt(10)).unwrap();
        tk.block_signals(h, true);
        tk.update(h, w, &Mutation::SetInt(10));
        assert!(tk.poll_events().is_empty());
        assert_eq!(probe.control(h).unwrap().value, Some(UserInput::IntChanged(10)));

        tk.block_signals(h, false);
        w.apply(&Mutation::SetInt(11)).unwrap();
        tk.update(h, w, &Mutation::SetInt(11));
        assert_eq!(
            tk.poll_events(),
            vec![NativeEvent {
                handle: h,
                input: UserInput::IntChanged(11)
            }]
        );

        // no change, no signal
        tk.update(h, w, &Mutation::SetInt(11));
        assert!(tk.poll_events().is_empty());
    }
}
