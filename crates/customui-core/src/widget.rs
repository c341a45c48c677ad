use std::fmt::Write as _;

use crate::class::WidgetClass;
use crate::error::{ParseErrors, UiError};
use crate::event::{Notification, UserInput};
use crate::factory;
use crate::geometry::Geometry;
use crate::ids::{NativeHandle, ProxyHandle, WidgetId, WidgetKey, next_auto_id};
use crate::kinds::{
    Behavior, Button, Checkbox, Combobox, Container, Dataflow, Edit, Group, Image, Label, Layout,
    Plot, Progressbar, Radiobutton, Slider, Slot, Spinbox, Stretch, Table, Tabs, TextBrowser,
    Tree, Window,
};
use crate::markup::Element;
use crate::mutation::Mutation;
use crate::query::{Query, Value};
use crate::registry::{self, Registration, WidgetRef};

/// Per-kind payload of a [`Widget`]. Closed set; one variant per class, the
/// two slider classes share [`Slider`].
#[derive(Debug)]
pub enum WidgetKind {
    Window(Window),
    Button(Button),
    Edit(Edit),
    Slider(Slider),
    Label(Label),
    Checkbox(Checkbox),
    Radiobutton(Radiobutton),
    Spinbox(Spinbox),
    Combobox(Combobox),
    Group(Group),
    Tabs(Tabs),
    Stretch(Stretch),
    Image(Image),
    Plot(Plot),
    Table(Table),
    Tree(Tree),
    Progressbar(Progressbar),
    Dataflow(Dataflow),
    TextBrowser(TextBrowser),
}

impl WidgetKind {
    pub fn behavior(&self) -> &dyn Behavior {
        match self {
            WidgetKind::Window(k) => k,
            WidgetKind::Button(k) => k,
            WidgetKind::Edit(k) => k,
            WidgetKind::Slider(k) => k,
            WidgetKind::Label(k) => k,
            WidgetKind::Checkbox(k) => k,
            WidgetKind::Radiobutton(k) => k,
            WidgetKind::Spinbox(k) => k,
            WidgetKind::Combobox(k) => k,
            WidgetKind::Group(k) => k,
            WidgetKind::Tabs(k) => k,
            WidgetKind::Stretch(k) => k,
            WidgetKind::Image(k) => k,
            WidgetKind::Plot(k) => k,
            WidgetKind::Table(k) => k,
            WidgetKind::Tree(k) => k,
            WidgetKind::Progressbar(k) => k,
            WidgetKind::Dataflow(k) => k,
            WidgetKind::TextBrowser(k) => k,
        }
    }

    pub fn behavior_mut(&mut self) -> &mut dyn Behavior {
        match self {
            WidgetKind::Window(k) => k,
            WidgetKind::Button(k) => k,
            WidgetKind::Edit(k) => k,
            WidgetKind::Slider(k) => k,
            WidgetKind::Label(k) => k,
            WidgetKind::Checkbox(k) => k,
            WidgetKind::Radiobutton(k) => k,
            WidgetKind::Spinbox(k) => k,
            WidgetKind::Combobox(k) => k,
            WidgetKind::Group(k) => k,
            WidgetKind::Tabs(k) => k,
            WidgetKind::Stretch(k) => k,
            WidgetKind::Image(k) => k,
            WidgetKind::Plot(k) => k,
            WidgetKind::Table(k) => k,
            WidgetKind::Tree(k) => k,
            WidgetKind::Progressbar(k) => k,
            WidgetKind::Dataflow(k) => k,
            WidgetKind::TextBrowser(k) => k,
        }
    }

    /// Containers owned by this kind, in document order.
    pub fn containers(&self) -> Vec<&Container> {
        match self {
            WidgetKind::Window(w) => vec![&w.body],
            WidgetKind::Group(g) => vec![&g.body],
            WidgetKind::Tabs(t) => t.pages.iter().map(|p| &p.body).collect(),
            _ => Vec::new(),
        }
    }

    pub fn containers_mut(&mut self) -> Vec<&mut Container> {
        match self {
            WidgetKind::Window(w) => vec![&mut w.body],
            WidgetKind::Group(g) => vec![&mut g.body],
            WidgetKind::Tabs(t) => t.pages.iter_mut().map(|p| &mut p.body).collect(),
            _ => Vec::new(),
        }
    }

    /// Splits the kind into owned children and extra native controls it holds
    /// besides the widget's own (tab pages).
    fn dismantle(self) -> (Vec<Widget>, Vec<NativeHandle>) {
        match self {
            WidgetKind::Window(w) => (w.body.into_widgets().collect(), Vec::new()),
            WidgetKind::Group(g) => (g.body.into_widgets().collect(), Vec::new()),
            WidgetKind::Tabs(t) => {
                let mut children = Vec::new();
                let mut pages = Vec::new();
                for tab in t.pages {
                    pages.extend(tab.page);
                    children.extend(tab.body.into_widgets());
                }
                (children, pages)
            }
            _ => (Vec::new(), Vec::new()),
        }
    }
}

/// One node of the widget tree.
///
/// Created only by parsing. While it lives it is registered in the global
/// existence set and in its proxy's id table; once rendered it also owns
/// exactly one native control. [`Widget::destroy`] tears the subtree down
/// depth-first and hands every native control back to the caller.
pub struct Widget {
    id: WidgetId,
    class: WidgetClass,
    pub geometry: Option<Geometry>,
    pub style: String,
    pub enabled: bool,
    pub visible: bool,
    pub kind: WidgetKind,
    native: Option<NativeHandle>,
    registration: Registration,
}

impl std::fmt::Debug for Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("id", &self.id)
            .field("class", &self.class)
            .field("native", &self.native)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Widget {
    /// Parses `el` as a widget of `class` owned by `proxy`.
    ///
    /// Tag mismatch and a bad `id` are hard failures; every other attribute
    /// falls back to its default when malformed.
    pub fn parse(
        el: &Element,
        class: WidgetClass,
        proxy: ProxyHandle,
    ) -> Result<Widget, ParseErrors> {
        if el.tag != class.tag() {
            return Err(UiError::TagMismatch {
                expected: class.tag(),
                found: el.tag.clone(),
            }
            .into());
        }
        let id = match el.try_int("id") {
            Ok(None) => next_auto_id(),
            Ok(Some(id)) if id > 0 => id,
            Ok(Some(_)) | Err(_) => return Err(UiError::InvalidId.into()),
        };
        let registration = Registration::register(proxy, id, class)?;
        let kind = factory::parse_kind(class, el, proxy)?;

        log::debug!("parsed <{}> id={id} proxy={proxy}", class.tag());
        Ok(Widget {
            id,
            class,
            geometry: Geometry::from_attr(el),
            style: el.str_or("style", ""),
            enabled: el.bool_or("enabled", true),
            visible: el.bool_or("visible", true),
            kind,
            native: None,
            registration,
        })
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn class(&self) -> WidgetClass {
        self.class
    }

    pub fn key(&self) -> WidgetKey {
        self.registration.widget().key
    }

    pub fn proxy(&self) -> ProxyHandle {
        self.registration.widget().proxy
    }

    pub fn widget_ref(&self) -> WidgetRef {
        self.registration.widget()
    }

    pub fn native(&self) -> Option<NativeHandle> {
        self.native
    }

    /// Binds the native control created by `create`. Allowed once.
    pub fn bind_native(
        &mut self,
        create: impl FnOnce(&Widget) -> NativeHandle,
    ) -> Result<NativeHandle, UiError> {
        if self.native.is_some() {
            return Err(UiError::AlreadyBound);
        }
        let handle = create(self);
        registry::bind_native(self.key(), handle)?;
        self.native = Some(handle);
        Ok(handle)
    }

    pub fn by_id(proxy: ProxyHandle, id: WidgetId) -> Option<WidgetRef> {
        registry::by_id(proxy, id)
    }

    pub fn by_native(handle: NativeHandle) -> Option<WidgetRef> {
        registry::by_native(handle)
    }

    pub fn layout(&self) -> Option<Layout> {
        self.kind.containers().first().map(|c| c.layout)
    }

    /// Direct children, in document order.
    pub fn children(&self) -> Vec<&Widget> {
        self.kind
            .containers()
            .into_iter()
            .flat_map(Container::widgets)
            .collect()
    }

    /// Visits the subtree in document order, parents first.
    pub fn walk(&self, f: &mut dyn FnMut(&Widget)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    pub fn find(&self, id: WidgetId) -> Option<&Widget> {
        if self.id == id {
            return Some(self);
        }
        self.children().into_iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        if self.id == id {
            return Some(self);
        }
        self.kind
            .containers_mut()
            .into_iter()
            .flat_map(Container::widgets_mut)
            .find_map(|c| c.find_mut(id))
    }

    /// Applies a host mutation to the model.
    pub fn apply(&mut self, mutation: &Mutation) -> Result<(), UiError> {
        match mutation {
            Mutation::SetEnabled(enabled) => self.enabled = *enabled,
            Mutation::SetVisible(visible) => self.visible = *visible,
            Mutation::SetStyle(style) => self.style = style.clone(),
            Mutation::SetGeometry(geometry) => self.geometry = Some(*geometry),
            _ => {
                return self.kind.behavior_mut().apply(mutation).unwrap_or(Err(
                    UiError::Unsupported {
                        class: self.class.tag(),
                        operation: mutation.name(),
                    },
                ));
            }
        }
        Ok(())
    }

    /// Absorbs native user input. Returns the notification for the host, if
    /// the input means anything to this kind.
    pub fn handle_input(&mut self, input: UserInput) -> Option<Notification> {
        let emit = self.kind.behavior_mut().input(input)?;
        Some(Notification {
            proxy: self.proxy(),
            widget: self.id,
            handler: emit.handler,
            event: emit.event,
        })
    }

    pub fn query(&self, query: &Query) -> Result<Value, UiError> {
        if let Some(answer) = self.kind.behavior().query(query) {
            return answer;
        }
        match query {
            Query::Enabled => Ok(Value::Bool(self.enabled)),
            Query::Visible => Ok(Value::Bool(self.visible)),
            Query::Style => Ok(Value::Text(self.style.clone())),
            Query::Geometry => Ok(self.geometry.map_or(Value::None, Value::Geometry)),
            _ => Err(UiError::Unsupported {
                class: self.class.tag(),
                operation: "this query",
            }),
        }
    }

    /// Destroys the subtree depth-first. Every bound native control is passed
    /// to `release`, children before parents.
    pub fn destroy(self, release: &mut dyn FnMut(NativeHandle)) {
        let Widget {
            id,
            class,
            kind,
            native,
            registration,
            ..
        } = self;
        let (children, pages) = kind.dismantle();
        for child in children {
            child.destroy(release);
        }
        for page in pages {
            release(page);
        }
        if let Some(handle) = native {
            release(handle);
        }
        drop(registration);
        log::debug!("destroyed <{}> id={id}", class.tag());
    }

    /// Indented text rendering of the subtree. Auto ids print as `auto`.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.outline_into(&mut out, 0, None);
        out
    }

    fn outline_into(&self, out: &mut String, depth: usize, slot: Option<Slot>) {
        let indent = "  ".repeat(depth);
        let _ = write!(out, "{indent}");
        if let Some(slot) = slot {
            let _ = match slot {
                Slot::Stack(i) => write!(out, "[{i}] "),
                Slot::Grid { row, column } => write!(out, "[{row},{column}] "),
                Slot::FormLabel { row } => write!(out, "[{row}:label] "),
                Slot::FormField { row } => write!(out, "[{row}:field] "),
            };
        }
        let _ = write!(out, "{}", self.class.tag());
        if self.id > 0 {
            let _ = write!(out, " id={}", self.id);
        } else {
            let _ = write!(out, " id=auto");
        }
        if let Some(layout) = self.layout()
            && !matches!(self.kind, WidgetKind::Tabs(_))
        {
            let _ = write!(out, " layout={}", layout.name());
        }
        out.push('\n');

        if let WidgetKind::Tabs(tabs) = &self.kind {
            let indent = "  ".repeat(depth + 1);
            for tab in &tabs.pages {
                let _ = writeln!(
                    out,
                    "{indent}tab {:?} layout={}",
                    tab.title,
                    tab.body.layout.name()
                );
                for (slot, child) in tab.body.cells() {
                    child.outline_into(out, depth + 2, Some(slot));
                }
            }
            return;
        }
        for container in self.kind.containers() {
            for (slot, child) in container.cells() {
                child.outline_into(out, depth + 1, Some(slot));
            }
        }
    }
}
