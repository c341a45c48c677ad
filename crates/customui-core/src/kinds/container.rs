//! Layout containers: the row model shared by windows, groups and tab pages.
//!
//! A container holds rows of child widgets. Stack layouts have exactly one
//! child per row, form layouts exactly two (label, field), grid rows are
//! closed explicitly by `<br>` and may hold any number of children.

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::error::{ParseErrors, UiError};
use crate::event::{Event, UserInput};
use crate::factory;
use crate::geometry::{Point, Size, pair_attr};
use crate::ids::{NativeHandle, ProxyHandle};
use crate::kinds::{Behavior, Emit, ok, out_of_range, value};
use crate::markup::Element;
use crate::mutation::Mutation;
use crate::query::{Query, Value};
use crate::widget::Widget;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    VBox,
    HBox,
    Grid,
    Form,
}

impl Layout {
    pub fn parse(el: &Element) -> Result<Layout, UiError> {
        match el.attr("layout").map(str::trim) {
            None | Some("vbox") => Ok(Layout::VBox),
            Some("hbox") => Ok(Layout::HBox),
            Some("grid") => Ok(Layout::Grid),
            Some("form") => Ok(Layout::Form),
            Some(other) => Err(UiError::InvalidLayout(other.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Layout::VBox => "vbox",
            Layout::HBox => "hbox",
            Layout::Grid => "grid",
            Layout::Form => "form",
        }
    }

    /// Children per row, or `None` when rows are closed by `<br>`.
    pub fn row_width(self) -> Option<usize> {
        match self {
            Layout::VBox | Layout::HBox => Some(1),
            Layout::Form => Some(2),
            Layout::Grid => None,
        }
    }

    pub fn slot(self, row: usize, column: usize) -> Slot {
        match self {
            Layout::VBox | Layout::HBox => Slot::Stack(row),
            Layout::Grid => Slot::Grid { row, column },
            Layout::Form if column == 0 => Slot::FormLabel { row },
            Layout::Form => Slot::FormField { row },
        }
    }
}

/// Where a child goes inside its container's native layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Stack(usize),
    Grid { row: usize, column: usize },
    FormLabel { row: usize },
    FormField { row: usize },
}

pub type Row = SmallVec<[Widget; 2]>;

#[derive(Debug)]
pub struct Container {
    pub layout: Layout,
    pub rows: Vec<Row>,
}

impl Container {
    /// Parses the `layout` attribute and every child element of `el`.
    ///
    /// Errors from sibling children are collected; widgets that did parse
    /// are dropped (and deregistered) when anything failed.
    pub fn parse(el: &Element, proxy: ProxyHandle) -> Result<Container, ParseErrors> {
        let layout = Layout::parse(el)?;
        let mut errors = ParseErrors::default();
        let mut rows = Vec::new();
        let mut row = Row::new();
        // Failed children still occupy their slot so later rows line up.
        let mut filled = 0;

        for child in &el.children {
            if child.tag == "br" {
                if layout == Layout::Grid {
                    rows.push(std::mem::take(&mut row));
                    filled = 0;
                } else {
                    errors.push(UiError::BreakOutsideGrid);
                }
                continue;
            }

            match factory::parse_any(child, proxy) {
                Ok(widget) => row.push(widget),
                Err(e) => errors.push(e),
            }
            filled += 1;

            if layout.row_width() == Some(filled) {
                rows.push(std::mem::take(&mut row));
                filled = 0;
            }
        }

        if filled > 0 {
            if layout == Layout::Grid {
                rows.push(row);
            } else {
                errors.push(UiError::ExtraElements);
            }
        }

        errors.into_result(Container { layout, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.is_empty())
    }

    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.rows.iter().flatten()
    }

    pub fn widgets_mut(&mut self) -> impl Iterator<Item = &mut Widget> {
        self.rows.iter_mut().flatten()
    }

    /// Children paired with their layout slot, in document order.
    pub fn cells(&self) -> impl Iterator<Item = (Slot, &Widget)> {
        let layout = self.layout;
        self.rows.iter().enumerate().flat_map(move |(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, w)| (layout.slot(r, c), w))
        })
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = (Slot, &mut Widget)> {
        let layout = self.layout;
        self.rows.iter_mut().enumerate().flat_map(move |(r, row)| {
            row.iter_mut()
                .enumerate()
                .map(move |(c, w)| (layout.slot(r, c), w))
        })
    }

    pub fn into_widgets(self) -> impl Iterator<Item = Widget> {
        self.rows.into_iter().flatten()
    }
}

#[derive(Debug)]
pub struct Group {
    pub text: String,
    pub flat: bool,
    pub body: Container,
}

impl Group {
    pub fn parse(el: &Element, proxy: ProxyHandle) -> Result<Self, ParseErrors> {
        Ok(Self {
            text: el.str_or("text", ""),
            flat: el.bool_or("flat", false),
            body: Container::parse(el, proxy)?,
        })
    }
}

impl Behavior for Group {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::SetText(text) => {
                self.text = text.clone();
                ok()
            }
            _ => None,
        }
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::Text => value(Value::Text(self.text.clone())),
            _ => None,
        }
    }
}

/// One page of a [`Tabs`] widget. Pages are not widgets themselves; their
/// native page control is owned by the tabs widget.
#[derive(Debug)]
pub struct Tab {
    pub title: String,
    pub body: Container,
    pub page: Option<NativeHandle>,
}

#[derive(Debug)]
pub struct Tabs {
    pub pages: Vec<Tab>,
    pub current: usize,
    pub onchange: Option<String>,
}

impl Tabs {
    pub fn parse(el: &Element, proxy: ProxyHandle) -> Result<Self, ParseErrors> {
        let mut errors = ParseErrors::default();
        let mut pages = Vec::new();
        for child in &el.children {
            if child.tag != "tab" {
                errors.push(UiError::UnexpectedChild {
                    parent: "tabs",
                    found: child.tag.clone(),
                });
                continue;
            }
            match Container::parse(child, proxy) {
                Ok(body) => pages.push(Tab {
                    title: child.str_or("title", ""),
                    body,
                    page: None,
                }),
                Err(e) => errors.push(e),
            }
        }
        errors.into_result(Self {
            pages,
            current: 0,
            onchange: el.handler("onchange"),
        })
    }
}

impl Behavior for Tabs {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::SetCurrentTab(index) => {
                if *index >= self.pages.len() {
                    return Some(Err(out_of_range("tab", index)));
                }
                self.current = *index;
                ok()
            }
            _ => None,
        }
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        match input {
            UserInput::IndexChanged(index) => {
                let page = usize::try_from(index).ok().filter(|i| *i < self.pages.len())?;
                self.current = page;
                Some(Emit::new(Event::ValueChangedInt(index), &self.onchange))
            }
            _ => None,
        }
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::CurrentIndex | Query::Value => value(Value::Int(self.current as i32)),
            Query::Items => value(Value::List(
                self.pages.iter().map(|p| p.title.clone()).collect(),
            )),
            _ => None,
        }
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u8 {
        const RESIZABLE = 1 << 0;
        const CLOSEABLE = 1 << 1;
        const MODAL = 1 << 2;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum WindowOp {
    Show,
    Hide,
    SetPosition(Point),
    SetSize(Size),
    SetTitle(String),
}

/// Top-level container. The only kind the host shows, hides or closes.
#[derive(Debug)]
pub struct Window {
    pub title: String,
    pub flags: WindowFlags,
    pub size: Option<Size>,
    pub position: Option<Point>,
    pub shown: bool,
    pub onclose: Option<String>,
    pub body: Container,
}

impl Window {
    pub const DEFAULT_TITLE: &'static str = "Custom UI";

    pub fn parse(el: &Element, proxy: ProxyHandle) -> Result<Self, ParseErrors> {
        let mut flags = WindowFlags::empty();
        flags.set(WindowFlags::RESIZABLE, el.bool_or("resizable", false));
        flags.set(WindowFlags::CLOSEABLE, el.bool_or("closeable", false));
        flags.set(WindowFlags::MODAL, el.bool_or("modal", false));
        Ok(Self {
            title: el.str_or("title", Self::DEFAULT_TITLE),
            flags,
            size: pair_attr(el, "size").map(|(width, height)| Size { width, height }),
            position: pair_attr(el, "position").map(|(x, y)| Point::new(x, y)),
            shown: el.bool_or("visible", true),
            onclose: el.handler("onclose"),
            body: Container::parse(el, proxy)?,
        })
    }

    pub fn run(&mut self, op: &WindowOp) {
        match op {
            WindowOp::Show => self.shown = true,
            WindowOp::Hide => self.shown = false,
            WindowOp::SetPosition(p) => self.position = Some(*p),
            WindowOp::SetSize(s) => self.size = Some(*s),
            WindowOp::SetTitle(t) => self.title = t.clone(),
        }
    }
}

impl Behavior for Window {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::Window(op) => self.run(op),
            Mutation::SetText(title) => self.title = title.clone(),
            _ => return None,
        }
        ok()
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        match input {
            UserInput::CloseRequested if self.flags.contains(WindowFlags::CLOSEABLE) => {
                self.shown = false;
                Some(Emit::new(Event::WindowClosed, &self.onclose))
            }
            _ => None,
        }
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::Title | Query::Text => value(Value::Text(self.title.clone())),
            Query::Visible => value(Value::Bool(self.shown)),
            _ => None,
        }
    }
}
