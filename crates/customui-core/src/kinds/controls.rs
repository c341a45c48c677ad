//! Leaf controls.

use crate::error::{ParseErrors, UiError};
use crate::event::{Event, UserInput};
use crate::kinds::{Behavior, Emit, ok, out_of_range, value};
use crate::markup::Element;
use crate::mutation::{ComboboxOp, Mutation};
use crate::query::{Query, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Button {
    pub text: String,
    pub default: bool,
    pub checkable: bool,
    pub pressed: bool,
    pub onclick: Option<String>,
}

impl Button {
    pub fn parse(el: &Element) -> Self {
        Self {
            text: el.str_or("text", "???"),
            default: el.bool_or("default", false),
            checkable: el.bool_or("checkable", false),
            pressed: false,
            onclick: el.handler("onclick"),
        }
    }
}

impl Behavior for Button {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::SetText(text) => self.text = text.clone(),
            Mutation::SetPressed(pressed) => self.pressed = *pressed,
            _ => return None,
        }
        ok()
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        match input {
            UserInput::Clicked => Some(Emit::new(Event::Clicked, &self.onclick)),
            UserInput::Toggled(pressed) => {
                self.pressed = pressed;
                None
            }
            _ => None,
        }
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::Text => value(Value::Text(self.text.clone())),
            Query::Checked => value(Value::Bool(self.pressed)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edit {
    pub value: String,
    pub password: bool,
    pub onchange: Option<String>,
    pub oneditingfinished: Option<String>,
}

impl Edit {
    pub fn parse(el: &Element) -> Self {
        Self {
            value: el.str_or("value", ""),
            password: el.bool_or("password", false),
            onchange: el.handler("onchange"),
            oneditingfinished: el.handler("oneditingfinished"),
        }
    }
}

impl Behavior for Edit {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::SetText(text) => self.value = text.clone(),
            _ => return None,
        }
        ok()
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        match input {
            UserInput::TextChanged(text) => {
                self.value = text.clone();
                Some(Emit::new(Event::ValueChangedString(text), &self.onchange))
            }
            UserInput::EditingFinished => Some(Emit::new(
                Event::EditingFinished(self.value.clone()),
                &self.oneditingfinished,
            )),
            _ => None,
        }
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::Text | Query::Value => value(Value::Text(self.value.clone())),
            _ => None,
        }
    }
}

/// Integer range shared by sliders and progress bars.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntRange {
    pub minimum: i32,
    pub maximum: i32,
    pub value: i32,
}

impl IntRange {
    fn parse(el: &Element) -> Self {
        let minimum = el.int_or("minimum", 0);
        let maximum = el.int_or("maximum", 100).max(minimum);
        let value = el.int_or("value", minimum).clamp(minimum, maximum);
        Self {
            minimum,
            maximum,
            value,
        }
    }

    pub fn set(&mut self, v: i32) -> i32 {
        self.value = v.clamp(self.minimum, self.maximum);
        self.value
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Slider {
    pub orientation: Orientation,
    pub range: IntRange,
    pub onchange: Option<String>,
}

impl Slider {
    pub fn parse(el: &Element, orientation: Orientation) -> Self {
        Self {
            orientation,
            range: IntRange::parse(el),
            onchange: el.handler("onchange"),
        }
    }
}

impl Behavior for Slider {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::SetInt(v) => {
                self.range.set(*v);
                ok()
            }
            _ => None,
        }
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        match input {
            UserInput::IntChanged(v) => {
                let v = self.range.set(v);
                Some(Emit::new(Event::ValueChangedInt(v), &self.onchange))
            }
            _ => None,
        }
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::Value => value(Value::Int(self.range.value)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
    pub wordwrap: bool,
    pub onlinkactivated: Option<String>,
}

impl Label {
    pub fn parse(el: &Element) -> Self {
        Self {
            text: el.str_or("text", ""),
            wordwrap: el.bool_or("wordwrap", false),
            onlinkactivated: el.handler("onlinkactivated"),
        }
    }
}

impl Behavior for Label {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::SetText(text) => {
                self.text = text.clone();
                ok()
            }
            _ => None,
        }
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        match input {
            UserInput::LinkActivated(link) => {
                Some(Emit::new(Event::LinkActivated(link), &self.onlinkactivated))
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

#[derive(Clone, Debug, PartialEq)]
pub struct Checkbox {
    pub text: String,
    pub checked: bool,
    pub onchange: Option<String>,
}

impl Checkbox {
    pub fn parse(el: &Element) -> Self {
        Self {
            text: el.str_or("text", "???"),
            checked: el.bool_or("checked", false),
            onchange: el.handler("onchange"),
        }
    }
}

impl Behavior for Checkbox {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::SetChecked(checked) => self.checked = *checked,
            Mutation::SetText(text) => self.text = text.clone(),
            _ => return None,
        }
        ok()
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        match input {
            UserInput::Toggled(checked) => {
                self.checked = checked;
                Some(Emit::new(
                    Event::ValueChangedInt(i32::from(checked)),
                    &self.onchange,
                ))
            }
            _ => None,
        }
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::Checked | Query::Value => value(Value::Bool(self.checked)),
            Query::Text => value(Value::Text(self.text.clone())),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Radiobutton {
    pub text: String,
    pub checked: bool,
    pub onclick: Option<String>,
}

impl Radiobutton {
    pub fn parse(el: &Element) -> Self {
        Self {
            text: el.str_or("text", ""),
            checked: el.bool_or("checked", false),
            onclick: el.handler("onclick"),
        }
    }
}

impl Behavior for Radiobutton {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::SetChecked(checked) => self.checked = *checked,
            Mutation::SetText(text) => self.text = text.clone(),
            _ => return None,
        }
        ok()
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        match input {
            UserInput::Clicked => {
                self.checked = true;
                Some(Emit::new(Event::Clicked, &self.onclick))
            }
            UserInput::Toggled(checked) => {
                self.checked = checked;
                None
            }
            _ => None,
        }
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::Checked | Query::Value => value(Value::Bool(self.checked)),
            Query::Text => value(Value::Text(self.text.clone())),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Spinbox {
    pub minimum: f64,
    pub maximum: f64,
    pub step: f64,
    pub value: f64,
    /// Floating point spinboxes report doubles, the others integers.
    pub float: bool,
    pub prefix: String,
    pub suffix: String,
    pub onchange: Option<String>,
}

impl Spinbox {
    pub fn parse(el: &Element) -> Self {
        let float = el.bool_or("float", false);
        let minimum = el.float_or("minimum", 0.0);
        let maximum = el.float_or("maximum", 100.0).max(minimum);
        let mut spin = Self {
            minimum,
            maximum,
            step: el.float_or("step", 1.0),
            value: minimum,
            float,
            prefix: el.str_or("prefix", ""),
            suffix: el.str_or("suffix", ""),
            onchange: el.handler("onchange"),
        };
        spin.set(el.float_or("value", minimum));
        spin
    }

    pub fn set(&mut self, v: f64) -> f64 {
        let v = v.clamp(self.minimum, self.maximum);
        self.value = if self.float { v } else { v.round() };
        self.value
    }

    fn changed(&self) -> Event {
        if self.float {
            Event::ValueChangedDouble(self.value)
        } else {
            Event::ValueChangedInt(self.value as i32)
        }
    }

    fn current(&self) -> Value {
        if self.float {
            Value::Double(self.value)
        } else {
            Value::Int(self.value as i32)
        }
    }
}

impl Behavior for Spinbox {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::SetDouble(v) => self.set(*v),
            Mutation::SetInt(v) => self.set(f64::from(*v)),
            _ => return None,
        };
        ok()
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        match input {
            UserInput::DoubleChanged(v) => self.set(v),
            UserInput::IntChanged(v) => self.set(f64::from(v)),
            _ => return None,
        };
        Some(Emit::new(self.changed(), &self.onchange))
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::Value => value(self.current()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Combobox {
    pub items: Vec<String>,
    /// -1 when nothing is selected.
    pub selected: i32,
    pub onchange: Option<String>,
}

impl Combobox {
    pub fn parse(el: &Element) -> Result<Self, ParseErrors> {
        let mut errors = ParseErrors::default();
        let mut items = Vec::new();
        for child in &el.children {
            if child.tag == "item" {
                items.push(child.text.clone());
            } else {
                errors.push(UiError::UnexpectedChild {
                    parent: "combobox",
                    found: child.tag.clone(),
                });
            }
        }
        let selected = if items.is_empty() { -1 } else { 0 };
        errors.into_result(Self {
            items,
            selected,
            onchange: el.handler("onchange"),
        })
    }

    pub fn current_text(&self) -> Option<&str> {
        usize::try_from(self.selected)
            .ok()
            .and_then(|i| self.items.get(i))
            .map(String::as_str)
    }

    fn check_index(&self, index: i32) -> Result<(), UiError> {
        check_combobox_index(index, self.items.len())
    }

    pub fn run(&mut self, op: &ComboboxOp) -> Result<(), UiError> {
        match op {
            ComboboxOp::Insert { index, text } => {
                let index = (*index).min(self.items.len());
                self.items.insert(index, text.clone());
                if self.selected < 0 {
                    self.selected = 0;
                } else if index as i32 <= self.selected {
                    self.selected += 1;
                }
            }
            ComboboxOp::Remove { index } => {
                if *index >= self.items.len() {
                    return Err(out_of_range("combobox index", index));
                }
                self.items.remove(*index);
                let index = *index as i32;
                if index < self.selected {
                    self.selected -= 1;
                } else if index == self.selected {
                    self.selected = self.selected.min(self.items.len() as i32 - 1);
                }
            }
            ComboboxOp::SetItems { items, selected } => {
                check_combobox_index(*selected, items.len())?;
                self.items = items.clone();
                self.selected = *selected;
            }
            ComboboxOp::SetSelected(index) => {
                self.check_index(*index)?;
                self.selected = *index;
            }
        }
        Ok(())
    }
}

fn check_combobox_index(index: i32, len: usize) -> Result<(), UiError> {
    if index < -1 || index >= len as i32 {
        return Err(out_of_range("combobox index", index));
    }
    Ok(())
}

impl Behavior for Combobox {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::Combobox(op) => Some(self.run(op)),
            _ => None,
        }
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        match input {
            UserInput::IndexChanged(index) if self.check_index(index).is_ok() => {
                self.selected = index;
                Some(Emit::new(Event::ValueChangedInt(index), &self.onchange))
            }
            _ => None,
        }
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::Value | Query::CurrentIndex => value(Value::Int(self.selected)),
            Query::Items => value(Value::List(self.items.clone())),
            Query::Text => value(self.current_text().map_or(Value::None, |t| Value::Text(t.into()))),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Progressbar {
    pub orientation: Orientation,
    pub range: IntRange,
    pub text_visible: bool,
}

impl Progressbar {
    pub fn parse(el: &Element) -> Self {
        let orientation = if el.bool_or("vertical", false) {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };
        Self {
            orientation,
            range: IntRange::parse(el),
            text_visible: el.bool_or("text-visible", true),
        }
    }
}

impl Behavior for Progressbar {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::SetInt(v) => {
                self.range.set(*v);
                ok()
            }
            _ => None,
        }
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::Value => value(Value::Int(self.range.value)),
            _ => None,
        }
    }
}

/// RGB image. Pixel data is 3 bytes per pixel, row major.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub keep_aspect_ratio: bool,
    pub scaled_contents: bool,
    pub data: Vec<u8>,
    pub onmouse: Option<String>,
}

impl Image {
    pub fn parse(el: &Element) -> Self {
        Self {
            width: el.int_or("width", 0).max(0) as u32,
            height: el.int_or("height", 0).max(0) as u32,
            keep_aspect_ratio: el.bool_or("keep-aspect-ratio", false),
            scaled_contents: el.bool_or("scaled-contents", false),
            data: Vec::new(),
            onmouse: el.handler("onmouse"),
        }
    }
}

impl Behavior for Image {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::SetImage {
                data,
                width,
                height,
            } => {
                let expected = *width as usize * *height as usize * 3;
                if data.len() != expected {
                    return Some(Err(UiError::InvalidArgument(format!(
                        "image data has {} bytes, expected {expected}",
                        data.len()
                    ))));
                }
                self.data = data.clone();
                self.width = *width;
                self.height = *height;
                ok()
            }
            _ => None,
        }
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        match input {
            UserInput::Mouse {
                kind,
                modifiers,
                x,
                y,
            } => Some(Emit::new(
                Event::Mouse {
                    kind,
                    modifiers,
                    x,
                    y,
                },
                &self.onmouse,
            )),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextBrowser {
    pub text: String,
    pub url: Option<String>,
    pub read_only: bool,
    pub onchange: Option<String>,
    pub onlinkactivated: Option<String>,
}

impl TextBrowser {
    pub fn parse(el: &Element) -> Self {
        Self {
            text: el.str_or("text", ""),
            url: None,
            read_only: el.bool_or("read-only", true),
            onchange: el.handler("onchange"),
            onlinkactivated: el.handler("onlinkactivated"),
        }
    }
}

impl Behavior for TextBrowser {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::SetText(text) => self.text = text.clone(),
            Mutation::SetUrl(url) => self.url = Some(url.clone()),
            _ => return None,
        }
        ok()
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        match input {
            UserInput::TextChanged(text) => {
                self.text = text.clone();
                Some(Emit::new(Event::ValueChangedString(text), &self.onchange))
            }
            UserInput::LinkActivated(link) => {
                Some(Emit::new(Event::LinkActivated(link), &self.onlinkactivated))
            }
            _ => None,
        }
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::Text | Query::Value => value(Value::Text(self.text.clone())),
            _ => None,
        }
    }
}

/// Flexible empty space in a stack layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Stretch {
    pub factor: i32,
}

impl Stretch {
    pub fn parse(el: &Element) -> Self {
        Self {
            factor: el.int_or("factor", 0).max(0),
        }
    }
}

impl Behavior for Stretch {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_defaults() {
        let b = Button::parse(&Element::new("button"));
        assert_eq!(b.text, "???");
        assert_eq!(b.onclick, None);
    }

    #[test]
    fn test_slider_malformed_minimum_falls_back() {
        let s = Slider::parse(
            &Element::new("hslider")
                .with_attr("minimum", "abc")
                .with_attr("maximum", "20")
                .with_attr("value", "50"),
            Orientation::Horizontal,
        );
        assert_eq!(s.range.minimum, 0);
        assert_eq!(s.range.maximum, 20);
        assert_eq!(s.range.value, 20);
    }

    #[test]
    fn test_spinbox_integer_rounds() {
        let mut s = Spinbox::parse(&Element::new("spinbox"));
        assert_eq!(s.set(2.6), 3.0);
        let e = s.input(UserInput::DoubleChanged(4.2)).unwrap();
        assert_eq!(e.event, Event::ValueChangedInt(4));
    }

    #[test]
    fn test_combobox_insert_remove_tracks_selection() {
        let el = Element::new("combobox")
            .with_child(Element::new("item").with_text("a"))
            .with_child(Element::new("item").with_text("b"));
        let mut c = Combobox::parse(&el).unwrap();
        assert_eq!(c.selected, 0);
        c.run(&ComboboxOp::SetSelected(1)).unwrap();
        c.run(&ComboboxOp::Insert {
            index: 0,
            text: "z".into(),
        })
        .unwrap();
        assert_eq!(c.selected, 2);
        assert_eq!(c.current_text(), Some("b"));
        c.run(&ComboboxOp::Remove { index: 2 }).unwrap();
        assert_eq!(c.selected, 1);
        assert!(c.run(&ComboboxOp::Remove { index: 9 }).is_err());
        assert!(c.run(&ComboboxOp::SetSelected(5)).is_err());
    }

    #[test]
    fn test_combobox_rejected_set_items_keeps_state() {
        let el = ["a", "b", "c"].into_iter().fold(Element::new("combobox"), |el, t| {
            el.with_child(Element::new("item").with_text(t))
        });
        let mut c = Combobox::parse(&el).unwrap();
        c.run(&ComboboxOp::SetSelected(2)).unwrap();
        let err = c.run(&ComboboxOp::SetItems {
            items: vec!["x".into()],
            selected: 5,
        });
        assert!(matches!(err, Err(UiError::InvalidArgument(_))));
        assert_eq!(c.items, ["a", "b", "c"]);
        assert_eq!(c.selected, 2);
        assert_eq!(c.current_text(), Some("c"));

        c.run(&ComboboxOp::SetItems {
            items: vec!["x".into()],
            selected: 0,
        })
        .unwrap();
        assert_eq!(c.current_text(), Some("x"));
    }

    #[test]
    fn test_combobox_rejects_foreign_children() {
        let el = Element::new("combobox").with_child(Element::new("button"));
        let err = Combobox::parse(&el).unwrap_err();
        assert!(err.contains("invalid element <button> inside <combobox>"));
    }

    #[test]
    fn test_image_data_size_checked() {
        let mut img = Image::parse(&Element::new("image"));
        let bad = Mutation::SetImage {
            data: vec![0; 5],
            width: 2,
            height: 1,
        };
        assert!(img.apply(&bad).unwrap().is_err());
        let good = Mutation::SetImage {
            data: vec![0; 6],
            width: 2,
            height: 1,
        };
        assert!(img.apply(&good).unwrap().is_ok());
        assert_eq!((img.width, img.height), (2, 1));
    }
}
