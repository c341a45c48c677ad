//! Tag → widget kind dispatch.
//!
//! Adding a widget kind means one [`WidgetClass`] variant, one arm in
//! [`parse_kind`] and the kind's own module; nothing else changes.

use crate::class::WidgetClass;
use crate::error::{ParseErrors, UiError};
use crate::ids::ProxyHandle;
use crate::kinds::{
    Button, Checkbox, Combobox, Dataflow, Edit, Group, Image, Label, Orientation, Plot,
    Progressbar, Radiobutton, Slider, Spinbox, Stretch, Table, Tabs, TextBrowser, Tree, Window,
};
use crate::markup::Element;
use crate::widget::{Widget, WidgetKind};

/// Parses any element that may appear inside a layout container.
///
/// The root tag `ui` is not one of them.
pub fn parse_any(el: &Element, proxy: ProxyHandle) -> Result<Widget, ParseErrors> {
    match WidgetClass::from_tag(&el.tag) {
        Some(class) if class != WidgetClass::Window => Widget::parse(el, class, proxy),
        _ => Err(UiError::UnknownElement(el.tag.clone()).into()),
    }
}

pub(crate) fn parse_kind(
    class: WidgetClass,
    el: &Element,
    proxy: ProxyHandle,
) -> Result<WidgetKind, ParseErrors> {
    Ok(match class {
        WidgetClass::Window => WidgetKind::Window(Window::parse(el, proxy)?),
        WidgetClass::Button => WidgetKind::Button(Button::parse(el)),
        WidgetClass::Edit => WidgetKind::Edit(Edit::parse(el)),
        WidgetClass::HSlider => WidgetKind::Slider(Slider::parse(el, Orientation::Horizontal)),
        WidgetClass::VSlider => WidgetKind::Slider(Slider::parse(el, Orientation::Vertical)),
        WidgetClass::Label => WidgetKind::Label(Label::parse(el)),
        WidgetClass::Checkbox => WidgetKind::Checkbox(Checkbox::parse(el)),
        WidgetClass::Radiobutton => WidgetKind::Radiobutton(Radiobutton::parse(el)),
        WidgetClass::Spinbox => WidgetKind::Spinbox(Spinbox::parse(el)),
        WidgetClass::Combobox => WidgetKind::Combobox(Combobox::parse(el)?),
        WidgetClass::Group => WidgetKind::Group(Group::parse(el, proxy)?),
        WidgetClass::Tabs => WidgetKind::Tabs(Tabs::parse(el, proxy)?),
        WidgetClass::Stretch => WidgetKind::Stretch(Stretch::parse(el)),
        WidgetClass::Image => WidgetKind::Image(Image::parse(el)),
        WidgetClass::Plot => WidgetKind::Plot(Plot::parse(el)),
        WidgetClass::Table => WidgetKind::Table(Table::parse(el)?),
        WidgetClass::Tree => WidgetKind::Tree(Tree::parse(el)?),
        WidgetClass::Progressbar => WidgetKind::Progressbar(Progressbar::parse(el)),
        WidgetClass::Dataflow => WidgetKind::Dataflow(Dataflow::parse(el)),
        WidgetClass::TextBrowser => WidgetKind::TextBrowser(TextBrowser::parse(el)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tag() {
        let err = parse_any(&Element::new("slider"), 0).unwrap_err();
        assert_eq!(err.messages, vec!["invalid element <slider>".to_string()]);
    }

    #[test]
    fn test_ui_not_allowed_as_child() {
        assert!(parse_any(&Element::new("ui"), 0).unwrap_err().contains("<ui>"));
    }

    #[test]
    fn test_every_child_tag_dispatches() {
        for class in WidgetClass::ALL {
            if class == WidgetClass::Window {
                continue;
            }
            let w = parse_any(&Element::new(class.tag()), 0).unwrap();
            assert_eq!(w.class(), class);
        }
    }
}
