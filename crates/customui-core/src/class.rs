/// The fixed class of a widget kind. Each class owns exactly one markup tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetClass {
    Window,
    Button,
    Edit,
    HSlider,
    VSlider,
    Label,
    Checkbox,
    Radiobutton,
    Spinbox,
    Combobox,
    Group,
    Tabs,
    Stretch,
    Image,
    Plot,
    Table,
    Tree,
    Progressbar,
    Dataflow,
    TextBrowser,
}

impl WidgetClass {
    pub const ALL: [WidgetClass; 20] = [
        WidgetClass::Window,
        WidgetClass::Button,
        WidgetClass::Edit,
        WidgetClass::HSlider,
        WidgetClass::VSlider,
        WidgetClass::Label,
        WidgetClass::Checkbox,
        WidgetClass::Radiobutton,
        WidgetClass::Spinbox,
        WidgetClass::Combobox,
        WidgetClass::Group,
        WidgetClass::Tabs,
        WidgetClass::Stretch,
        WidgetClass::Image,
        WidgetClass::Plot,
        WidgetClass::Table,
        WidgetClass::Tree,
        WidgetClass::Progressbar,
        WidgetClass::Dataflow,
        WidgetClass::TextBrowser,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            WidgetClass::Window => "ui",
            WidgetClass::Button => "button",
            WidgetClass::Edit => "edit",
            WidgetClass::HSlider => "hslider",
            WidgetClass::VSlider => "vslider",
            WidgetClass::Label => "label",
            WidgetClass::Checkbox => "checkbox",
            WidgetClass::Radiobutton => "radiobutton",
            WidgetClass::Spinbox => "spinbox",
            WidgetClass::Combobox => "combobox",
            WidgetClass::Group => "group",
            WidgetClass::Tabs => "tabs",
            WidgetClass::Stretch => "stretch",
            WidgetClass::Image => "image",
            WidgetClass::Plot => "plot",
            WidgetClass::Table => "table",
            WidgetClass::Tree => "tree",
            WidgetClass::Progressbar => "progressbar",
            WidgetClass::Dataflow => "dataflow",
            WidgetClass::TextBrowser => "text-browser",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }

    /// Layout containers own child widgets.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            WidgetClass::Window | WidgetClass::Group | WidgetClass::Tabs
        )
    }
}

impl std::fmt::Display for WidgetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
