//! State every titled diagram carries: title, caption, legend, header, footer,
//! main frame, skin parameters and the preferred layout engine.

use std::collections::BTreeMap;

/// Graph layout backend a diagram asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutEngine {
    #[default]
    Graphviz,
    Smetana,
    Elk,
}

impl LayoutEngine {
    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "graphviz" | "dot" => Some(LayoutEngine::Graphviz),
            "smetana" => Some(LayoutEngine::Smetana),
            "elk" => Some(LayoutEngine::Elk),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            LayoutEngine::Graphviz => "graphviz",
            LayoutEngine::Smetana => "smetana",
            LayoutEngine::Elk => "elk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
}

impl HorizontalAlignment {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" => Some(HorizontalAlignment::Left),
            "center" => Some(HorizontalAlignment::Center),
            "right" => Some(HorizontalAlignment::Right),
            _ => None,
        }
    }
}

/// Text lines with an alignment. No lines means "not set".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Positioned {
    pub lines: Vec<String>,
    pub alignment: HorizontalAlignment,
}

impl Positioned {
    pub fn new(lines: Vec<String>, alignment: HorizontalAlignment) -> Self {
        Positioned { lines, alignment }
    }

    pub fn is_none(&self) -> bool {
        self.lines.is_empty()
    }

    /// Only whitespace (or nothing) to show.
    pub fn is_white(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiagramCommon {
    title: Positioned,
    caption: Positioned,
    legend: Positioned,
    header: Positioned,
    footer: Positioned,
    main_frame: Option<Vec<String>>,
    params: BTreeMap<String, String>,
    layout: LayoutEngine,
}

impl DiagramCommon {
    /// Blank titles are ignored.
    pub fn set_title(&mut self, title: Positioned) {
        if title.is_none() || title.is_white() {
            return;
        }
        self.title = title;
    }

    pub fn title(&self) -> &Positioned {
        &self.title
    }

    pub fn set_caption(&mut self, caption: Positioned) {
        self.caption = caption;
    }

    pub fn caption(&self) -> &Positioned {
        &self.caption
    }

    pub fn set_legend(&mut self, legend: Positioned) {
        self.legend = legend;
    }

    pub fn legend(&self) -> &Positioned {
        &self.legend
    }

    pub fn set_header(&mut self, header: Positioned) {
        self.header = header;
    }

    pub fn header(&self) -> &Positioned {
        &self.header
    }

    pub fn set_footer(&mut self, footer: Positioned) {
        self.footer = footer;
    }

    pub fn footer(&self) -> &Positioned {
        &self.footer
    }

    pub fn set_main_frame(&mut self, lines: Vec<String>) {
        self.main_frame = Some(lines);
    }

    pub fn main_frame(&self) -> Option<&[String]> {
        self.main_frame.as_deref()
    }

    /// Skin parameter keys are case-insensitive.
    pub fn set_param(&mut self, key: &str, value: &str) {
        self.params.insert(key.to_lowercase(), value.to_string());
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_dark_mode(&self) -> bool {
        self.param("mode").is_some_and(|m| m.eq_ignore_ascii_case("dark"))
    }

    pub fn set_layout(&mut self, layout: LayoutEngine) {
        self.layout = layout;
    }

    /// The layout engine to use; `forced` (from the caller's configuration)
    /// wins over whatever the source asked for.
    pub fn layout_engine(&self, forced: Option<LayoutEngine>) -> LayoutEngine {
        forced.unwrap_or(self.layout)
    }
}

/// Diagrams that carry [`DiagramCommon`] state.
pub trait Titled {
    fn common(&self) -> &DiagramCommon;
    fn common_mut(&mut self) -> &mut DiagramCommon;
}
