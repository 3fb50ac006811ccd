//! Dashboard widgets
//!
//! Every widget the toolbar can add is a [`WidgetKind`]. Each kind carries a
//! human title, the logical name derived from it, and a factory building the
//! [`Panel`] that gets mounted into a pane.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::{dock::Panel, layout::create_component_type};

pub mod bar_graph;
pub mod pie_graph;
pub mod table;
pub mod test_panel;
pub mod tree;

pub use bar_graph::BarGraphPanel;
pub use pie_graph::PieGraphPanel;
pub use table::TablePanel;
pub use test_panel::TestPanel;
pub use tree::TreePanel;

/// Builds a fresh, unmounted widget.
pub type WidgetFactory = fn() -> Box<dyn Panel>;

/// Sample series shared by the graph widgets.
pub(crate) const GENRE_POPULARITY: [(&str, u64); 4] = [
    ("Black Metal", 80),
    ("Death Metal", 65),
    ("Doom Metal", 50),
    ("Folk Metal", 35),
];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum WidgetKind {
    Test,
    Table,
    Tree,
    VerticalGraph,
    HorizontalGraph,
    PieGraph,
}

impl WidgetKind {
    pub fn title(self) -> &'static str {
        match self {
            WidgetKind::Test => "Test Component",
            WidgetKind::Table => "Table Component",
            WidgetKind::Tree => "Tree Component",
            WidgetKind::VerticalGraph => "Vertical Graph",
            WidgetKind::HorizontalGraph => "Horizontal Graph",
            WidgetKind::PieGraph => "Pie Graph",
        }
    }

    /// The key used in the registry and in saved layouts.
    pub fn logical_name(self) -> String {
        create_component_type(self.title())
    }

    pub fn from_logical_name(name: &str) -> Option<Self> {
        Self::iter().find(|kind| kind.logical_name() == name)
    }

    pub fn factory(self) -> WidgetFactory {
        match self {
            WidgetKind::Test => || -> Box<dyn Panel> { Box::new(TestPanel::new()) },
            WidgetKind::Table => || -> Box<dyn Panel> { Box::new(TablePanel::new()) },
            WidgetKind::Tree => || -> Box<dyn Panel> { Box::new(TreePanel::new()) },
            WidgetKind::VerticalGraph => {
                || -> Box<dyn Panel> { Box::new(BarGraphPanel::vertical()) }
            }
            WidgetKind::HorizontalGraph => {
                || -> Box<dyn Panel> { Box::new(BarGraphPanel::horizontal()) }
            }
            WidgetKind::PieGraph => || -> Box<dyn Panel> { Box::new(PieGraphPanel::new()) },
        }
    }
}
