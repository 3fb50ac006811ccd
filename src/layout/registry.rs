//! Component registry and mounter
//!
//! Binds logical widget names to mount callbacks in the docking engine, at
//! most once per name, and adds panes of those widgets.

use tracing::{debug, error};

use super::session::LayoutSession;
use crate::{
    dock::{ComponentContainer, DockingEngine, PaneId},
    widgets::{WidgetFactory, WidgetKind},
};

/// Derives the logical name of a widget from its title: lowerCamelCase over
/// whitespace-separated words.
pub fn create_component_type(title: &str) -> String {
    title
        .split_whitespace()
        .enumerate()
        .map(|(index, word)| {
            if index == 0 {
                word.to_lowercase()
            } else {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            }
        })
        .collect()
}

/// A widget kind bound to the name it is registered under.
#[derive(Debug, Clone, Copy)]
pub struct WidgetDescriptor<'a> {
    logical_name: &'a str,
    factory: WidgetFactory,
}

impl<'a> WidgetDescriptor<'a> {
    pub fn new(logical_name: &'a str, factory: WidgetFactory) -> Self {
        Self {
            logical_name,
            factory,
        }
    }

    /// Resolves a persisted name back to the widget it was saved from.
    pub fn from_logical_name(logical_name: &'a str) -> Option<Self> {
        WidgetKind::from_logical_name(logical_name)
            .map(|kind| Self::new(logical_name, kind.factory()))
    }

    pub fn logical_name(&self) -> &'a str {
        self.logical_name
    }

    pub fn factory(&self) -> WidgetFactory {
        self.factory
    }
}

/// Logical names that already have a mount callback in the engine, in
/// registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisteredSet {
    names: Vec<String>,
}

impl RegisteredSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|registered| registered == name)
    }

    /// Returns `false` if the name was already present.
    pub(super) fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names.clone()
    }
}

impl<E: DockingEngine> LayoutSession<E> {
    /// Binds a mount callback for `logical_name` unless one is already bound.
    pub fn register_new_component(&mut self, logical_name: &str, factory: WidgetFactory) {
        let Some(engine) = self.engine.as_mut() else {
            error!("Layout does not exist.");
            return;
        };
        if self.registered.contains(logical_name) {
            return;
        }

        engine.register_component_factory_function(
            logical_name,
            Box::new(move |container: &mut ComponentContainer| {
                let panel = factory();
                container.element_mut().append(panel);
            }),
        );
        self.registered.insert(logical_name);
        debug!("Registered component \"{logical_name}\"");
    }

    pub fn register_descriptor(&mut self, descriptor: WidgetDescriptor<'_>) {
        self.register_new_component(descriptor.logical_name(), descriptor.factory());
    }

    /// Registers the widget under the name derived from `title` and adds a
    /// pane of it.
    pub fn add_new_component(&mut self, title: &str, factory: WidgetFactory) -> Option<PaneId> {
        if self.has_errors() {
            return None;
        }

        let component_type = create_component_type(title);
        self.register_new_component(&component_type, factory);
        let engine = self.engine.as_mut()?;
        match engine.add_component(&component_type, None, title) {
            Ok(id) => Some(id),
            Err(e) => {
                error!("Failed to add component \"{title}\": {e}");
                None
            }
        }
    }

    pub fn add_widget(&mut self, kind: WidgetKind) -> Option<PaneId> {
        self.add_new_component(kind.title(), kind.factory())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Pie Graph", "pieGraph")]
    #[case("", "")]
    #[case("A B C", "aBC")]
    #[case("   ", "")]
    #[case("  table   component ", "tableComponent")]
    #[case("VERTICAL graph", "verticalGraph")]
    #[case("Test\tComponent\nTwo", "testComponentTwo")]
    #[case("élan vital", "élanVital")]
    fn test_create_component_type(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(create_component_type(title), expected);
    }

    #[test]
    fn test_registered_set_keeps_order_and_uniqueness() {
        let mut set = RegisteredSet::default();
        assert!(set.insert("table"));
        assert!(set.insert("pieGraph"));
        assert!(!set.insert("table"));
        assert_eq!(set.to_vec(), vec!["table", "pieGraph"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_descriptor_from_logical_name() {
        let descriptor = WidgetDescriptor::from_logical_name("treeComponent").expect("known");
        assert_eq!(descriptor.logical_name(), "treeComponent");
        assert!(WidgetDescriptor::from_logical_name("chart").is_none());
    }
}
