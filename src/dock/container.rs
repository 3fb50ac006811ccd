use std::fmt;

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Something that can be mounted into a pane and drawn there.
pub trait Panel {
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect);

    /// Returns `true` when the key was consumed.
    fn handle_key_event(&mut self, _key: KeyEvent) -> bool {
        false
    }

    /// Called once when the hosting pane is torn down.
    fn unmount(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(u64);

impl PaneId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// The visual root of a pane. Mount callbacks append panels here.
#[derive(Default)]
pub struct ContainerElement {
    children: Vec<Box<dyn Panel>>,
}

impl ContainerElement {
    pub fn append(&mut self, panel: Box<dyn Panel>) {
        self.children.push(panel);
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn first_mut(&mut self) -> Option<&mut Box<dyn Panel>> {
        self.children.first_mut()
    }
}

impl Drop for ContainerElement {
    fn drop(&mut self) {
        for child in self.children.iter_mut() {
            child.unmount();
        }
    }
}

/// A single docking slot.
pub struct ComponentContainer {
    id: PaneId,
    component_type: String,
    title: String,
    state: Option<Value>,
    element: ContainerElement,
}

impl ComponentContainer {
    pub(crate) fn new(
        id: PaneId,
        component_type: impl Into<String>,
        title: impl Into<String>,
        state: Option<Value>,
    ) -> Self {
        Self {
            id,
            component_type: component_type.into(),
            title: title.into(),
            state,
            element: ContainerElement::default(),
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> Option<&Value> {
        self.state.as_ref()
    }

    pub fn element(&self) -> &ContainerElement {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut ContainerElement {
        &mut self.element
    }

    pub fn is_mounted(&self) -> bool {
        !self.element.is_empty()
    }
}

impl fmt::Debug for ComponentContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentContainer")
            .field("id", &self.id)
            .field("component_type", &self.component_type)
            .field("title", &self.title)
            .field("mounted", &self.element.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;

    struct CountingPanel(Arc<AtomicUsize>);

    impl Panel for CountingPanel {
        fn draw(&mut self, _f: &mut Frame<'_>, _area: Rect) {}

        fn unmount(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_dropping_container_unmounts_children() {
        let unmounted = Arc::new(AtomicUsize::new(0));
        {
            let mut container = ComponentContainer::new(PaneId::new(1), "table", "Table", None);
            assert!(!container.is_mounted());
            container
                .element_mut()
                .append(Box::new(CountingPanel(Arc::clone(&unmounted))));
            assert!(container.is_mounted());
            assert_eq!(container.element().len(), 1);
        }
        assert_eq!(unmounted.load(Ordering::SeqCst), 1);
    }
}
