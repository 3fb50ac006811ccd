//! Runtime item tree of the docking engine.

use ratatui::layout::Direction;

use super::{
    config::{ItemConfig, DEFAULT_ITEM_SIZE},
    container::{ComponentContainer, PaneId},
    DockError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Row,
    Column,
}

impl Axis {
    pub(crate) fn direction(self) -> Direction {
        match self {
            Axis::Row => Direction::Horizontal,
            Axis::Column => Direction::Vertical,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Split {
    pub axis: Axis,
    pub children: Vec<Item>,
    pub size: u16,
}

#[derive(Debug)]
pub(crate) struct Stack {
    pub panes: Vec<ComponentContainer>,
    pub active: usize,
    pub size: u16,
}

impl Stack {
    pub(crate) fn single(pane: ComponentContainer, size: u16) -> Self {
        Self {
            panes: vec![pane],
            active: 0,
            size,
        }
    }

    pub(crate) fn position(&self, id: PaneId) -> Option<usize> {
        self.panes.iter().position(|pane| pane.id() == id)
    }

    pub(crate) fn active_pane_mut(&mut self) -> Option<&mut ComponentContainer> {
        self.panes.get_mut(self.active)
    }
}

#[derive(Debug)]
pub(crate) enum Item {
    Split(Split),
    Stack(Stack),
}

impl Item {
    pub(crate) fn empty_row() -> Self {
        Item::Split(Split {
            axis: Axis::Row,
            children: Vec::new(),
            size: DEFAULT_ITEM_SIZE,
        })
    }

    pub(crate) fn size(&self) -> u16 {
        match self {
            Item::Split(split) => split.size,
            Item::Stack(stack) => stack.size,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Item::Split(split) => split.children.is_empty(),
            Item::Stack(stack) => stack.panes.is_empty(),
        }
    }

    /// Builds the runtime tree. `create` turns a component config into a
    /// (possibly mounted) container.
    pub(crate) fn from_config<F>(config: ItemConfig, create: &mut F) -> Result<Self, DockError>
    where
        F: FnMut(String, String, Option<serde_json::Value>) -> ComponentContainer,
    {
        let item = match config {
            ItemConfig::Row { content, size } => Item::Split(Split {
                axis: Axis::Row,
                children: Self::children_from_config(content, create)?,
                size: size.max(1),
            }),
            ItemConfig::Column { content, size } => Item::Split(Split {
                axis: Axis::Column,
                children: Self::children_from_config(content, create)?,
                size: size.max(1),
            }),
            ItemConfig::Stack {
                content,
                active_item_index,
                size,
            } => {
                let mut panes = Vec::with_capacity(content.len());
                for child in content {
                    match child {
                        ItemConfig::Component {
                            component_type,
                            title,
                            component_state,
                            ..
                        } => panes.push(create(component_type, title, component_state)),
                        _ => {
                            return Err(DockError::InvalidItem(
                                "stacks may only contain components".to_string(),
                            ))
                        }
                    }
                }
                let active = active_item_index.min(panes.len().saturating_sub(1));
                Item::Stack(Stack {
                    panes,
                    active,
                    size: size.max(1),
                })
            }
            ItemConfig::Component {
                component_type,
                title,
                component_state,
                size,
            } => Item::Stack(Stack::single(
                create(component_type, title, component_state),
                size.max(1),
            )),
        };
        Ok(item)
    }

    fn children_from_config<F>(
        content: Vec<ItemConfig>,
        create: &mut F,
    ) -> Result<Vec<Item>, DockError>
    where
        F: FnMut(String, String, Option<serde_json::Value>) -> ComponentContainer,
    {
        content
            .into_iter()
            .map(|child| Self::from_config(child, create))
            .collect()
    }

    pub(crate) fn to_config(&self) -> ItemConfig {
        match self {
            Item::Split(split) => {
                let content = split.children.iter().map(Item::to_config).collect();
                match split.axis {
                    Axis::Row => ItemConfig::Row {
                        content,
                        size: split.size,
                    },
                    Axis::Column => ItemConfig::Column {
                        content,
                        size: split.size,
                    },
                }
            }
            Item::Stack(stack) => ItemConfig::Stack {
                content: stack
                    .panes
                    .iter()
                    .map(|pane| ItemConfig::Component {
                        component_type: pane.component_type().to_string(),
                        title: pane.title().to_string(),
                        component_state: pane.state().cloned(),
                        size: DEFAULT_ITEM_SIZE,
                    })
                    .collect(),
                active_item_index: stack.active,
                size: stack.size,
            },
        }
    }

    /// Panes in depth-first order.
    pub(crate) fn collect_panes<'a>(&'a self, out: &mut Vec<&'a ComponentContainer>) {
        match self {
            Item::Split(split) => split
                .children
                .iter()
                .for_each(|child| child.collect_panes(out)),
            Item::Stack(stack) => out.extend(stack.panes.iter()),
        }
    }

    pub(crate) fn collect_stacks_mut<'a>(&'a mut self, out: &mut Vec<&'a mut Stack>) {
        match self {
            Item::Split(split) => split
                .children
                .iter_mut()
                .for_each(|child| child.collect_stacks_mut(out)),
            Item::Stack(stack) => out.push(stack),
        }
    }

    pub(crate) fn stack_of_mut(&mut self, id: PaneId) -> Option<&mut Stack> {
        let mut stacks = Vec::new();
        self.collect_stacks_mut(&mut stacks);
        stacks
            .into_iter()
            .find(|stack| stack.position(id).is_some())
    }

    /// Removes empty stacks and splits below this item and collapses splits
    /// left with a single child. The item itself is never removed.
    pub(crate) fn prune(&mut self) {
        if let Item::Split(split) = self {
            for child in split.children.iter_mut() {
                child.prune();
                child.collapse();
            }
            split.children.retain(|child| !child.is_empty());
        }
    }

    fn collapse(&mut self) {
        let Item::Split(split) = self else {
            return;
        };
        if split.children.len() != 1 {
            return;
        }
        let size = split.size;
        if let Some(mut only) = split.children.pop() {
            match &mut only {
                Item::Split(inner) => inner.size = size,
                Item::Stack(inner) => inner.size = size,
            }
            *self = only;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn create_unmounted() -> impl FnMut(String, String, Option<serde_json::Value>) -> ComponentContainer
    {
        let mut next = 0;
        move |component_type, title, state| {
            next += 1;
            ComponentContainer::new(PaneId::new(next), component_type, title, state)
        }
    }

    #[test]
    fn test_component_under_row_is_wrapped_in_stack() {
        let config = ItemConfig::row(vec![
            ItemConfig::component("table", "Table Component"),
            ItemConfig::component("tree", "Tree Component"),
        ]);
        let item = Item::from_config(config, &mut create_unmounted()).expect("valid");
        assert_eq!(
            item.to_config(),
            ItemConfig::row(vec![
                ItemConfig::stack(vec![ItemConfig::component("table", "Table Component")]),
                ItemConfig::stack(vec![ItemConfig::component("tree", "Tree Component")]),
            ])
        );
    }

    #[test]
    fn test_collect_panes_is_depth_first() {
        let config = ItemConfig::row(vec![
            ItemConfig::column(vec![
                ItemConfig::component("a", "A"),
                ItemConfig::component("b", "B"),
            ]),
            ItemConfig::stack(vec![
                ItemConfig::component("c", "C"),
                ItemConfig::component("d", "D"),
            ]),
        ]);
        let item = Item::from_config(config, &mut create_unmounted()).expect("valid");
        let mut panes = Vec::new();
        item.collect_panes(&mut panes);
        let titles: Vec<_> = panes.iter().map(|pane| pane.title()).collect();
        assert_eq!(titles, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_active_index_is_clamped() {
        let config = ItemConfig::Stack {
            content: vec![ItemConfig::component("a", "A")],
            active_item_index: 7,
            size: DEFAULT_ITEM_SIZE,
        };
        let Item::Stack(stack) = Item::from_config(config, &mut create_unmounted()).expect("valid")
        else {
            panic!("expected a stack");
        };
        assert_eq!(stack.active, 0);
    }

    #[test]
    fn test_prune_collapses_single_child_splits() {
        let config = ItemConfig::row(vec![
            ItemConfig::Column {
                content: vec![ItemConfig::component("a", "A"), ItemConfig::stack(vec![])],
                size: 30,
            },
            ItemConfig::component("b", "B"),
        ]);
        let mut item = Item::from_config(config, &mut create_unmounted()).expect("valid");
        item.prune();
        assert_eq!(
            item.to_config(),
            ItemConfig::row(vec![
                ItemConfig::Stack {
                    content: vec![ItemConfig::component("a", "A")],
                    active_item_index: 0,
                    size: 30,
                },
                ItemConfig::stack(vec![ItemConfig::component("b", "B")]),
            ])
        );
    }
}
