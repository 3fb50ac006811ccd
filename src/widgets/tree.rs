use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{prelude::*, widgets::*};

use crate::dock::Panel;

#[derive(Debug, Clone)]
struct Node {
    label: &'static str,
    children: Vec<Node>,
    expanded: bool,
}

impl Node {
    fn leaf(label: &'static str) -> Self {
        Self {
            label,
            children: Vec::new(),
            expanded: false,
        }
    }

    fn branch(label: &'static str, children: Vec<Node>) -> Self {
        Self {
            label,
            children,
            expanded: false,
        }
    }
}

fn sample_tree() -> Vec<Node> {
    vec![
        Node::branch(
            "Black Metal",
            vec![Node::leaf("Mayhem"), Node::leaf("Emperor")],
        ),
        Node::branch(
            "Death Metal",
            vec![
                Node::leaf("Death"),
                Node::branch(
                    "Florida",
                    vec![Node::leaf("Obituary"), Node::leaf("Morbid Angel")],
                ),
            ],
        ),
        Node::branch(
            "Doom Metal",
            vec![Node::leaf("Candlemass"), Node::leaf("Saint Vitus")],
        ),
        Node::branch(
            "Folk Metal",
            vec![Node::leaf("Finntroll"), Node::leaf("Eluveitie")],
        ),
    ]
}

/// A visible row: depth plus the index path into the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
struct VisibleNode {
    depth: usize,
    path: Vec<usize>,
}

/// Expandable tree of sample nodes.
#[derive(Debug)]
pub struct TreePanel {
    roots: Vec<Node>,
    state: ListState,
}

impl Default for TreePanel {
    fn default() -> Self {
        Self::new()
    }
}

impl TreePanel {
    pub fn new() -> Self {
        Self {
            roots: sample_tree(),
            state: ListState::default().with_selected(Some(0)),
        }
    }

    fn visible(&self) -> Vec<VisibleNode> {
        fn walk(nodes: &[Node], depth: usize, prefix: &[usize], out: &mut Vec<VisibleNode>) {
            for (index, node) in nodes.iter().enumerate() {
                let mut path = prefix.to_vec();
                path.push(index);
                out.push(VisibleNode {
                    depth,
                    path: path.clone(),
                });
                if node.expanded {
                    walk(&node.children, depth + 1, &path, out);
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.roots, 0, &[], &mut out);
        out
    }

    fn node(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get(*first)?;
        for index in rest {
            node = node.children.get(*index)?;
        }
        Some(node)
    }

    fn node_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get_mut(*first)?;
        for index in rest {
            node = node.children.get_mut(*index)?;
        }
        Some(node)
    }

    fn selected_path(&self) -> Option<Vec<usize>> {
        let selected = self.state.selected()?;
        self.visible().get(selected).map(|node| node.path.clone())
    }

    fn set_expanded(&mut self, expanded: Option<bool>) {
        let Some(path) = self.selected_path() else {
            return;
        };
        if let Some(node) = self.node_mut(&path) {
            if !node.children.is_empty() {
                node.expanded = expanded.unwrap_or(!node.expanded);
            }
        }
    }

    /// Labels of the currently visible rows, indented by depth.
    pub fn visible_labels(&self) -> Vec<String> {
        self.visible()
            .iter()
            .filter_map(|visible| {
                let node = self.node(&visible.path)?;
                let marker = match (node.children.is_empty(), node.expanded) {
                    (true, _) => "  ",
                    (false, true) => "▾ ",
                    (false, false) => "▸ ",
                };
                Some(format!(
                    "{}{}{}",
                    "  ".repeat(visible.depth),
                    marker,
                    node.label
                ))
            })
            .collect()
    }
}

impl Panel for TreePanel {
    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self.visible_labels().into_iter().map(ListItem::new).collect();
        let list = List::new(items)
            .highlight_style(Style::default().reversed())
            .highlight_symbol("> ");
        f.render_stateful_widget(list, area, &mut self.state);
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        let len = self.visible().len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let next = self
                    .state
                    .selected()
                    .map_or(0, |index| (index + 1).min(len.saturating_sub(1)));
                self.state.select(Some(next));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let previous = self
                    .state
                    .selected()
                    .map_or(0, |index| index.saturating_sub(1));
                self.state.select(Some(previous));
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.set_expanded(None),
            KeyCode::Right | KeyCode::Char('l') => self.set_expanded(Some(true)),
            KeyCode::Left | KeyCode::Char('h') => self.set_expanded(Some(false)),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use super::*;

    fn press(panel: &mut TreePanel, code: KeyCode) {
        panel.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_starts_collapsed() {
        let panel = TreePanel::new();
        assert_eq!(
            panel.visible_labels(),
            vec!["▸ Black Metal", "▸ Death Metal", "▸ Doom Metal", "▸ Folk Metal"]
        );
    }

    #[test]
    fn test_expand_nested_and_collapse() {
        let mut panel = TreePanel::new();
        press(&mut panel, KeyCode::Down);
        press(&mut panel, KeyCode::Enter);
        press(&mut panel, KeyCode::Down);
        press(&mut panel, KeyCode::Down);
        press(&mut panel, KeyCode::Right);
        assert_eq!(
            panel.visible_labels(),
            vec![
                "▸ Black Metal",
                "▾ Death Metal",
                "    Death",
                "  ▾ Florida",
                "      Obituary",
                "      Morbid Angel",
                "▸ Doom Metal",
                "▸ Folk Metal",
            ]
        );

        press(&mut panel, KeyCode::Up);
        press(&mut panel, KeyCode::Up);
        press(&mut panel, KeyCode::Left);
        assert_eq!(panel.visible_labels().len(), 4);
    }

    #[test]
    fn test_leaf_toggle_is_noop() {
        let mut panel = TreePanel::new();
        press(&mut panel, KeyCode::Enter);
        press(&mut panel, KeyCode::Down);
        let before = panel.visible_labels();
        press(&mut panel, KeyCode::Enter);
        assert_eq!(panel.visible_labels(), before);
    }
}
