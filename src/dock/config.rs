use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DockError;

/// Default weight of an item relative to its siblings.
pub const DEFAULT_ITEM_SIZE: u16 = 10;

pub(crate) fn default_size() -> u16 {
    DEFAULT_ITEM_SIZE
}

/// User-facing layout configuration.
///
/// Items are tagged by `type`. A `component` placed directly inside a row or
/// column is wrapped into a stack when the layout is loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    #[serde(default)]
    pub root: Option<ItemConfig>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub dimensions: Dimensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ItemConfig {
    Row {
        #[serde(default)]
        content: Vec<ItemConfig>,
        #[serde(default = "default_size")]
        size: u16,
    },
    Column {
        #[serde(default)]
        content: Vec<ItemConfig>,
        #[serde(default = "default_size")]
        size: u16,
    },
    Stack {
        #[serde(default)]
        content: Vec<ItemConfig>,
        #[serde(default)]
        active_item_index: usize,
        #[serde(default = "default_size")]
        size: u16,
    },
    Component {
        component_type: String,
        #[serde(default)]
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        component_state: Option<Value>,
        #[serde(default = "default_size")]
        size: u16,
    },
}

impl ItemConfig {
    pub fn row(content: Vec<ItemConfig>) -> Self {
        ItemConfig::Row {
            content,
            size: DEFAULT_ITEM_SIZE,
        }
    }

    pub fn column(content: Vec<ItemConfig>) -> Self {
        ItemConfig::Column {
            content,
            size: DEFAULT_ITEM_SIZE,
        }
    }

    pub fn stack(content: Vec<ItemConfig>) -> Self {
        ItemConfig::Stack {
            content,
            active_item_index: 0,
            size: DEFAULT_ITEM_SIZE,
        }
    }

    pub fn component(component_type: impl Into<String>, title: impl Into<String>) -> Self {
        ItemConfig::Component {
            component_type: component_type.into(),
            title: title.into(),
            component_state: None,
            size: DEFAULT_ITEM_SIZE,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ItemConfig::Row { .. } => "row",
            ItemConfig::Column { .. } => "column",
            ItemConfig::Stack { .. } => "stack",
            ItemConfig::Component { .. } => "component",
        }
    }

    pub fn size(&self) -> u16 {
        match self {
            ItemConfig::Row { size, .. }
            | ItemConfig::Column { size, .. }
            | ItemConfig::Stack { size, .. }
            | ItemConfig::Component { size, .. } => *size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "enabled")]
    pub show_popout_icon: bool,
    #[serde(default = "enabled")]
    pub show_maximise_icon: bool,
    #[serde(default = "enabled")]
    pub show_close_icon: bool,
}

fn enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_popout_icon: true,
            show_maximise_icon: true,
            show_close_icon: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    /// Rows reserved for the tab header of every stack.
    #[serde(default = "default_header_height")]
    pub header_height: u16,
}

fn default_header_height() -> u16 {
    1
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            header_height: default_header_height(),
        }
    }
}

/// Fully populated configuration as produced by `save_layout`.
///
/// This is the serialized form that round-trips through files. Only
/// [`LayoutConfig::from_resolved`] turns it back into something loadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLayoutConfig {
    pub resolved: bool,
    pub root: Option<ItemConfig>,
    pub settings: Settings,
    pub dimensions: Dimensions,
}

impl LayoutConfig {
    pub fn from_resolved(resolved: ResolvedLayoutConfig) -> Result<Self, DockError> {
        if !resolved.resolved {
            return Err(DockError::NotResolved);
        }
        if let Some(root) = &resolved.root {
            validate_item(root)?;
        }
        Ok(Self {
            root: resolved.root,
            settings: resolved.settings,
            dimensions: resolved.dimensions,
        })
    }

    /// Deserializes an opaque saved layout and resolves it in one step.
    pub fn from_resolved_value(value: Value) -> Result<Self, DockError> {
        let resolved: ResolvedLayoutConfig = serde_json::from_value(value)?;
        Self::from_resolved(resolved)
    }
}

fn validate_item(item: &ItemConfig) -> Result<(), DockError> {
    if item.size() == 0 {
        return Err(DockError::InvalidItem(format!(
            "{} with zero size",
            item.kind()
        )));
    }
    match item {
        ItemConfig::Row { content, .. } | ItemConfig::Column { content, .. } => {
            content.iter().try_for_each(validate_item)
        }
        ItemConfig::Stack { content, .. } => {
            for child in content {
                match child {
                    ItemConfig::Component { .. } => validate_item(child)?,
                    _ => {
                        return Err(DockError::InvalidItem(
                            "stacks may only contain components".to_string(),
                        ))
                    }
                }
            }
            Ok(())
        }
        ItemConfig::Component { component_type, .. } if component_type.is_empty() => Err(
            DockError::InvalidItem("component without a componentType".to_string()),
        ),
        ItemConfig::Component { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_item_config_uses_camel_case_tags() {
        let item = ItemConfig::Stack {
            content: vec![ItemConfig::component("pieGraph", "Pie Graph")],
            active_item_index: 0,
            size: 10,
        };
        let value = serde_json::to_value(&item).expect("serializable");
        assert_eq!(
            value,
            json!({
                "type": "stack",
                "content": [{
                    "type": "component",
                    "componentType": "pieGraph",
                    "title": "Pie Graph",
                    "size": 10
                }],
                "activeItemIndex": 0,
                "size": 10
            })
        );
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: LayoutConfig = serde_json::from_value(json!({
            "root": { "type": "row", "content": [{ "type": "component", "componentType": "table" }] }
        }))
        .expect("valid config");
        assert_eq!(config.settings, Settings::default());
        assert_eq!(config.dimensions.header_height, 1);
        assert_eq!(
            config.root,
            Some(ItemConfig::row(vec![ItemConfig::component("table", "")]))
        );
    }

    #[test]
    fn test_from_resolved_rejects_unresolved() {
        let resolved = ResolvedLayoutConfig {
            resolved: false,
            root: None,
            settings: Settings::default(),
            dimensions: Dimensions::default(),
        };
        assert!(matches!(
            LayoutConfig::from_resolved(resolved),
            Err(DockError::NotResolved)
        ));
    }

    #[test]
    fn test_from_resolved_rejects_nested_stack_in_stack() {
        let resolved = ResolvedLayoutConfig {
            resolved: true,
            root: Some(ItemConfig::stack(vec![ItemConfig::stack(vec![])])),
            settings: Settings::default(),
            dimensions: Dimensions::default(),
        };
        assert!(matches!(
            LayoutConfig::from_resolved(resolved),
            Err(DockError::InvalidItem(_))
        ));
    }

    #[test]
    fn test_from_resolved_rejects_zero_size_items() {
        let hidden = json!({
            "resolved": true,
            "settings": {},
            "dimensions": {},
            "root": {
                "type": "row",
                "content": [
                    {
                        "type": "stack",
                        "size": 0,
                        "content": [{ "type": "component", "componentType": "a", "title": "AAAA" }]
                    },
                    {
                        "type": "stack",
                        "size": 10,
                        "content": [{ "type": "component", "componentType": "b", "title": "BBBB" }]
                    }
                ]
            }
        });
        assert!(matches!(
            LayoutConfig::from_resolved_value(hidden),
            Err(DockError::InvalidItem(message)) if message == "stack with zero size"
        ));

        for root in [
            json!({ "type": "row", "size": 0 }),
            json!({ "type": "column", "size": 0 }),
            json!({ "type": "component", "componentType": "a", "size": 0 }),
        ] {
            let result = LayoutConfig::from_resolved_value(json!({
                "resolved": true,
                "settings": {},
                "dimensions": {},
                "root": root,
            }));
            assert!(matches!(result, Err(DockError::InvalidItem(_))));
        }
    }

    #[test]
    fn test_from_resolved_value_rejects_garbage() {
        let result = LayoutConfig::from_resolved_value(json!({ "hello": "world" }));
        assert!(matches!(result, Err(DockError::Deserialize(_))));
    }
}
