use serde::{Deserialize, Serialize};
use std::fmt;

/// Узел дерева оконного менеджера (ответ GET_TREE).
///
/// Снимок неизменяем и живёт ровно один проход обновления подписей.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pid: Option<i32>,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub window_properties: Option<WindowProperties>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub floating_nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Root,
    Output,
    Workspace,
    Con,
    FloatingCon,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Свойства X11 окна (только для XWayland / i3)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowProperties {
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Node {
    #[allow(dead_code)]
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            ..Self::default()
        }
    }

    #[allow(dead_code)]
    pub fn workspace(name: impl Into<String>) -> Self {
        Self::new(NodeType::Workspace).with_name(name)
    }

    /// Окно Wayland с app_id
    #[allow(dead_code)]
    pub fn window(pid: i32, app_id: impl Into<String>) -> Self {
        Self::new(NodeType::Con).with_pid(pid).with_app_id(app_id)
    }

    #[allow(dead_code)]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[allow(dead_code)]
    pub fn with_pid(mut self, pid: i32) -> Self {
        self.pid = Some(pid);
        self
    }

    #[allow(dead_code)]
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    #[allow(dead_code)]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.window_properties
            .get_or_insert_with(WindowProperties::default)
            .class = Some(class.into());
        self
    }

    #[allow(dead_code)]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window_properties
            .get_or_insert_with(WindowProperties::default)
            .title = Some(title.into());
        self
    }

    #[allow(dead_code)]
    pub fn with_child(mut self, child: Node) -> Self {
        self.nodes.push(child);
        self
    }

    #[allow(dead_code)]
    pub fn with_floating(mut self, child: Node) -> Self {
        self.floating_nodes.push(child);
        self
    }

    pub fn is_workspace(&self) -> bool {
        self.node_type == NodeType::Workspace
    }

    /// Текущая подпись узла (пустая строка для безымянных контейнеров)
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn window_class(&self) -> Option<&str> {
        self.window_properties.as_ref()?.class.as_deref()
    }

    pub fn window_title(&self) -> Option<&str> {
        self.window_properties.as_ref()?.title.as_deref()
    }

    /// Рабочие столы всех выходов.
    ///
    /// В sway рабочие столы - прямые потомки выходов, в i3 между ними лежит
    /// контейнер `content`, поэтому спускаемся до первого узла-рабочего стола.
    pub fn workspaces(&self) -> impl Iterator<Item = &Node> {
        let mut found = Vec::new();
        collect_workspaces(self, &mut found);
        found.into_iter()
    }

    #[allow(dead_code)]
    pub fn workspaces_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        let mut found = Vec::new();
        collect_workspaces_mut(self, &mut found);
        found.into_iter()
    }
}

fn collect_workspaces<'a>(node: &'a Node, found: &mut Vec<&'a Node>) {
    for child in &node.nodes {
        if child.is_workspace() {
            found.push(child);
        } else {
            collect_workspaces(child, found);
        }
    }
}

#[allow(dead_code)]
fn collect_workspaces_mut<'a>(node: &'a mut Node, found: &mut Vec<&'a mut Node>) {
    for child in &mut node.nodes {
        if child.is_workspace() {
            found.push(child);
        } else {
            collect_workspaces_mut(child, found);
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} \"{}\"", self.node_type, self.display_name())?;
        if let Some(pid) = self.pid {
            write!(f, " (pid {})", pid)?;
        }
        Ok(())
    }
}
