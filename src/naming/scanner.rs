use crate::events::Node;

/// Все узлы-приложения (с pid) поддерева в порядке обхода в глубину.
///
/// Обычные дочерние узлы перечисляются полностью. Каждое плавающее поддерево
/// даёт не больше одного узла - первый найденный, чтобы стопка диалогов
/// одного приложения не размножала его имя.
pub fn find_applications(node: &Node) -> Vec<&Node> {
    let mut found = Vec::new();
    if node.pid.is_some() {
        found.push(node);
    }

    found.extend(node.nodes.iter().flat_map(find_applications));

    found.extend(
        node.floating_nodes
            .iter()
            .filter_map(|floating| find_applications(floating).into_iter().next()),
    );

    found
}
