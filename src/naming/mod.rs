//! Вычисление подписи рабочего стола по его содержимому.
//!
//! Здесь только чистые функции: дерево на входе, строка на выходе.

pub mod dedup;
pub mod extract;
pub mod formatter;
pub mod scanner;

pub use dedup::unique_stable;
pub use extract::application_name;
pub use formatter::format_name;
pub use scanner::find_applications;

use crate::events::Node;

/// Номер рабочего стола из ведущих цифр его имени.
///
/// `None` для имён без ведущих цифр, для нуля и для переполнения u32.
pub fn workspace_number(name: &str) -> Option<u32> {
    let digits_end = name
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(name.len());
    name[..digits_end].parse::<u32>().ok().filter(|n| *n > 0)
}

/// Токены приложений рабочего стола: без пустых и без повторов
pub fn application_tokens(workspace: &Node) -> Vec<String> {
    unique_stable(
        find_applications(workspace)
            .into_iter()
            .filter_map(application_name)
            .map(format_name)
            .filter(|token| !token.is_empty()),
    )
}

/// `"<N>"` или `"<N> tok1 tok2 ..."`
pub fn compose_label(number: u32, tokens: &[String]) -> String {
    if tokens.is_empty() {
        number.to_string()
    } else {
        format!("{} {}", number, tokens.join(" "))
    }
}

/// Номер и желаемая подпись рабочего стола, `None` если стол не нумерованный
pub fn desired_label(workspace: &Node) -> Option<(u32, String)> {
    let number = workspace_number(workspace.display_name())?;
    Some((number, compose_label(number, &application_tokens(workspace))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NodeType;

    fn label_of(workspace: &Node) -> Option<String> {
        desired_label(workspace).map(|(_, label)| label)
    }

    #[test]
    fn test_workspace_number() {
        assert_eq!(workspace_number("3"), Some(3));
        assert_eq!(workspace_number("12 firefox slack"), Some(12));
        assert_eq!(workspace_number("7:web"), Some(7));
        assert_eq!(workspace_number("scratch"), None);
        assert_eq!(workspace_number(""), None);
        assert_eq!(workspace_number("0 idle"), None);
        assert_eq!(workspace_number("-1"), None);
        assert_eq!(workspace_number("99999999999999"), None);
    }

    #[test]
    fn test_compose_label() {
        assert_eq!(compose_label(4, &[]), "4");
        assert_eq!(
            compose_label(3, &["firefox".to_string(), "slack".to_string()]),
            "3 firefox slack"
        );
    }

    #[test]
    fn test_desired_label_end_to_end() {
        let ws = Node::workspace("3")
            .with_child(Node::window(100, "firefox"))
            .with_floating(Node::new(NodeType::FloatingCon).with_pid(200).with_class("Slack"));

        assert_eq!(label_of(&ws).as_deref(), Some("3 firefox slack"));
    }

    #[test]
    fn test_desired_label_dedups_and_drops_empty() {
        let ws = Node::workspace("2 stale")
            .with_child(Node::window(1, "org.mozilla.firefox"))
            .with_child(Node::window(2, "firefox"))
            .with_child(Node::default().with_pid(3))
            .with_child(Node::window(4, "123"))
            .with_child(Node::window(5, "Alacritty"));

        assert_eq!(label_of(&ws).as_deref(), Some("2 firefox alacritty"));
    }

    #[test]
    fn test_desired_label_skips_unnumbered() {
        let ws = Node::workspace("scratch").with_child(Node::window(1, "firefox"));
        assert_eq!(desired_label(&ws), None);
    }

    #[test]
    fn test_desired_label_idempotent() {
        let ws = Node::workspace("5")
            .with_child(Node::window(1, "kitty"))
            .with_child(Node::window(2, "code-insiders"));
        let (number, label) = desired_label(&ws).unwrap();
        assert_eq!(number, 5);
        assert_eq!(label, "5 kitty code insiders");

        let renamed = Node { name: Some(label.clone()), ..ws };
        assert_eq!(label_of(&renamed), Some(label));
    }
}
