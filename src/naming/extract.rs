use crate::events::Node;

/// Источник "сырого" имени приложения у узла дерева
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    /// Wayland app_id
    AppId,
    /// X11 WM_CLASS
    WindowClass,
    /// X11 заголовок окна - самый шумный источник, поэтому последний
    WindowTitle,
}

/// Порядок опроса источников: побеждает первое непустое значение
pub const NAME_SOURCES: [NameSource; 3] = [
    NameSource::AppId,
    NameSource::WindowClass,
    NameSource::WindowTitle,
];

impl NameSource {
    pub fn read<'a>(&self, node: &'a Node) -> Option<&'a str> {
        let value = match self {
            NameSource::AppId => node.app_id.as_deref(),
            NameSource::WindowClass => node.window_class(),
            NameSource::WindowTitle => node.window_title(),
        }?;
        (!value.is_empty()).then_some(value)
    }
}

/// Сырое имя приложения узла или `None`, если ни один источник не дал значения
pub fn application_name(node: &Node) -> Option<&str> {
    NAME_SOURCES.iter().find_map(|source| source.read(node))
}
