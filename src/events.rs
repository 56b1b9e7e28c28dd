#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Show,
    Hide,
    Reload,
    ConfigReload,
    PortfolioReload,
}
