use crate::controller::Snapshot;

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,

    // Pagination
    LoadMore,
    PageLoaded { snapshot: Snapshot, session: u64 },
    LoadFailed { error: String, session: u64 },
    /// Re-read the controller's state
    Sync,
    /// Start a new session: drop the memoized index and load from page 0
    Refresh,

    OpenInBrowser,
    YankUrl,

    None,
}
