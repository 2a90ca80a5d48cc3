/// User actions that can be performed in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move cursor up
    MoveUp,
    /// Move cursor down
    MoveDown,
    /// Move cursor up by a page
    PageUp,
    /// Move cursor down by a page
    PageDown,
    /// Go to first entry
    GoToFirst,
    /// Go to last entry
    GoToLast,
    /// Check or uncheck the entry under the cursor
    ToggleSelect,
    /// Check every item
    SelectAll,
    /// Uncheck every item
    SelectNone,
    /// Largest first
    SortBySize,
    /// Most recently modified first
    SortByDate,
    /// Alphabetical by path
    SortByPath,
    /// Drop items below the minimum size
    FilterBySize,
    /// Confirm the current screen (start, delete, quit from summary)
    Confirm,
    /// Stop the running scan and keep what was found
    CancelScan,
    /// Reset everything and go back to the main menu
    BackToMenu,
    /// Quit the application
    Quit,
    /// No action (for tick events)
    Tick,
}
