use devsweep_core::{DirectCleanupId, ScannerKind};

/// One line of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    /// Interactive scan followed by selection
    Scan(ScannerKind),
    /// One-shot cleanup, no selection step
    Direct(DirectCleanupId),
}

impl MenuEntry {
    pub fn all() -> Vec<MenuEntry> {
        let scans = [
            ScannerKind::Unified,
            ScannerKind::NodeModules,
            ScannerKind::Pods,
        ]
        .into_iter()
        .map(MenuEntry::Scan);
        let direct = DirectCleanupId::ALL.into_iter().map(MenuEntry::Direct);
        scans.chain(direct).collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            MenuEntry::Scan(kind) => kind.info().name,
            MenuEntry::Direct(id) => id.name(),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            MenuEntry::Scan(kind) => kind.info().icon,
            MenuEntry::Direct(id) => id.icon(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MenuEntry::Scan(kind) => kind.info().description,
            MenuEntry::Direct(id) => id.description(),
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, MenuEntry::Scan(_))
    }
}

/// What the user asked the menu to run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuChoice {
    pub scans: Vec<ScannerKind>,
    pub direct: Vec<DirectCleanupId>,
}

impl MenuChoice {
    pub fn is_empty(&self) -> bool {
        self.scans.is_empty() && self.direct.is_empty()
    }
}

/// Cursor and checkboxes of the main menu
#[derive(Debug, Clone)]
pub struct MenuState {
    entries: Vec<MenuEntry>,
    checked: Vec<bool>,
    pub cursor: usize,
}

impl MenuState {
    pub fn new() -> Self {
        let entries = MenuEntry::all();
        let checked = vec![false; entries.len()];
        Self {
            entries,
            checked,
            cursor: 0,
        }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
    }

    pub fn go_to_first(&mut self) {
        self.cursor = 0;
    }

    pub fn go_to_last(&mut self) {
        self.cursor = self.entries.len().saturating_sub(1);
    }

    pub fn toggle(&mut self) {
        if let Some(checked) = self.checked.get_mut(self.cursor) {
            *checked = !*checked;
        }
    }

    /// Checked entries in menu order, or the entry under the cursor when
    /// nothing is checked
    pub fn choice(&self) -> MenuChoice {
        let mut chosen: Vec<MenuEntry> = self
            .entries
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(entry, _)| *entry)
            .collect();
        if chosen.is_empty()
            && let Some(entry) = self.entries.get(self.cursor)
        {
            chosen.push(*entry);
        }

        let mut choice = MenuChoice::default();
        for entry in chosen {
            match entry {
                MenuEntry::Scan(kind) => choice.scans.push(kind),
                MenuEntry::Direct(id) => choice.direct.push(id),
            }
        }
        choice
    }

    pub fn reset(&mut self) {
        self.checked.iter_mut().for_each(|c| *c = false);
        self.cursor = 0;
    }
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_falls_back_to_cursor() {
        let mut menu = MenuState::new();
        menu.move_down();
        let choice = menu.choice();
        assert_eq!(choice.scans, vec![ScannerKind::NodeModules]);
        assert!(choice.direct.is_empty());
    }

    #[test]
    fn test_choice_uses_checked_entries() {
        let mut menu = MenuState::new();
        menu.move_down();
        menu.toggle();
        menu.go_to_last();
        menu.toggle();
        menu.go_to_first();

        let choice = menu.choice();
        assert_eq!(choice.scans, vec![ScannerKind::NodeModules]);
        assert_eq!(choice.direct, vec![DirectCleanupId::XcodeCaches]);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut menu = MenuState::new();
        menu.move_up();
        assert_eq!(menu.cursor, 0);
        for _ in 0..50 {
            menu.move_down();
        }
        assert_eq!(menu.cursor, menu.entries().len() - 1);
    }

    #[test]
    fn test_reset_clears_checks() {
        let mut menu = MenuState::new();
        menu.toggle();
        menu.move_down();
        menu.reset();
        assert_eq!(menu.cursor, 0);
        assert!(!menu.is_checked(0));
    }
}
