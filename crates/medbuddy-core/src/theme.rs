//! Dark-mode preference and its class-list side effect.

use std::collections::BTreeSet;

use crate::db::{Database, DbResult};

/// Preference key holding a JSON boolean.
pub const DARK_MODE_KEY: &str = "darkMode";
/// Class toggled on the document root.
pub const DARK_CLASS: &str = "dark";

/// Something carrying CSS-style classes (a document root in the host app).
pub trait ThemeTarget {
    fn add_class(&mut self, class: &str);
    fn remove_class(&mut self, class: &str);
    fn has_class(&self, class: &str) -> bool;
}

/// In-memory class list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    classes: BTreeSet<String>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }
}

impl ThemeTarget for ClassList {
    fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// Keeps the stored preference and the target's class state in step.
pub struct ThemeController<T: ThemeTarget> {
    target: T,
    dark: bool,
}

impl<T: ThemeTarget> ThemeController<T> {
    /// Read the stored preference, apply it and write it back.
    ///
    /// A missing or unparseable value means light mode.
    pub fn load(db: &Database, target: T) -> DbResult<Self> {
        let dark = read_dark_mode(db)?;
        let mut controller = Self { target, dark };
        controller.apply();
        controller.persist(db)?;
        Ok(controller)
    }

    /// Flip the mode, apply it and persist it. Returns the new state.
    pub fn toggle(&mut self, db: &Database) -> DbResult<bool> {
        self.set_dark(db, !self.dark)?;
        Ok(self.dark)
    }

    pub fn set_dark(&mut self, db: &Database, dark: bool) -> DbResult<()> {
        self.dark = dark;
        self.apply();
        self.persist(db)?;
        tracing::info!(dark, "theme changed");
        Ok(())
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    fn apply(&mut self) {
        self.target.remove_class(DARK_CLASS);
        if self.dark {
            self.target.add_class(DARK_CLASS);
        }
    }

    fn persist(&self, db: &Database) -> DbResult<()> {
        db.set_preference(DARK_MODE_KEY, &serde_json::to_string(&self.dark)?)
    }
}

/// Stored dark-mode flag; anything but a JSON boolean reads as light.
pub fn read_dark_mode(db: &Database) -> DbResult<bool> {
    let stored = db.get_preference(DARK_MODE_KEY)?;
    Ok(stored
        .and_then(|raw| serde_json::from_str::<bool>(&raw).ok())
        .unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_light_and_writes_back() {
        let db = Database::open_in_memory().unwrap();
        let controller = ThemeController::load(&db, ClassList::new()).unwrap();

        assert!(!controller.is_dark());
        assert!(!controller.target().has_class(DARK_CLASS));
        assert_eq!(db.get_preference(DARK_MODE_KEY).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_invalid_stored_value_is_light() {
        let db = Database::open_in_memory().unwrap();
        db.set_preference(DARK_MODE_KEY, "yes please").unwrap();

        let mut target = ClassList::new();
        target.add_class(DARK_CLASS);
        let controller = ThemeController::load(&db, target).unwrap();

        assert!(!controller.is_dark());
        assert!(!controller.target().has_class(DARK_CLASS));
    }

    #[test]
    fn test_stored_dark_applied() {
        let db = Database::open_in_memory().unwrap();
        db.set_preference(DARK_MODE_KEY, "true").unwrap();

        let controller = ThemeController::load(&db, ClassList::new()).unwrap();
        assert!(controller.is_dark());
        assert!(controller.target().has_class(DARK_CLASS));
    }

    #[test]
    fn test_toggle_twice_restores() {
        let db = Database::open_in_memory().unwrap();
        let mut target = ClassList::new();
        target.add_class("font-sans");
        let mut controller = ThemeController::load(&db, target).unwrap();
        let before = controller.target().clone();

        assert!(controller.toggle(&db).unwrap());
        assert!(controller.target().has_class(DARK_CLASS));
        assert_eq!(db.get_preference(DARK_MODE_KEY).unwrap().as_deref(), Some("true"));

        assert!(!controller.toggle(&db).unwrap());
        assert_eq!(controller.target(), &before);
        assert_eq!(db.get_preference(DARK_MODE_KEY).unwrap().as_deref(), Some("false"));
        assert!(controller.target().has_class("font-sans"));
    }
}
