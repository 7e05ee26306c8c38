// Navigation state management.
// Handles the drill-down stack and breadcrumb trail for the archive tab.

use crate::archive::month_name;

/// A node in the navigation breadcrumb trail.
#[derive(Debug, Clone)]
pub struct BreadcrumbNode {
    /// Display label for the breadcrumb.
    pub label: String,
}

/// The current view level in the archive hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewLevel {
    /// Top level: years with posts
    Years,
    /// Months with posts in a year
    Months { year: i32 },
    /// Posts published in one month
    Posts { year: i32, month: u32 },
}

impl ViewLevel {
    /// Get the display title for this view level.
    pub fn title(&self) -> String {
        match self {
            ViewLevel::Years => "Archive".to_string(),
            ViewLevel::Months { year } => format!("{}", year),
            ViewLevel::Posts { year, month } => format!("{} {}", month_name(*month), year),
        }
    }

    /// Create a breadcrumb node for this view level.
    pub fn to_breadcrumb(&self) -> BreadcrumbNode {
        let label = match self {
            ViewLevel::Years => "Archive".to_string(),
            ViewLevel::Months { year } => year.to_string(),
            ViewLevel::Posts { month, .. } => month_name(*month).to_string(),
        };
        BreadcrumbNode { label }
    }
}

/// Navigation stack for the archive tab.
#[derive(Debug, Clone)]
pub struct NavigationStack {
    /// Bottom = root, top = current. Never empty.
    root: ViewLevel,
    stack: Vec<ViewLevel>,
}

impl NavigationStack {
    /// Create a new navigation stack starting at the given level.
    pub fn new(root: ViewLevel) -> Self {
        Self {
            root,
            stack: Vec::new(),
        }
    }

    /// Get the current view level.
    pub fn current(&self) -> &ViewLevel {
        self.stack.last().unwrap_or(&self.root)
    }

    /// Push a new view level onto the stack (drill down).
    pub fn push(&mut self, level: ViewLevel) {
        self.stack.push(level);
    }

    /// Pop the current view level (go back). Returns false if at root.
    pub fn pop(&mut self) -> bool {
        self.stack.pop().is_some()
    }

    /// Get the breadcrumb trail.
    pub fn breadcrumbs(&self) -> Vec<BreadcrumbNode> {
        std::iter::once(&self.root)
            .chain(self.stack.iter())
            .map(ViewLevel::to_breadcrumb)
            .collect()
    }

    /// Reset to root level.
    pub fn reset(&mut self) {
        self.stack.clear();
    }
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self::new(ViewLevel::Years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_stack() {
        let mut nav = NavigationStack::default();
        assert_eq!(nav.current(), &ViewLevel::Years);

        nav.push(ViewLevel::Months { year: 2023 });
        assert_eq!(nav.breadcrumbs().len(), 2);

        nav.push(ViewLevel::Posts {
            year: 2023,
            month: 11,
        });
        assert_eq!(nav.breadcrumbs().len(), 3);
        assert_eq!(nav.current().title(), "November 2023");

        assert!(nav.pop());
        assert_eq!(nav.current(), &ViewLevel::Months { year: 2023 });

        assert!(nav.pop());
        assert_eq!(nav.current(), &ViewLevel::Years);

        // Can't pop past root
        assert!(!nav.pop());
        assert_eq!(nav.current().title(), "Archive");
    }

    #[test]
    fn test_breadcrumbs() {
        let mut nav = NavigationStack::default();
        nav.push(ViewLevel::Months { year: 2024 });
        nav.push(ViewLevel::Posts {
            year: 2024,
            month: 2,
        });

        let labels: Vec<String> = nav.breadcrumbs().into_iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["Archive", "2024", "February"]);

        nav.reset();
        assert_eq!(nav.breadcrumbs().len(), 1);
    }
}
