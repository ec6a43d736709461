//! Page routes and the landing page.

use std::fmt;

use serde::Serialize;

/// A page of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Landing page.
    Home,
    /// Add-school form.
    AddSchool,
    /// School listing.
    ShowSchools,
}

impl Route {
    /// Every route, in navigation order.
    pub const ALL: [Self; 3] = [Self::Home, Self::AddSchool, Self::ShowSchools];

    /// The URL path for this route.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::AddSchool => "/add-school",
            Self::ShowSchools => "/show-schools",
        }
    }

    /// Page title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "School Management System",
            Self::AddSchool => "Add New School",
            Self::ShowSchools => "All Schools",
        }
    }

    /// Line shown under the page title.
    #[must_use]
    pub const fn subtitle(self) -> &'static str {
        match self {
            Self::Home => LANDING_TAGLINE,
            Self::AddSchool => "Fill in the details to register a new school in the system.",
            Self::ShowSchools => "Browse and explore registered schools",
        }
    }

    /// Resolve a URL path. A trailing slash is ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|route| route.path() == normalized)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A navigation card on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LandingCard {
    /// Card heading.
    pub title: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Button caption.
    pub action: &'static str,
    /// Where the button leads.
    pub route: Route,
}

/// Text shown under the landing page title.
pub const LANDING_TAGLINE: &str = "Efficiently manage school information with our comprehensive \
     system. Add new schools and view existing ones with ease.";

/// The landing page's navigation cards.
pub const LANDING_CARDS: [LandingCard; 2] = [
    LandingCard {
        title: "Add School",
        description: "Register a new school with complete information including contact \
             details and images.",
        action: "Add New School",
        route: Route::AddSchool,
    },
    LandingCard {
        title: "View Schools",
        description: "Browse and explore all registered schools in an organized grid layout.",
        action: "View All Schools",
        route: Route::ShowSchools,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::AddSchool.path(), "/add-school");
        assert_eq!(Route::ShowSchools.path(), "/show-schools");
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/"), Some(Route::Home));
        assert_eq!(Route::from_path(""), Some(Route::Home));
        assert_eq!(Route::from_path("/add-school"), Some(Route::AddSchool));
        assert_eq!(Route::from_path("/show-schools/"), Some(Route::ShowSchools));
        assert_eq!(Route::from_path("/schools"), None);
    }

    #[test]
    fn test_round_trip_every_route() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn test_landing_cards_point_at_flows() {
        assert_eq!(LANDING_CARDS[0].route, Route::AddSchool);
        assert_eq!(LANDING_CARDS[1].route, Route::ShowSchools);
        assert!(LANDING_TAGLINE.contains("Add new schools"));
        assert!(!LANDING_CARDS[0].description.contains("  "));
    }

    #[test]
    fn test_page_headings() {
        assert_eq!(Route::ShowSchools.title(), "All Schools");
        assert_eq!(
            Route::ShowSchools.subtitle(),
            "Browse and explore registered schools"
        );
        assert_eq!(Route::AddSchool.title(), "Add New School");
        assert_eq!(Route::Home.subtitle(), LANDING_TAGLINE);
    }

    #[test]
    fn test_display_is_path() {
        assert_eq!(Route::AddSchool.to_string(), "/add-school");
    }
}
