use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    /// Popular games. Selecting it shows the whole catalogue.
    #[default]
    Pop,
    Slots,
    Table,
    Live,
    Jackpot,
}

impl CategoryId {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryId::Pop => "pop",
            CategoryId::Slots => "slots",
            CategoryId::Table => "table",
            CategoryId::Live => "live",
            CategoryId::Jackpot => "jackpot",
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pop" => Ok(CategoryId::Pop),
            "slots" => Ok(CategoryId::Slots),
            "table" => Ok(CategoryId::Table),
            "live" => Ok(CategoryId::Live),
            "jackpot" => Ok(CategoryId::Jackpot),
            other => Err(format!("Category '{}' not supported", other)),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub label: &'static str,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Game {
    pub id: &'static str,
    pub title: &'static str,
    pub category: CategoryId,
    pub provider: &'static str,
    /// Return to player, in percent. Display only.
    pub rtp: f32,
    pub volatility: &'static str,
    pub image: &'static str,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Promotion {
    pub id: u32,
    pub title: &'static str,
    pub text: &'static str,
}

/// The closed set of pages the site can show.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    #[default]
    Home,
    Casino,
    Promos,
    Dashboard,
    Login,
    Register,
    Deposit,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::Casino,
        Route::Promos,
        Route::Dashboard,
        Route::Login,
        Route::Register,
        Route::Deposit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Casino => "casino",
            Route::Promos => "promos",
            Route::Dashboard => "dashboard",
            Route::Login => "login",
            Route::Register => "register",
            Route::Deposit => "deposit",
        }
    }

    /// URL path serving this route.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Casino => "/casino",
            Route::Promos => "/promos",
            Route::Dashboard => "/dashboard",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Deposit => "/deposit",
        }
    }

    /// Login and register render as a modal dialog.
    pub fn is_auth(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::ALL
            .into_iter()
            .find(|route| route.as_str() == s)
            .ok_or_else(|| format!("Unknown route '{}'", s))
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

/// Stored once the visitor accepts essential cookies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieConsent {
    pub essential: bool,
    pub at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_round_trips_through_name() {
        for route in Route::ALL {
            assert_eq!(route.as_str().parse::<Route>().unwrap(), route);
        }
        assert!("lobby".parse::<Route>().is_err());
    }

    #[test]
    fn test_only_login_and_register_are_auth_routes() {
        let auth: Vec<Route> = Route::ALL.into_iter().filter(Route::is_auth).collect();
        assert_eq!(auth, vec![Route::Login, Route::Register]);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&CategoryId::Jackpot).unwrap();
        assert_eq!(json, "\"jackpot\"");
        assert_eq!("slots".parse::<CategoryId>().unwrap(), CategoryId::Slots);
        assert!("SLOTS".parse::<CategoryId>().is_err());
    }

    #[test]
    fn test_theme_defaults_to_dark_and_toggles() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }
}
