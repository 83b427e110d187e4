mod browse;
mod components;
mod layout;

pub use browse::{browse_page, BrowsePage};

/// Colour scheme of the browse page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Dark.
    #[default]
    Espresso,
    /// Light.
    Latte,
}

impl Theme {
    /// Unknown or missing values fall back to [`Theme::Espresso`].
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("latte") => Self::Latte,
            _ => Self::Espresso,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Espresso => "espresso",
            Self::Latte => "latte",
        }
    }

    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Espresso => Self::Latte,
            Self::Latte => Self::Espresso,
        }
    }
}
