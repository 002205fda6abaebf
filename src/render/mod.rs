//! Page rendering.
//!
//! # Data Flow
//! ```text
//! Page (template + ViewModel)
//!     → Accept: application/json → ViewModel as JSON
//!     → otherwise                 → html.rs (askama, templates/page.html)
//! ```
//!
//! The shell always carries navigation and, when present, the model's error
//! banner, so a degraded page is still a usable page.

pub mod html;

pub use html::render_html;

/// Templates, one per page route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Index,
    Teams,
    TeamDetail,
    TeamLineup,
    Players,
    PlayerDetail,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::Index => "index",
            Template::Teams => "teams",
            Template::TeamDetail => "team-detail",
            Template::TeamLineup => "team-lineup",
            Template::Players => "players",
            Template::PlayerDetail => "player-detail",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Template::Index => "Fantasy Football",
            Template::Teams => "Teams",
            Template::TeamDetail => "Team",
            Template::TeamLineup => "Lineup",
            Template::Players => "Players",
            Template::PlayerDetail => "Player",
        }
    }
}
