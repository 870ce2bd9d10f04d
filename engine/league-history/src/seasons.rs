//! Year-by-year retrieval policy

use std::fmt;

/// First season the provider only serves with session cookies
pub const AUTH_REQUIRED_FROM: i32 = 2018;

/// First season with weekly box scores
pub const MATCHUPS_AVAILABLE_FROM: i32 = 2019;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRequirement {
    None,
    Required,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingAuth,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingAuth => write!(
                f,
                "ESPN authentication required for seasons {} and later",
                AUTH_REQUIRED_FROM
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonAction {
    Fetch { auth: AuthRequirement, matchups: bool },
    Skip(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonDecision {
    pub year: i32,
    pub action: SeasonAction,
}

/// Inclusive year range with the per-year fetch policy applied.
///
/// The plan is a plain value: `iter()` can be called any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonPlan {
    start_year: i32,
    end_year: i32,
    has_auth: bool,
}

impl SeasonPlan {
    /// `end_year` is clamped to `current_year`
    pub fn new(start_year: i32, end_year: i32, current_year: i32, has_auth: bool) -> Self {
        Self { start_year, end_year: end_year.min(current_year), has_auth }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Effective (clamped) last season
    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    pub fn is_empty(&self) -> bool {
        self.start_year > self.end_year
    }

    pub fn decide(&self, year: i32) -> SeasonDecision {
        let action = if year >= AUTH_REQUIRED_FROM && !self.has_auth {
            SeasonAction::Skip(SkipReason::MissingAuth)
        } else {
            let auth = if year >= AUTH_REQUIRED_FROM {
                AuthRequirement::Required
            } else {
                AuthRequirement::None
            };
            SeasonAction::Fetch { auth, matchups: year >= MATCHUPS_AVAILABLE_FROM }
        };
        SeasonDecision { year, action }
    }

    pub fn iter(&self) -> impl Iterator<Item = SeasonDecision> + '_ {
        (self.start_year..=self.end_year).map(move |year| self.decide(year))
    }
}
