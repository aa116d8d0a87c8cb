//! Profile tab
//!
//! Account information, trip statistics and sign out.

use crate::models::User;
use crate::screens::{LoadState, ScreenLifetime, SubmitState};
use crate::services::trip::ProfileStats;
use crate::state::AppContext;
use crate::utils::errors::Result;
use crate::utils::helpers::format_long_date;

/// One labelled number in the statistics card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatItem {
    pub label: &'static str,
    pub value: usize,
}

pub fn stat_items(stats: &ProfileStats) -> Vec<StatItem> {
    vec![
        StatItem {
            label: "Trips Created",
            value: stats.trips_created,
        },
        StatItem {
            label: "Trip Collaborations",
            value: stats.collaborations,
        },
        StatItem {
            label: "Countries Visited",
            value: stats.countries_visited,
        },
    ]
}

#[derive(Debug)]
pub struct ProfileScreen {
    ctx: AppContext,
    lifetime: ScreenLifetime,
    stats: LoadState<ProfileStats>,
    pub sign_out: SubmitState,
}

impl ProfileScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            lifetime: ScreenLifetime::new(),
            stats: LoadState::Idle,
            sign_out: SubmitState::default(),
        }
    }

    pub fn title(&self) -> &'static str {
        "Profile"
    }

    pub fn lifetime(&self) -> &ScreenLifetime {
        &self.lifetime
    }

    pub fn user(&self) -> Option<User> {
        self.ctx.session.current_user()
    }

    /// "Member since Saturday, July 15, 2023"
    pub fn member_since(&self) -> Option<String> {
        self.user()
            .map(|u| format!("Member since {}", format_long_date(u.created_at.date_naive())))
    }

    pub fn state(&self) -> &LoadState<ProfileStats> {
        &self.stats
    }

    pub fn stat_items(&self) -> Vec<StatItem> {
        self.stats.data().map(stat_items).unwrap_or_default()
    }

    pub async fn load(&mut self) -> Result<()> {
        let user = self.ctx.session.require_user()?;
        self.stats = LoadState::Loading;
        let result = self
            .lifetime
            .guard(self.ctx.services.trip_service.profile_stats(&user.id))
            .await;
        self.stats.settle("profile_stats", result)
    }

    /// Sign out; the router switches to the auth flow on its own
    pub async fn logout(&mut self) -> Result<()> {
        self.sign_out.begin()?;
        let result = self.ctx.session.logout().await;
        self.sign_out.record("logout", &result);
        result?;
        self.sign_out.succeed(None);
        self.stats = LoadState::Idle;
        Ok(())
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}
