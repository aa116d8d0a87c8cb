//! Share trip screen

use crate::navigation::{NavAction, TripsRoute};
use crate::screens::{LoadState, ScreenLifetime};
use crate::services::trip::SharePayload;
use crate::state::AppContext;
use crate::utils::errors::Result;

#[derive(Debug)]
pub struct ShareTripScreen {
    ctx: AppContext,
    trip_id: String,
    lifetime: ScreenLifetime,
    payload: LoadState<SharePayload>,
}

impl ShareTripScreen {
    pub fn new(ctx: AppContext, trip_id: &str) -> Self {
        Self {
            ctx,
            trip_id: trip_id.to_string(),
            lifetime: ScreenLifetime::new(),
            payload: LoadState::Idle,
        }
    }

    pub fn state(&self) -> &LoadState<SharePayload> {
        &self.payload
    }

    pub fn lifetime(&self) -> &ScreenLifetime {
        &self.lifetime
    }

    pub async fn load(&mut self) -> Result<()> {
        let user = self.ctx.session.require_user()?;
        self.payload = LoadState::Loading;
        let result = self
            .lifetime
            .guard(self.ctx.services.trip_service.share_payload(&user.id, &self.trip_id))
            .await;
        self.payload.settle("share_payload", result)
    }

    /// Message followed by the link, as pasted into a chat
    pub fn share_text(&self) -> Option<String> {
        self.payload
            .data()
            .map(|p| format!("{}\n{}", p.message, p.url))
    }

    pub fn link(&self) -> Option<&str> {
        self.payload.data().map(|p| p.url.as_str())
    }

    pub fn done(&self) -> NavAction<TripsRoute> {
        NavAction::GoBack
    }

    pub fn unmount(&self) {
        self.lifetime.unmount();
    }
}
