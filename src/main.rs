//! TripPlanner demo
//!
//! Builds the application context, signs in with the demo account and walks
//! the trips tab the way the app would: list, search, trip details, first day.
//! An optional argument is used as the search query.

use anyhow::Context;
use tracing::{info, warn};

use trip_planner::{
    config::Settings,
    database::{DEMO_EMAIL, DEMO_PASSWORD},
    navigation::{RootRouter, RootState},
    screens::trips::{
        day::activity_time_label, list::EMPTY_TITLE, DayDetailsScreen, TripDetailsScreen, TripsListScreen,
    },
    state::AppContext,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}", trip_planner::info());

    let (ctx, seeded) = AppContext::build(settings).await?;
    if let Some(summary) = &seeded {
        info!(trips = summary.trip_ids.len(), user = %summary.demo_user.email, "Demo data loaded");
    } else {
        warn!("Demo data disabled, the trips list will be empty");
    }

    let mut router = RootRouter::new(ctx.session.subscribe(), &ctx.settings.app.deep_link_scheme);
    ctx.session.initialize().await?;
    router.sync();

    if matches!(router.state(), RootState::Auth(_)) {
        ctx.session.login(DEMO_EMAIL, DEMO_PASSWORD).await?;
        router.sync();
    }
    info!(state = router.state().name(), "Navigator ready");

    let mut list = TripsListScreen::new(ctx.clone());
    list.load().await?;
    if let Some(query) = std::env::args().nth(1) {
        list.set_search_query(&query);
    }

    println!("{}", list.title());
    let cards = list.cards();
    if cards.is_empty() {
        let hint = list.empty_message().unwrap_or_default();
        println!("  {}: {}", EMPTY_TITLE, hint);
        return Ok(());
    }
    for card in &cards {
        println!(
            "  {} | {} | {} | {} | {}",
            card.title,
            card.destination,
            card.date_range,
            card.state.as_str(),
            card.collaborators
        );
    }

    let first = &cards[0];
    router.apply_trips(list.open_trip(&first.id));

    let mut details = TripDetailsScreen::new(ctx.clone(), &first.id);
    details.load().await?;
    for day in details.day_cards() {
        println!(
            "    {} ({}): {}, {}",
            day.label,
            day.date,
            day.activity_summary(),
            day.accommodation_summary()
        );
    }

    let mut day = DayDetailsScreen::new(ctx.clone(), &first.id, 0);
    day.load().await?;
    println!("  {} - {}", day.title(), day.date_label().unwrap_or_default());
    for activity in day.activities() {
        match activity_time_label(activity) {
            Some(time) => println!("    {} at {}", activity.name, time),
            None => println!("    {}", activity.name),
        }
    }

    if let Some(tabs) = router.main() {
        info!(screen = tabs.title(), depth = tabs.trips().depth(), "Demo finished");
    }
    ctx.session.logout().await?;
    Ok(())
}
