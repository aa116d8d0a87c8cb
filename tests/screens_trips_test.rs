//! Trips tab screens: list, create, edit, details, day and item screens,
//! collaborators and sharing

mod helpers;

use assert_matches::assert_matches;
use helpers::*;
use trip_planner::models::{TripState, User};
use trip_planner::navigation::{MainTab, NavAction, RootRouter, TripsRoute};
use trip_planner::screens::trips::list::{EMPTY_LIST_HINT, EMPTY_SEARCH_HINT};
use trip_planner::screens::trips::{
    AccommodationDetailsScreen, ActivityDetailsScreen, AddActivityScreen, CreateTripScreen, DayDetailsScreen,
    EditTripScreen, ManageCollaboratorsScreen, ShareTripScreen, TripDetailsScreen, TripsListScreen,
};
use trip_planner::TripPlannerError;

async fn owner_with_trip() -> (TestContext, User, String) {
    let ctx = TestContext::new();
    let owner = ctx.signed_in("Owner", OWNER_EMAIL).await;
    let trip = ctx.create_trip(&owner, "Summer in Rome", "Rome, Italy").await;
    (ctx, owner, trip.id)
}

#[tokio::test]
async fn test_trips_list_search_filters_title_and_destination() {
    let (ctx, owner, _) = owner_with_trip().await;
    ctx.create_trip(&owner, "Barcelona Weekend", "Barcelona, Spain").await;

    let mut list = TripsListScreen::new(ctx.app.clone());
    list.load().await.expect("load trips");
    assert_eq!(list.cards().len(), 2);
    assert_eq!(list.empty_message(), None);

    list.set_search_query("rom");
    let titles: Vec<String> = list.cards().into_iter().map(|c| c.title).collect();
    assert_eq!(titles, vec!["Summer in Rome".to_string()]);

    list.set_search_query("SPAIN");
    assert_eq!(list.cards()[0].title, "Barcelona Weekend");
    assert_eq!(list.cards()[0].collaborators, "Just you");

    // The query is matched as typed, so padding narrows the results
    list.set_search_query("  ");
    assert!(list.cards().is_empty());
    assert_eq!(list.empty_message(), Some(EMPTY_SEARCH_HINT));

    list.set_search_query("tokyo");
    assert!(list.cards().is_empty());
    assert_eq!(list.empty_message(), Some(EMPTY_SEARCH_HINT));
}

#[tokio::test]
async fn test_empty_trips_list_suggests_creating_one() {
    let ctx = TestContext::new();
    ctx.signed_in("Owner", OWNER_EMAIL).await;

    let mut list = TripsListScreen::new(ctx.app.clone());
    assert_eq!(list.empty_message(), None);
    list.load().await.unwrap();
    assert_eq!(list.empty_message(), Some(EMPTY_LIST_HINT));
    assert_eq!(list.create_trip(), NavAction::Navigate(TripsRoute::CreateTrip));
}

#[tokio::test]
async fn test_create_trip_screen_validates_then_replaces_itself() {
    let ctx = TestContext::new();
    ctx.signed_in("Owner", OWNER_EMAIL).await;
    let mut list = TripsListScreen::new(ctx.app.clone());
    list.load().await.unwrap();

    let mut create = CreateTripScreen::starting_on(ctx.app.clone(), date(2023, 7, 15));
    assert_eq!(create.form.cover_images().len(), 6);
    let cover = create.form.cover_images()[0];
    create.form.select_cover_image(cover);
    create.form.clear_cover_image();
    assert_eq!(create.form.cover_image(), None);
    assert_matches!(create.submit().await, Err(TripPlannerError::Validation(_)));
    assert_eq!(create.submit.error.as_deref(), Some("Please enter a trip title"));

    create.form.title = "Summer in Rome".to_string();
    create.form.destination = "Rome, Italy".to_string();
    create.form.budget = "a lot".to_string();
    create.submit().await.unwrap_err();
    assert_eq!(create.submit.error.as_deref(), Some("Please enter a valid budget"));

    create.form.budget = "1500".to_string();
    create.form.set_end_date(date(2023, 7, 17));
    let action = create.submit().await.expect("create trip");
    let trip = create.created().expect("created trip").clone();
    assert_eq!(trip.budget, Some(1500.0));
    assert_eq!(trip.state, TripState::InCreation);
    assert_eq!(
        action,
        NavAction::Replace(TripsRoute::TripDetails {
            trip_id: trip.id.clone()
        })
    );

    // The list picks the new trip up from the store
    assert!(list.sync_with_store().await);
    assert_eq!(list.cards().len(), 1);
}

#[tokio::test]
async fn test_create_then_details_replaces_form_on_stack() {
    let ctx = TestContext::new();
    let mut router = RootRouter::new(ctx.app.session.subscribe(), &ctx.app.settings.app.deep_link_scheme);
    ctx.signed_in("Owner", OWNER_EMAIL).await;
    router.sync();

    let list = TripsListScreen::new(ctx.app.clone());
    router.apply_trips(list.create_trip());

    let mut create = CreateTripScreen::starting_on(ctx.app.clone(), date(2023, 7, 15));
    create.form.title = "Summer in Rome".to_string();
    create.form.destination = "Rome, Italy".to_string();
    router.apply_trips(create.submit().await.unwrap());

    let trips = router.main().unwrap().trips();
    assert_eq!(trips.depth(), 2);
    assert_matches!(trips.current(), TripsRoute::TripDetails { .. });
    assert!(!trips.contains(&TripsRoute::CreateTrip));
    assert_eq!(router.main().unwrap().active(), MainTab::Trips);
}

#[tokio::test]
async fn test_edit_trip_screen_prefills_and_saves() {
    let (ctx, _, trip_id) = owner_with_trip().await;

    let mut edit = EditTripScreen::new(ctx.app.clone(), &trip_id);
    assert!(edit.form.is_none());
    edit.load().await.expect("load trip");

    let form = edit.form.as_mut().expect("form filled");
    assert_eq!(form.title, "Summer in Rome");
    assert_eq!(form.day_count(), 3);
    form.title = "Roman Holiday".to_string();
    form.set_end_date(date(2023, 7, 18));

    let action = edit.submit().await.expect("save");
    assert_eq!(
        action,
        NavAction::Navigate(TripsRoute::TripDetails {
            trip_id: trip_id.clone()
        })
    );
    let stored = ctx.app.store.trip(&trip_id).await.unwrap();
    assert_eq!(stored.title, "Roman Holiday");
    assert_eq!(stored.end_date, date(2023, 7, 18));
}

#[tokio::test]
async fn test_trip_details_shows_days_and_menu() {
    let (ctx, owner, trip_id) = owner_with_trip().await;
    ctx.app
        .services
        .itinerary_service
        .add_activity(&owner.id, &trip_id, 1, activity_request("Vatican", Some(10)))
        .await
        .unwrap();

    let mut details = TripDetailsScreen::new(ctx.app.clone(), &trip_id);
    details.load().await.expect("load trip");
    let cards = details.day_cards();
    assert_eq!(cards.len(), 3);
    assert_eq!(cards[0].label, "Day 1");
    assert_eq!(cards[1].activity_count, 1);
    assert!(!cards[1].has_accommodation);
    assert!(details.is_owner());

    details.open_menu();
    assert!(details.menu_visible());
    assert_eq!(
        details.share(),
        NavAction::Navigate(TripsRoute::ShareTrip {
            trip_id: trip_id.clone()
        })
    );
    assert!(!details.menu_visible());
    details.open_menu();
    details.close_menu();
    assert!(!details.menu_visible());
    assert_eq!(
        details.manage_collaborators(),
        NavAction::Navigate(TripsRoute::ManageCollaborators {
            trip_id: trip_id.clone()
        })
    );
    assert_eq!(
        details.open_day(2),
        NavAction::Navigate(TripsRoute::DayDetails {
            trip_id: trip_id.clone(),
            day_index: 2
        })
    );

    assert_eq!(details.advance_state().await.unwrap(), TripState::WaitingToStart);
    assert_eq!(details.trip().unwrap().state, TripState::WaitingToStart);
}

#[tokio::test]
async fn test_deleting_trip_from_details_goes_back() {
    let (ctx, _, trip_id) = owner_with_trip().await;
    let mut router = RootRouter::new(ctx.app.session.subscribe(), &ctx.app.settings.app.deep_link_scheme);
    router.sync();
    let mut events = ctx.app.store.subscribe();

    let mut details = TripDetailsScreen::new(ctx.app.clone(), &trip_id);
    details.load().await.unwrap();
    router.apply_trips(NavAction::Navigate(TripsRoute::TripDetails {
        trip_id: trip_id.clone(),
    }));

    details.request_delete();
    assert!(details.delete_dialog_visible());
    details.cancel_delete();
    assert!(!details.delete_dialog_visible());

    details.request_delete();
    let action = details.confirm_delete().await.expect("delete");
    assert_eq!(action, NavAction::GoBack);
    assert!(ctx.app.store.trip(&trip_id).await.is_none());

    while let Ok(event) = events.try_recv() {
        router.handle_store_event(&event);
    }
    assert_eq!(*router.main().unwrap().trips().current(), TripsRoute::TripsList);

    // A screen still showing the trip notices it is gone
    assert!(details.sync_with_store().await);
    assert_eq!(details.state().error(), Some("This trip no longer exists"));
}

#[tokio::test]
async fn test_day_screen_follows_changes_from_item_screens() {
    let (ctx, _, trip_id) = owner_with_trip().await;

    let mut day = DayDetailsScreen::new(ctx.app.clone(), &trip_id, 0);
    day.load().await.expect("load day");
    assert_eq!(day.title(), "Day 1");
    assert!(day.activities().is_empty());
    day.sync_with_store().await;

    let mut add = AddActivityScreen::new(ctx.app.clone(), &trip_id, 0);
    add.form.name = "Colosseum".to_string();
    add.submit().await.unwrap_err();
    assert_eq!(add.submit.error.as_deref(), Some("Please enter valid coordinates"));
    add.form.set_location(41.8902, 12.4922);
    assert_eq!(add.submit().await.expect("add activity"), NavAction::GoBack);

    assert!(day.sync_with_store().await);
    let activity_id = day.activities()[0].id.clone();
    assert_eq!(day.stats().activities, 1);
    assert_eq!(
        day.open_activity(&activity_id),
        NavAction::Navigate(TripsRoute::ActivityDetails {
            trip_id: trip_id.clone(),
            day_index: 0,
            activity_id: activity_id.clone()
        })
    );

    let mut details = ActivityDetailsScreen::new(ctx.app.clone(), &trip_id, 0, &activity_id);
    details.load().await.expect("load activity");
    assert!(details.toggle_vote().await.unwrap());
    assert!(details.has_voted());

    assert!(day.sync_with_store().await);
    assert_eq!(day.activities()[0].vote_count(), 1);
}

#[tokio::test]
async fn test_day_screen_transportation() {
    let (ctx, _, trip_id) = owner_with_trip().await;
    let mut day = DayDetailsScreen::new(ctx.app.clone(), &trip_id, 1);
    day.load().await.unwrap();

    day.transport_kind = "  ".to_string();
    day.save_transportation().await.unwrap_err();
    assert_eq!(day.action.error.as_deref(), Some("Please enter a transportation type"));

    day.transport_kind = "train".to_string();
    day.transport_details = "Frecciarossa 9:05".to_string();
    let saved = day.save_transportation().await.expect("save");
    assert_eq!(saved.details.as_deref(), Some("Frecciarossa 9:05"));
    assert!(day.stats().has_transportation);

    assert!(day.clear_transportation().await.unwrap());
    assert!(day.transportation().is_none());
    assert!(day.transport_kind.is_empty());
}

#[tokio::test]
async fn test_activity_details_edit_comment_delete() {
    let (ctx, owner, trip_id) = owner_with_trip().await;
    let activity = ctx
        .app
        .services
        .itinerary_service
        .add_activity(&owner.id, &trip_id, 0, activity_request("Colosseum", Some(9)))
        .await
        .unwrap();

    let mut screen = ActivityDetailsScreen::new(ctx.app.clone(), &trip_id, 0, &activity.id);
    screen.load().await.unwrap();

    screen.post_comment().await.unwrap_err();
    assert_eq!(screen.comments.submit.error.as_deref(), Some("Please enter a comment"));
    screen.comments.draft = "Book tickets early".to_string();
    screen.post_comment().await.expect("post comment");
    assert!(screen.comments.draft.is_empty());
    let comment = screen.comments.comments()[0].clone();
    assert!(screen.comments.can_delete(&comment, &owner.id, false));
    assert!(!screen.comments.can_delete(&comment, "someone-else", false));
    let comment_id = comment.id;

    screen.start_editing();
    screen.cancel_editing();
    assert!(screen.editing.is_none());
    screen.start_editing();
    screen.editing.as_mut().unwrap().name = "Colosseum at night".to_string();
    screen.save_changes().await.expect("save");
    assert!(screen.editing.is_none());
    assert_eq!(screen.state().data().unwrap().name, "Colosseum at night");

    screen.delete_comment(&comment_id).await.unwrap();
    assert!(screen.comments.comments().is_empty());

    assert_eq!(screen.delete().await.unwrap(), NavAction::GoBack);
    assert!(ctx.app.store.activity(&activity.id).await.is_none());
}

#[tokio::test]
async fn test_accommodation_details_toggle_selection() {
    let (ctx, owner, trip_id) = owner_with_trip().await;
    let hotel = ctx
        .app
        .services
        .itinerary_service
        .add_accommodation(&owner.id, &trip_id, 0, accommodation_request("Hotel Artemide"))
        .await
        .unwrap();

    let mut screen = AccommodationDetailsScreen::new(ctx.app.clone(), &trip_id, 0, &hotel.id);
    screen.load().await.unwrap();
    assert!(!screen.is_selected());

    assert!(screen.toggle_selection().await.unwrap());
    assert!(ctx.app.store.accommodation(&hotel.id).await.unwrap().is_selected);
    assert!(!screen.toggle_selection().await.unwrap());
    assert!(!screen.is_selected());
}

#[tokio::test]
async fn test_accommodation_on_another_day_is_not_found() {
    let (ctx, owner, trip_id) = owner_with_trip().await;
    let hotel = ctx
        .app
        .services
        .itinerary_service
        .add_accommodation(&owner.id, &trip_id, 0, accommodation_request("Hotel Artemide"))
        .await
        .unwrap();

    let mut screen = AccommodationDetailsScreen::new(ctx.app.clone(), &trip_id, 1, &hotel.id);
    assert_matches!(
        screen.load().await,
        Err(TripPlannerError::AccommodationNotFound { .. })
    );
    assert!(screen.state().error().is_some());
}

#[tokio::test]
async fn test_manage_collaborators_invite_and_remove() {
    let (ctx, _, trip_id) = owner_with_trip().await;
    let friend = ctx.register("Friend", FRIEND_EMAIL).await;

    let mut screen = ManageCollaboratorsScreen::new(ctx.app.clone(), &trip_id);
    screen.load().await.unwrap();
    assert_eq!(screen.members().len(), 1);
    assert!(screen.is_owner());

    screen.invite_email = "friend".to_string();
    assert_matches!(screen.invite().await, Err(TripPlannerError::Validation(_)));
    assert_eq!(screen.submit.error.as_deref(), Some("Please enter a valid email"));

    screen.invite_email = format!(" {} ", FRIEND_EMAIL);
    let invited = screen.invite().await.expect("invite");
    assert_eq!(invited.id, friend.id);
    assert_eq!(
        screen.submit.success.as_deref(),
        Some("Friend can now plan this trip with you")
    );
    assert!(screen.invite_email.is_empty());
    assert_eq!(screen.members().len(), 2);

    screen.remove(&friend.id).await.expect("remove");
    assert_eq!(screen.members().len(), 1);
    let trip = ctx.app.store.trip(&trip_id).await.unwrap();
    assert!(trip.collaborators.is_empty());
}

#[tokio::test]
async fn test_collaborator_leaves_from_their_device() {
    let (ctx, owner, trip_id) = owner_with_trip().await;
    ctx.register("Friend", FRIEND_EMAIL).await;
    ctx.app
        .services
        .trip_service
        .add_collaborator(&owner.id, &trip_id, FRIEND_EMAIL)
        .await
        .unwrap();

    let friend_app = ctx.second_device();
    friend_app.session.login(FRIEND_EMAIL, TEST_PASSWORD).await.unwrap();

    let mut screen = ManageCollaboratorsScreen::new(friend_app.clone(), &trip_id);
    screen.load().await.unwrap();
    assert!(!screen.is_owner());
    assert_eq!(screen.leave().await.expect("leave"), NavAction::PopToRoot);

    let mut list = TripsListScreen::new(friend_app.clone());
    list.load().await.unwrap();
    assert!(list.cards().is_empty());
}

#[tokio::test]
async fn test_share_screen_text_and_link() {
    let (ctx, _, trip_id) = owner_with_trip().await;
    let mut share = ShareTripScreen::new(ctx.app.clone(), &trip_id);
    assert_eq!(share.share_text(), None);

    share.load().await.expect("share payload");
    let link = format!("tripplanner://trips/{}", trip_id);
    assert_eq!(share.link(), Some(link.as_str()));
    assert_eq!(
        share.share_text(),
        Some(format!(
            "Check out my trip to Rome, Italy from 7/15/2023 to 7/17/2023!\n{}",
            link
        ))
    );
    assert_eq!(share.done(), NavAction::GoBack);
}

#[tokio::test]
async fn test_unmounted_screen_does_not_load() {
    let (ctx, _, trip_id) = owner_with_trip().await;
    let mut details = TripDetailsScreen::new(ctx.app.clone(), &trip_id);
    details.unmount();

    assert_matches!(details.load().await, Err(TripPlannerError::Cancelled));
    assert!(details.state().is_loading());
    assert!(!details.lifetime().is_mounted());
}
