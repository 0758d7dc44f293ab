use std::{fmt, net::SocketAddr, sync::Arc};

use anyhow::Context;
use cucumber::{given, then, when, World as _};
use tempfile::TempDir;
use travellist::{
    config::AppConfig,
    models::trip::Trip,
    services::storage::{JsonTripStore, TripStore},
    state::AppState,
};

#[derive(Debug, cucumber::World, Default)]
struct AppWorld {
    state: Option<TestState>,
    current_trip_id: Option<String>,
    search_result: Option<Option<Trip>>,
    removal_accepted: Option<bool>,
}

impl AppWorld {
    fn app_state(&self) -> &AppState {
        self.state
            .as_ref()
            .expect("state must be initialised first")
            .app()
    }

    fn store(&self) -> &Arc<dyn TripStore> {
        &self.app_state().store
    }

    fn current_trip_id(&self) -> &str {
        self.current_trip_id
            .as_deref()
            .expect("a trip must be stored before this step")
    }

    async fn current_trip(&self) -> Trip {
        self.store()
            .find_one(self.current_trip_id())
            .await
            .expect("load trip")
            .expect("stored trip must exist")
    }
}

struct TestState {
    app: AppState,
    _root: TempDir,
}

impl fmt::Debug for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestState").finish()
    }
}

impl TestState {
    async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for bdd world")?;

        let config = AppConfig {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            data_root: root.path().to_path_buf(),
            cookie_secret: "bdd-cookie-secret".into(),
        };

        let store = JsonTripStore::new(config.data_root.clone());
        store.ensure_structure().await?;

        let app = AppState::new(config, Arc::new(store));
        Ok(Self { app, _root: root })
    }

    fn app(&self) -> &AppState {
        &self.app
    }
}

#[given("a fresh application state")]
async fn given_fresh_state(world: &mut AppWorld) {
    world.state = Some(TestState::new().await.expect("state"));
    world.current_trip_id = None;
    world.search_result = None;
    world.removal_accepted = None;
}

#[given(regex = r#"^a stored trip \"([^\"]+)\" in \"([^\"]+)\", \"([^\"]+)\"$"#)]
#[when(regex = r#"^I add a trip \"([^\"]+)\" in \"([^\"]+)\", \"([^\"]+)\"$"#)]
async fn add_trip(world: &mut AppWorld, attraction: String, city: String, country: String) {
    let trip = Trip::new(attraction, city, country);
    world.store().insert(&trip).await.expect("insert trip");
    world.current_trip_id = Some(trip.id);
}

#[then(regex = r#"^the stored trip shows \"([^\"]+)\" in \"([^\"]+)\", \"([^\"]+)\"$"#)]
async fn then_trip_fields(world: &mut AppWorld, attraction: String, city: String, country: String) {
    let trip = world.current_trip().await;
    assert_eq!(trip.attraction, attraction);
    assert_eq!(trip.city, city);
    assert_eq!(trip.country, country);
}

#[then("the stored trip has all fields at their defaults")]
async fn then_trip_defaults(world: &mut AppWorld) {
    let trip = world.current_trip().await;
    assert_eq!(trip.rating, 0);
    assert!(trip.travel_days.is_empty());
    assert!(trip.best_season.is_empty());
    assert!(trip.comments.is_empty());
    assert!(trip.tags.is_empty());
    assert!(trip.description.is_none());
    assert!(trip.video_link.is_none());
}

#[when(regex = r#"^I update the stored trip with tag \"([^\"]+)\" and description \"([^\"]+)\"$"#)]
async fn when_edit_trip(world: &mut AppWorld, tag: String, description: String) {
    let mut trip = world.current_trip().await;
    trip.tags = vec![tag];
    trip.travel_days = vec!["3".into(), "4".into()];
    trip.best_season = vec!["Spring".into()];
    trip.description = Some(description);
    let id = trip.id.clone();
    world.store().replace(&id, &trip).await.expect("replace trip");
}

#[then(regex = r#"^the stored trip has tag \"([^\"]+)\" and description \"([^\"]+)\"$"#)]
async fn then_trip_edited(world: &mut AppWorld, tag: String, description: String) {
    let trip = world.current_trip().await;
    assert_eq!(trip.tags, vec![tag]);
    assert_eq!(trip.description.as_deref(), Some(description.as_str()));
}

#[when("I delete the stored trip")]
async fn when_delete_trip(world: &mut AppWorld) {
    let id = world.current_trip_id().to_string();
    let deleted = world.store().delete(&id).await.expect("delete trip");
    assert!(deleted, "trip should have existed before deletion");
}

#[when("I delete a trip id that does not exist")]
async fn when_delete_missing(world: &mut AppWorld) {
    let deleted = world
        .store()
        .delete("0123456789abcdef0123456789abcdef")
        .await
        .expect("delete call");
    assert!(!deleted, "missing id must report false, not an error");
}

#[then("fetching the stored trip yields nothing")]
async fn then_trip_gone(world: &mut AppWorld) {
    let id = world.current_trip_id().to_string();
    let found = world.store().find_one(&id).await.expect("find_one");
    assert!(found.is_none());
}

#[when(regex = r#"^I search for \"([^\"]+)\"$"#)]
async fn when_search(world: &mut AppWorld, query: String) {
    let hit = world.store().search(&query).await.expect("search");
    world.search_result = Some(hit);
}

#[then(regex = r#"^the search finds \"([^\"]+)\"$"#)]
async fn then_search_hit(world: &mut AppWorld, attraction: String) {
    let result = world
        .search_result
        .as_ref()
        .expect("a search must have run");
    let trip = result.as_ref().expect("search should have found a trip");
    assert_eq!(trip.attraction, attraction);
}

#[then("the search finds no trip")]
async fn then_search_miss(world: &mut AppWorld) {
    let result = world
        .search_result
        .as_ref()
        .expect("a search must have run");
    assert!(result.is_none());
}

#[when(regex = r#"^I comment \"([^\"]+)\" on the stored trip$"#)]
async fn when_comment(world: &mut AppWorld, content: String) {
    let mut trip = world.current_trip().await;
    trip.add_comment(content);
    let id = trip.id.clone();
    world.store().replace(&id, &trip).await.expect("replace trip");
}

#[then(regex = r"^the stored trip has (\d+) comments?$")]
async fn then_comment_count(world: &mut AppWorld, expected: usize) {
    let trip = world.current_trip().await;
    assert_eq!(trip.comments.len(), expected);
}

#[then(regex = r#"^comment (\d+) reads \"([^\"]+)\"$"#)]
async fn then_comment_content(world: &mut AppWorld, index: usize, content: String) {
    let trip = world.current_trip().await;
    assert_eq!(trip.comments[index].content, content);
}

#[then("the latest comment carries a well-formed timestamp")]
async fn then_comment_timestamp(world: &mut AppWorld) {
    let trip = world.current_trip().await;
    let latest = trip.comments.last().expect("at least one comment expected");
    assert!(
        chrono::NaiveDateTime::parse_from_str(&latest.timestamp, "%Y-%m-%d %H:%M:%S").is_ok(),
        "timestamp {:?} must match YYYY-MM-DD HH:MM:SS",
        latest.timestamp
    );
}

#[when(regex = r"^I remove comment (\d+) from the stored trip$")]
async fn when_remove_comment(world: &mut AppWorld, index: usize) {
    let mut trip = world.current_trip().await;
    let accepted = trip.remove_comment(index);
    if accepted {
        let id = trip.id.clone();
        world.store().replace(&id, &trip).await.expect("replace trip");
    }
    world.removal_accepted = Some(accepted);
}

#[then("the removal is rejected")]
async fn then_removal_rejected(world: &mut AppWorld) {
    assert_eq!(world.removal_accepted, Some(false));
}

#[when(regex = r"^I rate the stored trip (-?\d+)$")]
async fn when_rate(world: &mut AppWorld, rating: i32) {
    let mut trip = world.current_trip().await;
    trip.set_rating(rating);
    let id = trip.id.clone();
    world.store().replace(&id, &trip).await.expect("replace trip");
}

#[then(regex = r"^the stored trip has rating (\d+)$")]
async fn then_rating(world: &mut AppWorld, expected: i32) {
    let trip = world.current_trip().await;
    assert_eq!(trip.rating, expected);
}

#[then(regex = r#"^the stored trip still shows \"([^\"]+)\" with rating (\d+)$"#)]
async fn then_identity_preserved(world: &mut AppWorld, attraction: String, rating: i32) {
    let trip = world.current_trip().await;
    assert_eq!(trip.attraction, attraction);
    assert_eq!(trip.rating, rating);
}

#[tokio::main]
async fn main() {
    AppWorld::cucumber()
        .fail_on_skipped()
        .with_default_cli()
        .run("tests/features")
        .await;
}
