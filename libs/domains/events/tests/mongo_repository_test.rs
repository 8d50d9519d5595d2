//! MongoDB repository tests against a throwaway container.
//!
//! Run with `cargo test -p domain_events -- --ignored` (needs Docker).

use domain_events::{
    CreateEvent, EventFilter, EventRepository, MongoEventRepository, MongoRegistrationRepository,
    RegistrationRepository, UpdateEvent,
};
use mongodb::bson::oid::ObjectId;
use test_utils::{TestDataBuilder, TestMongo};

fn payload(name: &str) -> CreateEvent {
    CreateEvent {
        name: name.to_string(),
        location: "Community hall".to_string(),
        coordinates: [13.405, 52.52],
        game_type: "Battleship".to_string(),
        date: "2026-12-05T18:00:00Z".to_string(),
        participants: Some(2),
        description: Some("Bring snacks".to_string()),
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_event_crud_round_trip() {
    let mongo = TestMongo::new().await;
    let data = TestDataBuilder::from_test_name("test_event_crud_round_trip");
    let db = mongo.database(&data.database_name());
    let repo = MongoEventRepository::new(&db);
    repo.init_indexes().await.unwrap();

    let created = repo.create(payload(&data.name("event", "main"))).await.unwrap();
    let id = ObjectId::parse_str(&created.id).unwrap();

    let fetched = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let updated = repo
        .update(
            id,
            UpdateEvent {
                participants: Some(6),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.participants, Some(6));
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.created_at, created.created_at);

    let unchanged = repo.update(id, UpdateEvent::default()).await.unwrap().unwrap();
    assert_eq!(unchanged, updated);

    let deleted = repo.delete(id).await.unwrap().unwrap();
    assert_eq!(deleted.id, created.id);
    assert!(repo.find_by_id(id).await.unwrap().is_none());
    assert!(repo.delete(id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_by_game_type() {
    let mongo = TestMongo::new().await;
    let data = TestDataBuilder::from_test_name("test_find_by_game_type");
    let db = mongo.database(&data.database_name());
    let repo = MongoEventRepository::new(&db);

    repo.create(payload("a")).await.unwrap();
    let mut chess = payload("b");
    chess.game_type = "Chess".to_string();
    repo.create(chess).await.unwrap();

    let all = repo.find(EventFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let only_chess = repo
        .find(EventFilter {
            game_type: Some("Chess".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(only_chess.len(), 1);
    assert_eq!(only_chess[0].name, "b");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_registration_upsert_is_idempotent() {
    let mongo = TestMongo::new().await;
    let data = TestDataBuilder::from_test_name("test_registration_upsert_is_idempotent");
    let db = mongo.database(&data.database_name());
    let repo = MongoRegistrationRepository::new(&db);
    repo.init_indexes().await.unwrap();

    let event_id = ObjectId::new();
    let email = data.email("player");

    let first = repo.register(event_id, &email, "Player").await.unwrap();
    let second = repo.register(event_id, &email, "Renamed").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second.name, "Player");

    repo.register(event_id, &data.email("other"), "Other").await.unwrap();
    let listed = repo.list_for_event(event_id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].joined_at <= listed[1].joined_at);
}
