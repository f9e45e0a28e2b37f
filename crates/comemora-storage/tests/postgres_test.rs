// PostgreSQL repository tests
//
// Need a running database:
//   DATABASE_URL=postgres://... cargo test --test postgres_test -- --ignored

use comemora_core::{Event, EventType};
use comemora_storage::{Database, SaveEventRow};

async fn connect() -> Database {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = Database::from_url(&url).await.unwrap();
    db.migrate().await.unwrap();
    db
}

fn row(event: Event) -> SaveEventRow {
    SaveEventRow::try_from(event).unwrap()
}

#[tokio::test]
#[ignore] // Requires PostgreSQL: cargo test --test postgres_test -- --ignored
async fn test_no_id_reuse_after_delete_and_resave() {
    let db = connect().await;

    let mut saved = Vec::new();
    for name in ["A", "B", "C"] {
        saved.push(
            db.insert_event(row(Event::new(name, 1, 1, EventType::Other)))
                .await
                .unwrap(),
        );
    }
    let highest = saved[2].id;
    assert!(db.delete_event(highest).await.unwrap());

    // Re-saving an older event must not rewind the sequence
    db.upsert_event(row(Event::from(saved[0].clone())))
        .await
        .unwrap();

    let next = db
        .insert_event(row(Event::new("D", 1, 1, EventType::Other)))
        .await
        .unwrap();
    assert!(next.id > highest);

    for id in [saved[0].id, saved[1].id, next.id] {
        db.delete_event(id).await.unwrap();
    }
}

#[tokio::test]
#[ignore] // Requires PostgreSQL: cargo test --test postgres_test -- --ignored
async fn test_upsert_with_explicit_id_moves_sequence_forward() {
    let db = connect().await;

    let first = db
        .insert_event(row(Event::new("A", 2, 2, EventType::Other)))
        .await
        .unwrap();

    let mut ahead = Event::new("B", 2, 2, EventType::Other);
    ahead.id = first.id + 100;
    let ahead = db.upsert_event(row(ahead)).await.unwrap();

    let next = db
        .insert_event(row(Event::new("C", 2, 2, EventType::Other)))
        .await
        .unwrap();
    assert!(next.id > ahead.id);

    for id in [first.id, ahead.id, next.id] {
        db.delete_event(id).await.unwrap();
    }
}
