use mongodb::{Database, bson::doc};

/// Pings the server through `db`.
pub async fn check_health(db: &Database) -> Result<(), String> {
    db.run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| e.to_string())
}
