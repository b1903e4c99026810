use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::event::{Event, EventUpdate, NewEvent};
use crate::utils::error::AppError;

const EVENT_COLUMNS: &str = "id, title, description, location, date, user_id, created_at, updated_at";

/// Event CRUD over an injected pool. Ownership is the caller's concern: the
/// handler passes the authenticated user id, and the referential constraint
/// on events.user_id does the rest.
#[derive(Clone)]
pub struct EventService {
    pool: PgPool,
}

impl EventService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: i64, payload: NewEvent) -> Result<Event, AppError> {
        let (title, date) = creation_fields(&payload)?;

        let event = sqlx::query_as::<_, Event>(&format!(
            "INSERT INTO events (title, description, location, date, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {EVENT_COLUMNS}"
        ))
        .bind(title)
        .bind(&payload.description)
        .bind(&payload.location)
        .bind(date)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    pub async fn list(&self) -> Result<Vec<Event>, AppError> {
        let events =
            sqlx::query_as::<_, Event>(&format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        Ok(events)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    /// Unconditional partial merge; absent fields keep their stored values.
    pub async fn update(&self, id: i64, payload: EventUpdate) -> Result<Event, AppError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 location = COALESCE($4, location), \
                 date = COALESCE($5, date), \
                 updated_at = now() \
             WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.location)
        .bind(payload.date)
        .fetch_optional(&self.pool)
        .await?;

        event.ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".to_string()));
        }
        Ok(())
    }
}

fn creation_fields(payload: &NewEvent) -> Result<(&str, DateTime<Utc>), AppError> {
    let title = payload.title.as_deref().filter(|t| !t.is_empty());

    match (title, payload.date) {
        (Some(title), Some(date)) => Ok((title, date)),
        _ => Err(AppError::Validation(
            "Missing required fields: title or date".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_requires_title_and_date() {
        let complete = NewEvent {
            title: Some("Launch party".to_string()),
            description: None,
            location: Some("Berlin".to_string()),
            date: Some(Utc::now()),
        };
        assert!(creation_fields(&complete).is_ok());

        let untitled = NewEvent {
            title: Some(String::new()),
            description: None,
            location: None,
            date: Some(Utc::now()),
        };
        assert!(matches!(
            creation_fields(&untitled),
            Err(AppError::Validation(_))
        ));

        let undated = NewEvent {
            title: Some("Launch party".to_string()),
            description: None,
            location: None,
            date: None,
        };
        assert!(matches!(
            creation_fields(&undated),
            Err(AppError::Validation(_))
        ));
    }
}
