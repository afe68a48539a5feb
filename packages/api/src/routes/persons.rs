//! Phonebook handlers: `/api/persons` and `/info`.

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use store::{NewPerson, Person};
use tracing::info;

use crate::{
    error::{ApiError, ApiJson},
    state::PhonebookState,
};

#[derive(Debug, Deserialize)]
pub struct PersonRequest {
    pub name: Option<String>,
    pub number: Option<String>,
}

impl PersonRequest {
    fn validate(self) -> Result<NewPerson, ApiError> {
        let name = self.name.filter(|n| !n.is_empty());
        let number = self.number.filter(|n| !n.is_empty());
        match (name, number) {
            (Some(name), Some(number)) => Ok(NewPerson { name, number }),
            _ => Err(ApiError::Validation(
                "Name and number are required".to_string(),
            )),
        }
    }
}

fn person_not_found() -> ApiError {
    ApiError::NotFound("Person not found".to_string())
}

/// Path ids that are not numbers can never match an entry.
fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse().map_err(|_| person_not_found())
}

pub async fn list_persons(
    State(state): State<PhonebookState>,
) -> Result<Json<Vec<Person>>, ApiError> {
    Ok(Json(state.persons.list().await?))
}

pub async fn get_person(
    State(state): State<PhonebookState>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    state
        .persons
        .get(parse_id(&id)?)
        .await?
        .map(Json)
        .ok_or_else(person_not_found)
}

pub async fn delete_person(
    State(state): State<PhonebookState>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    let person = state
        .persons
        .delete(parse_id(&id)?)
        .await?
        .ok_or_else(person_not_found)?;
    info!("Deleted {} ({})", person.name, person.id);
    Ok(Json(person))
}

pub async fn create_person(
    State(state): State<PhonebookState>,
    ApiJson(request): ApiJson<PersonRequest>,
) -> Result<Json<Person>, ApiError> {
    let person = state.persons.insert(request.validate()?).await?;
    info!("Added {} ({})", person.name, person.id);
    Ok(Json(person))
}

pub async fn info(State(state): State<PhonebookState>) -> Result<Html<String>, ApiError> {
    let count = state.persons.count().await?;
    let now = Local::now().format("%a %b %d %Y %H:%M:%S GMT%z");
    Ok(Html(format!(
        "<p>Phonebook has info for {count} people</p>\n<p>{now}</p>"
    )))
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use serde_json::json;

    use crate::{phonebook_router, routes::testing::send, state::PhonebookState};

    fn app() -> axum::Router {
        phonebook_router(PhonebookState::seeded())
    }

    async fn count(app: &axum::Router) -> usize {
        let (_, persons) = send(app, Method::GET, "/api/persons", None, None).await;
        persons.as_array().unwrap().len()
    }

    #[tokio::test]
    async fn test_list_seeded() {
        let app = app();
        let (status, persons) = send(&app, Method::GET, "/api/persons", None, None).await;
        assert_eq!(status, 200);
        assert_eq!(persons.as_array().unwrap().len(), 6);
        assert_eq!(
            persons[0],
            json!({ "id": 1, "name": "Arto Hellas", "number": "040-123456" })
        );
    }

    #[tokio::test]
    async fn test_get_person() {
        let app = app();
        let (status, person) = send(&app, Method::GET, "/api/persons/2", None, None).await;
        assert_eq!(status, 200);
        assert_eq!(person["name"], "Ada Lovelace");

        let (status, err) = send(&app, Method::GET, "/api/persons/99", None, None).await;
        assert_eq!(status, 404);
        assert_eq!(err, json!({ "error": "Person not found" }));

        let (status, _) = send(&app, Method::GET, "/api/persons/abc", None, None).await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_delete_person() {
        let app = app();
        let (status, removed) = send(&app, Method::DELETE, "/api/persons/3", None, None).await;
        assert_eq!(status, 200);
        assert_eq!(
            removed,
            json!({ "id": 3, "name": "Dan Abramov", "number": "12-43-234345" })
        );

        let (_, persons) = send(&app, Method::GET, "/api/persons", None, None).await;
        let persons = persons.as_array().unwrap();
        assert_eq!(persons.len(), 5);
        assert!(persons.iter().all(|p| p["id"] != 3));
    }

    #[tokio::test]
    async fn test_delete_unknown_person() {
        let app = app();
        let (status, err) = send(&app, Method::DELETE, "/api/persons/42", None, None).await;
        assert_eq!(status, 404);
        assert_eq!(err, json!({ "error": "Person not found" }));
        assert_eq!(count(&app).await, 6);
    }

    #[tokio::test]
    async fn test_create_person() {
        let app = app();
        let (status, created) = send(
            &app,
            Method::POST,
            "/api/persons",
            Some(json!({ "name": "Grace Hopper", "number": "555-1906" })),
            None,
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(created["name"], "Grace Hopper");
        assert_eq!(created["number"], "555-1906");

        // Fresh id, distinct from every seeded one
        let id = created["id"].as_u64().unwrap();
        assert!(id > 6);
        assert_eq!(count(&app).await, 7);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let app = app();
        let (status, err) = send(
            &app,
            Method::POST,
            "/api/persons",
            Some(json!({ "name": "Arto Hellas", "number": "1" })),
            None,
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(err, json!({ "error": "Name must be unique" }));
        assert_eq!(count(&app).await, 6);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let app = app();
        for body in [
            json!({ "name": "No Number" }),
            json!({ "number": "123" }),
            json!({ "name": "", "number": "123" }),
            json!({}),
        ] {
            let (status, err) = send(&app, Method::POST, "/api/persons", Some(body), None).await;
            assert_eq!(status, 400);
            assert_eq!(err, json!({ "error": "Name and number are required" }));
        }
        assert_eq!(count(&app).await, 6);
    }

    #[tokio::test]
    async fn test_info_page() {
        let app = app();
        send(&app, Method::DELETE, "/api/persons/1", None, None).await;

        let (status, page) = send(&app, Method::GET, "/info", None, None).await;
        assert_eq!(status, 200);
        let page = page.as_str().unwrap();
        assert!(page.starts_with("<p>Phonebook has info for 5 people</p>"));
    }
}
