use actix_web::{
    error::InternalError,
    get, post,
    web::{self, Data},
    HttpResponse,
};
use person_service::{
    consts::consts::{PUBLISH_FAILED_MESSAGE, READ_FAILED_MESSAGE},
    model::person::Person,
    runtime::person_service::{CreatePersonError, PersonService},
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_message: String,
}

impl ErrorResponse {
    pub fn new(error_message: &str) -> Self {
        Self {
            error_message: error_message.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct EmailQuery {
    pub email: String,
}

/// Publishes the person, the record is stored once the listener picks it up
#[post("/api/person")]
async fn create_person(service: Data<PersonService>, person: web::Json<Person>) -> HttpResponse {
    match service.create(person.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(CreatePersonError::Invalid(e)) => {
            HttpResponse::BadRequest().json(ErrorResponse::new(&e.to_string()))
        }
        Err(CreatePersonError::Publish(e)) => {
            log::error!("Failed to publish person: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(PUBLISH_FAILED_MESSAGE))
        }
    }
}

#[get("/api/person")]
async fn read_person(service: Data<PersonService>, query: web::Query<EmailQuery>) -> HttpResponse {
    match service.read(&query.email).await {
        Ok(Some(person)) => HttpResponse::Ok().json(person),
        Ok(None) => HttpResponse::NotFound().finish(),
        Err(e) => {
            log::error!("Failed to read person [Email: {}]: {}", query.email, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(READ_FAILED_MESSAGE))
        }
    }
}

/// Registers the person routes, rejected bodies and queries answer 400 with an
/// `errorMessage` like the handlers do
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _| {
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(&err.to_string()));
        InternalError::from_response(err, response).into()
    });

    let query_config = web::QueryConfig::default().error_handler(|err, _| {
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(&err.to_string()));
        InternalError::from_response(err, response).into()
    });

    cfg.app_data(json_config)
        .app_data(query_config)
        .service(create_person)
        .service(read_person);
}

#[cfg(test)]
mod tests {
    use std::{
        sync::Arc,
        time::{Duration, Instant},
    };

    use actix_web::{http::StatusCode, test, App};
    use person_service::{
        runtime::{options::ServiceOptions, runtime::Runtime},
        store::{memory::MemoryStore, mock::FlakyStore, PersonStore},
        stream::mock::MockPublisher,
    };
    use rstest::rstest;
    use serde_json::{json, Value};

    use super::*;

    const DIJKSTRA: &str = r#"{"email": "edsger.dijkstra@company.com", "firstName": "Edsger", "lastName": "Dijkstra", "yearBirth": 1930 }"#;

    fn unique_email() -> String {
        format!("{}@company.com", uuid::Uuid::new_v4())
    }

    fn post_person(body: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/person")
            .insert_header(("content-type", "application/json"))
            .set_payload(body.to_string())
    }

    fn get_person(email: &str) -> test::TestRequest {
        test::TestRequest::get().uri(&format!("/api/person?email={}", email))
    }

    /// GETs until the response is 200 and matches `expected`, or the timeout elapses
    macro_rules! get_eventually {
        ($app:expr, $email:expr, $expected:expr) => {{
            let deadline = Instant::now() + Duration::from_secs(5);

            loop {
                let response = test::call_service($app, get_person($email).to_request()).await;
                let status = response.status();
                let body = test::read_body(response).await;
                let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

                if (status == StatusCode::OK && &json == $expected) || Instant::now() >= deadline {
                    break (status, json);
                }

                tokio::time::sleep(Duration::from_millis(25)).await;
            }
        }};
    }

    #[actix_web::test]
    async fn post_returns_no_content_and_publishes() {
        let publisher = Arc::new(MockPublisher::new_accepting());
        let store = Arc::new(MemoryStore::new());
        let service = PersonService::new(publisher.clone(), store.clone());
        let app =
            test::init_service(App::new().app_data(Data::new(service)).configure(configure)).await;

        let response = test::call_service(&app, post_person(DIJKSTRA).to_request()).await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(test::read_body(response).await.is_empty());

        let published = publisher.published();
        assert_eq!(published.len(), 1);
        assert_eq!(
            serde_json::to_value(&published[0]).unwrap(),
            serde_json::from_str::<Value>(DIJKSTRA).unwrap()
        );
        assert!(store.is_empty(), "Handler must not write the store");
    }

    #[actix_web::test]
    async fn post_returns_error_when_publish_fails() {
        let store = Arc::new(MemoryStore::new());
        let service = PersonService::new(Arc::new(MockPublisher::new_failing()), store.clone());
        let app =
            test::init_service(App::new().app_data(Data::new(service)).configure(configure)).await;

        let response = test::call_service(&app, post_person(DIJKSTRA).to_request()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = test::read_body_json(response).await;
        assert_eq!(body, ErrorResponse::new("fail to publish Person in topic"));
        assert!(store.is_empty());
    }

    #[rstest]
    #[case(r#"{"email": "", "firstName": "No", "lastName": "Body", "yearBirth": 2000}"#)]
    #[case(r#"{"email": "  ", "firstName": "No", "lastName": "Body", "yearBirth": 2000}"#)]
    #[case(r#"{"firstName": "No", "lastName": "Body", "yearBirth": 2000}"#)]
    #[case(r#"{"email": "a@b.com", "firstName": "No""#)]
    #[case(r#"{"email": "a@b.com", "firstName": "No", "lastName": "Body", "yearBirth": "old"}"#)]
    #[actix_web::test]
    async fn post_rejects_bad_bodies(#[case] body: &str) {
        let publisher = Arc::new(MockPublisher::new_accepting());
        let service = PersonService::new(publisher.clone(), Arc::new(MemoryStore::new()));
        let app =
            test::init_service(App::new().app_data(Data::new(service)).configure(configure)).await;

        let response = test::call_service(&app, post_person(body).to_request()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json: Value = test::read_body_json(response).await;
        assert!(json.get("errorMessage").is_some());
        assert_eq!(publisher.publish_count(), 0);
    }

    #[actix_web::test]
    async fn get_unknown_returns_not_found() {
        let publisher = Arc::new(MockPublisher::new_accepting());
        let service = PersonService::new(publisher.clone(), Arc::new(MemoryStore::new()));
        let app =
            test::init_service(App::new().app_data(Data::new(service)).configure(configure)).await;

        let response =
            test::call_service(&app, get_person("unknown@nowhere.com").to_request()).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(test::read_body(response).await.is_empty());
        assert_eq!(publisher.publish_count(), 0);
    }

    #[actix_web::test]
    async fn get_without_email_is_bad_request() {
        let service = PersonService::new(
            Arc::new(MockPublisher::new_accepting()),
            Arc::new(MemoryStore::new()),
        );
        let app =
            test::init_service(App::new().app_data(Data::new(service)).configure(configure)).await;

        let request = test::TestRequest::get().uri("/api/person").to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn get_returns_stored_person() {
        let store = Arc::new(MemoryStore::new());
        store.save(Person::new_test()).await.unwrap();
        let service = PersonService::new(Arc::new(MockPublisher::new_accepting()), store);
        let app =
            test::init_service(App::new().app_data(Data::new(service)).configure(configure)).await;

        let response =
            test::call_service(&app, get_person("edsger.dijkstra@company.com").to_request()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let json: Value = test::read_body_json(response).await;
        assert_eq!(json, serde_json::from_str::<Value>(DIJKSTRA).unwrap());
    }

    #[actix_web::test]
    async fn get_hides_store_failure_details() {
        let service = PersonService::new(
            Arc::new(MockPublisher::new_accepting()),
            Arc::new(FlakyStore::new_failing()),
        );
        let app =
            test::init_service(App::new().app_data(Data::new(service)).configure(configure)).await;

        let response =
            test::call_service(&app, get_person("edsger.dijkstra@company.com").to_request()).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = test::read_body_json(response).await;
        assert_eq!(body, ErrorResponse::new("fail to read Person from store"));
    }

    #[actix_web::test]
    async fn post_then_get_eventually_returns_person() {
        let runtime = Runtime::start(ServiceOptions::new_test()).await.unwrap();
        let app = test::init_service(
            App::new()
                .app_data(Data::new(runtime.service()))
                .configure(configure),
        )
        .await;

        let email = unique_email();
        let expected = json!({
            "email": email,
            "firstName": "Edsger",
            "lastName": "Dijkstra",
            "yearBirth": 1930
        });

        let request = post_person(&expected.to_string()).to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let (status, json) = get_eventually!(&app, &email, &expected);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, expected);

        runtime.shutdown().await;
    }

    #[actix_web::test]
    async fn second_post_overwrites_first() {
        let runtime = Runtime::start(ServiceOptions::new_test()).await.unwrap();
        let app = test::init_service(
            App::new()
                .app_data(Data::new(runtime.service()))
                .configure(configure),
        )
        .await;

        let email = unique_email();
        let first = json!({
            "email": email,
            "firstName": "Grace",
            "lastName": "Hopper",
            "yearBirth": 1906
        });
        let second = json!({
            "email": email,
            "firstName": "Amazing Grace",
            "lastName": "Hopper",
            "yearBirth": 1906
        });

        for body in [&first, &second] {
            let request = post_person(&body.to_string()).to_request();
            let response = test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::NO_CONTENT);
        }

        let (status, json) = get_eventually!(&app, &email, &second);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["firstName"], "Amazing Grace");

        assert_eq!(runtime.shutdown().await, 2);
    }

    #[actix_web::test]
    async fn deleted_person_is_not_found() {
        let runtime = Runtime::start(ServiceOptions::new_test()).await.unwrap();
        let store = runtime.store();
        let app = test::init_service(
            App::new()
                .app_data(Data::new(runtime.service()))
                .configure(configure),
        )
        .await;

        let person = Person::new(&unique_email(), "James", "Watt", 1736);
        store.save(person.clone()).await.unwrap();
        assert!(store.delete(&person.email).await.unwrap());

        let response = test::call_service(&app, get_person(&person.email).to_request()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        runtime.shutdown().await;
    }
}
