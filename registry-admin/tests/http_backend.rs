use registry_admin::registry::prelude::*;
use registry_admin::registry::{Backend, Collection, ReferenceKind};
use registry_admin::{City, EntityId, ErrorClass, HttpBackend, Province};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_get(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_decodes_records() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/provincias",
        json!([
            { "ID": 1, "CreatedAt": "2024-01-01T00:00:00Z", "nombre": "Pichincha" },
            { "ID": 2, "nombre": "Guayas" }
        ]),
    )
    .await;

    let backend = HttpBackend::new(&server.uri()).unwrap();
    let provinces = Collection::<Province>::new(&backend).list().await.unwrap();

    assert_eq!(provinces.len(), 2);
    assert_eq!(provinces[0].id, EntityId(1));
    assert_eq!(provinces[1].name, "Guayas");
}

#[tokio::test]
async fn test_empty_list_is_not_an_error() {
    let server = MockServer::start().await;
    mount_get(&server, "/ciudades", json!([])).await;

    let backend = HttpBackend::new(&server.uri()).unwrap();
    let cities = Collection::<City>::new(&backend).list().await.unwrap();
    assert!(cities.is_empty());
}

#[tokio::test]
async fn test_get_by_id() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/ciudades/7",
        json!({ "ID": 7, "ciudad": "Quito", "provincia_id": 1 }),
    )
    .await;

    let backend = HttpBackend::new(&server.uri()).unwrap();
    let city = Collection::<City>::new(&backend).get(EntityId(7)).await.unwrap();
    assert_eq!(city.name, "Quito");
    assert_eq!(city.province_id, EntityId(1));
}

#[tokio::test]
async fn test_client_error_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/provincias"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "el nombre es obligatorio" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri()).unwrap();
    let err = backend
        .create("provincias", json!({ "nombre": "" }))
        .await
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::Client);
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message(), "el nombre es obligatorio");
}

#[tokio::test]
async fn test_server_error_without_body_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/instituciones/4"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri()).unwrap();
    let err = backend
        .update("instituciones", EntityId(4), json!({ "nombre": "x" }))
        .await
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::Server);
    assert_eq!(err.server_message(), None);
    assert_eq!(
        err.user_message(),
        "internal server error, check for duplicate data (national ID / email)"
    );
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let backend = HttpBackend::new("http://127.0.0.1:9").unwrap();
    let err = backend.list("provincias").await.unwrap_err();

    assert_eq!(err.class(), ErrorClass::Network);
    assert_eq!(err.status(), None);
    assert!(err.user_message().starts_with("could not reach the server"));
}

#[tokio::test]
async fn test_undecodable_success_body_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/provincias"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri()).unwrap();
    let err = Collection::<Province>::new(&backend).list().await.unwrap_err();

    assert_eq!(err.class(), ErrorClass::Network);
    assert!(err.to_string().contains("invalid response body"));
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/provincias/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&server.uri()).unwrap();
    Collection::<Province>::new(&backend)
        .delete(EntityId(2))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_filtered_listing_route() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "/ciudades/provincia/3",
        json!([{ "ID": 9, "ciudad": "Cuenca", "provincia_id": 3 }]),
    )
    .await;

    let backend = HttpBackend::new(&server.uri()).unwrap();
    let cities = Collection::<City>::new(&backend)
        .list_by("provincia", "3")
        .await
        .unwrap();

    assert_eq!(cities.len(), 1);
    assert_eq!(cities[0].name, "Cuenca");
}

#[tokio::test]
async fn test_student_create_wire_format() {
    let server = MockServer::start().await;
    mount_get(&server, "/estudiantes", json!([])).await;
    mount_get(&server, "/ciudades", json!([{ "ID": 7, "ciudad": "Quito", "provincia_id": 1 }])).await;
    mount_get(
        &server,
        "/instituciones",
        json!([{ "ID": 3, "nombre": "Colegio Mejía" }]),
    )
    .await;

    Mock::given(method("POST"))
        .and(path("/personas"))
        .and(body_json(json!({
            "nombre": "Luis Paredes",
            "fecha_nacimiento": "2020-05-01T00:00:00Z",
            "correo": null,
            "telefono": null,
            "cedula": "1712345678"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ID": 31,
            "nombre": "Luis Paredes",
            "fecha_nacimiento": "2020-05-01T00:00:00Z",
            "cedula": "1712345678"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/estudiantes"))
        .and(body_json(json!({
            "persona_id": 31,
            "institucion_id": 3,
            "ciudad_id": 7,
            "especialidad": "Informática"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ID": 40,
            "persona_id": 31,
            "institucion_id": 3,
            "ciudad_id": 7,
            "especialidad": "Informática"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut manager = CrudManager::<Students>::connect(&server.uri()).unwrap();
    for action in [
        CrudAction::Mount,
        CrudAction::OpenCreate,
        CrudAction::set_field("nombre", "Luis Paredes"),
        CrudAction::set_field("fecha_nacimiento", "2020-05-01"),
        CrudAction::set_field("cedula", "1712345678"),
        CrudAction::set_field("institucion_id", "3"),
        CrudAction::set_field("ciudad_id", "7"),
        CrudAction::set_field("especialidad", "Informática"),
        CrudAction::Submit,
    ] {
        manager.dispatch(action);
    }
    manager.run_pending().await;

    let state = manager.state();
    assert_eq!(state.error, None);
    assert_eq!(state.success.as_deref(), Some("Student created"));
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_cities_mount_fails_as_a_whole() {
    let server = MockServer::start().await;
    mount_get(&server, "/ciudades", json!([{ "ID": 7, "ciudad": "Quito", "provincia_id": 1 }])).await;
    Mock::given(method("GET"))
        .and(path("/provincias"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut manager = CrudManager::<Cities>::connect(&server.uri()).unwrap();
    manager.dispatch(CrudAction::Mount);
    manager.update().await;

    let state = manager.state();
    assert!(state.rows.is_empty());
    assert!(!state.references.is_loaded(ReferenceKind::Provinces));
    assert!(state
        .error
        .as_deref()
        .unwrap()
        .starts_with("Failed to load cities: internal server error"));
    assert!(!state.is_loading);
}
