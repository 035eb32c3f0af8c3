mod common;

use common::{StubTransport, fixture};
use linkage_core::api::{Attributes, ConstructionError, OneOrMany, RecordStrategy, Relationships};
use linkage_core::{BuildError, Client, ClientError, GraphBuilder};
use serde::Deserialize;
use serde_json::{Value, json};
use std::error::Error;
use std::sync::{Arc, Mutex};

#[derive(Debug, Deserialize)]
struct Employee {
    id: String,
    first_name: String,
    age: u32,
}

#[derive(Debug, Deserialize)]
struct Position {
    id: String,
    title: String,
}

#[derive(Debug)]
enum Kind {
    Employee(Employee),
    Position(Position),
}

#[derive(Debug)]
struct Entity {
    kind: Kind,
    related: Mutex<Relationships<Arc<Entity>>>,
    attached: Mutex<usize>,
}

impl Entity {
    fn related_one(&self, key: &str) -> Arc<Entity> {
        match self.related.lock().unwrap().get(key) {
            Some(OneOrMany::One(entity)) => entity.clone(),
            other => panic!("expected to-one `{key}`, got {other:?}"),
        }
    }

    fn related_many(&self, key: &str) -> Vec<Arc<Entity>> {
        match self.related.lock().unwrap().get(key) {
            Some(OneOrMany::Many(entities)) => entities.clone(),
            other => panic!("expected to-many `{key}`, got {other:?}"),
        }
    }

    fn title(&self) -> &str {
        match &self.kind {
            Kind::Position(position) => &position.title,
            other => panic!("not a position: {other:?}"),
        }
    }
}

/// Deserializes attributes into typed structs per resource type.
struct TypedStrategy;

impl RecordStrategy for TypedStrategy {
    type Record = Arc<Entity>;

    fn construct(
        &self,
        resource_type: &str,
        attributes: Attributes,
    ) -> Result<Arc<Entity>, ConstructionError> {
        let value = Value::Object(attributes);
        let kind = match resource_type {
            "employee" => Kind::Employee(serde_json::from_value(value)?),
            "position" => Kind::Position(serde_json::from_value(value)?),
            other => {
                return Err(ConstructionError::new(format!(
                    "unknown resource type `{other}`"
                )));
            }
        };

        Ok(Arc::new(Entity {
            kind,
            related: Mutex::new(Relationships::new()),
            attached: Mutex::new(0),
        }))
    }

    fn attach(&self, record: &Arc<Entity>, relationships: Relationships<Arc<Entity>>) {
        *record.related.lock().unwrap() = relationships;
        *record.attached.lock().unwrap() += 1;
    }
}

#[test]
fn test_typed_records_from_nested_list() {
    let builder = GraphBuilder::new(TypedStrategy);

    let employees = builder.build_slice(&fixture("nested-list")).unwrap().into_vec();

    assert_eq!(employees.len(), 2);
    match &employees[1].kind {
        Kind::Employee(employee) => {
            assert_eq!(employee.id, "6789");
            assert_eq!(employee.first_name, "Frank");
            assert_eq!(employee.age, 21);
        }
        other => panic!("expected employee, got {other:?}"),
    }

    let current = employees[1].related_one("current_position");
    let positions = employees[1].related_many("positions");
    assert!(Arc::ptr_eq(&current, &positions[0]));
    assert_eq!(current.title(), "Doctor");
    assert_eq!(positions[1].title(), "Lawyer");
    match &positions[1].kind {
        Kind::Position(position) => assert_eq!(position.id, "3"),
        other => panic!("expected position, got {other:?}"),
    }
    assert!(employees[0].related_many("positions").is_empty());

    for entity in employees.iter().chain(positions.iter()) {
        assert_eq!(*entity.attached.lock().unwrap(), 1);
    }
}

#[test]
fn test_typed_records_keep_relationship_order() {
    let doc = json!({
        "data": {
            "type": "employee",
            "id": "1",
            "attributes": {"first_name": "Frank", "age": 17},
            "relationships": {
                "positions": {"data": [
                    {"type": "position", "id": "3"},
                    {"type": "position", "id": "1"},
                    {"type": "position", "id": "3"}
                ]},
                "current_position": {"data": {"type": "position", "id": "1"}}
            }
        },
        "included": [
            {"type": "position", "id": "1", "attributes": {"title": "Student"}},
            {"type": "position", "id": "3", "attributes": {"title": "Lawyer"}}
        ]
    });

    let employee = GraphBuilder::new(TypedStrategy).build_value(doc).unwrap();
    let employee = employee.as_one().unwrap();

    let keys: Vec<_> = employee.related.lock().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["positions", "current_position"]);

    let titles: Vec<_> = employee
        .related_many("positions")
        .iter()
        .map(|p| p.title().to_string())
        .collect();
    assert_eq!(titles, vec!["Lawyer", "Student", "Lawyer"]);
}

#[test]
fn test_attribute_type_mismatch_aborts_build() {
    let doc = json!({
        "data": {"type": "employee", "id": "1", "attributes": {"first_name": "Frank", "age": "seventeen"}}
    });

    let err = GraphBuilder::new(TypedStrategy).build_value(doc).unwrap_err();

    match err {
        BuildError::Construction { resource, source } => {
            assert_eq!(resource.to_string(), "employee:1");
            assert!(source.source().is_some());
        }
        other => panic!("expected construction error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_client_with_custom_strategy() {
    let url = "http://example.com/v1/employee/1?include=current_position";
    let client = Client::builder()
        .strategy(TypedStrategy)
        .transport(Arc::new(StubTransport::new().reply_fixture(url, "nested-resource")))
        .build()
        .unwrap();

    let employee = client.get(url).await.unwrap();

    assert_eq!(employee.related_one("current_position").title(), "Student");
}

#[tokio::test]
async fn test_unknown_type_surfaces_through_client() {
    let url = "http://example.com/v1/things/1";
    let body = json!({"data": {"type": "thing", "id": "1"}});
    let client = Client::builder()
        .strategy(TypedStrategy)
        .transport(Arc::new(
            StubTransport::new().reply(url, 200, serde_json::to_vec(&body).unwrap()),
        ))
        .build()
        .unwrap();

    let err = client.get(url).await.unwrap_err();

    match err {
        ClientError::Build(BuildError::Construction { source, .. }) => {
            assert_eq!(source.message(), "unknown resource type `thing`");
        }
        other => panic!("expected construction error, got {other:?}"),
    }
}
