use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value};

use wts_connector::{ApiClient, ConnectorError, FieldValues, OptionPair, ResolverRegistry};

struct MockApi {
    url: String,
    targets: Arc<Mutex<Vec<String>>>,
}

impl MockApi {
    fn request_count(&self) -> usize {
        self.targets.lock().unwrap().len()
    }
}

/// Serves the given `(status, body)` responses in order, one per incoming
/// connection, recording each request target. Resolver calls are all GETs
/// without bodies, so only the target is kept.
fn mock_api(responses: Vec<(u16, String)>) -> MockApi {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
    let port = listener.local_addr().unwrap().port();
    let targets: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let recorded = targets.clone();

    thread::spawn(move || {
        for (stream, (status, body)) in listener.incoming().zip(responses) {
            let mut stream = stream.unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let target = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line.trim().is_empty() {
                    break;
                }
            }
            recorded.lock().unwrap().push(target);

            let response = format!(
                "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        }
    });

    MockApi {
        url: format!("http://127.0.0.1:{}", port),
        targets,
    }
}

fn ok(body: Value) -> (u16, String) {
    (200, body.to_string())
}

async fn resolve(
    mock: &MockApi,
    name: &str,
    fields: &FieldValues,
) -> Result<Vec<OptionPair>, ConnectorError> {
    let client = ApiClient::new(&mock.url, "token");
    ResolverRegistry::new().resolve(name, &client, fields).await
}

fn labels(options: &[OptionPair]) -> Vec<&str> {
    options.iter().map(|o| o.label.as_str()).collect()
}

#[tokio::test]
async fn panels_drain_every_page_in_order() {
    let mock = mock_api(vec![
        ok(json!({
            "items": [{"title": "A", "id": "1"}, {"title": "B", "id": "2"}],
            "hasMorePages": true
        })),
        ok(json!({
            "items": [{"title": "C", "id": "3"}],
            "hasMorePages": false
        })),
    ]);

    let options = resolve(&mock, "getPanels", &FieldValues::new()).await.unwrap();

    assert_eq!(labels(&options), vec!["A", "B", "C"]);
    assert_eq!(options[2], OptionPair::new("C", "3"));

    let targets = mock.targets.lock().unwrap();
    assert_eq!(targets.len(), 2, "must stop exactly when hasMorePages is false");
    assert!(targets[0].contains("pageNumber=1"));
    assert!(targets[1].contains("pageNumber=2"));
}

#[tokio::test]
async fn pagination_failure_discards_partial_pages() {
    let mock = mock_api(vec![
        ok(json!({"items": [{"title": "A", "id": "1"}], "hasMorePages": true})),
        (500, json!({"message": "boom"}).to_string()),
    ]);

    let err = resolve(&mock, "getPanels", &FieldValues::new()).await.unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Failed to load panels:"), "got {}", message);
    assert_eq!(mock.request_count(), 2);
}

#[tokio::test]
async fn users_by_department_requires_the_department_first() {
    let mock = mock_api(vec![]);

    let err = resolve(&mock, "getUsersByDepartments", &FieldValues::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectorError::MissingDependency("departmentId")));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn users_by_department_filters_memberships_locally() {
    let mock = mock_api(vec![ok(json!([
        {"name": "Ana", "userId": "u1", "departments": [{"departmentId": "D1"}]},
        {"name": "Bob", "userId": "u2", "departments": [{"departmentId": "D2"}]},
        {"name": "Cai", "userId": "u3", "departments": [
            {"departmentId": "D2"}, {"departmentId": "D1"}
        ]},
        {"name": "Dan", "userId": "u4"}
    ]))]);
    let fields = FieldValues::new().with("departmentId", json!("D1"));

    let options = resolve(&mock, "getUsersByDepartments", &fields).await.unwrap();

    assert_eq!(
        options,
        vec![OptionPair::new("Ana", "u1"), OptionPair::new("Cai", "u3")]
    );
    assert_eq!(mock.request_count(), 1, "the agent list is fetched once, unpaginated");
}

#[tokio::test]
async fn template_params_drop_duplicate_names_keeping_the_first() {
    let mock = mock_api(vec![ok(json!({
        "items": [{
            "name": "welcome",
            "params": [
                {"name": "x", "value": "1"},
                {"name": "x", "value": "2"},
                {"name": "y", "value": "3"}
            ]
        }],
        "hasMorePages": false
    }))]);
    let fields = FieldValues::new()
        .with("channelId", json!("ch1"))
        .with("templateName", json!("welcome"));

    let options = resolve(&mock, "getTemplatesParams", &fields).await.unwrap();

    assert_eq!(
        options,
        vec![OptionPair::new("x", "x"), OptionPair::new("y", "y")]
    );
}

#[tokio::test]
async fn templates_depend_on_the_channel() {
    let mock = mock_api(vec![]);

    let err = resolve(&mock, "getTemplates", &FieldValues::new()).await.unwrap_err();

    assert!(matches!(err, ConnectorError::MissingDependency("channelId")));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn channels_compose_labels_from_identity() {
    let mock = mock_api(vec![ok(json!([
        {"id": "ch1", "identity": {"humanId": "+55 11 91234", "platform": "WHATSAPP"}},
        {"id": "ch2"}
    ]))]);

    let options = resolve(&mock, "getChannelsIds", &FieldValues::new()).await.unwrap();

    assert_eq!(options[0], OptionPair::new("+55 11 91234 WHATSAPP", "ch1"));
    // No identity at all: the raw id stands in as the label.
    assert_eq!(options[1], OptionPair::new("ch2", "ch2"));
}

#[tokio::test]
async fn bots_read_the_items_page() {
    let mock = mock_api(vec![ok(json!({
        "items": [{"name": "Greeter", "id": "b1"}],
        "hasMorePages": false
    }))]);

    let options = resolve(&mock, "getBots", &FieldValues::new()).await.unwrap();

    assert_eq!(options, vec![OptionPair::new("Greeter", "b1")]);
}

#[tokio::test]
async fn departments_map_name_to_id() {
    let mock = mock_api(vec![ok(json!([
        {"name": "Support", "id": "d1"},
        {"name": "Sales", "id": "d2"}
    ]))]);

    let options = resolve(&mock, "getDepartmentsIds", &FieldValues::new()).await.unwrap();

    assert_eq!(
        options,
        vec![
            OptionPair::new("Support", "d1"),
            OptionPair::new("Sales", "d2")
        ]
    );
}

#[tokio::test]
async fn unexpected_response_shape_is_a_resolver_error() {
    let mock = mock_api(vec![ok(json!({"not": "an array"}))]);

    let err = resolve(&mock, "getDepartmentsIds", &FieldValues::new())
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("Failed to load departments:"));
}

#[tokio::test]
async fn custom_fields_store_the_key_as_value() {
    let mock = mock_api(vec![ok(json!([
        {"name": "Birthday", "key": "birthday"}
    ]))]);

    let options = resolve(&mock, "getCustomFields", &FieldValues::new()).await.unwrap();

    assert_eq!(options, vec![OptionPair::new("Birthday", "birthday")]);
}

#[tokio::test]
async fn panel_custom_fields_filter_out_groups() {
    let mock = mock_api(vec![ok(json!([
        {"name": "Amount", "id": "f1", "type": "NUMBER"},
        {"name": "Grouping", "id": "f2", "type": "GROUP"},
        {"name": "Notes", "id": "f3", "type": "TEXT"}
    ]))]);
    let fields = FieldValues::new().with("panelId", json!("p1"));

    let options = resolve(&mock, "getCustomFieldsPanel", &fields).await.unwrap();

    assert_eq!(labels(&options), vec!["Amount", "Notes"]);

    let targets = mock.targets.lock().unwrap();
    assert_eq!(targets[0], "/crm/v1/panel/p1/custom-fields");
}

#[tokio::test]
async fn steps_by_panel_ask_for_step_details() {
    let mock = mock_api(vec![ok(json!({
        "id": "p1",
        "steps": [{"title": "Todo", "id": "s1"}, {"title": "Done", "id": "s2"}]
    }))]);
    let fields = FieldValues::new().with("panelId", json!("p1"));

    let options = resolve(&mock, "getStepsPanelId", &fields).await.unwrap();

    assert_eq!(
        options,
        vec![OptionPair::new("Todo", "s1"), OptionPair::new("Done", "s2")]
    );

    let targets = mock.targets.lock().unwrap();
    assert!(targets[0].starts_with("/crm/v1/panel/p1"));
    assert!(targets[0].contains("IncludeDetails=Steps"));
}

#[tokio::test]
async fn tags_by_panel_ask_for_tag_details() {
    let mock = mock_api(vec![ok(json!({
        "id": "p1",
        "tags": [{"name": "hot", "id": "t1"}]
    }))]);
    let fields = FieldValues::new().with("panelId", json!("p1"));

    let options = resolve(&mock, "getTagsPanel", &fields).await.unwrap();

    assert_eq!(options, vec![OptionPair::new("hot", "t1")]);

    let targets = mock.targets.lock().unwrap();
    assert!(targets[0].contains("IncludeDetails=Tags"));
}

#[tokio::test]
async fn unknown_resolver_is_rejected() {
    let mock = mock_api(vec![]);

    let err = resolve(&mock, "getNothing", &FieldValues::new()).await.unwrap_err();

    assert!(matches!(err, ConnectorError::Validation(_)));
    assert_eq!(mock.request_count(), 0);
}
