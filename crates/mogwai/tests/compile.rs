use mogwai::{
    core::{
        context::{ClientError, ContextConfig, ScriptRequest, Transport},
        obs::{metrics_report, metrics_reset_all},
    },
    error::{ErrorKind, ErrorOrigin},
    prelude::*,
};
use proptest::prelude::*;
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

const PERSON_GROOVY: &str = r#"
// Lookups used by the Person model.
def findByName(name) {
  g.V('$type', 'person').has('name', name)
}

def friendsOf(name, int depth) {
  g.V('name', name).out('knows').loop(1) { it.loops < depth }
}

/* Counts every person vertex. */
def count() { g.V('$type', 'person').count() }
"#;

#[derive(Clone, Default)]
struct FakeTransport {
    requests: Arc<Mutex<Vec<ScriptRequest>>>,
    fail_with: Option<ClientError>,
}

impl FakeTransport {
    fn requests(&self) -> Vec<ScriptRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Transport for FakeTransport {
    fn submit(&self, request: &ScriptRequest) -> Result<serde_json::Value, ClientError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());

        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(serde_json::json!({ "results": request.bindings.len() })),
        }
    }
}

fn person_schema() -> Schema {
    Schema::new()
        .method("displayName", |instance, _| {
            let name = instance
                .property("name")
                .and_then(Value::as_text)
                .unwrap_or_default()
                .to_string();
            Ok(Value::from(name.to_uppercase()))
        })
        .static_fn("count", |_, _| Ok(Value::from(-1)))
        .static_fn("label", |model, _| Ok(Value::from(model.name())))
}

fn compiler(transport: &FakeTransport) -> ModelCompiler {
    mogwai::connect(ContextConfig::default(), transport.clone())
}

#[test]
fn compiled_model_exposes_schema_and_procedures() {
    let transport = FakeTransport::default();
    let model = Arc::new(
        compiler(&transport)
            .compile("Person", Arc::new(person_schema()), PERSON_GROOVY)
            .expect("person should compile"),
    );

    assert_eq!(model.type_tag(), "person");
    assert_eq!(
        model.procedure_names().collect::<Vec<_>>(),
        ["count", "findByName", "friendsOf"]
    );
    assert_eq!(
        model.call("label", vec![]).expect("label should run"),
        Value::from("Person")
    );

    let marko = model.instantiate(BTreeMap::from([(
        "name".to_string(),
        Value::from("marko"),
    )]));
    assert_eq!(marko.type_tag(), "person");
    assert_eq!(
        marko.call("displayName", vec![]).expect("method should run"),
        Value::from("MARKO")
    );
}

#[test]
fn procedure_call_renders_gremlin_request() {
    let transport = FakeTransport::default();
    let model = compiler(&transport)
        .compile("Person", Arc::new(person_schema()), PERSON_GROOVY)
        .expect("person should compile");

    let reply = model
        .procedure("friendsOf")
        .expect("friendsOf should be bound")
        .invoke(vec![Arg::from("marko"), Arg::from(2)])
        .expect("call should succeed");

    assert_eq!(reply.get("results"), Some(&Value::from(2)));

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert!(
        requests[0]
            .gremlin
            .starts_with("def friendsOf(name, depth) {")
    );
    assert!(requests[0].gremlin.ends_with("\nfriendsOf(p0, p1)"));
    assert_eq!(requests[0].bindings["p0"], serde_json::json!("marko"));
    assert_eq!(requests[0].bindings["p1"], serde_json::json!(2));
}

#[test]
fn script_procedure_wins_over_schema_static() {
    let transport = FakeTransport::default();
    let model = compiler(&transport)
        .compile("Person", Arc::new(person_schema()), PERSON_GROOVY)
        .expect("person should compile");

    let reply = model.call("count", vec![]).expect("count should run");

    assert_ne!(reply, Value::from(-1), "schema static must be replaced");
    assert_eq!(transport.requests().len(), 1);
}

#[test]
fn callback_only_invocation_forwards_no_params() {
    let transport = FakeTransport::default();
    let model = compiler(&transport)
        .compile("Person", Arc::new(Schema::new()), PERSON_GROOVY)
        .expect("person should compile");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    model
        .call(
            "count",
            vec![Arg::callback(move |outcome| {
                sink.lock()
                    .expect("sink lock")
                    .push(outcome.as_ref().map(|v| v.get("results").cloned()).ok());
            })],
        )
        .expect("count should run");

    assert_eq!(transport.requests()[0].bindings.len(), 0);
    assert_eq!(
        *seen.lock().expect("sink lock"),
        vec![Some(Some(Value::from(0)))]
    );
}

#[test]
fn transport_failure_surfaces_verbatim() {
    let failure = ClientError::Transport("connection refused".to_string());
    let transport = FakeTransport {
        fail_with: Some(failure.clone()),
        ..FakeTransport::default()
    };
    let model = compiler(&transport)
        .compile("Person", Arc::new(Schema::new()), PERSON_GROOVY)
        .expect("person should compile");

    let err = model
        .procedure("findByName")
        .expect("findByName should be bound")
        .invoke(vec![Arg::from("marko")])
        .expect_err("transport failure should surface");
    assert_eq!(err, failure);

    let public = mogwai::Error::from(err);
    assert_eq!(public.kind, ErrorKind::Remote);
    assert_eq!(public.origin, ErrorOrigin::Client);
}

#[test]
fn malformed_script_is_a_public_scan_error() {
    let transport = FakeTransport::default();
    let err = compiler(&transport)
        .compile("Person", Arc::new(person_schema()), "def findByName(name) {")
        .map_err(mogwai::Error::from)
        .expect_err("malformed script should fail");

    assert_eq!(err.kind, ErrorKind::Invalid);
    assert_eq!(err.origin, ErrorOrigin::Scan);
    assert_eq!(err.message, "line 1: body of 'findByName' is not closed");
}

#[test]
fn connect_json_reads_config() {
    let compiler = mogwai::connect_json(
        r#"{ "host": "gremlin.local", "port": 8183, "graph": "social" }"#,
        FakeTransport::default(),
    )
    .expect("config should parse");
    let model = compiler
        .compile("Person", Arc::new(Schema::new()), "")
        .expect("person should compile");

    let handle = model.connection();
    assert_eq!(handle.to_string(), "gremlin.local:8183/social#0");
    assert_eq!(compiler.context().indexed_keys(), vec!["$type".to_string()]);
}

#[test]
fn connect_json_rejects_bad_config() {
    let err = mogwai::connect_json(r#"{ "port": "not a port" }"#, FakeTransport::default())
        .err()
        .expect("bad config should fail");

    assert_eq!(err.kind, ErrorKind::Invalid);
    assert_eq!(err.origin, ErrorOrigin::Context);
}

#[test]
fn metrics_track_compiles_and_calls() {
    metrics_reset_all();
    let transport = FakeTransport::default();
    let compiler = compiler(&transport);

    let person = compiler
        .compile("Person", Arc::new(person_schema()), PERSON_GROOVY)
        .expect("person should compile");
    compiler
        .compile("Place", Arc::new(Schema::new()), "")
        .expect("place should compile");
    person.call("count", vec![]).expect("count should run");

    let report = metrics_report();
    assert_eq!(report.ops.models_compiled, 2);
    assert_eq!(report.ops.procedures_bound, 3);
    assert_eq!(report.ops.procedures_shadowing, 1);
    assert_eq!(report.ops.procedure_calls, 1);
    assert_eq!(report.model_counters[0].type_tag, "person");
}

proptest! {
    #[test]
    fn trailing_values_are_never_taken_as_callbacks(values in prop::collection::vec(any::<i64>(), 1..5)) {
        let transport = FakeTransport::default();
        let model = compiler(&transport)
            .compile("Person", Arc::new(Schema::new()), "def echo(a) { a }")
            .expect("model should compile");

        model
            .call("echo", values.iter().copied().map(Arg::from).collect())
            .expect("echo should run");

        let request = &transport.requests()[0];
        prop_assert_eq!(request.bindings.len(), values.len());
    }
}
