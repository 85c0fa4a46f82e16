use crate::procedure::{GroovyScanner, ProcedureScanner, ScanError};

fn scan(text: &str) -> Result<Vec<(String, Vec<String>, String)>, ScanError> {
    let procedures = GroovyScanner.scan(text)?;

    Ok(procedures
        .iter()
        .map(|(name, p)| (name.clone(), p.params.clone(), p.body.clone()))
        .collect())
}

#[test]
fn empty_text_yields_no_procedures() {
    assert!(scan("").expect("empty text should scan").is_empty());
    assert!(
        scan("  \n// nothing here\n/* still nothing */\n")
            .expect("comment-only text should scan")
            .is_empty()
    );
}

#[test]
fn definitions_are_extracted_with_params_and_bodies() {
    let text = r"
def findByName(name) {
  g.V('name', name)
}

// count all vertices of a type
def countByType(String type, int limit) { g.V('$type', type)[0..<limit].count() }

def all() { g.V() }
";

    let procedures = scan(text).expect("well-formed text should scan");
    let names: Vec<&str> = procedures.iter().map(|(n, _, _)| n.as_str()).collect();
    assert_eq!(names, ["all", "countByType", "findByName"]);

    let (_, params, body) = &procedures[1];
    assert_eq!(params, &["type".to_string(), "limit".to_string()]);
    assert_eq!(body, " g.V('$type', type)[0..<limit].count() ");

    let (_, params, body) = &procedures[2];
    assert_eq!(params, &["name".to_string()]);
    assert_eq!(body.trim(), "g.V('name', name)");
}

#[test]
fn braces_inside_strings_and_comments_do_not_close_the_body() {
    let text = r#"
def tricky(x) {
  def s = "}"
  def t = '{'
  // }
  /* } */
  def u = """
    }}}
  """
  x.map { it -> it + s }
}
"#;

    let procedures = scan(text).expect("nested braces should scan");
    assert_eq!(procedures.len(), 1);

    let body = &procedures[0].2;
    assert!(body.contains("x.map { it -> it + s }"));
    assert!(body.trim_end().ends_with('}'));
}

#[test]
fn procedure_definition_round_trips_through_scanner() {
    let procedures = GroovyScanner
        .scan("def add(a, b) { a + b }")
        .expect("definition should scan");
    let add = procedures.get("add").expect("add should be present");

    assert_eq!(add.definition(), "def add(a, b) { a + b }");

    let rescanned = GroovyScanner
        .scan(&add.definition())
        .expect("rendered definition should scan again");
    assert_eq!(rescanned.get("add").map(|p| &**p), Some(&**add));
}

#[test]
fn stray_top_level_text_is_rejected() {
    let err = scan("def ok() { 1 }\n\nprintln 'hi'").expect_err("stray statement should fail");

    assert_eq!(err, ScanError::UnexpectedToken { line: 3, found: 'p' });
}

#[test]
fn keyword_must_be_followed_by_boundary() {
    let err = scan("define() { 1 }").expect_err("'define' is not 'def'");

    assert_eq!(err, ScanError::UnexpectedToken { line: 1, found: 'd' });
}

#[test]
fn missing_pieces_are_reported_with_their_procedure() {
    assert_eq!(
        scan("def (a) { a }"),
        Err(ScanError::MissingName { line: 1 })
    );
    assert_eq!(
        scan("def f { 1 }"),
        Err(ScanError::MissingParams {
            name: "f".to_string(),
            line: 1
        })
    );
    assert_eq!(
        scan("def f(a, b"),
        Err(ScanError::UnterminatedParams {
            name: "f".to_string(),
            line: 1
        })
    );
    assert_eq!(
        scan("def f(a)\n\n"),
        Err(ScanError::MissingBody {
            name: "f".to_string(),
            line: 3
        })
    );
}

#[test]
fn invalid_params_are_rejected() {
    assert_eq!(
        scan("def f(a,, b) { a }"),
        Err(ScanError::InvalidParam {
            name: "f".to_string(),
            param: String::new(),
            line: 1
        })
    );
    assert_eq!(
        scan("def f(a = 1) { a }"),
        Err(ScanError::InvalidParam {
            name: "f".to_string(),
            param: "a = 1".to_string(),
            line: 1
        })
    );
    assert_eq!(
        scan("def f(9lives) { 1 }"),
        Err(ScanError::InvalidParam {
            name: "f".to_string(),
            param: "9lives".to_string(),
            line: 1
        })
    );
}

#[test]
fn generic_parameter_types_keep_their_commas() {
    let procedures = scan("def f(Map<String, Object> m, List<Map<String, Integer>> rows, n) { m }")
        .expect("generic parameter types should scan");

    assert_eq!(
        procedures[0].1,
        ["m".to_string(), "rows".to_string(), "n".to_string()]
    );
}

#[test]
fn malformed_generic_types_are_rejected() {
    assert_eq!(
        scan("def f(Map<String m) { m }"),
        Err(ScanError::InvalidParam {
            name: "f".to_string(),
            param: "Map<String m".to_string(),
            line: 1
        })
    );
    assert_eq!(
        scan("def f(String extra m) { m }"),
        Err(ScanError::InvalidParam {
            name: "f".to_string(),
            param: "String extra m".to_string(),
            line: 1
        })
    );
}

#[test]
fn large_scripts_scan_in_linear_time() {
    let literals = "'abcdefgh' /* c */ ".repeat(40_000);
    let text = format!("def big() {{\n{literals}\n}}\n");

    let started = std::time::Instant::now();
    let procedures = scan(&text).expect("large script should scan");
    let elapsed = started.elapsed();

    assert_eq!(procedures.len(), 1);
    assert!(
        elapsed < std::time::Duration::from_secs(2),
        "scanning {} bytes took {elapsed:?}",
        text.len()
    );

    let broken = format!("{text}def tail() {{\n'open\n}}");
    assert_eq!(
        scan(&broken),
        Err(ScanError::UnterminatedString { line: 5 })
    );
}

#[test]
fn unterminated_constructs_fail_loudly() {
    assert_eq!(
        scan("def f() {\n  g.V()\n"),
        Err(ScanError::UnterminatedBody {
            name: "f".to_string(),
            line: 1
        })
    );
    assert_eq!(
        scan("def f() {\n  'abc\n}"),
        Err(ScanError::UnterminatedString { line: 2 })
    );
    assert_eq!(
        scan("def f() { \"\"\" never closed }"),
        Err(ScanError::UnterminatedString { line: 1 })
    );
    assert_eq!(
        scan("/* open\ndef f() { 1 }"),
        Err(ScanError::UnterminatedComment { line: 1 })
    );
}

#[test]
fn duplicate_names_fail_without_partial_results() {
    let err = scan("def f() { 1 }\ndef g() { 2 }\ndef f() { 3 }")
        .expect_err("duplicate names should fail");

    assert_eq!(
        err,
        ScanError::DuplicateProcedure {
            name: "f".to_string(),
            line: 3
        }
    );
}
