use std::io::Write;

use blockgraph::Program;
use generator::Generator;

/// Loading a workspace export from disk and generating from it is the
/// whole pipeline the CLI drives.
#[test]
fn generates_from_a_workspace_file() {
    let source = r#"{
  "variables": ["greeting"],
  "blocks": [
    {
      "kind": "variables_set",
      "fields": {"VAR": "greeting"},
      "inputs": {"VALUE": {"kind": "text", "fields": {"TEXT": "hello"}}},
      "next": {
        "kind": "text_print",
        "inputs": {"TEXT": {"kind": "variables_get", "fields": {"VAR": "greeting"}}}
      }
    }
  ]
}"#;
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(source.as_bytes()).expect("write failed");

    let loaded = std::fs::read_to_string(file.path()).expect("read failed");
    let program = Program::from_json(&loaded).expect("parse failed");
    let code = Generator::new()
        .workspace_to_code(&program)
        .expect("generation failed");
    assert_eq!(
        code,
        "var greeting;\n\n\ngreeting := 'hello'\nwindow.alert(greeting);\n"
    );
}
