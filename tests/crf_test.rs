#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use ingredients_parser::{CrfTestTagger, IngredientParser, ParserConfig, Tagger, TaggerError};

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

// One test so no other thread forks while a script is still open for writing.
#[test]
fn runs_crf_test_binary() {
    let dir = tempfile::tempdir().unwrap();

    // Echo the input table back with a tag column appended to each row.
    let echo = write_script(
        dir.path(),
        "crf_test_ok",
        r##"[ "$1" = "-v" ] && [ "$2" = "1" ] && [ "$3" = "-m" ] || exit 2
echo "# 0.5"
awk -F'\t' '{ if ($0 == "") print ""; else if ($1 ~ /^[0-9]/) print $0 "\tB-QTY/0.9"; else print $0 "\tB-NAME/0.8" }' "$5"
echo ""
"##,
    );
    let tagger = CrfTestTagger::new(&echo);
    let output = tagger
        .tag(Path::new("/path/to/model"), "2\tI1\tL4\tNoCAP\tNoPAREN\n")
        .expect("crf_test succeeds");
    assert!(output.starts_with("# 0.5\n2\tI1\tL4\tNoCAP\tNoPAREN\tB-QTY/0.9\n"));

    let config = ParserConfig::from_json(
        format!(
            r#"{{"modelfilepath": "/path/to/model", "crftestpath": "{}"}}"#,
            echo.display()
        )
        .as_bytes(),
    )
    .unwrap();
    let parser = IngredientParser::new(config).unwrap();
    let ingredients = parser.parse("2 eggs").expect("parse succeeds");
    assert_eq!(ingredients.len(), 1);
    assert_eq!(ingredients[0].quantity(), Some("2"));
    assert_eq!(ingredients[0].names(), ["eggs"]);

    // Warnings on stderr from a successful run never reach the decoder.
    let noisy = write_script(
        dir.path(),
        "crf_test_noisy",
        "echo 'warning: model is old' >&2\necho '2\tB-QTY/0.9'\necho 'eggs\tB-NAME/0.8'\necho ''\n",
    );
    let output = CrfTestTagger::new(&noisy)
        .tag(Path::new("/path/to/model"), "2\tI1\tL4\tNoCAP\tNoPAREN\n")
        .expect("crf_test succeeds despite stderr");
    assert!(!output.contains("warning"));
    let config = ParserConfig {
        crf_test_path: Some(noisy.clone()),
        ..ParserConfig::default()
    }
    .with_model("/path/to/model");
    let ingredients = IngredientParser::new(config)
        .unwrap()
        .parse("2 eggs")
        .expect("stderr is not decoded");
    assert_eq!(ingredients.len(), 1);
    assert_eq!(ingredients[0].names(), ["eggs"]);

    let failing = write_script(
        dir.path(),
        "crf_test_fail",
        "echo \"open failed: $4\"\nexit 1\n",
    );
    let err = CrfTestTagger::new(&failing)
        .tag(Path::new("/missing/model"), "salt\n")
        .unwrap_err();
    match &err {
        TaggerError::Failed { status, output } => {
            assert!(!status.unwrap().success());
            assert_eq!(output, "open failed: /missing/model\n");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.to_string(), "open failed: /missing/model\n");
}
