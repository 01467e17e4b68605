use automover::{match_name, match_yaml, parse_chains, FileMetadata, Router, RuleChain, StepKind};

const RULES: &str = r##"
# Daily notes first.
chain "Journal":
    name "^(\d{4})-\d{2}-\d{2}\.md$" -> "Journal/$1"

chain "Projects":
    tag "#proj/(\w+)" -> "Projects/$1"
    yaml Status "(.+)" -> "$1" optional

chain "Archive" disabled:
    name ".*" -> "Archive"

chain "Loose" continue_on_failure:
    yaml "due date" "^(\d{4})" -> "Due/$1"
    name "^(\w)" -> "$1"
"##;

#[test]
fn parse_and_route() {
    let chains = parse_chains(RULES).unwrap();
    assert_eq!(chains.len(), 4);
    assert!(!chains[2].active);
    assert!(chains[3].continue_on_failure);
    assert_eq!(chains[3].steps[0].kind, StepKind::Yaml);
    assert_eq!(chains[3].steps[0].key.as_deref(), Some("due date"));

    let router = Router::new();
    let route = |file: &FileMetadata| router.select_destination(&chains, file);

    assert_eq!(
        route(&FileMetadata::new("2024-01-01.md")).as_deref(),
        Some("Journal/2024")
    );
    assert_eq!(
        route(&FileMetadata::new("n.md").tag("#proj/atlas")).as_deref(),
        Some("Projects/atlas")
    );
    assert_eq!(
        route(&FileMetadata::new("notes.md").set("due date", "2025-02-01")).as_deref(),
        Some("Due/2025/n")
    );
    assert_eq!(route(&FileMetadata::new("notes.md")).as_deref(), Some("n"));
}

#[test]
fn display_round_trips() {
    let chains = parse_chains(RULES).unwrap();
    let text: String = chains.iter().map(|c| format!("{c}\n")).collect();
    let again = parse_chains(&text).unwrap();
    assert_eq!(again, chains);
}

#[test]
fn quotes_and_backslashes_round_trip() {
    let input = r#"chain "say \"hi\"":
    yaml "odd key" "a\\b\"c" -> "F\\G""#;
    let chains = parse_chains(input).unwrap();
    assert_eq!(chains[0].name, "say \"hi\"");
    assert_eq!(chains[0].steps[0].pattern, r#"a\b"c"#);

    let again = parse_chains(&chains[0].to_string()).unwrap();
    assert_eq!(again, chains);
}

#[test]
fn keys_round_trip_for_every_step_kind() {
    let mut keyless = match_yaml("k", "x").to("X").optional();
    keyless.key = None;
    let mut empty_key = match_yaml("k", "x").to("X");
    empty_key.key = Some(String::new());
    let mut underscore = match_yaml("k", "x").to("X");
    underscore.key = Some("_".to_owned());
    let mut keyed_name = match_name("x").to("X");
    keyed_name.key = Some("Status".to_owned());

    let chain = RuleChain::new("keys")
        .step(keyless)
        .step(empty_key)
        .step(underscore)
        .step(keyed_name)
        .step(match_name("x").to("X"));

    let again = parse_chains(&chain.to_string()).unwrap();
    assert_eq!(again, [chain]);
}

#[test]
fn settings_chains_survive_notation() {
    let settings = automover::Settings::from_json(
        r#"{"ruleChains": [{"name": "s", "steps": [
            {"type": "yaml", "pattern": "x", "folder": "X", "optional": true},
            {"type": "name", "key": "Status", "pattern": "y", "folder": "Y"}
        ]}]}"#,
    )
    .unwrap();
    let text = settings.rule_chains[0].to_string();
    assert_eq!(parse_chains(&text).unwrap(), settings.rule_chains);
}

#[test]
fn error_mentions_what_was_expected() {
    let err = parse_chains("chain \"c\":\n    name \"x\" \"X\"").unwrap_err();
    assert!(err.to_string().starts_with("parse error:"));
    assert!(err.to_string().contains("->"), "{err}");
}

#[test]
fn trailing_garbage_is_rejected() {
    assert!(parse_chains("chain \"c\":\n    name \"x\" -> \"X\"\nbogus").is_err());
}

#[test]
fn parse_chains_file_reads_from_disk() {
    let path = std::env::temp_dir().join(format!("automover-notation-{}.rules", std::process::id()));
    std::fs::write(&path, RULES).unwrap();
    let chains = automover::parse_chains_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(chains.len(), 4);
}

#[test]
fn parse_chains_file_missing_is_io_error() {
    let err = automover::parse_chains_file("/nonexistent/automover.rules").unwrap_err();
    assert!(matches!(err, automover::AutomoverError::Io(_)));
}
