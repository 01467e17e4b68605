use automover::{match_name, match_tag, FileMetadata, Router, Settings};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let settings = Settings::from_json(
        r#"{
            "ruleChains": [
                {"name": "Archive", "active": false, "steps": []},
                {"name": "Reading", "steps": [
                    {"type": "yaml", "key": "Type", "pattern": "^book$", "folder": "Reading"}
                ]}
            ]
        }"#,
    )
    .expect("invalid settings");

    let mut chains = settings.rule_chains;
    chains.push(
        automover::RuleChain::new("Areas")
            .step(match_tag(r"#area/(\w+)").to("Areas/$1"))
            .step(match_name(r"^(\w)").to("$1")),
    );

    let file = FileMetadata::new("garden.md").tag("#area/home");
    let report = Router::new().route_detailed(&chains, &file);

    println!("{report}");
    for trace in report.visited() {
        println!("  #{} {:<8} {}", trace.position, trace.name, trace.outcome);
    }
}
