use automover::{match_name, match_tag, match_yaml, FileMetadata, Router, RuleChain};

fn main() {
    tracing_subscriber::fmt::init();

    let chains = vec![
        RuleChain::new("Journal").step(match_name(r"^(\d{4})-\d{2}-\d{2}\.md$").to("Journal/$1")),
        RuleChain::new("Projects")
            .step(match_tag(r"#proj/(\w+)").to("Projects/$1"))
            .step(match_yaml("Status", "(.+)").to("$1").optional()),
    ];

    let router = Router::new();
    let files = [
        FileMetadata::new("2024-01-01.md"),
        FileMetadata::new("kickoff.md")
            .tag("#proj/atlas")
            .set("Status", "Active"),
        FileMetadata::new("scratch.md"),
    ];

    for file in &files {
        match router.select_destination(&chains, file) {
            Some(folder) => println!("{} -> {folder}", file.name()),
            None => println!("{} stays put", file.name()),
        }
    }
}
