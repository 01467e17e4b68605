use automover::{match_name, match_tag, FileMetadata, Router, RuleChain};

fn main() {
    tracing_subscriber::fmt::init();

    // Both chains match a tagged daily note; the earlier one wins.
    let chains = vec![
        RuleChain::new("Tagged").step(match_tag(r"#(\w+)").to("Tags/$1")),
        RuleChain::new("Journal").step(match_name(r"^(\d{4})-").to("Journal/$1")),
    ];
    let file = FileMetadata::new("2024-06-01.md").tag("#travel");

    let router = Router::new();
    if let Some(dest) = router.route(&chains, &file) {
        println!("tagged first:  {dest}");
    }

    let reversed: Vec<RuleChain> = chains.into_iter().rev().collect();
    if let Some(dest) = router.route(&reversed, &file) {
        println!("journal first: {dest}");
    }

    // An inactive chain is skipped entirely.
    let mut muted = reversed;
    muted[0].active = false;
    if let Some(dest) = router.route(&muted, &file) {
        println!("journal muted: {dest}");
    }
}
