use automover::{parse_chains, FileMetadata, Router};

fn main() {
    tracing_subscriber::fmt::init();

    let input = r##"
        # Dated notes go under their year.
        chain "Journal":
            name "^(\d{4})-" -> "Journal/$1"

        chain "Projects" continue_on_failure:
            tag "#proj/(\w+)" -> "Projects/$1"
            yaml Status "(.+)" -> "$1"
    "##;

    let chains = parse_chains(input).expect("failed to parse chains");
    for chain in &chains {
        println!("{chain}");
    }

    let router = Router::new();
    for issue in router.check(&chains) {
        println!("warning: {issue}");
    }

    let file = FileMetadata::new("atlas.md").set("Status", "Paused");
    println!("{:?}", router.select_destination(&chains, &file));
}
