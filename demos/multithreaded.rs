use std::sync::Arc;
use std::thread;

use automover::{match_name, match_tag, FileMetadata, Router, RuleChain};

fn main() {
    tracing_subscriber::fmt::init();

    let chains = Arc::new(vec![
        RuleChain::new("Journal").step(match_name(r"^(\d{4})-").to("Journal/$1")),
        RuleChain::new("Projects").step(match_tag(r"#proj/(\w+)").to("Projects/$1")),
    ]);
    let router = Router::new();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let router = router.clone();
            let chains = Arc::clone(&chains);
            thread::spawn(move || {
                let files: Vec<FileMetadata> = (0..3)
                    .map(|j| {
                        FileMetadata::new(format!("note-{i}-{j}.md"))
                            .at(format!("Inbox/note-{i}-{j}.md"))
                            .tag(format!("#proj/p{j}"))
                    })
                    .collect();
                router.plan_moves(&chains, &files)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        for plan in handle.join().expect("worker panicked") {
            println!("thread {i}: {plan}");
        }
    }
    println!("{router}");
}
