use std::io;
use std::sync::{Arc, Mutex};

use automover::{match_name, match_yaml, ChainIssue, FileMetadata, Router, RuleChain};

/// A `MakeWriter` target that keeps everything written to it.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn captured<F: FnOnce()>(f: F) -> String {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    capture.contents()
}

#[test]
fn invalid_pattern_is_reported_once() {
    let router = Router::new();
    let chains = vec![RuleChain::new("broken").step(match_name("(unclosed").to("X"))];

    let output = captured(|| {
        for name in ["a.md", "b.md", "c.md"] {
            assert_eq!(router.select_destination(&chains, &FileMetadata::new(name)), None);
        }
    });

    assert_eq!(output.matches("invalid pattern").count(), 1, "{output}");
    assert!(output.contains("WARN"));
    assert!(output.contains("(unclosed"));
}

#[test]
fn valid_patterns_log_no_warnings() {
    let router = Router::new();
    let chains = vec![RuleChain::new("ok").step(match_name(".*").to("X"))];
    let output = captured(|| {
        let _ = router.select_destination(&chains, &FileMetadata::new("a.md"));
    });
    assert!(!output.contains("WARN"), "{output}");
}

#[test]
fn diagnostics_list_invalid_patterns() {
    let router = Router::new();
    let _ = router.cache().compile("[z-a]");
    let _ = router.cache().compile("ok");
    let _ = router.cache().compile("(a");

    let diags = router.cache().diagnostics();
    let patterns: Vec<&str> = diags.iter().map(|d| d.pattern.as_str()).collect();
    assert_eq!(patterns, ["(a", "[z-a]"]);
    assert!(diags.iter().all(|d| !d.message.is_empty()));
    assert_eq!(router.to_string(), "Router(3 cached patterns, 2 invalid)");
}

#[test]
fn check_reports_chain_problems() {
    let router = Router::new();
    let mut keyless = match_yaml("k", ".*").to("K");
    keyless.key = None;
    let chains = vec![
        RuleChain::new("empty"),
        RuleChain::new("bad").step(match_name("(").to("X")),
        RuleChain::new("keyless").step(keyless),
        RuleChain::new("unbound").step(match_name(r"^(\w+)").to("$1/$2")),
        RuleChain::new("fine").step(match_name(r"^(\w+)").to("$1")),
    ];

    let issues = router.check(&chains);
    assert_eq!(issues.len(), 4, "{issues:?}");
    assert!(matches!(issues[0], ChainIssue::EmptyChain { .. }));
    assert!(matches!(issues[1], ChainIssue::InvalidPattern { .. }));
    assert!(matches!(issues[2], ChainIssue::MissingKey { .. }));
    assert!(matches!(issues[3], ChainIssue::UnboundPlaceholder { .. }));
}
