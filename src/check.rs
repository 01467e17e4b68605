use crate::pattern::PatternCache;
use crate::types::{ChainIssue, RuleChain, StepKind};

pub(crate) fn check(cache: &PatternCache, chains: &[RuleChain]) -> Vec<ChainIssue> {
    let mut issues = Vec::new();

    for chain in chains {
        if chain.steps.is_empty() {
            issues.push(ChainIssue::EmptyChain {
                chain: chain.name.clone(),
            });
        }

        for (index, step) in chain.steps.iter().enumerate() {
            let matcher = cache.compile(&step.pattern);
            if let Some(message) = matcher.error() {
                issues.push(ChainIssue::InvalidPattern {
                    chain: chain.name.clone(),
                    step: index,
                    pattern: step.pattern.clone(),
                    message: message.to_owned(),
                });
                continue;
            }

            if step.kind == StepKind::Yaml && step.key.as_deref().map_or(true, str::is_empty) {
                issues.push(ChainIssue::MissingKey {
                    chain: chain.name.clone(),
                    step: index,
                });
            }

            let groups = matcher.group_count();
            for (placeholder, n) in placeholders(&step.folder) {
                if (1..=groups).contains(&n) {
                    continue;
                }
                let issue = match shadowing_prefix(placeholder, groups) {
                    Some(shadowed_by) => ChainIssue::ShadowedPlaceholder {
                        chain: chain.name.clone(),
                        step: index,
                        placeholder: placeholder.to_owned(),
                        shadowed_by: shadowed_by.to_owned(),
                        groups,
                    },
                    None => ChainIssue::UnboundPlaceholder {
                        chain: chain.name.clone(),
                        step: index,
                        placeholder: placeholder.to_owned(),
                        groups,
                    },
                };
                issues.push(issue);
            }
        }
    }

    issues
}

/// The shortest proper prefix of `placeholder` that names a real group.
/// Rendering substitutes lower indices first, so that prefix is rewritten
/// before the full token is ever considered.
fn shadowing_prefix(placeholder: &str, groups: usize) -> Option<&str> {
    (2..placeholder.len()).map(|end| &placeholder[..end]).find(|prefix| {
        prefix[1..]
            .parse::<usize>()
            .is_ok_and(|n| (1..=groups).contains(&n))
    })
}

/// Every `$<digits>` token in a folder template, with its parsed index.
fn placeholders(template: &str) -> Vec<(&str, usize)> {
    let mut out = Vec::new();
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' {
            let digits = bytes[i + 1..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count();
            if digits > 0 {
                let token = &template[i..=i + digits];
                if let Ok(n) = token[1..].parse::<usize>() {
                    out.push((token, n));
                }
                i += digits + 1;
                continue;
            }
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{match_name, match_yaml};

    #[test]
    fn clean_chains_have_no_issues() {
        let chains = vec![RuleChain::new("ok")
            .step(match_name(r"^(\d{4})-(\d{2})").to("Journal/$1/$2"))
            .step(match_yaml("Status", ".+").to("Status"))];
        assert!(check(&PatternCache::new(), &chains).is_empty());
    }

    #[test]
    fn reports_invalid_pattern_and_skips_other_step_checks() {
        let chains = vec![RuleChain::new("bad").step(match_name("(").to("$3"))];
        let issues = check(&PatternCache::new(), &chains);
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0],
            ChainIssue::InvalidPattern { chain, step: 0, pattern, .. } if chain == "bad" && pattern == "("
        ));
    }

    #[test]
    fn reports_missing_key() {
        let mut step = match_yaml("k", ".*").to("K");
        step.key = None;
        let chains = vec![RuleChain::new("c").step(step)];
        assert_eq!(
            check(&PatternCache::new(), &chains),
            [ChainIssue::MissingKey {
                chain: "c".into(),
                step: 0
            }]
        );
    }

    #[test]
    fn reports_unbound_placeholders() {
        let chains = vec![RuleChain::new("c").step(match_name("(a)").to("$1/$2/$0"))];
        let issues = check(&PatternCache::new(), &chains);
        let placeholders: Vec<&str> = issues
            .iter()
            .filter_map(|i| match i {
                ChainIssue::UnboundPlaceholder { placeholder, .. } => Some(placeholder.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(placeholders, ["$2", "$0"]);
    }

    #[test]
    fn ten_past_group_count_is_shadowed_by_one() {
        let chains = vec![RuleChain::new("c").step(match_name("(a)(b)").to("$10/$23/$30"))];
        let issues = check(&PatternCache::new(), &chains);
        assert_eq!(
            issues,
            [
                ChainIssue::ShadowedPlaceholder {
                    chain: "c".into(),
                    step: 0,
                    placeholder: "$10".into(),
                    shadowed_by: "$1".into(),
                    groups: 2,
                },
                ChainIssue::ShadowedPlaceholder {
                    chain: "c".into(),
                    step: 0,
                    placeholder: "$23".into(),
                    shadowed_by: "$2".into(),
                    groups: 2,
                },
                ChainIssue::UnboundPlaceholder {
                    chain: "c".into(),
                    step: 0,
                    placeholder: "$30".into(),
                    groups: 2,
                },
            ]
        );
    }

    #[test]
    fn reports_empty_chain() {
        let issues = check(&PatternCache::new(), &[RuleChain::new("empty")]);
        assert_eq!(
            issues,
            [ChainIssue::EmptyChain {
                chain: "empty".into()
            }]
        );
    }

    #[test]
    fn check_warms_the_cache() {
        let cache = PatternCache::new();
        check(&cache, &[RuleChain::new("c").step(match_name("x").to("X"))]);
        assert!(cache.contains("x"));
    }

    #[test]
    fn placeholder_scan() {
        assert_eq!(placeholders("A/$1/$12/$/x$"), [("$1", 1), ("$12", 12)]);
        assert!(placeholders("plain").is_empty());
    }
}
