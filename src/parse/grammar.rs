use winnow::ascii::till_line_ending;
use winnow::combinator::{alt, cut_err, opt, peek, preceded, repeat, terminated};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::{RuleChain, RuleStep, StepKind};

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

// -- Identifiers & strings --------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1, |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
        }),
    )
        .take()
        .parse_next(input)
}

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    // regex escapes such as \d or \. pass through untouched
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

/// A step key. A bare `_` stands for "no key"; a quoted `"_"` is the literal key.
fn key(input: &mut &str) -> ModalResult<Option<String>> {
    alt((
        string_literal.map(Some),
        ident.map(|id| (id != "_").then(|| id.to_owned())),
    ))
        .context(StrContext::Expected(StrContextValue::Description(
            "frontmatter key",
        )))
        .parse_next(input)
}

fn quoted(what: &'static str) -> impl FnMut(&mut &str) -> ModalResult<String> {
    move |input: &mut &str| {
        ws.parse_next(input)?;
        cut_err(string_literal)
            .context(StrContext::Expected(StrContextValue::Description(what)))
            .parse_next(input)
    }
}

// -- Steps ------------------------------------------------------------------

fn step_kind(input: &mut &str) -> ModalResult<StepKind> {
    alt((
        "name".value(StepKind::Name),
        "tag".value(StepKind::Tag),
        "yaml".value(StepKind::Yaml),
    ))
    .parse_next(input)
}

fn step_def(input: &mut &str) -> ModalResult<RuleStep> {
    ws.parse_next(input)?;
    let kind = step_kind.parse_next(input)?;

    let key = if kind == StepKind::Yaml {
        ws.parse_next(input)?;
        cut_err(key).parse_next(input)?
    } else {
        // name and tag steps may carry a key too; it is only present when
        // another string follows it
        opt(terminated(preceded(ws, key), peek((ws, '"'))))
            .parse_next(input)?
            .flatten()
    };

    let pattern = quoted("pattern").parse_next(input)?;

    ws.parse_next(input)?;
    cut_err("->")
        .context(StrContext::Expected(StrContextValue::StringLiteral("->")))
        .parse_next(input)?;

    let folder = quoted("folder template").parse_next(input)?;
    let optional = opt((ws, "optional")).parse_next(input)?.is_some();

    Ok(RuleStep {
        kind,
        key,
        pattern,
        folder,
        optional,
    })
}

// -- Chains -----------------------------------------------------------------

#[derive(Clone, Copy)]
enum Flag {
    Disabled,
    ContinueOnFailure,
}

fn flag(input: &mut &str) -> ModalResult<Flag> {
    ws.parse_next(input)?;
    alt((
        "disabled".value(Flag::Disabled),
        "continue_on_failure".value(Flag::ContinueOnFailure),
    ))
    .parse_next(input)
}

fn chain_def(input: &mut &str) -> ModalResult<RuleChain> {
    ws.parse_next(input)?;
    "chain".parse_next(input)?;

    let name = quoted("chain name").parse_next(input)?;
    let flags: Vec<Flag> = repeat(0.., flag).parse_next(input)?;

    ws.parse_next(input)?;
    cut_err(':').parse_next(input)?;

    let steps: Vec<RuleStep> = repeat(0.., step_def).parse_next(input)?;

    let mut chain = RuleChain::new(&name);
    chain.steps = steps;
    for flag in flags {
        match flag {
            Flag::Disabled => chain.active = false,
            Flag::ContinueOnFailure => chain.continue_on_failure = true,
        }
    }
    Ok(chain)
}

// -- Top-level parser -------------------------------------------------------

pub fn parse_chain_list(input: &mut &str) -> ModalResult<Vec<RuleChain>> {
    let chains: Vec<RuleChain> = repeat(0.., chain_def).parse_next(input)?;
    ws.parse_next(input)?;
    Ok(chains)
}

#[cfg(test)]
mod tests {
    use crate::parse::parse_chains;

    use super::*;

    #[test]
    fn parse_single_chain() {
        let chains = parse_chains("chain \"Journal\":\n    name \"^j\" -> \"Journal\"").unwrap();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].name, "Journal");
        assert!(chains[0].active);
        assert!(!chains[0].continue_on_failure);
        assert_eq!(chains[0].steps.len(), 1);
        assert_eq!(chains[0].steps[0].kind, StepKind::Name);
        assert_eq!(chains[0].steps[0].folder, "Journal");
    }

    #[test]
    fn parse_flags_in_any_order() {
        let chains = parse_chains(
            "chain \"a\" continue_on_failure disabled:\nchain \"b\" disabled:",
        )
        .unwrap();
        assert!(!chains[0].active);
        assert!(chains[0].continue_on_failure);
        assert!(!chains[1].active);
        assert!(!chains[1].continue_on_failure);
    }

    #[test]
    fn parse_all_step_kinds() {
        let input = r##"chain "c":
    name "n" -> "N"
    tag "#t/(\w+)" -> "T/$1"
    yaml Status "(.+)" -> "$1" optional
    yaml "due date" ".+" -> "Due""##;
        let chain = &parse_chains(input).unwrap()[0];
        let kinds: Vec<StepKind> = chain.steps.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            [StepKind::Name, StepKind::Tag, StepKind::Yaml, StepKind::Yaml]
        );
        assert_eq!(chain.steps[1].pattern, r"#t/(\w+)");
        assert_eq!(chain.steps[2].key.as_deref(), Some("Status"));
        assert!(chain.steps[2].optional);
        assert!(!chain.steps[3].optional);
        assert_eq!(chain.steps[3].key.as_deref(), Some("due date"));
        assert_eq!(chain.steps[0].key, None);
    }

    #[test]
    fn parse_empty_chain() {
        let chains = parse_chains("chain \"empty\":").unwrap();
        assert!(chains[0].steps.is_empty());
    }

    #[test]
    fn parse_empty_input() {
        assert!(parse_chains("").unwrap().is_empty());
        assert!(parse_chains("  # only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn comments_do_not_eat_tags_in_strings() {
        let input = "# header\nchain \"c\": # trailing\n    tag \"#proj\" -> \"P\" # note\n";
        let chain = &parse_chains(input).unwrap()[0];
        assert_eq!(chain.steps[0].pattern, "#proj");
    }

    #[test]
    fn string_escapes() {
        let chain = &parse_chains(r#"chain "a\"b": name "x\\y\.z" -> "f""#).unwrap()[0];
        assert_eq!(chain.name, "a\"b");
        assert_eq!(chain.steps[0].pattern, r"x\y\.z");
    }

    #[test]
    fn keyless_and_keyed_steps() {
        let input = r##"chain "c":
    yaml _ "x" -> "X"
    yaml "" "x" -> "X"
    yaml "_" "x" -> "X"
    name Status "x" -> "X"
    tag "due date" "#t" -> "T"
    tag "#t" -> "T""##;
        let steps = &parse_chains(input).unwrap()[0].steps;
        let keys: Vec<Option<&str>> = steps.iter().map(|s| s.key.as_deref()).collect();
        assert_eq!(
            keys,
            [None, Some(""), Some("_"), Some("Status"), Some("due date"), None]
        );
        assert_eq!(steps[4].pattern, "#t");
        assert_eq!(steps[5].pattern, "#t");
    }

    #[test]
    fn missing_arrow_is_error() {
        assert!(parse_chains("chain \"c\":\n    name \"x\" \"X\"").is_err());
    }

    #[test]
    fn yaml_without_key_is_error() {
        assert!(parse_chains("chain \"c\":\n    yaml \"x\" -> \"X\"").is_err());
    }

    #[test]
    fn unknown_step_kind_is_error() {
        assert!(parse_chains("chain \"c\":\n    path \"x\" -> \"X\"").is_err());
    }

    #[test]
    fn missing_colon_is_error() {
        assert!(parse_chains("chain \"c\"\n    name \"x\" -> \"X\"").is_err());
    }
}
