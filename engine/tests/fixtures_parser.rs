use std::fs;
use std::path::PathBuf;

use listrank_core::{DialectId, RankOutcome, ResolutionMode, Target};
use listrank_engine::parser::ResponseParser;
use listrank_engine::workflow::analyze;
use listrank_engine::{parse, resolve, resolve_raw};

#[test]
fn test_parse_openai_fixture_keeps_whole_item_text_as_name() {
    let text = fixture("openai.txt");
    let (parsed, stats) =
        ResponseParser::new(DialectId::PermissiveNumbered).parse_with_stats(&text);

    assert_eq!(parsed.len(), 4);
    let neosync = &parsed.entities()[0];
    assert!(neosync.name.starts_with("Neosync - Open-source platform"));
    assert_eq!(neosync.url, "https://www.neosync.dev");

    let gretel = &parsed.entities()[2];
    assert_eq!(gretel.url, "https://gretel.ai");
    assert_eq!(gretel.description, "Website:");

    let mockaroo = &parsed.entities()[3];
    assert_eq!(
        mockaroo.description,
        "These tools vary in pricing and deployment options."
    );

    assert_eq!(stats.relevant_lines, 7);
    assert_eq!(stats.item_lines, 4);
    assert_eq!(stats.continuation_lines, 2);
    assert_eq!(stats.orphan_lines, 1);
}

#[test]
fn test_parse_claude_fixture_only_takes_trailing_urls() {
    let text = fixture("claude.txt");
    let parsed = parse(&text, DialectId::NumberedParen);

    let names: Vec<&str> = parsed.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Tonic.ai", "Neosync", "Delphix", "Mockaroo"]);

    assert_eq!(parsed.entities()[0].url, "https://www.tonic.ai");
    // The URL sits mid-line, so it stays in the description.
    assert_eq!(parsed.entities()[1].url, "");
    assert!(parsed.entities()[1].description.contains("https://www.neosync.dev"));

    let delphix = &parsed.entities()[2];
    assert_eq!(delphix.url, "https://www.delphix.com");
    assert_eq!(
        delphix.description,
        "Data virtualization with built-in masking. Learn more at"
    );

    let mockaroo = &parsed.entities()[3];
    assert_eq!(mockaroo.url, "https://www.mockaroo.com");
    assert!(mockaroo.description.starts_with("quick mock datasets for prototyping Each of"));
}

#[test]
fn test_parse_perplexity_fixture_mixes_bullet_styles() {
    let text = fixture("perplexity.txt");
    let (parsed, stats) =
        ResponseParser::new(DialectId::NumberedOrBulleted).parse_with_stats(&text);

    let names: Vec<&str> = parsed.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Tonic.ai", "Neosync", "Gretel", "Mostly AI"]);
    assert_eq!(parsed.entities()[1].url, "https://www.neosync.dev");
    assert_eq!(parsed.entities()[2].url, "https://gretel.ai");
    assert_eq!(
        parsed.entities()[2].description,
        "Privacy engineering platform with synthetic data APIs"
    );
    assert_eq!(parsed.entities()[3].url, "https://www.tonic.ai/blog");

    assert_eq!(stats.relevant_lines, 7);
    assert_eq!(stats.item_lines, 4);
    assert_eq!(stats.orphan_lines, 1);
}

#[test]
fn test_fixture_ranks_per_dialect() {
    use RankOutcome::{NotMentioned, Position};

    let cases = [
        ("openai.txt", DialectId::PermissiveNumbered, "https://www.neosync.dev", Position(1)),
        ("openai.txt", DialectId::PermissiveNumbered, "gretel.ai", Position(3)),
        ("claude.txt", DialectId::NumberedParen, "neosync.dev", Position(2)),
        ("claude.txt", DialectId::NumberedParen, "delphix.com", Position(3)),
        ("perplexity.txt", DialectId::NumberedOrBulleted, "tonic.ai", Position(1)),
        ("perplexity.txt", DialectId::NumberedOrBulleted, "mostly.ai", Position(4)),
        ("perplexity.txt", DialectId::NumberedOrBulleted, "delphix.com", NotMentioned),
    ];

    for (name, dialect, domain, expected) in cases {
        let target = Target::from_domain(domain);
        let parsed = parse(&fixture(name), dialect);
        assert_eq!(
            resolve(&target.domain, &target.brand, &parsed),
            expected,
            "{name} with {domain}"
        );
    }
}

#[test]
fn test_raw_mode_agrees_on_well_formed_numbered_list() {
    let text = fixture("openai.txt");
    let parsed = parse(&text, DialectId::PermissiveNumbered);

    for domain in ["neosync.dev", "tonic.ai", "gretel.ai", "mockaroo.com", "unknown.example"] {
        let target = Target::from_domain(domain);
        assert_eq!(
            resolve(&target.domain, &target.brand, &parsed),
            resolve_raw(&target.domain, &target.brand, &text),
            "{domain}"
        );
    }
}

#[test]
fn test_wrong_dialect_falls_back_to_raw_lines() {
    let text = fixture("claude.txt");
    let target = Target::from_domain("neosync.dev");
    let analysis = analyze(&text, DialectId::PermissiveNumbered, &target);

    assert!(analysis.entities.is_empty());
    assert_eq!(analysis.mode, ResolutionMode::RawLine);
    assert_eq!(analysis.outcome, RankOutcome::Position(2));
}

#[test]
fn test_parse_is_deterministic_across_fixtures() {
    for (name, dialect) in [
        ("openai.txt", DialectId::PermissiveNumbered),
        ("claude.txt", DialectId::NumberedParen),
        ("perplexity.txt", DialectId::NumberedOrBulleted),
    ] {
        let text = fixture(name);
        assert_eq!(parse(&text, dialect), parse(&text, dialect), "{name}");
        let crlf = text.replace('\n', "\r\n");
        assert_eq!(parse(&crlf, dialect), parse(&text, dialect), "{name} with CRLF");
    }
}

#[test]
fn test_scenario_numbered_with_urls() {
    let text = "1. Acme Tool - a widget. https://acme.io\n2. Beta - other. https://beta.io";
    let parsed = parse(text, DialectId::PermissiveNumbered);

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed.entities()[0].url, "https://acme.io");
    assert_eq!(parsed.entities()[1].url, "https://beta.io");
    assert_eq!(resolve("acme.io", "Acme", &parsed), RankOutcome::Position(1));
}

#[test]
fn test_scenario_bulleted_bare_domain_mention() {
    let text = "* Gizmo (https://gizmo.com) does X\n* Acme handles Y things, see acme.io";
    let parsed = parse(text, DialectId::NumberedOrBulleted);

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed.entities()[0].url, "https://gizmo.com");
    assert_eq!(parsed.entities()[1].url, "");
    assert_eq!(resolve("acme.io", "Acme", &parsed), RankOutcome::Position(2));
}

#[test]
fn test_scenario_empty_text() {
    for dialect in DialectId::ALL {
        let parsed = parse("", dialect);
        assert!(parsed.is_empty());
        assert_eq!(resolve("acme.io", "Acme", &parsed), RankOutcome::NotMentioned);
    }
    assert_eq!(resolve_raw("acme.io", "Acme", ""), RankOutcome::NotMentioned);
}

#[test]
fn test_scenario_unenumerated_mention() {
    let text = "Acme is a popular choice for many teams.";
    assert!(parse(text, DialectId::NumberedOrBulleted).is_empty());
    assert_eq!(
        resolve_raw("acme.io", "Acme", text),
        RankOutcome::MentionedUnranked
    );
}

#[test]
fn test_scenario_raw_prefers_enumerated_match() {
    let text = "Acme is widely known.\n1. Beta\n2. Acme";
    assert_eq!(resolve_raw("acme.io", "Acme", text), RankOutcome::Position(2));
}

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("fixture file must be readable")
}
