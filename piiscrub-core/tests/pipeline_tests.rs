// piiscrub-core/tests/pipeline_tests.rs
//! End-to-end tests of scanner → evaluator → redactor on realistic inputs.

use anyhow::Result;
use std::sync::Arc;

use piiscrub_core::{
    scan, ConfidenceTier, ContextRule, ContextRules, Evaluator, NameTrie, NeighborRelationship,
    PatternLexicon, PatternRule, PiiEngine, Redactor, SanitizationEngine, ScrubConfig,
};

fn contact_lexicon_config() -> ScrubConfig {
    ScrubConfig {
        rules: vec![
            PatternRule {
                kind: "email".to_string(),
                pattern: r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}".to_string(),
                ..Default::default()
            },
            PatternRule {
                kind: "phone".to_string(),
                pattern: r"\b\d{3}-\d{3}-\d{4}\b".to_string(),
                ..Default::default()
            },
            PatternRule {
                kind: "name".to_string(),
                pattern: r"\b[A-Za-z]+\b".to_string(),
                dictionary_gated: true,
                ..Default::default()
            },
        ],
        context_rules: vec![ContextRule {
            word: "private".to_string(),
            relationship: NeighborRelationship::FollowedByName,
        }],
        ..Default::default()
    }
}

fn jon_doe() -> Arc<NameTrie> {
    Arc::new(NameTrie::build(["jon", "doe"]))
}

const SAMPLE: &str = "Jon Doe email is jon@example.com and his phone is 556-321-9876";
const MASKED: &str = "*** *** email is *************** and his phone is ************";

#[test_log::test]
fn test_end_to_end_example() -> Result<()> {
    let engine = PiiEngine::new(contact_lexicon_config(), jon_doe())?;
    let redaction = engine.sanitize(SAMPLE)?;

    assert_eq!(redaction.masked, MASKED);

    let found: Vec<(&str, &str)> = redaction
        .report
        .iter()
        .map(|e| (e.kind.as_str(), &SAMPLE[e.start..e.end]))
        .collect();
    assert_eq!(
        found,
        vec![
            ("name", "Jon"),
            ("name", "Doe"),
            ("email", "jon@example.com"),
            ("phone", "556-321-9876"),
        ]
    );
    Ok(())
}

#[test]
fn test_end_to_end_with_default_rules() -> Result<()> {
    let engine = PiiEngine::new(ScrubConfig::load_default_rules()?, jon_doe())?;
    assert_eq!(engine.sanitize(SAMPLE)?.masked, MASKED);
    Ok(())
}

#[test]
fn test_masking_is_idempotent() -> Result<()> {
    let engine = PiiEngine::new(ScrubConfig::load_default_rules()?, jon_doe())?;
    let inputs = [
        SAMPLE,
        "user=doe dob=1984-02-29 ssn=123-45-6789",
        "no pii in here at all",
        "",
    ];
    for input in inputs {
        let once = engine.sanitize(input)?.masked;
        let twice = engine.sanitize(&once)?.masked;
        assert_eq!(once, twice, "re-masking changed {input:?}");
    }
    Ok(())
}

#[test]
fn test_value_glued_to_masked_span_surfaces_on_second_pass() -> Result<()> {
    // The SSN has no word boundary in front of it until the email before it
    // is masked, so only the second pass finds it.
    let engine = PiiEngine::new(ScrubConfig::load_default_rules()?, jon_doe())?;
    let once = engine.sanitize("id jon@x.com123-45-6789")?.masked;
    assert_eq!(once, "id *********123-45-6789");
    let twice = engine.sanitize(&once)?.masked;
    assert_eq!(twice, format!("id {}", "*".repeat(20)));
    assert_eq!(engine.sanitize(&twice)?.masked, twice);
    Ok(())
}

#[test]
fn test_private_rank_rule_through_engine() -> Result<()> {
    let trie = Arc::new(NameTrie::build(["john"]));
    let engine = PiiEngine::new(contact_lexicon_config(), trie)?;

    let detections = engine.detect("Private John")?;
    assert_eq!(detections.len(), 2);
    assert!(detections
        .iter()
        .all(|d| d.kind() == "name" && d.tier() == ConfidenceTier::Heuristic));

    assert!(engine.detect("Private property")?.is_empty());
    assert_eq!(engine.sanitize("Private property")?.masked, "Private property");
    Ok(())
}

#[test]
fn test_short_value_inside_longer_word_is_untouched() -> Result<()> {
    let trie = Arc::new(NameTrie::build(["al"]));
    let engine = PiiEngine::new(contact_lexicon_config(), trie)?;
    let redaction = engine.sanitize("Al sent a signal, al!")?;
    assert_eq!(redaction.masked, "** sent a signal, **!");
    Ok(())
}

#[test]
fn test_scan_candidates_within_bounds_and_ordered() -> Result<()> {
    let lexicon = PatternLexicon::from_config(&ScrubConfig::load_default_rules()?)?;
    let texts = [
        SAMPLE,
        "",
        "   ",
        "name,email,phone\nJane,jane@corp.io,(555) 010-2000\n",
        "ts=2024-01-01T00:00:00Z level=INFO user=\"Zoë Ångström\" dob=02/14/1990",
        "@@@ ... ---",
    ];
    for text in texts {
        let candidates = scan(text, &lexicon);
        for pair in candidates.windows(2) {
            assert!(
                (pair[0].start(), pair[0].rank()) <= (pair[1].start(), pair[1].rank()),
                "unordered candidates in {text:?}"
            );
        }
        for c in &candidates {
            assert!(c.start() < c.end() && c.end() <= text.len());
            assert_eq!(&text[c.start()..c.end()], c.text());
        }
    }
    Ok(())
}

#[test]
fn test_stages_compose_without_engine() -> Result<()> {
    let config = contact_lexicon_config();
    let lexicon = PatternLexicon::from_config(&config)?;
    let context = ContextRules::from_config(&config)?;
    let trie = NameTrie::build(["jon", "doe"]);

    let candidates = scan(SAMPLE, &lexicon);
    let detections = Evaluator::new(&lexicon, &trie, &context).evaluate(&candidates, SAMPLE)?;
    // "jon" inside the address is still a detection here; the redactor drops it.
    assert_eq!(detections.len(), 5);

    let redaction = Redactor::new(config.redaction.clone()).redact(SAMPLE, &detections)?;
    assert_eq!(redaction.masked, MASKED);
    assert_eq!(redaction.report.len(), 4);
    Ok(())
}

#[test]
fn test_csv_and_log_inputs() -> Result<()> {
    let trie = Arc::new(NameTrie::build(["jane", "smith"]));
    let engine = PiiEngine::new(ScrubConfig::load_default_rules()?, trie)?;

    let csv = "id,first,last,dob\n7,Jane,Smith,1990-04-12\n";
    assert_eq!(
        engine.sanitize(csv)?.masked,
        "id,first,last,dob\n7,****,*****,**********\n"
    );

    let log_line = "2024-05-01 INFO login ok user=jane.smith@corp.example ip=10.0.0.1";
    let masked = engine.sanitize(log_line)?.masked;
    assert!(masked.starts_with("********** INFO login ok user=*"));
    assert!(masked.ends_with(" ip=10.0.0.1"));
    Ok(())
}

#[test]
fn test_shared_engine_across_threads() -> Result<()> {
    let engine = Arc::new(PiiEngine::new(ScrubConfig::load_default_rules()?, jon_doe())?);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || engine.sanitize(SAMPLE).map(|r| r.masked))
        })
        .collect();
    for handle in handles {
        let masked = handle.join().expect("worker panicked")?;
        assert_eq!(masked, MASKED);
    }
    Ok(())
}
