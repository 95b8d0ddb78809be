use kb_chat::{Corpus, EngineConfig, Record, RetrievalEngine};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

fn engine_with(records: &[(String, String)], threshold: f32) -> RetrievalEngine {
    let corpus = Corpus::from_records(
        records
            .iter()
            .map(|(title, body)| Record::new(title.clone(), body.clone()))
            .collect(),
    );
    RetrievalEngine::from_corpus(
        corpus,
        &EngineConfig {
            threshold,
            ..EngineConfig::default()
        },
    )
}

fn fixture() -> Vec<(String, String)> {
    vec![
        ("Wave function".into(), "A wave function describes quantum state.".into()),
        ("Entanglement".into(), "Entanglement links particle states.".into()),
        ("Superposition".into(), "A state can be a sum of other states.".into()),
        ("Uncertainty".into(), "Position and momentum cannot both be exact.".into()),
    ]
}

#[quickcheck]
fn prop_get_response_is_total(query: String) -> bool {
    let engine = engine_with(&fixture(), 0.2);
    let response = engine.get_response(&query);
    response == engine.fallback_message()
        || fixture().iter().any(|(_, body)| *body == response)
}

#[quickcheck]
fn prop_get_response_is_deterministic(query: String) -> bool {
    let engine = engine_with(&fixture(), 0.2);
    engine.get_response(&query) == engine.get_response(&query)
}

#[quickcheck]
fn prop_scores_are_finite_and_bounded(records: Vec<(String, String)>, query: String) -> bool {
    let engine = engine_with(&records, 0.2);
    match engine.best_match(&query) {
        None => records.is_empty(),
        Some(m) => {
            m.index < records.len()
                && m.score.is_finite()
                && (-1e-4..=1.0 + 1e-4).contains(&m.score)
        }
    }
}

#[quickcheck]
fn prop_raising_threshold_never_adds_matches(query: String, low: u8, high: u8) -> TestResult {
    if low > high {
        return TestResult::discard();
    }
    let low = engine_with(&fixture(), low as f32 / 255.0);
    let high = engine_with(&fixture(), high as f32 / 255.0);

    let matched_high = high.get_response(&query) != high.fallback_message();
    let matched_low = low.get_response(&query) != low.fallback_message();
    TestResult::from_bool(!matched_high || matched_low)
}

#[quickcheck]
fn prop_self_match_returns_lowest_duplicate(
    records: Vec<(String, String)>,
    pick: usize,
) -> TestResult {
    if records.is_empty() {
        return TestResult::discard();
    }
    let engine = engine_with(&records, 0.2);
    let i = pick % records.len();
    let text = Record::new(records[i].0.clone(), records[i].1.clone()).combined_text();

    let Some(m) = engine.best_match(&text) else {
        return TestResult::failed();
    };
    if m.score == 0.0 {
        // No indexable terms in the record
        return TestResult::discard();
    }
    TestResult::from_bool(m.index <= i)
}
