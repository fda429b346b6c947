use search_core::{
    similarity, vectorize, Engine, EngineConfig, EngineError, IdfPolicy, RebuildPolicy, TfWeighting,
};
use std::sync::Arc;
use std::thread;

fn engine_with(docs: &[(&str, &str)]) -> Engine {
    let engine = Engine::default();
    for (id, text) in docs {
        engine.add_text(*id, text).unwrap();
    }
    engine
}

#[test]
fn cat_query_ranks_doc1_first() {
    let engine = engine_with(&[("doc1", "the cat sat"), ("doc2", "the dog sat")]);
    let hits = engine.search("cat", None);
    assert_eq!(hits[0].id, "doc1");
    assert!(hits[0].score > 0.0);
    // doc2 shares no term with the query, so it scores zero and is dropped
    assert_eq!(hits.len(), 1);
}

#[test]
fn zero_scores_can_be_included() {
    let engine = Engine::new(EngineConfig { include_zero_scores: true, ..Default::default() });
    engine.add_text("doc1", "the cat sat").unwrap();
    engine.add_text("doc2", "the dog sat").unwrap();
    let hits = engine.search("cat", None);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[1].id, "doc2");
    assert_eq!(hits[1].score, 0.0);
}

#[test]
fn empty_corpus_returns_nothing() {
    let engine = Engine::default();
    assert!(engine.search("anything", None).is_empty());
    assert!(engine.status().is_ready);
    assert_eq!(engine.status().document_count, 0);
}

#[test]
fn clearing_then_searching_returns_nothing() {
    let engine = engine_with(&[("a", "rust systems"), ("b", "rust web")]);
    assert_eq!(engine.search("rust", None).len(), 2);
    engine.clear_history();
    assert!(engine.search("rust", None).is_empty());
    assert_eq!(engine.status().document_count, 0);
    assert_eq!(engine.status().term_count, 0);
}

#[test]
fn duplicate_upload_leaves_corpus_unchanged() {
    let engine = engine_with(&[("a.txt", "first")]);
    let err = engine.upload("a.txt", b"second").unwrap_err();
    assert!(matches!(err, EngineError::DuplicateId(_)));
    assert_eq!(engine.status().document_count, 1);
    assert_eq!(engine.document("a.txt").unwrap().text, "first");
}

#[test]
fn bad_encoding_is_rejected() {
    let engine = Engine::default();
    let err = engine.upload("bin", &[0xff, 0xfe, 0x00]).unwrap_err();
    assert!(matches!(err, EngineError::Encoding(_)));
    assert_eq!(engine.status().document_count, 0);
}

#[test]
fn deleting_missing_document_is_not_found() {
    let engine = engine_with(&[("a", "x")]);
    assert!(matches!(engine.delete_document("b"), Err(EngineError::NotFound(_))));
    assert_eq!(engine.status().document_count, 1);
    engine.delete_document("a").unwrap();
    assert!(matches!(engine.document("a"), Err(EngineError::NotFound(_))));
}

#[test]
fn ranking_is_deterministic() {
    let engine = engine_with(&[
        ("c", "apple banana"),
        ("a", "apple banana"),
        ("b", "apple cherry"),
        ("d", "banana"),
    ]);
    let first = engine.search("apple banana", None);
    for _ in 0..10 {
        assert_eq!(engine.search("apple banana", None), first);
    }
    let ids: Vec<_> = first.iter().map(|h| h.id.as_str()).collect();
    // identical documents tie and fall back to identity order
    assert_eq!(&ids[..2], &["a", "c"]);
}

#[test]
fn top_k_limits_results() {
    let engine = engine_with(&[("a", "x y"), ("b", "x"), ("c", "x z")]);
    assert_eq!(engine.search("x", Some(2)).len(), 2);
    assert_eq!(engine.search("x", None).len(), 3);

    let limited = Engine::new(EngineConfig { top_k: Some(1), ..Default::default() });
    limited.add_text("a", "x").unwrap();
    limited.add_text("b", "x").unwrap();
    assert_eq!(limited.search("x", None).len(), 1);
    assert_eq!(limited.search("x", Some(2)).len(), 2);
}

#[test]
fn out_of_vocabulary_query_is_empty_not_error() {
    let engine = engine_with(&[("a", "hello world")]);
    assert!(engine.search("zebra", None).is_empty());
    assert!(engine.vectorize_query("zebra quokka").is_empty());
    assert!(engine.search("", None).is_empty());
}

#[test]
fn document_vectors_are_non_empty_after_rebuild() {
    let engine = engine_with(&[("a", "one two"), ("b", "two three"), ("empty", "...")]);
    let snapshot = engine.snapshot();
    for (doc, vector) in &snapshot.vectors {
        assert_eq!(vector.is_empty(), doc.term_frequencies.is_empty(), "{}", doc.id);
        let recomputed = vectorize(&doc.term_frequencies, &snapshot.index, TfWeighting::Raw);
        assert_eq!(&recomputed, vector);
    }
}

#[test]
fn document_is_most_similar_to_itself() {
    let engine = engine_with(&[("a", "red green blue"), ("b", "green green yellow")]);
    let snapshot = engine.snapshot();
    let (_, a) = &snapshot.vectors[0];
    let (_, b) = &snapshot.vectors[1];
    assert!((similarity(a, a) - 1.0).abs() < 1e-6);
    assert_eq!(similarity(a, b), similarity(b, a));
    assert!(similarity(a, b) < 1.0);
}

#[test]
fn plain_idf_ignores_ubiquitous_terms() {
    let engine = Engine::new(EngineConfig { idf: IdfPolicy::Plain, ..Default::default() });
    engine.add_text("doc1", "the cat sat").unwrap();
    engine.add_text("doc2", "the dog sat").unwrap();
    // "the" is in every document so carries no weight under ln(N/df)
    assert!(engine.search("the", None).is_empty());
    assert_eq!(engine.search("the cat", None)[0].id, "doc1");
}

#[test]
fn snippets_highlight_query_terms() {
    let engine = engine_with(&[("a", "Rust is great. Rust systems programming.")]);
    let hits = engine.search("rust", None);
    assert_eq!(
        hits[0].snippet.as_deref(),
        Some("<em>Rust</em> is great. <em>Rust</em> systems programming.")
    );

    let plain = Engine::new(EngineConfig { snippets: false, ..Default::default() });
    plain.add_text("a", "rust").unwrap();
    assert!(plain.search("rust", None)[0].snippet.is_none());
}

#[test]
fn lazy_rebuild_is_observable() {
    let engine = Engine::new(EngineConfig { rebuild: RebuildPolicy::Lazy, ..Default::default() });
    engine.add_text("a", "alpha").unwrap();
    engine.add_text("b", "beta").unwrap();
    let status = engine.status();
    assert!(!status.is_ready);
    assert_eq!(status.document_count, 2);
    assert_eq!(status.term_count, 0);

    assert!(engine.rebuild().is_ready);
    assert_eq!(engine.status().term_count, 2);
}

#[test]
fn concurrent_searches_see_complete_indexes() {
    let engine = Arc::new(Engine::default());
    engine.add_text("base", "shared term").unwrap();

    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for i in 0..50 {
                engine.add_text(format!("doc{i:02}"), "shared term extra").unwrap();
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..50 {
                    let snapshot = engine.snapshot();
                    assert_eq!(snapshot.index.num_docs as usize, snapshot.vectors.len());
                    assert!(!engine.search("shared", None).is_empty());
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }
    assert_eq!(engine.status().document_count, 51);
}

#[test]
fn teardown_consumes_engine() {
    let engine = engine_with(&[("a", "x")]);
    engine.teardown();
    // a fresh engine is independent of the old one
    assert_eq!(Engine::default().status().document_count, 0);
}

fn score_gap(tf: TfWeighting) -> f32 {
    let engine = Engine::new(EngineConfig { tf, ..Default::default() });
    engine.add_text("a", "rust rust rust rust go").unwrap();
    engine.add_text("b", "rust go go").unwrap();
    let hits = engine.search("rust", None);
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "a");
    hits[0].score - hits[1].score
}

#[test]
fn sublinear_tf_narrows_repeated_term_advantage() {
    let raw = score_gap(TfWeighting::Raw);
    let sublinear = score_gap(TfWeighting::Sublinear);
    assert!(sublinear > 0.0);
    assert!(sublinear < raw, "sublinear gap {sublinear} should be below raw gap {raw}");
}
