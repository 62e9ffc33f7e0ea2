use templeqa_core::error::Error;
use templeqa_core::traits::VectorIndexer;
use templeqa_core::types::{DistanceMetric, DocumentChunk};
use templeqa_embed::TfidfVectorizer;
use templeqa_vector::FlatIndex;

fn chunks() -> Vec<DocumentChunk> {
    [
        "Sarva darsanam is the free general queue.",
        "Pratyeka darsanam costs a fee.",
        "Annadanam serves free meals to pilgrims.",
        "The Satyanarayana vratam is performed on the hill.",
        "Kalyanam is celebrated in the month of Vaisakha.",
    ]
    .iter()
    .enumerate()
    .map(|(i, t)| DocumentChunk::new("annavaram", i, *t))
    .collect()
}

fn fitted(chunks: &[DocumentChunk]) -> TfidfVectorizer {
    let mut vectorizer = TfidfVectorizer::new(300);
    let corpus: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    vectorizer.fit(&corpus);
    vectorizer
}

#[test]
fn search_never_exceeds_k_or_size() {
    let chunks = chunks();
    let vectorizer = fitted(&chunks);
    let index = FlatIndex::build(&chunks, &vectorizer, DistanceMetric::Euclidean).expect("build");
    let q = vectorizer.embed("free darsanam");
    assert_eq!(index.search(&q, 3).expect("search").len(), 3);
    assert_eq!(index.search(&q, 50).expect("search").len(), chunks.len());
    assert!(index.search(&q, 0).expect("search").is_empty());
}

#[test]
fn stored_vector_ranks_itself_first() {
    let chunks = chunks();
    let vectorizer = fitted(&chunks);
    for metric in [DistanceMetric::Euclidean, DistanceMetric::Cosine] {
        let index = FlatIndex::build(&chunks, &vectorizer, metric).expect("build");
        for chunk in &chunks {
            let v = vectorizer.embed(&chunk.content);
            let hits = index.search_vec(&v, 3).expect("search");
            assert_eq!(hits[0].id, chunk.id, "{metric:?}");
            assert!(hits[0].distance.abs() < 1e-5);
            assert_eq!(hits[0].rank, 0);
        }
    }
}

#[test]
fn ties_keep_insertion_order() {
    let chunks = chunks();
    let mut index = FlatIndex::new(2, DistanceMetric::Euclidean);
    let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]];
    index.add(&chunks, vectors).expect("add");
    let hits = index.search(&[1.0, 0.0], 4).expect("search");
    let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["annavaram:0", "annavaram:2", "annavaram:4", "annavaram:1"]);
}

#[test]
fn empty_index_returns_nothing() {
    let vectorizer = TfidfVectorizer::new(300);
    let index = FlatIndex::build(&[], &vectorizer, DistanceMetric::Euclidean).expect("build");
    assert!(index.is_empty());
    assert!(index.search(&vectorizer.embed("darsanam"), 3).expect("search").is_empty());
}

#[test]
fn dimension_mismatch_is_rejected() {
    let index = FlatIndex::new(4, DistanceMetric::Euclidean);
    let err = index.search(&[1.0, 0.0], 1).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Operation(_))), "got {err:?}");
    let mut index = FlatIndex::new(4, DistanceMetric::Euclidean);
    assert!(index.add(&chunks()[..1], vec![vec![1.0; 3]]).is_err());
}

#[test]
fn search_does_not_change_fingerprint() {
    let chunks = chunks();
    let vectorizer = fitted(&chunks);
    let index = FlatIndex::build(&chunks, &vectorizer, DistanceMetric::Euclidean).expect("build");
    let before = index.fingerprint();
    index.search(&vectorizer.embed("kalyanam"), 3).expect("search");
    index.search(&vectorizer.embed("vratam hill"), 3).expect("search");
    assert_eq!(before, index.fingerprint());
}
