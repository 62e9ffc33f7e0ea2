use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tempfile::TempDir;

use templeqa_core::config::Config;
use templeqa_core::error::Error;
use templeqa_core::traits::VectorIndexer;
use templeqa_rag::RagContext;

fn write_single_page_pdf(path: &Path, lines: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let mut operations = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
        operations.push(Operation::new("Td", vec![50.into(), (700 - 20 * i as i64).into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        operations.push(Operation::new("ET", vec![]));
    }
    let content_id = doc.add_object(Stream::new(dictionary! {}, Content { operations }.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1i64,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

#[test]
fn build_indexes_the_configured_document() {
    let tmp = TempDir::new().unwrap();
    write_single_page_pdf(&tmp.path().join("temple.pdf"), &["The temple has three darsanas: X, Y, Z."]);
    std::fs::write(
        tmp.path().join("config.toml"),
        "[document]\npath = \"temple.pdf\"\n\n[embedding]\nmax_features = 50\n",
    )
    .unwrap();

    let config = Config::load_for_env(tmp.path(), "test").expect("config");
    let context = RagContext::build(&config).expect("context");

    assert_eq!(context.index().len(), 1);
    assert_eq!(context.index().dim(), 50);
    assert!(context.vectorizer().is_fitted());
    let hits = context.retrieve("darsanas").expect("retrieve");
    assert_eq!(hits.len(), 1);
    assert!(hits[0].content.contains("darsanas"));
}

#[test]
fn build_fails_when_document_is_missing() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("config.toml"), "[document]\npath = \"absent.pdf\"\n").unwrap();
    let config = Config::load_for_env(tmp.path(), "test").expect("config");

    let err = RagContext::build(&config).err().expect("missing document must fail");
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Document { .. })), "got {err:?}");
}
