#![cfg(feature = "huggingface")]

use goldens::{
    Acquisition, ConfigProvider, HubConfigProvider, HubTokenizerProvider, TokenizerProvider,
};

#[test]
#[ignore = "network integration test against the live Hugging Face hub"]
fn live_tokenizer_round_trips_a_corpus_text() {
    let provider = HubTokenizerProvider::new();
    let handle = match provider.acquire("bert-base-uncased") {
        Acquisition::Ready(handle) => handle,
        Acquisition::NotApplicable => panic!("bert-base-uncased should publish a tokenizer"),
        Acquisition::Failed(reason) => panic!("tokenizer load failed: {reason}"),
    };

    let fields = handle
        .encode("hello world")
        .expect("encode should succeed");
    let ids = fields.get("input_ids").expect("input_ids should be present");
    assert!(ids.len() >= 2);
    assert!(fields.contains_key("attention_mask"));

    let without_special = handle
        .decode(ids, false)
        .expect("decode should succeed");
    assert_eq!(without_special, "hello world");
    let with_special = handle.decode(ids, true).expect("decode should succeed");
    assert!(with_special.contains("[CLS]"));
}

#[test]
#[ignore = "network integration test against the live Hugging Face hub"]
fn live_config_reports_its_model_type() {
    let provider = HubConfigProvider::new();
    let handle = match provider.acquire("gpt2") {
        Acquisition::Ready(handle) => handle,
        Acquisition::NotApplicable => panic!("gpt2 should publish a config"),
        Acquisition::Failed(reason) => panic!("config load failed: {reason}"),
    };

    let fields = handle.canonical_fields();
    assert_eq!(
        fields.get("model_type").and_then(|value| value.as_str()),
        Some("gpt2")
    );
}

#[test]
#[ignore = "network integration test against the live Hugging Face hub"]
fn live_missing_artifacts_are_not_applicable() {
    let provider = HubTokenizerProvider::new();
    match provider.acquire("microsoft/speecht5_tts") {
        Acquisition::Ready(_) => panic!("subject without tokenizer.json should not be ready"),
        Acquisition::NotApplicable => {}
        Acquisition::Failed(reason) => panic!("expected a silent skip, got failure: {reason}"),
    }
}
