//! Keyword extraction via named-entity recognition.
//!
//! Runs BERT token classification locally (candle, CPU) and reduces the
//! predictions to a small, cleaned keyword list. The whole component is an
//! enhancement: the engine keeps serving when the model cannot be fetched
//! or loaded, and `extract` never fails its caller.

use std::collections::{HashMap, HashSet};

use candle_core::{DType, Device, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use hf_hub::api::tokio::Api;
use serde::Deserialize;
use thiserror::Error;
use tokenizers::Tokenizer;
use tracing::warn;

/// The NER model all keyword extraction runs on.
pub const NER_MODEL: &str = "dslim/bert-base-NER";

/// BERT's positional limit; longer resumes are truncated for tagging.
const MAX_SEQ_LEN: usize = 512;

/// Keyword lists are capped at this many entries.
const MAX_KEYWORDS: usize = 20;

#[derive(Debug, Error)]
pub enum KeywordError {
    #[error("model download failed: {0}")]
    Download(String),

    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

impl From<candle_core::Error> for KeywordError {
    fn from(err: candle_core::Error) -> Self {
        KeywordError::Inference(err.to_string())
    }
}

/// Label-table view of the model config: class index → tag ("O", "B-ORG", ...).
#[derive(Debug, Deserialize)]
struct LabelConfig {
    id2label: HashMap<String, String>,
}

/// BERT encoder plus token-classification head, owned by the engine for its
/// whole lifetime and constructed exactly once at startup.
pub struct KeywordExtractor {
    tokenizer: Tokenizer,
    encoder: BertModel,
    classifier: Linear,
    labels: Vec<String>,
    device: Device,
}

impl KeywordExtractor {
    /// Downloads and loads the NER model. Failure leaves the engine running
    /// with keyword extraction disabled rather than aborting startup.
    pub async fn load() -> Result<Self, KeywordError> {
        let device = Device::Cpu;

        let api = Api::new().map_err(|e| KeywordError::Download(e.to_string()))?;
        let repo = api.model(NER_MODEL.to_string());
        let config_path = repo
            .get("config.json")
            .await
            .map_err(|e| KeywordError::Download(e.to_string()))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .await
            .map_err(|e| KeywordError::Download(e.to_string()))?;
        let weights_path = repo
            .get("model.safetensors")
            .await
            .map_err(|e| KeywordError::Download(e.to_string()))?;

        let raw_config = tokio::fs::read_to_string(&config_path)
            .await
            .map_err(|e| KeywordError::ModelLoad(e.to_string()))?;
        let bert_config: BertConfig = serde_json::from_str(&raw_config)
            .map_err(|e| KeywordError::ModelLoad(format!("bad model config: {e}")))?;
        let labels = parse_labels(&raw_config)?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| KeywordError::ModelLoad(format!("bad tokenizer: {e}")))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| KeywordError::ModelLoad(e.to_string()))?
        };
        let encoder = BertModel::load(vb.pp("bert"), &bert_config)
            .map_err(|e| KeywordError::ModelLoad(e.to_string()))?;
        let classifier =
            candle_nn::linear(bert_config.hidden_size, labels.len(), vb.pp("classifier"))
                .map_err(|e| KeywordError::ModelLoad(e.to_string()))?;

        Ok(Self {
            tokenizer,
            encoder,
            classifier,
            labels,
            device,
        })
    }

    /// Extracts up to 20 keywords from `text`. Never fails: any model error
    /// is logged and an empty list returned, since keywords are an
    /// enhancement rather than a critical path.
    pub fn extract(&self, text: &str) -> Vec<String> {
        match self.tag_entities(text) {
            Ok(spans) => postprocess(spans),
            Err(e) => {
                warn!("keyword extraction failed: {e}");
                Vec::new()
            }
        }
    }

    /// Runs token classification and returns the tokens tagged as the
    /// beginning of an entity span, in emission order. Continuation tokens
    /// (I-*) are discarded so multi-token entities count once.
    fn tag_entities(&self, text: &str) -> Result<Vec<String>, KeywordError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| KeywordError::Inference(e.to_string()))?;

        let len = encoding.get_ids().len().min(MAX_SEQ_LEN);
        if len == 0 {
            return Ok(Vec::new());
        }
        let ids = &encoding.get_ids()[..len];
        let tokens = &encoding.get_tokens()[..len];
        let special = &encoding.get_special_tokens_mask()[..len];

        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.encoder.forward(&input_ids, &token_type_ids, None)?;
        let logits = self.classifier.forward(&hidden)?;
        let predicted: Vec<u32> = logits.argmax(D::Minus1)?.squeeze(0)?.to_vec1()?;

        let mut spans = Vec::new();
        for ((token, &prediction), &is_special) in tokens.iter().zip(&predicted).zip(special) {
            if is_special == 1 {
                continue;
            }
            let label = self
                .labels
                .get(prediction as usize)
                .map(String::as_str)
                .unwrap_or("O");
            if label.starts_with("B-") {
                spans.push(token.clone());
            }
        }
        Ok(spans)
    }
}

fn parse_labels(raw_config: &str) -> Result<Vec<String>, KeywordError> {
    let label_config: LabelConfig = serde_json::from_str(raw_config)
        .map_err(|e| KeywordError::ModelLoad(format!("missing id2label table: {e}")))?;

    let count = label_config.id2label.len();
    let mut labels = vec![String::from("O"); count];
    for (id, label) in label_config.id2label {
        let index: usize = id
            .parse()
            .map_err(|_| KeywordError::ModelLoad(format!("non-numeric label id '{id}'")))?;
        if index >= count {
            return Err(KeywordError::ModelLoad(format!(
                "label id {index} out of range"
            )));
        }
        labels[index] = label;
    }
    Ok(labels)
}

/// Reduces raw entity-begin tokens to the final keyword list: dedup by exact
/// token, strip `##` sub-word markers, trim, drop anything of length <= 2,
/// cap at 20. Emission order is preserved throughout.
pub fn postprocess(spans: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    spans
        .into_iter()
        .filter(|token| seen.insert(token.clone()))
        .map(|token| token.replace("##", "").trim().to_string())
        .filter(|keyword| keyword.len() > 2)
        .take(MAX_KEYWORDS)
        .collect()
}
