//! Batch execution: one operation per input item, strictly in order

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use soniox_client::redact_webhook_secret;
use tokio_util::sync::CancellationToken;

use crate::api::TranscriptionApi;
use crate::binary::BinaryData;
use crate::error::NodeError;
use crate::operations::{self, Outcome};
use crate::params::{ITEM_PARAMETERS_KEY, NodeParameters, Operation};

/// Input item handed over by the host
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub json: Map<String, Value>,
    #[serde(default)]
    pub binary: BTreeMap<String, BinaryData>,
}

/// Output item, paired with the index of the input it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputItem {
    pub json: Value,
    pub paired_item: usize,
}

/// Item failure that stopped the batch
#[derive(Debug, thiserror::Error)]
#[error("item {index}: {error}")]
pub struct ItemFailure {
    pub index: usize,
    #[source]
    pub error: NodeError,
}

/// Items produced by a batch
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub items: Vec<OutputItem>,
    /// The execution was cancelled; items after the last one were skipped
    pub aborted: bool,
}

/// Shared context for a batch run
pub struct NodeContext<'a, A: ?Sized> {
    pub api: &'a A,
    /// Node-level parameters, overlaid by each item's `parameters`
    pub defaults: Map<String, Value>,
    /// Emit failed items as error-tagged passthroughs instead of stopping
    pub continue_on_fail: bool,
    pub cancel: CancellationToken,
}

impl<A> NodeContext<'_, A>
where
    A: TranscriptionApi + ?Sized,
{
    /// Run the node over every item
    ///
    /// # Errors
    ///
    /// Returns the first item failure unless `continue_on_fail` is set
    pub async fn execute_batch(&self, items: &[Item]) -> Result<BatchResult, ItemFailure> {
        let mut result = BatchResult::default();

        for (index, item) in items.iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::info!(index, "execution cancelled, skipping remaining items");
                result.aborted = true;
                break;
            }

            match self.execute_item(item).await {
                Ok(Outcome::Done(json)) => result.items.push(OutputItem {
                    json,
                    paired_item: index,
                }),
                Ok(Outcome::Aborted) => {
                    tracing::info!(index, "execution cancelled while waiting, skipping remaining items");
                    result.aborted = true;
                    break;
                }
                Err(error) if self.continue_on_fail => {
                    tracing::error!(index, error = %error, "item failed, continuing");
                    result.items.push(OutputItem {
                        json: failed_item(&item.json, &error),
                        paired_item: index,
                    });
                }
                Err(error) => {
                    tracing::error!(index, error = %error, "item failed");
                    return Err(ItemFailure { index, error });
                }
            }
        }

        tracing::info!(
            processed = result.items.len(),
            total = items.len(),
            aborted = result.aborted,
            "batch finished"
        );
        Ok(result)
    }

    async fn execute_item(&self, item: &Item) -> Result<Outcome, NodeError> {
        let params = NodeParameters::resolve(&self.defaults, &item.json)?;
        tracing::debug!(operation = params.operation.name(), "executing item");

        match &params.operation {
            Operation::Create(create) => operations::create(self.api, create, &item.binary, &self.cancel).await,
            Operation::GetResults(get) => operations::get_results(self.api, get, &self.cancel).await,
            Operation::Delete(delete) => operations::delete(self.api, delete).await,
        }
    }
}

/// Original item JSON tagged with the failure, webhook secret hidden
fn failed_item(original: &Map<String, Value>, error: &NodeError) -> Value {
    let mut json = original.clone();
    let redacted = match json.get(ITEM_PARAMETERS_KEY).map(redact_webhook_secret) {
        Some(Cow::Owned(params)) => Some(params),
        _ => None,
    };
    if let Some(params) = redacted {
        json.insert(ITEM_PARAMETERS_KEY.to_owned(), params);
    }
    json.insert("error".to_owned(), Value::String(error.message()));
    if let Some(description) = error.description() {
        json.insert("description".to_owned(), Value::String(description.to_owned()));
    }
    Value::Object(json)
}
