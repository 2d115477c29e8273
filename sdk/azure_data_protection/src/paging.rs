//! `nextLink` pagination for ARM list operations.

use azure_data_protection_core::error::{DataProtectionError, DataProtectionResult};
use futures::{Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::registry::OperationContext;

/// One page of an ARM list response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,

    /// Absolute URL of the next page, if any.
    pub next_link: Option<String>,
}

enum Cursor {
    First(String),
    Next(Url),
    Done,
}

/// Stream every page of the list starting at `path`, following `nextLink`.
pub(crate) fn pages<T>(
    context: &OperationContext,
    path: String,
) -> impl Stream<Item = DataProtectionResult<Page<T>>> + Send + 'static
where
    T: DeserializeOwned + Send + 'static,
{
    let pipeline = context.pipeline().clone();
    let api_version = context.api_version().to_string();

    futures::stream::try_unfold(Cursor::First(path), move |cursor| {
        let pipeline = pipeline.clone();
        let api_version = api_version.clone();
        async move {
            let response = match cursor {
                Cursor::First(path) => pipeline.get(&path, &api_version).await?,
                Cursor::Next(url) => pipeline.get_url(url).await?,
                Cursor::Done => return Ok::<_, DataProtectionError>(None),
            };
            let page = response.json::<Page<T>>().await?;

            let next = match page.next_link.as_deref() {
                Some(link) if !link.is_empty() => {
                    Cursor::Next(next_url(pipeline.config().base_url(), link)?)
                }
                _ => Cursor::Done,
            };

            tracing::trace!(items = page.value.len(), more = !matches!(next, Cursor::Done), "page received");
            Ok(Some((page, next)))
        }
    })
}

/// Resolve a `nextLink` against the base URL. Links that leave the base
/// URL's origin are rejected so the bearer token is never sent elsewhere.
fn next_url(base: &Url, link: &str) -> DataProtectionResult<Url> {
    let url = base.join(link).map_err(|e| {
        DataProtectionError::invalid_argument(format!(
            "service returned an invalid nextLink '{link}': {e}"
        ))
    })?;

    if url.origin() != base.origin() {
        return Err(DataProtectionError::invalid_argument(format!(
            "nextLink host '{}' does not match the configured endpoint '{}'",
            url.host_str().unwrap_or_default(),
            base.host_str().unwrap_or_default()
        )));
    }
    Ok(url)
}

/// Drain a page stream into a single list.
pub(crate) async fn collect_all<T, S>(pages: S) -> DataProtectionResult<Vec<T>>
where
    S: Stream<Item = DataProtectionResult<Page<T>>>,
{
    pages
        .try_fold(Vec::new(), |mut items, page| async move {
            items.extend(page.value);
            Ok(items)
        })
        .await
}
