//! Full-list accumulation
//!
//! Follows cursors from a first page until the adapter reports the end.

use super::types::InfoItemsPage;
use crate::error::{ExtractionFailure, Result};
use crate::extractor::ListExtractor;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Follow `first.next_page` until a page arrives without a cursor
///
/// Items and item errors are concatenated in page order. Terminal errors
/// (network, cancellation) propagate; any other page failure is recorded in
/// the returned errors and stops the walk. The returned page never carries a
/// cursor.
///
/// There is no cycle detection: an adapter must never hand out a cursor that
/// leads back to a page it already produced.
pub async fn collect_all<T, E>(
    extractor: &E,
    first: InfoItemsPage<T>,
    cancel: &CancellationToken,
) -> Result<InfoItemsPage<T>>
where
    T: Send,
    E: ListExtractor<T> + ?Sized,
{
    let InfoItemsPage {
        mut items,
        mut next_page,
        mut errors,
    } = first;
    let mut pages = 1usize;

    while let Some(cursor) = next_page.take() {
        match extractor.page(&cursor, cancel).await {
            Ok(page) => {
                pages += 1;
                debug!(
                    "Page {pages}: {} items, {} item errors",
                    page.items.len(),
                    page.errors.len()
                );
                items.extend(page.items);
                errors.extend(page.errors);
                next_page = page.next_page;
            }
            Err(e) if e.is_terminal() => return Err(e),
            Err(e) => {
                warn!("Stopping after {pages} pages, next page failed: {e}");
                errors.push(ExtractionFailure::for_field("next_page", &e));
            }
        }
    }

    debug!("Collected {} items over {pages} pages", items.len());
    Ok(InfoItemsPage::with_errors(items, None, errors))
}
