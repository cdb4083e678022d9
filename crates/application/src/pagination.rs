use std::future::Future;

use oig_core::{AppResult, RequestContext};
use oig_domain::{ListQuery, Page};
use tracing::debug;
use url::Url;

/// Base used to resolve relative `next` links; only the query is read.
const RELATIVE_LINK_BASE: &str = "https://governance.invalid/";

/// Extracts the `after` cursor from a `next` link.
///
/// Returns `None` when the link has no `after` parameter or cannot be parsed.
#[must_use]
pub fn after_cursor(next_href: &str) -> Option<String> {
    let url = match Url::parse(next_href) {
        Ok(url) => url,
        Err(_) => Url::parse(RELATIVE_LINK_BASE)
            .and_then(|base| base.join(next_href))
            .ok()?,
    };

    url.query_pairs()
        .find(|(name, _)| name == "after")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Follows `next` links until the listing is exhausted.
///
/// Items keep server order. The loop stops on an empty page, a missing `next`
/// link, or a `next` link without an `after` cursor. Cancellation is checked
/// before every page and fails the whole listing.
pub async fn collect_all<T, F, Fut>(
    ctx: &RequestContext,
    query: &ListQuery,
    mut fetch_page: F,
) -> AppResult<Vec<T>>
where
    F: FnMut(ListQuery) -> Fut,
    Fut: Future<Output = AppResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut cursor = query.after.clone();
    let mut page_number = 0_usize;

    loop {
        ctx.ensure_active()?;
        page_number += 1;

        let page = fetch_page(query.with_after(cursor.take())).await?;
        let next = page.next_href().and_then(after_cursor);
        let page_len = page.data.len();
        debug!(page = page_number, items = page_len, "fetched list page");

        if page_len == 0 {
            break;
        }
        items.extend(page.data);

        match next {
            Some(after) => cursor = Some(after),
            None => break,
        }
    }

    Ok(items)
}
