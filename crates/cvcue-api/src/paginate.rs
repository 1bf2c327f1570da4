// Managed access point pagination
//
// Pages are requested with `pagesize` / `startindex` query parameters. The
// walk ends once the next start index reaches the `totalCount` reported by
// the most recent page, regardless of how many records that page held.

use std::num::NonZeroU32;

use async_stream::try_stream;
use futures_util::Stream;
use tracing::debug;

use crate::client::CueClient;
use crate::error::{Error, HttpFailure};
use crate::models::{AccessPoint, ManagedDevicesPage};
use crate::session::Session;

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::new(100).expect("non-zero literal");

/// Position in the managed-device listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page_size: NonZeroU32,
    start_index: u64,
}

impl PageCursor {
    /// A cursor at the first record.
    pub fn new(page_size: NonZeroU32) -> Self {
        Self::at(page_size, 0)
    }

    pub fn at(page_size: NonZeroU32, start_index: u64) -> Self {
        Self {
            page_size,
            start_index,
        }
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    pub fn start_index(&self) -> u64 {
        self.start_index
    }

    /// Move to the next page.
    pub fn advance(&mut self) {
        self.start_index = self
            .start_index
            .saturating_add(u64::from(self.page_size.get()));
    }

    /// Returns `true` once the cursor is at or past `total_count`.
    pub fn is_exhausted(&self, total_count: u64) -> bool {
        self.start_index >= total_count
    }
}

impl CueClient {
    /// Fetch a single page of managed access points.
    ///
    /// Non-success statuses and transport failures are
    /// [`Error::Retrieval`] carrying the full request URL; a body that does
    /// not decode is [`Error::Decode`].
    pub async fn fetch_page(
        &self,
        session: &Session,
        cursor: PageCursor,
    ) -> Result<ManagedDevicesPage, Error> {
        let url = self.access_points_url(cursor.page_size(), cursor.start_index())?;
        debug!("GET {url}");

        let retrieval = |failure: HttpFailure| Error::Retrieval {
            url: url.clone(),
            failure,
        };

        let resp = Self::authenticated(self.http().get(url.clone()), session)
            .send()
            .await
            .map_err(|e| retrieval(HttpFailure::Transport(e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(retrieval(HttpFailure::Status(status)));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| retrieval(HttpFailure::Transport(e)))?;

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Decode {
                url: url.clone(),
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }

    /// Lazily walk every managed access point, one page at a time.
    ///
    /// The first page is always requested. Records are yielded in server
    /// order as each page arrives; the first error ends the stream. The
    /// stream cannot be restarted -- call again for a fresh walk.
    pub fn fetch_all<'a>(
        &'a self,
        session: &'a Session,
        page_size: NonZeroU32,
    ) -> impl Stream<Item = Result<AccessPoint, Error>> + 'a {
        try_stream! {
            let mut cursor = PageCursor::new(page_size);
            loop {
                let page = self.fetch_page(session, cursor).await?;
                debug!(
                    start_index = cursor.start_index(),
                    received = page.managed_devices.len(),
                    total_count = page.total_count,
                    "page received"
                );

                for ap in page.managed_devices {
                    yield ap;
                }

                cursor.advance();
                if cursor.is_exhausted(page.total_count) {
                    break;
                }
            }
        }
    }
}
