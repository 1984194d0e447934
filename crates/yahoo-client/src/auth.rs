//! Session crumb for endpoints that need Yahoo's cookie+crumb pair.
//!
//! The cookie lives in the client's cookie store; only the crumb is kept here.

use tokio::sync::Mutex;

/// Page that sets the session cookie. It answers 404, the cookie still arrives.
pub(crate) const COOKIE_URL: &str = "https://fc.yahoo.com";
pub(crate) const REFERER: &str = "https://finance.yahoo.com/";

const MAX_CRUMB_LEN: usize = 100;

#[derive(Debug, Default)]
pub(crate) struct CrumbCache {
    crumb: Mutex<Option<String>>,
}

impl CrumbCache {
    /// Cached crumb, or the result of `refresh` stored for later calls.
    /// The lock is held across `refresh` so concurrent callers share one refresh.
    pub async fn get_or_refresh<F, Fut, E>(&self, refresh: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<String, E>>,
    {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }
        let crumb = refresh().await?;
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    pub async fn invalidate(&self) {
        *self.crumb.lock().await = None;
    }
}

/// The getcrumb body is the bare token. HTML pages and rate-limit notices are rejected.
pub(crate) fn parse_crumb(body: &str) -> Option<String> {
    let crumb = body.trim();
    let usable = !crumb.is_empty()
        && crumb.len() < MAX_CRUMB_LEN
        && !crumb.contains(char::is_whitespace)
        && !crumb.contains('<');
    usable.then(|| crumb.to_string())
}
