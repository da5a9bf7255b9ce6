//! Trade link splitting.
//!
//! The trade page refuses very long offers, so a link carrying
//! `chunk_size` or more classes on either side is opened as several
//! windows, each with an aligned slice of both lists:
//!
//! ```text
//! you[0..100]   them[0..100]    → window 1
//! you[100..200] them[100..200]  → window 2
//! ```

use cardmatch_types::{CardmatchError, Result, TradeConfig, constants};
use url::Url;

use crate::WindowOpener;

/// Split `url` into links of at most `chunk_size` pairs.
///
/// A link with both lists shorter than `chunk_size` comes back unchanged.
/// Otherwise chunks start at every multiple of `chunk_size` over `you[]`;
/// each chunk URL keeps scheme, host and path, drops every other query
/// parameter, and carries the `you[]` slice followed by the `them[]`
/// slice.
///
/// # Errors
/// [`CardmatchError::Internal`] if `chunk_size` is zero.
pub fn split_trade_url(url: &Url, chunk_size: usize) -> Result<Vec<Url>> {
    if chunk_size == 0 {
        return Err(CardmatchError::Internal("chunk size must be positive".into()));
    }

    let mut yours = Vec::new();
    let mut theirs = Vec::new();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            constants::YOU_PARAM => yours.push(value.into_owned()),
            constants::THEM_PARAM => theirs.push(value.into_owned()),
            _ => {}
        }
    }

    if yours.len() < chunk_size && theirs.len() < chunk_size {
        return Ok(vec![url.clone()]);
    }

    let chunks = yours
        .chunks(chunk_size)
        .enumerate()
        .map(|(n, you_chunk)| {
            let start = n * chunk_size;
            let them_chunk = theirs
                .get(start..theirs.len().min(start + chunk_size))
                .unwrap_or_default();

            let mut chunk_url = url.clone();
            chunk_url.set_query(None);
            {
                let mut query = chunk_url.query_pairs_mut();
                for value in you_chunk {
                    query.append_pair(constants::YOU_PARAM, value);
                }
                for value in them_chunk {
                    query.append_pair(constants::THEM_PARAM, value);
                }
            }
            chunk_url
        })
        .collect::<Vec<_>>();

    tracing::info!(
        yours = yours.len(),
        theirs = theirs.len(),
        windows = chunks.len(),
        "Trade link split"
    );
    Ok(chunks)
}

/// Split `url` and open one window per chunk, pausing
/// `config.window_delay` between windows. Returns the number opened.
///
/// # Errors
/// Whatever the opener reports; windows opened before the failure stay
/// open.
pub async fn open_split_trades<O: WindowOpener + ?Sized>(
    opener: &O,
    url: &Url,
    config: &TradeConfig,
) -> Result<usize> {
    let chunks = split_trade_url(url, config.chunk_size)?;
    for (n, chunk) in chunks.iter().enumerate() {
        if n > 0 {
            tokio::time::sleep(config.window_delay).await;
        }
        opener.open_window(chunk)?;
        tracing::debug!(window = n + 1, total = chunks.len(), "Trade window opened");
    }
    Ok(chunks.len())
}
