//! Reading a duplicate of an error response body.
//!
//! The body is drained frame by frame while the frames are kept. The body
//! handed back replays those frames in order, followed by whatever the
//! original would have produced next: nothing, the same error, or the
//! unread remainder.

use axum::body::{Body, Bytes};
use futures_util::stream::{self, StreamExt};
use http_body::{Body as _, Frame};
use http_body_util::{BodyExt, BodyStream, StreamBody};

use super::snapshot::UNREADABLE;

enum Tail {
    Done,
    Failed(axum::Error),
    Rest(Body),
}

/// Duplicate `body` as text.
///
/// Returns the body to forward and the text to log. The text is `None` for an
/// empty body and [`UNREADABLE`] when the body fails mid-stream or is larger
/// than `limit` bytes.
pub async fn duplicate_body_text(mut body: Body, limit: usize) -> (Body, Option<String>) {
    if body.is_end_stream() {
        return (body, None);
    }
    if body.size_hint().upper().is_some_and(|upper| upper > limit as u64) {
        return (body, Some(UNREADABLE.to_string()));
    }

    let mut frames: Vec<Frame<Bytes>> = Vec::new();
    let mut text = Vec::new();
    let tail = loop {
        match body.frame().await {
            None => break Tail::Done,
            Some(Err(e)) => break Tail::Failed(e),
            Some(Ok(frame)) => {
                if let Some(data) = frame.data_ref() {
                    text.extend_from_slice(data);
                }
                frames.push(frame);
                if text.len() > limit {
                    break Tail::Rest(body);
                }
            }
        }
    };

    let logged = match &tail {
        Tail::Done if text.is_empty() => None,
        Tail::Done => Some(String::from_utf8_lossy(&text).into_owned()),
        Tail::Failed(_) | Tail::Rest(_) => Some(UNREADABLE.to_string()),
    };

    let replay = stream::iter(frames.into_iter().map(Ok::<_, axum::Error>));
    let body = match tail {
        Tail::Done => Body::new(StreamBody::new(replay)),
        Tail::Failed(e) => Body::new(StreamBody::new(
            replay.chain(stream::once(async move { Err(e) })),
        )),
        Tail::Rest(rest) => Body::new(StreamBody::new(replay.chain(BodyStream::new(rest)))),
    };

    (body, logged)
}
