//! End-to-end run of the poll loop against a scripted provider, exercising
//! only the public crate surface.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use polligram::prelude::*;
use serde_json::json;
use tokio::sync::mpsc;

/// Replays a fixed sequence of batches, recording the offset of every
/// fetch; exhaustion fails the fetch so the loop terminates.
struct ScriptedApi {
    batches: Mutex<VecDeque<Vec<Update>>>,
    offsets: Mutex<Vec<i64>>,
}

impl ScriptedApi {
    fn new(batches: Vec<Vec<Update>>) -> Arc<Self> {
        Arc::new(ScriptedApi {
            batches: Mutex::new(batches.into()),
            offsets: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl UpdatesProvider for ScriptedApi {
    async fn fetch_updates(
        &self,
        offset: i64,
        _limit: Option<i64>,
        _timeout_secs: i64,
        _allowed_updates: Option<&[String]>,
    ) -> UResult<Vec<Update>> {
        tokio::task::yield_now().await;
        self.offsets.lock().unwrap().push(offset);
        self.batches
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| "script exhausted".into())
    }
}

fn text_update(id: i64, text: &str) -> Update {
    serde_json::from_value(json!({
        "update_id": id,
        "message": {
            "message_id": id,
            "date": 0,
            "chat": {"id": 7, "type": "private"},
            "text": text
        }
    }))
    .unwrap()
}

fn callback_update(id: i64, data: &str) -> Update {
    serde_json::from_value(json!({
        "update_id": id,
        "callback_query": {
            "id": id.to_string(),
            "from": {"id": 7, "is_bot": false, "first_name": "Ann"},
            "chat_instance": "-1",
            "data": data
        }
    }))
    .unwrap()
}

#[tokio::test]
async fn mixed_updates_reach_their_handlers_and_advance_the_cursor() {
    let api = ScriptedApi::new(vec![
        vec![text_update(100, "/start"), callback_update(101, "ping")],
        vec![],
        vec![text_update(205, "hello")],
    ]);
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let mut dispatcher = Dispatcher::new()
        .bot(api.clone())
        .logger(configure_discard_root())
        .build();

    let text_tx = tx.clone();
    dispatcher
        .add_message_handler(
            Some(Arc::new(move |_bot: Arc<ScriptedApi>, message: Message| {
                let tx = text_tx.clone();
                async move {
                    tx.send(format!("msg:{}", message.text.unwrap_or_default()))
                        .ok();
                    Ok(())
                }
            })),
            Filter::has("text"),
        )
        .unwrap();
    dispatcher
        .add_callback_handler(
            Some(Arc::new(move |_bot: Arc<ScriptedApi>, query: CallbackQuery| {
                let tx = tx.clone();
                async move {
                    tx.send(format!("cb:{}", query.data.unwrap_or_default())).ok();
                    Ok(())
                }
            })),
            Filter::callback_data("^ping$"),
        )
        .unwrap();

    let dispatcher = Arc::new(dispatcher);
    let outcome = dispatcher.start().await.unwrap();
    assert!(matches!(outcome, Err(DispatchError::FetchFailure(_))));
    assert!(!dispatcher.is_running());

    let mut seen = Vec::new();
    for _ in 0..3 {
        let entry = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for a handler invocation")
            .expect("handler channel closed early");
        seen.push(entry);
    }
    assert_eq!(seen, vec!["msg:/start", "cb:ping", "msg:hello"]);

    // -1 before anything was consumed, then past each batch's final id
    let offsets = api.offsets.lock().unwrap().clone();
    assert_eq!(offsets, vec![-1, 102, 102, 206]);
}
