//! Inline-keyboard demo: `/start` posts a button, pressing it answers the
//! callback query and reports back in the chat.
//!
//! Expects the bot token in the `POLLIGRAM_TG_TOKEN` environment variable.

use std::sync::Arc;

use polligram::api::SendMessageOpts;
use polligram::prelude::*;

async fn show_keyboard(bot: Arc<BotApi>, message: Message) -> UResult {
    let keyboard = InlineKeyboardMarkup {
        inline_keyboard: vec![vec![InlineKeyboardButton {
            text: "Ping".to_owned(),
            callback_data: Some("ping".to_owned()),
            url: None,
        }]],
    };
    let opts = SendMessageOpts {
        reply_markup: Some(keyboard),
        ..Default::default()
    };
    bot.send_message(message.chat.id, "Press the button:", Some(&opts))
        .await?;
    Ok(())
}

async fn pong(bot: Arc<BotApi>, query: CallbackQuery) -> UResult {
    bot.answer_callback_query(&query.id, Some("Pong!"), false)
        .await?;
    if let Some(message) = &query.message {
        bot.send_message(message.chat.id, "Pong!", None).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> UResult {
    let logger = configure_term_root();
    let token = std::env::var("POLLIGRAM_TG_TOKEN")?;
    let bot = Arc::new(BotApi::new().token(&token).logger(logger.clone()).build()?);

    let mut dispatcher = Dispatcher::new()
        .bot(bot)
        .logger(logger.clone())
        .build();
    dispatcher.add_message_handler(Some(Arc::new(show_keyboard)), Filter::command("start"))?;
    dispatcher.add_callback_handler(Some(Arc::new(pong)), Filter::callback_data("^ping$"))?;

    let dispatcher = Arc::new(dispatcher);
    let poll_task = dispatcher.start();

    let stopper = dispatcher.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stopper.stop();
        }
    });

    dispatcher.run_until_stopped().await;
    poll_task.await??;
    info!(logger, "bye");
    Ok(())
}
