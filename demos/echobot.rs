//! Echoes every text message back to its chat.
//!
//! Expects the bot token in the `POLLIGRAM_TG_TOKEN` environment variable.

use std::sync::Arc;

use polligram::prelude::*;

async fn greet(bot: Arc<BotApi>, message: Message) -> UResult {
    bot.send_message(message.chat.id, "Hello there! Say anything and I'll repeat it.", None)
        .await?;
    Ok(())
}

async fn echo(bot: Arc<BotApi>, message: Message) -> UResult {
    if let Some(text) = &message.text {
        bot.send_message(message.chat.id, text, None).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> UResult {
    let logger = configure_term_root();
    let token = std::env::var("POLLIGRAM_TG_TOKEN")?;
    let bot = Arc::new(BotApi::new().token(&token).logger(logger.clone()).build()?);

    let me = bot.get_me().await?;
    info!(logger, "authorized"; "username" => me.username.as_deref().unwrap_or("<unset>"));

    let mut dispatcher = Dispatcher::new()
        .bot(bot)
        .logger(logger.clone())
        .build();
    dispatcher.add_message_handler(Some(Arc::new(greet)), Filter::command("start"))?;
    dispatcher.add_message_handler(Some(Arc::new(echo)), Filter::has("text"))?;

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
