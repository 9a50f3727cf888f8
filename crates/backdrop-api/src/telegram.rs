//! Long-polling update loop.
//!
//! teloxide's dispatcher runs updates from different chats concurrently and
//! updates from the same chat in order.

use std::future::Future;
use std::time::Duration;

use backdrop_infra::telegram::event_from_message;
use backdrop_types::error::GatewayError;
use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::dptree;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::types::{Message, Update};

use crate::state::AppState;

/// Delay between shutdown attempts while the dispatcher is not polling yet.
const SHUTDOWN_RETRY: Duration = Duration::from_millis(100);

/// Poll Telegram until `shutdown` resolves, then drain in-flight handlers.
pub async fn run_dispatcher(state: AppState, shutdown: impl Future<Output = ()> + Send + 'static) {
    let bot = state.bot.gateway().bot().clone();
    let handler = Update::filter_message().endpoint(handle_message);

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            tracing::debug!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Error in message handler",
        ))
        .build();

    let shutdown_token = dispatcher.shutdown_token();
    tokio::spawn(async move {
        shutdown.await;
        tracing::info!("Shutdown signal received, finishing in-flight updates");
        stop_when_running(|| shutdown_token.shutdown(), SHUTDOWN_RETRY).await;
    });

    dispatcher.dispatch().await;
}

/// Call `shutdown` until the dispatcher accepts it, then wait for it to stop.
///
/// A signal that lands before `dispatch()` starts polling gets an idle error;
/// the request is repeated every `retry` until it is accepted.
async fn stop_when_running<S, W, E>(mut shutdown: S, retry: Duration)
where
    S: FnMut() -> Result<W, E>,
    W: Future<Output = ()>,
    E: std::fmt::Display,
{
    loop {
        match shutdown() {
            Ok(stopped) => {
                stopped.await;
                return;
            }
            Err(err) => {
                tracing::debug!("Dispatcher not running yet ({err}), retrying shutdown");
                tokio::time::sleep(retry).await;
            }
        }
    }
}

async fn handle_message(msg: Message, state: AppState) -> Result<(), GatewayError> {
    let event = event_from_message(&msg);
    state.bot.handle(&event).await
}
