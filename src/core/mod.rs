mod dispatcher;
mod handler;
mod poller;

pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use handler::{CallbackHandler, HandlerRegistry, MessageHandler};
pub use poller::{PollOptions, UpdatePoller, UpdatesProvider};
