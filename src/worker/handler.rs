//! Message handlers invoked by the worker for every received message

/// Receives the text of each message the worker takes off the queue
///
/// Empty messages are filtered out by the worker before this is called.
pub trait MessageHandler: Send {
    fn handle(&mut self, text: &str);
}

/// Default handler: reports each message at Info
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHandler;

impl MessageHandler for LogHandler {
    fn handle(&mut self, text: &str) {
        log::info!("received message: {}", text);
    }
}

impl<F> MessageHandler for F
where
    F: FnMut(&str) + Send,
{
    fn handle(&mut self, text: &str) {
        self(text)
    }
}
