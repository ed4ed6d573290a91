#[derive(Debug, Clone)]
pub enum FlashMessage {
    /// Flash every configured board entry concurrently.
    FlashAll,
    Completed {
        port: String,
        result: Result<(), String>,
    },
}
