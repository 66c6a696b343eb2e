//! Subscription-side types: change streams and the batches they deliver.

mod batch;
mod stream;

pub use batch::ChangeBatch;
pub use stream::ChangeStream;
