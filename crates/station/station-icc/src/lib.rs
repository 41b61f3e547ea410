mod fanout;

pub use crossbeam_channel::{RecvTimeoutError, TryRecvError};
pub use fanout::{Fanout, PublishReport, SubscriberId, Subscription};
