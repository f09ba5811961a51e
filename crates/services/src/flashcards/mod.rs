mod service;
mod session;
mod view;

pub use service::FlashcardService;
pub use session::{CardFace, FlashcardReviewSession};
pub use view::FlashcardView;
