pub mod app;
pub mod event;
pub mod mode;
pub mod render_state;
pub mod session;

pub use app::App;
pub use event::{AppEvent, Key};
pub use mode::AppMode;
pub use render_state::{RenderSink, RenderState};
pub use session::Session;
